//! Top-up Store Engine
//!
//! The engine holds the core logic of the top-up store: the product catalog, order checkout and pricing, order status
//! management and reconciliation of payment gateway notifications. It is storage- and gateway-agnostic.
//!
//! The library is divided into these main sections:
//! 1. Order storage ([`mod@db`]). The [`OrderStore`] trait is the narrow contract every backend implements. An
//!    in-memory backend and a single-JSON-file backend are provided.
//! 2. The engine public API ([`mod@engine_api`]). [`OrderFlowApi`] handles checkouts, status updates and gateway
//!    notifications; [`DashboardApi`] and [`CatalogApi`] are read-only.
//! 3. The [`PaymentGateway`] trait, which a gateway adapter must implement for the gateway-backed payment method.
//!
//! The engine also emits events when orders are created or updated. See [`mod@events`] for how to hook into them.
mod db;
mod engine_api;

pub mod catalog;
pub mod db_types;
pub mod events;
pub mod gateway;
pub mod helpers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use catalog::{Catalog, CatalogError};
pub use db::{JsonFileStore, MemoryOrderStore, OrderStore, StoreError};
pub use engine_api::{
    catalog_api::CatalogApi,
    dashboard_api::{Dashboard, DashboardApi},
    errors::OrderFlowError,
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use gateway::{GatewayError, GatewayRedirect, GatewayTransaction, PaymentGateway};
