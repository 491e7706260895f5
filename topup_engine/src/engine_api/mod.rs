//! # Top-up engine public API
//!
//! * [`order_flow_api`] is the primary API. It handles checkouts, admin status changes and payment gateway
//!   notifications.
//! * [`dashboard_api`] aggregates the order book into the admin dashboard summary.
//! * [`catalog_api`] serves the read-only product catalog.
//!
//! Every API is created by handing it a backend that implements [`crate::OrderStore`]. Clones of a backend share the
//! same data, so each API can get its own clone.
//!
//! ```rust,ignore
//! use topup_engine::{Catalog, DashboardApi, MemoryOrderStore};
//! let store = MemoryOrderStore::new();
//! let api = DashboardApi::new(store, Arc::new(Catalog::builtin()));
//! let dashboard = api.snapshot().await?;
//! ```
pub mod catalog_api;
pub mod dashboard_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
