//! # Top-up store server
//! This crate hosts the HTTP server for the top-up store. It is responsible for:
//! * Serving the product catalog to the storefront.
//! * Accepting checkouts and, for the Midtrans payment method, creating the hosted payment session.
//! * Receiving Midtrans payment notifications and reconciling them with orders.
//! * Serving the admin dashboard: the order list, status changes and summary figures.
//! * Pushing order events to connected dashboards over Server-Sent Events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /api/health`: Health check.
//! * `GET /api/games`, `GET /api/games/{slug}`: The catalog.
//! * `GET /api/orders`, `POST /api/orders`, `PATCH /api/orders/{id}/status`: Orders.
//! * `GET /api/dashboard`: Dashboard summary.
//! * `POST /api/payments/notification`: Midtrans payment notifications.
//! * `GET /api/events`: The live event stream.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod notifications;
pub mod routes;
pub mod server;
