//! A small async client for the parts of the Midtrans API the top-up store needs.
//!
//! Only Snap transaction creation is supported. Incoming payment notifications are verified by the payment engine,
//! not here, since the engine owns the reconciliation logic.
mod api;
mod config;
mod error;
mod helpers;

pub mod data_objects;

pub use api::MidtransApi;
pub use config::{MidtransConfig, PRODUCTION_SNAP_URL, SANDBOX_SNAP_URL};
pub use data_objects::{CustomerDetails, SnapToken, SnapTransaction, TransactionDetails};
pub use error::MidtransApiError;
pub use helpers::basic_auth_header;
