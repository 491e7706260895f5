//! #  Order storage
//!
//! This module defines the contract that order storage backends fulfil, and provides two backends:
//!
//! * [`MemoryOrderStore`] keeps orders in process memory. Everything is lost on restart.
//! * [`JsonFileStore`] keeps a copy in memory as well, but rewrites a single JSON file in full on every change, and reads
//!   it back on startup.
//!
//! The contract is deliberately narrow: append, look up by id, list everything and replace everything. Higher-level
//! flows (status updates, payment reconciliation) are built on top of these in
//! [`OrderFlowApi`](crate::OrderFlowApi).
mod errors;
mod json_file;
mod memory;
mod traits;

pub use errors::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryOrderStore;
pub use traits::OrderStore;
