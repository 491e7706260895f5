use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order already exists. Order.id = {0}")]
    OrderAlreadyExists(OrderId),
    #[error("Could not access the order file. {0}")]
    Io(#[from] std::io::Error),
    #[error("The order file is corrupt. {0}")]
    Serialization(#[from] serde_json::Error),
}
