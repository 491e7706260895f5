use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The notification signature is invalid")]
    InvalidSignature,
    #[error("The payment gateway has not been configured")]
    GatewayNotConfigured,
    #[error("The payment gateway could not process the request. {0}")]
    GatewayError(String),
    #[error("Order store error: {0}")]
    StoreError(String),
}

impl OrderFlowError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }
}
