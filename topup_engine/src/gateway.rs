//! The contract between the engine and a hosted payment page provider.
//!
//! The engine only needs one thing from a gateway: given an order, create a hosted payment session and hand back a
//! token and the URL the customer should be redirected to. Payment results arrive later, asynchronously, as signed
//! notifications (see [`crate::OrderFlowApi::process_payment_notification`]).
use serde::{Deserialize, Serialize};
use thiserror::Error;
use topup_common::Rupiah;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct GatewayError(pub String);

impl From<String> for GatewayError {
    fn from(e: String) -> Self {
        Self(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayTransaction {
    pub order_id: OrderId,
    pub gross_amount: Rupiah,
    pub customer_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRedirect {
    pub token: String,
    pub redirect_url: String,
}

#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The name recorded as `payment.provider` on orders that go through this gateway.
    fn provider_name(&self) -> &'static str;

    async fn create_transaction(&self, transaction: GatewayTransaction) -> Result<GatewayRedirect, GatewayError>;
}
