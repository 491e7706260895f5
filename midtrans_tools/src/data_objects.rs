use serde::{Deserialize, Serialize};

/// Request body for `POST /snap/v1/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapTransaction {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
}

impl SnapTransaction {
    pub fn new<S: Into<String>>(order_id: S, gross_amount: i64, first_name: S, email: S) -> Self {
        Self {
            transaction_details: TransactionDetails { order_id: order_id.into(), gross_amount },
            customer_details: CustomerDetails { first_name: first_name.into(), email: email.into() },
        }
    }
}

/// A successful Snap response. The customer completes payment on the hosted page at `redirect_url`; `token` can be
/// handed to the Snap JS widget instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapToken {
    pub token: String,
    pub redirect_url: String,
}
