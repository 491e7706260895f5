use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
pub use topup_common::Rupiah;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// Waiting for the merchant to confirm a manual payment.
    Pending,
    /// Handed to the payment gateway. Waiting for the customer to pay.
    WaitingPayment,
    /// Payment has been received.
    Paid,
    /// The top-up is being delivered.
    Processing,
    /// The top-up has been delivered.
    Completed,
    /// The order was cancelled by an admin, or the payment was denied or expired.
    Cancelled,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 6] = [
        OrderStatusType::Pending,
        OrderStatusType::WaitingPayment,
        OrderStatusType::Paid,
        OrderStatusType::Processing,
        OrderStatusType::Completed,
        OrderStatusType::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatusType::Pending => "pending",
            OrderStatusType::WaitingPayment => "waiting_payment",
            OrderStatusType::Paid => "paid",
            OrderStatusType::Processing => "processing",
            OrderStatusType::Completed => "completed",
            OrderStatusType::Cancelled => "cancelled",
        }
    }

    /// Maps a gateway `transaction_status` onto an order status.
    ///
    /// | transaction_status           | order status      |
    /// |------------------------------|-------------------|
    /// | settlement, capture          | `paid`            |
    /// | pending                      | `waiting_payment` |
    /// | expire, cancel, deny         | `cancelled`       |
    /// | anything else                | `pending`         |
    pub fn from_transaction_status(transaction_status: &str) -> Self {
        match transaction_status {
            "settlement" | "capture" => OrderStatusType::Paid,
            "pending" => OrderStatusType::WaitingPayment,
            "expire" | "cancel" | "deny" => OrderStatusType::Cancelled,
            _ => OrderStatusType::Pending,
        }
    }

    /// True for the statuses whose order totals count towards revenue.
    pub fn is_paid_equivalent(&self) -> bool {
        matches!(self, OrderStatusType::Paid | OrderStatusType::Processing | OrderStatusType::Completed)
    }

    /// True for the statuses that still need someone (the merchant or the customer) to act on a payment.
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(self, OrderStatusType::Pending | OrderStatusType::WaitingPayment)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatusType::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ConversionError(format!("Invalid order status: {s}")))
    }
}

//--------------------------------------    PaymentMethod      ---------------------------------------------------------
/// The payment methods the store accepts. Exactly one of them, [`PaymentMethod::Midtrans`], is gateway-backed; the
/// rest are confirmed manually by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Manual Transfer")]
    ManualTransfer,
    #[serde(rename = "E-Wallet")]
    EWallet,
    #[serde(rename = "QRIS")]
    Qris,
    #[serde(rename = "Midtrans")]
    Midtrans,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] =
        [PaymentMethod::ManualTransfer, PaymentMethod::EWallet, PaymentMethod::Qris, PaymentMethod::Midtrans];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::ManualTransfer => "Manual Transfer",
            PaymentMethod::EWallet => "E-Wallet",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::Midtrans => "Midtrans",
        }
    }

    pub fn is_gateway_backed(&self) -> bool {
        matches!(self, PaymentMethod::Midtrans)
    }

    /// Gateway-backed orders wait for the gateway to report a payment. Everything else waits for the merchant.
    pub fn initial_status(&self) -> OrderStatusType {
        if self.is_gateway_backed() {
            OrderStatusType::WaitingPayment
        } else {
            OrderStatusType::Pending
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    /// Matching ignores case and surrounding whitespace, so "manual transfer" and "Manual Transfer" are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConversionError(format!("Unsupported payment method: {s}")))
    }
}

//--------------------------------------       Catalog         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub genre: String,
    pub image: String,
    pub price_from: Rupiah,
    /// Display-only discount badge. It does not affect pricing.
    pub discount: u8,
    pub rating: f64,
    pub sold: u64,
    pub description: String,
    pub packages: Vec<Package>,
}

impl Product {
    pub fn package(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == package_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: Rupiah,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionCode {
    pub code: String,
    pub label: String,
    pub percentage: u8,
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
/// A line item, frozen at checkout. Later catalog changes do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub game_id: String,
    pub game_title: String,
    pub package_id: String,
    pub package_name: String,
    pub price: Rupiah,
    pub quantity: i64,
    pub subtotal: Rupiah,
}

//--------------------------------------     PaymentRecord     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub provider: String,
    pub token: Option<String>,
    pub redirect_url: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_status: Option<String>,
    pub fraud_status: Option<String>,
    /// How the customer paid at the gateway, e.g. `qris` or `bank_transfer`.
    #[serde(default)]
    pub payment_type: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    pub fn new<S: Into<String>>(provider: S) -> Self {
        Self {
            provider: provider.into(),
            token: None,
            redirect_url: None,
            transaction_id: None,
            transaction_status: None,
            fraud_status: None,
            payment_type: None,
            paid_at: None,
        }
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
    pub discount: Rupiah,
    pub subtotal: Rupiah,
    pub total: Rupiah,
    pub total_label: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatusType,
    pub payment: Option<PaymentRecord>,
    pub created_at: DateTime<Utc>,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} for {} <{}>: {} item(s), total {} via {} [{}]",
            self.id,
            self.customer_name,
            self.email,
            self.items.len(),
            self.total,
            self.payment_method,
            self.status
        )
    }
}
