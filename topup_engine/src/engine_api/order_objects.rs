use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use topup_common::Rupiah;

use crate::{
    catalog::Catalog,
    db_types::{Order, OrderId, OrderItem, OrderStatusType, PaymentMethod, PaymentRecord, PromotionCode},
    engine_api::errors::OrderFlowError,
    helpers::verify_notification_signature,
};

pub const INCOMPLETE_ORDER_MESSAGE: &str = "Order data is incomplete";
pub const INVALID_ITEMS_MESSAGE: &str = "Order items are not valid";

//--------------------------------------   CheckoutRequest     ---------------------------------------------------------
/// A checkout as submitted by the storefront.
///
/// The fields are deliberately loose: anything missing or of the wrong shape in `items` is dealt with during
/// validation rather than rejected by the deserializer, so that partly-valid carts can still be checked out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<String>,
    pub promo_code: Option<String>,
    #[serde(default)]
    pub items: Value,
}

/// A cart line that refers to a catalog entry. It has not been checked against the catalog yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutItem {
    pub game_id: String,
    pub package_id: String,
    pub quantity: i64,
}

impl CheckoutItem {
    /// Reads a single element of the `items` array. Returns `None` if it is not an object or is missing either id.
    /// `productId` is accepted in place of `gameId`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let item = value.as_object()?;
        let game_id = item.get("gameId").or_else(|| item.get("productId"))?.as_str()?;
        let package_id = item.get("packageId")?.as_str()?;
        let quantity = coerce_quantity(item.get("quantity"));
        Some(Self { game_id: game_id.to_string(), package_id: package_id.to_string(), quantity })
    }
}

/// Turns whatever the client sent as a quantity into a whole number of at least 1.
///
/// Numbers are truncated towards zero and numeric strings are parsed first. Anything else (missing, `null`, booleans,
/// text) counts as 1, as does any result below 1.
pub fn coerce_quantity(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(truncate)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(truncate))
        },
        _ => None,
    };
    parsed.unwrap_or(1).max(1)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to 0
    f.trunc() as i64
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

//--------------------------------------      OrderDraft       ---------------------------------------------------------
/// A checkout that has been validated and priced, but not yet assigned an id or stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_name: String,
    pub email: String,
    pub payment_method: PaymentMethod,
    pub promotion: Option<PromotionCode>,
    pub items: Vec<OrderItem>,
    pub subtotal: Rupiah,
    pub discount: Rupiah,
    pub total: Rupiah,
}

impl OrderDraft {
    /// Validates the request and prices it against `catalog`.
    ///
    /// Items that do not resolve to a catalog product and package are dropped. If none are left, the checkout fails.
    pub fn from_request(request: &CheckoutRequest, catalog: &Catalog) -> Result<Self, OrderFlowError> {
        let (Some(customer_name), Some(email), Some(payment_method)) =
            (required(&request.customer_name), required(&request.email), required(&request.payment_method))
        else {
            return Err(OrderFlowError::validation(INCOMPLETE_ORDER_MESSAGE));
        };
        let requested = match request.items.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(OrderFlowError::validation(INCOMPLETE_ORDER_MESSAGE)),
        };
        let payment_method =
            payment_method.parse::<PaymentMethod>().map_err(|e| OrderFlowError::validation(e.to_string()))?;

        let items = requested
            .iter()
            .filter_map(CheckoutItem::from_json)
            .filter_map(|item| price_item(catalog, &item))
            .collect::<Result<Vec<_>, _>>()?;
        if items.is_empty() {
            return Err(OrderFlowError::validation(INVALID_ITEMS_MESSAGE));
        }
        let subtotal = items
            .iter()
            .try_fold(Rupiah::default(), |acc, item| acc.checked_add(item.subtotal))
            .ok_or_else(|| OrderFlowError::validation("The order total is too large"))?;
        let promotion = request.promo_code.as_deref().and_then(|code| catalog.promotion(code)).cloned();
        let discount = promotion.as_ref().map(|p| subtotal.percentage(p.percentage)).unwrap_or_default();
        let total = subtotal - discount;
        Ok(Self {
            customer_name: customer_name.to_string(),
            email: email.to_string(),
            payment_method,
            promotion,
            items,
            subtotal,
            discount,
            total,
        })
    }

    pub fn initial_status(&self) -> OrderStatusType {
        self.payment_method.initial_status()
    }

    pub fn into_order(self, id: OrderId, payment: Option<PaymentRecord>, created_at: DateTime<Utc>) -> Order {
        let status = self.initial_status();
        Order {
            id,
            customer_name: self.customer_name,
            email: self.email,
            payment_method: self.payment_method,
            promo_code: self.promotion.map(|p| p.code),
            discount: self.discount,
            subtotal: self.subtotal,
            total: self.total,
            total_label: self.total.to_string(),
            items: self.items,
            status,
            payment,
            created_at,
        }
    }
}

/// Returns `None` for items that are not in the catalog, and an error if the line total overflows.
fn price_item(catalog: &Catalog, item: &CheckoutItem) -> Option<Result<OrderItem, OrderFlowError>> {
    let (product, package) = catalog.resolve(&item.game_id, &item.package_id)?;
    let subtotal = package.price.checked_mul(item.quantity).ok_or_else(|| {
        OrderFlowError::validation(format!("The quantity for {} is too large", package.name))
    });
    Some(subtotal.map(|subtotal| OrderItem {
        game_id: product.id.clone(),
        game_title: product.title.clone(),
        package_id: package.id.clone(),
        package_name: package.name.clone(),
        price: package.price,
        quantity: item.quantity,
        subtotal,
    }))
}

//--------------------------------------    CheckoutResult     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub order: Order,
    /// The hosted payment page for gateway-backed orders.
    pub payment_url: Option<String>,
}

//--------------------------------------  PaymentNotification  ---------------------------------------------------------
/// A transaction status notification from the payment gateway.
///
/// Missing fields deserialize as empty strings, so that an incomplete notification fails the signature check
/// rather than being rejected as malformed. `status_code` and `gross_amount` are kept exactly as sent, since they are
/// part of the signed message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gross_amount: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub signature_key: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

impl PaymentNotification {
    pub fn order_id(&self) -> OrderId {
        OrderId::from(self.order_id.as_str())
    }

    pub fn is_signature_valid(&self, server_key: &str) -> bool {
        verify_notification_signature(
            &self.order_id,
            &self.status_code,
            &self.gross_amount,
            server_key,
            &self.signature_key,
        )
    }

    pub fn mapped_status(&self) -> OrderStatusType {
        OrderStatusType::from_transaction_status(&self.transaction_status)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected a string or a number, got {other}"))),
    }
}
