use std::{fmt::Debug, sync::Arc};

use chrono::Utc;
use log::*;
use topup_common::Secret;

use crate::{
    catalog::Catalog,
    db::OrderStore,
    db_types::{Order, OrderId, OrderStatusType, PaymentRecord},
    engine_api::{
        errors::OrderFlowError,
        order_objects::{CheckoutRequest, CheckoutResult, OrderDraft, PaymentNotification},
    },
    events::{EventProducers, OrderCreatedEvent, OrderUpdatedEvent},
    gateway::{GatewayTransaction, PaymentGateway},
    helpers::OrderIdGenerator,
};

/// `OrderFlowApi` is the primary API for handling the order lifecycle: checkouts from the storefront, status changes
/// from the admin dashboard, and payment notifications from the gateway.
///
/// Status changes are a read-all, modify, replace-all sequence on the store. Two changes racing each other can lose
/// one of the writes.
pub struct OrderFlowApi<B, G> {
    store: B,
    catalog: Arc<Catalog>,
    gateway: Option<G>,
    notification_key: Option<Secret<String>>,
    producers: EventProducers,
    ids: OrderIdGenerator,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi (gateway configured: {})", self.gateway.is_some())
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(store: B, catalog: Arc<Catalog>, producers: EventProducers, ids: OrderIdGenerator) -> Self {
        Self { store, catalog, gateway: None, notification_key: None, producers, ids }
    }

    /// Enables the gateway-backed payment method. `notification_key` is the secret the gateway signs its notifications
    /// with. Without it, every notification is rejected.
    pub fn with_gateway(mut self, gateway: G, notification_key: Secret<String>) -> Self {
        self.gateway = Some(gateway);
        self.notification_key = Some(notification_key);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    fn call_order_created_hook(&self, order: &Order) {
        for emitter in &self.producers.order_created_producer {
            debug!("🔄️📦️ Notifying order created hook subscribers");
            emitter.publish_event(OrderCreatedEvent::new(order.clone()));
        }
    }

    fn call_order_updated_hook(&self, old_status: OrderStatusType, order: &Order) {
        for emitter in &self.producers.order_updated_producer {
            debug!("🔄️📝️ Notifying order updated hook subscribers");
            emitter.publish_event(OrderUpdatedEvent::new(old_status, order.clone()));
        }
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderStore,
    G: PaymentGateway,
{
    /// Validates, prices and stores a new order.
    ///
    /// For the gateway-backed payment method, a hosted payment session is created first. The order is only stored once
    /// that succeeds, so a gateway failure leaves nothing behind.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutResult, OrderFlowError> {
        let draft = OrderDraft::from_request(&request, &self.catalog)?;
        let id = self.ids.next_id();
        trace!("🔄️📦️ Checkout {id} priced at {} for {}", draft.total, draft.customer_name);
        let payment = if draft.payment_method.is_gateway_backed() {
            let gateway = self.gateway.as_ref().ok_or_else(|| {
                warn!("🔄️📦️ Checkout {id} asked for {} but no gateway is configured", draft.payment_method);
                OrderFlowError::GatewayNotConfigured
            })?;
            let transaction = GatewayTransaction {
                order_id: id.clone(),
                gross_amount: draft.total,
                customer_name: draft.customer_name.clone(),
                email: draft.email.clone(),
            };
            let redirect = gateway.create_transaction(transaction).await.map_err(|e| {
                warn!("🔄️💳️ Could not create a payment session for {id}. {e}");
                OrderFlowError::GatewayError(e.to_string())
            })?;
            debug!("🔄️💳️ Payment session created for {id}");
            let mut record = PaymentRecord::new(gateway.provider_name());
            record.token = Some(redirect.token);
            record.redirect_url = Some(redirect.redirect_url);
            Some(record)
        } else {
            None
        };
        let order = draft.into_order(id, payment, Utc::now());
        self.store.insert_order(order.clone()).await.map_err(store_error)?;
        info!("🔄️📦️ New order: {order}");
        self.call_order_created_hook(&order);
        let payment_url = order.payment.as_ref().and_then(|p| p.redirect_url.clone());
        Ok(CheckoutResult { order, payment_url })
    }

    /// Sets the status of an order. Any status can be set from any other; replaying the same update is harmless and
    /// emits another update event.
    pub async fn update_status(&self, order_id: &OrderId, status: &str) -> Result<Order, OrderFlowError> {
        let mut orders = self.store.fetch_orders().await.map_err(store_error)?;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        let new_status = status.parse::<OrderStatusType>().map_err(|e| OrderFlowError::validation(e.to_string()))?;
        let old_status = order.status;
        order.status = new_status;
        let updated = order.clone();
        self.store.replace_orders(orders).await.map_err(store_error)?;
        info!("🔄️📝️ Order {order_id} status changed from {old_status} to {new_status}");
        self.call_order_updated_hook(old_status, &updated);
        Ok(updated)
    }

    /// Applies a gateway payment notification to its order.
    ///
    /// The signature is checked before anything else. The gateway's transaction status is mapped onto an order status
    /// and recorded on the order's payment record. `paid_at` is only set when the order becomes paid.
    pub async fn process_payment_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<Order, OrderFlowError> {
        let (Some(gateway), Some(key)) = (self.gateway.as_ref(), self.notification_key.as_ref()) else {
            warn!("🔄️💳️ Payment notification for {} received, but no gateway is configured", notification.order_id);
            return Err(OrderFlowError::InvalidSignature);
        };
        if key.is_blank() || !notification.is_signature_valid(key.reveal()) {
            warn!("🔄️💳️ Payment notification for {} has an invalid signature", notification.order_id);
            return Err(OrderFlowError::InvalidSignature);
        }
        let order_id = notification.order_id();
        let mut orders = self.store.fetch_orders().await.map_err(store_error)?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        let new_status = notification.mapped_status();
        let old_status = order.status;
        order.status = new_status;
        let record = order.payment.get_or_insert_with(|| PaymentRecord::new(gateway.provider_name()));
        record.provider = gateway.provider_name().to_string();
        record.transaction_status = Some(notification.transaction_status.clone());
        if let Some(fraud_status) = notification.fraud_status {
            record.fraud_status = Some(fraud_status);
        }
        if let Some(transaction_id) = notification.transaction_id {
            record.transaction_id = Some(transaction_id);
        }
        if let Some(payment_type) = notification.payment_type {
            record.payment_type = Some(payment_type);
        }
        if new_status == OrderStatusType::Paid {
            record.paid_at = Some(Utc::now());
        }
        let updated = order.clone();
        self.store.replace_orders(orders).await.map_err(store_error)?;
        info!(
            "🔄️💳️ Payment notification for {order_id}: transaction is {}. Order status {old_status} -> {new_status}",
            notification.transaction_status
        );
        self.call_order_updated_hook(old_status, &updated);
        Ok(updated)
    }
}

fn store_error<E: std::error::Error>(e: E) -> OrderFlowError {
    error!("🔄️🗄️ Order store error. {e}");
    OrderFlowError::StoreError(e.to_string())
}
