use cucumber::{given, then, when};
use serde_json::json;
use topup_common::Rupiah;
use topup_engine::{
    db_types::OrderStatusType,
    helpers::notification_signature,
    order_objects::{CheckoutRequest, PaymentNotification},
    OrderFlowError,
    OrderStore,
};

use crate::cucumber::{store_world::SERVER_KEY, StoreWorld};

#[given(expr = "a cart with {int} x {word} {word}")]
async fn add_to_cart(world: &mut StoreWorld, quantity: i64, game_id: String, package_id: String) {
    world.cart.push(json!({ "gameId": game_id, "packageId": package_id, "quantity": quantity }));
}

#[given(expr = "a cart item for {word} {word} with quantity {string}")]
async fn add_to_cart_raw_quantity(world: &mut StoreWorld, game_id: String, package_id: String, quantity: String) {
    world.cart.push(json!({ "gameId": game_id, "packageId": package_id, "quantity": quantity }));
}

#[given(expr = "the promo code {word}")]
async fn use_promo(world: &mut StoreWorld, code: String) {
    world.promo_code = Some(code);
}

#[when(expr = "{string} checks out with {string}")]
async fn checkout(world: &mut StoreWorld, customer: String, method: String) {
    let request = CheckoutRequest {
        customer_name: Some(customer.clone()),
        email: Some(format!("{}@example.com", customer.to_lowercase())),
        payment_method: Some(method),
        promo_code: world.promo_code.take(),
        items: json!(std::mem::take(&mut world.cart)),
    };
    let result = world.api().checkout(request).await.map(|r| r.order);
    world.record(result);
}

#[when(expr = "the admin sets the order status to {word}")]
async fn admin_sets_status(world: &mut StoreWorld, status: String) {
    let id = world.order().id.clone();
    let result = world.api().update_status(&id, &status).await;
    world.record(result);
}

#[when(expr = "the gateway reports {word} for the order")]
async fn gateway_reports(world: &mut StoreWorld, transaction_status: String) {
    send_notification(world, transaction_status, SERVER_KEY).await;
}

#[when(expr = "a forged notification reports {word} for the order")]
async fn forged_notification(world: &mut StoreWorld, transaction_status: String) {
    send_notification(world, transaction_status, "not-the-server-key").await;
}

async fn send_notification(world: &mut StoreWorld, transaction_status: String, key: &str) {
    let order = world.order();
    let gross_amount = format!("{}.00", order.total.value());
    let notification = PaymentNotification {
        order_id: order.id.to_string(),
        status_code: "200".into(),
        signature_key: notification_signature(order.id.as_str(), "200", &gross_amount, key),
        gross_amount,
        transaction_status,
        fraud_status: Some("accept".into()),
        transaction_id: Some(format!("tx-{}", order.id)),
        payment_type: Some("qris".into()),
    };
    let result = world.api().process_payment_notification(notification).await;
    world.record(result);
}

#[when(expr = "{string} places an order for {int} x {word} {word} that becomes {word}")]
async fn order_with_status(
    world: &mut StoreWorld,
    customer: String,
    quantity: i64,
    game_id: String,
    package_id: String,
    status: String,
) {
    add_to_cart(world, quantity, game_id, package_id).await;
    checkout(world, customer, "Manual Transfer".into()).await;
    admin_sets_status(world, status).await;
    assert!(world.last_error.is_none(), "Order could not be placed: {:?}", world.last_error);
}

#[then(expr = "the order subtotal is {int}")]
async fn check_subtotal(world: &mut StoreWorld, value: i64) {
    assert_eq!(world.order().subtotal, Rupiah::from(value), "Subtotal is incorrect");
}

#[then(expr = "the order discount is {int}")]
async fn check_discount(world: &mut StoreWorld, value: i64) {
    assert_eq!(world.order().discount, Rupiah::from(value), "Discount is incorrect");
}

#[then(expr = "the order total is {int}")]
async fn check_total(world: &mut StoreWorld, value: i64) {
    let order = world.order();
    assert_eq!(order.total, Rupiah::from(value), "Total is incorrect");
    assert_eq!(order.total, order.subtotal - order.discount);
}

#[then(expr = "the order status is {word}")]
async fn check_status(world: &mut StoreWorld, status: String) {
    assert!(world.last_error.is_none(), "Last operation failed: {:?}", world.last_error);
    assert_eq!(world.order().status.as_str(), status);
}

#[then(expr = "the order has {int} item(s)")]
async fn check_item_count(world: &mut StoreWorld, count: usize) {
    assert_eq!(world.order().items.len(), count);
}

#[then(expr = "the stored order status is {word}")]
async fn check_stored_status(world: &mut StoreWorld, status: String) {
    let id = world.order().id.clone();
    let stored = world.api().store().fetch_order(&id).await.expect("Error fetching order").expect("Order not stored");
    assert_eq!(stored.status, status.parse::<OrderStatusType>().expect("Not a valid status"));
}

#[then(expr = "the order payment has a paid-at time")]
async fn check_paid_at(world: &mut StoreWorld) {
    let payment = world.order().payment.as_ref().expect("Order has no payment record");
    assert!(payment.paid_at.is_some(), "paidAt is not set");
}

#[then(expr = "the order payment has no paid-at time")]
async fn check_no_paid_at(world: &mut StoreWorld) {
    let paid_at = world.order().payment.as_ref().and_then(|p| p.paid_at);
    assert!(paid_at.is_none(), "paidAt is set");
}

#[then(expr = "the order has a payment page")]
async fn check_payment_page(world: &mut StoreWorld) {
    let payment = world.order().payment.as_ref().expect("Order has no payment record");
    assert!(payment.redirect_url.as_deref().is_some_and(|u| u.starts_with("https://")));
}

#[then(expr = "it fails with {string}")]
async fn check_failure(world: &mut StoreWorld, message: String) {
    let err = world.last_error.as_ref().expect("Operation did not fail");
    assert!(err.to_string().contains(&message), "Unexpected error: {err}");
}

#[then(expr = "the notification is rejected as unauthorized")]
async fn check_unauthorized(world: &mut StoreWorld) {
    assert!(matches!(world.last_error, Some(OrderFlowError::InvalidSignature)), "{:?}", world.last_error);
}

#[then(expr = "the store has {int} order(s)")]
async fn check_order_count(world: &mut StoreWorld, count: usize) {
    let orders = world.api().store().fetch_orders().await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "{int} order created event(s) was/were emitted")]
async fn check_created_events(world: &mut StoreWorld, count: usize) {
    let rx = &mut world.system_mut().created_events;
    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, count, "Wrong number of order created events");
}

#[then(expr = "{int} order updated event(s) was/were emitted")]
async fn check_updated_events(world: &mut StoreWorld, count: usize) {
    let rx = &mut world.system_mut().updated_events;
    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, count, "Wrong number of order updated events");
}

#[then(expr = "the dashboard revenue is {int}")]
async fn check_revenue(world: &mut StoreWorld, value: i64) {
    let dashboard = world.system().dashboard.snapshot().await.expect("Error computing dashboard");
    assert_eq!(dashboard.revenue, Rupiah::from(value), "Revenue is incorrect");
}

#[then(expr = "the dashboard shows {int} orders, {int} pending and {int} completed")]
async fn check_dashboard_counts(world: &mut StoreWorld, total: usize, pending: usize, completed: usize) {
    let dashboard = world.system().dashboard.snapshot().await.expect("Error computing dashboard");
    assert_eq!(dashboard.total_orders, total);
    assert_eq!(dashboard.pending_orders, pending);
    assert_eq!(dashboard.completed_orders, completed);
}
