use std::sync::Arc;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::json;
use topup_engine::{
    db_types::{OrderId, OrderStatusType},
    events::EventProducers,
    helpers::OrderIdGenerator,
    test_utils::{sample_order, StubGateway, STUB_REDIRECT_URL},
    Catalog,
    DashboardApi,
    GatewayError,
    GatewayRedirect,
    MemoryOrderStore,
    OrderFlowApi,
    OrderStore,
    StoreError,
};
use topup_common::{Rupiah, Secret};

use super::{
    helpers::{get_request, json, orders_api, patch_request, post_request, SERVER_KEY},
    mocks::{MockGateway, MockStore},
};
use crate::routes::{CheckoutRoute, OrdersRoute, UpdateOrderStatusRoute};

fn checkout_body(payment_method: &str, promo_code: Option<&str>) -> serde_json::Value {
    json!({
        "customerName": "Budi",
        "email": "budi@example.com",
        "paymentMethod": payment_method,
        "promoCode": promo_code,
        "items": [
            { "gameId": "mlbb", "packageId": "dm-86", "quantity": 2 },
            { "gameId": "ff", "packageId": "ff-70", "quantity": "1" }
        ]
    })
}

fn configure_with(store: MemoryOrderStore, gateway: Option<StubGateway>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let dashboard_api = DashboardApi::new(store.clone(), Arc::new(Catalog::builtin()));
        let api = orders_api(store, gateway);
        cfg.service(CheckoutRoute::<MemoryOrderStore, StubGateway>::new())
            .service(UpdateOrderStatusRoute::<MemoryOrderStore, StubGateway>::new())
            .service(OrdersRoute::<MemoryOrderStore>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(dashboard_api));
    }
}

#[actix_web::test]
async fn manual_checkout() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let (status, body) = post_request(
        "/orders",
        checkout_body("Manual Transfer", Some("WELCOME10")),
        configure_with(store.clone(), Some(StubGateway::default())),
    )
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["message"], "Order created");
    assert!(body["paymentUrl"].is_null());
    let order = &body["order"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"], 45_500);
    assert_eq!(order["discount"], 4_550);
    assert_eq!(order["total"], 40_950);
    assert_eq!(order["promoCode"], "WELCOME10");
    assert_eq!(order["items"].as_array().map(|a| a.len()), Some(2));
    assert!(order["id"].as_str().is_some_and(|id| id.starts_with("ORD-")));

    let stored = store.fetch_orders().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total, Rupiah::from(40_950));
}

#[actix_web::test]
async fn midtrans_checkout_returns_a_payment_url() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (status, body) = post_request(
        "/orders",
        checkout_body("Midtrans", None),
        configure_with(store.clone(), Some(gateway.clone())),
    )
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["paymentUrl"], STUB_REDIRECT_URL);
    assert_eq!(body["order"]["status"], "waiting_payment");
    assert_eq!(body["order"]["payment"]["provider"], "stub");
    assert_eq!(body["order"]["payment"]["redirectUrl"], STUB_REDIRECT_URL);
    assert_eq!(gateway.calls(), 1);
}

#[actix_web::test]
async fn gateway_receives_the_order_total() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_provider_name().return_const("midtrans");
    gateway
        .expect_create_transaction()
        .withf(|tx| tx.gross_amount == Rupiah::from(38_675) && tx.customer_name == "Budi")
        .times(1)
        .returning(|tx| {
            Ok(GatewayRedirect {
                token: format!("snap-{}", tx.order_id),
                redirect_url: "https://app.sandbox.midtrans.com/snap/v2/vtweb/abc".into(),
            })
        });
    let configure = move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(
            MemoryOrderStore::new(),
            Arc::new(Catalog::builtin()),
            EventProducers::default(),
            OrderIdGenerator::new(),
        )
        .with_gateway(gateway, Secret::new(SERVER_KEY.to_string()));
        cfg.service(CheckoutRoute::<MemoryOrderStore, MockGateway>::new()).app_data(web::Data::new(api));
    };
    let (status, body) =
        post_request("/orders", checkout_body("Midtrans", Some("GAMENIGHT15")), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["paymentUrl"], "https://app.sandbox.midtrans.com/snap/v2/vtweb/abc");
    assert_eq!(body["order"]["payment"]["provider"], "midtrans");
}

#[actix_web::test]
async fn gateway_failure_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_provider_name().return_const("midtrans");
    gateway
        .expect_create_transaction()
        .returning(|_| Err(GatewayError("Midtrans responded with 401: Unknown Merchant server_key/id".into())));
    let store = MemoryOrderStore::new();
    let stored = store.clone();
    let configure = move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(store, Arc::new(Catalog::builtin()), EventProducers::default(), OrderIdGenerator::new())
            .with_gateway(gateway, Secret::new(SERVER_KEY.to_string()));
        cfg.service(CheckoutRoute::<MemoryOrderStore, MockGateway>::new()).app_data(web::Data::new(api));
    };
    let (status, body) = post_request("/orders", checkout_body("Midtrans", None), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json(&body)["message"].as_str().is_some_and(|m| m.contains("Unknown Merchant")));
    assert!(stored.fetch_orders().await.unwrap().is_empty());
}

#[actix_web::test]
async fn midtrans_checkout_without_a_gateway() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let (status, body) = post_request("/orders", checkout_body("Midtrans", None), configure_with(store.clone(), None))
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json(&body)["message"],
        "The Midtrans payment method is not available. No server key has been configured."
    );
    assert!(store.fetch_orders().await.unwrap().is_empty());
}

#[actix_web::test]
async fn incomplete_checkouts_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut body = checkout_body("QRIS", None);
    body["email"] = json!("   ");
    let (status, res) =
        post_request("/orders", body, configure_with(MemoryOrderStore::new(), None)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&res)["message"], "Order data is incomplete");

    let mut body = checkout_body("QRIS", None);
    body["items"] = json!([]);
    let (status, res) =
        post_request("/orders", body, configure_with(MemoryOrderStore::new(), None)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&res)["message"], "Order data is incomplete");
}

#[actix_web::test]
async fn unknown_items_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut body = checkout_body("E-Wallet", None);
    body["items"] = json!([{ "gameId": "dota", "packageId": "dm-86", "quantity": 1 }]);
    let (status, res) =
        post_request("/orders", body, configure_with(MemoryOrderStore::new(), None)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&res)["message"], "Order items are not valid");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let req = actix_web::test::TestRequest::post()
        .uri("/orders")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ \"customerName\": ");
    let (status, body) = super::helpers::send_request(req, configure_with(MemoryOrderStore::new(), None))
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["message"].as_str().is_some_and(|m| m.starts_with("Could not read request body")));
}

#[actix_web::test]
async fn orders_are_listed_newest_first() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::with_orders(vec![sample_order("ORD-1"), sample_order("ORD-2"), sample_order("ORD-3")]);
    let (status, body) = get_request("/orders", configure_with(store, None)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let ids = json(&body)["orders"]
        .as_array()
        .map(|orders| orders.iter().filter_map(|o| o["id"].as_str().map(String::from)).collect::<Vec<_>>())
        .unwrap_or_default();
    assert_eq!(ids, vec!["ORD-3", "ORD-2", "ORD-1"]);
}

#[actix_web::test]
async fn update_order_status() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::with_orders(vec![sample_order("ORD-1"), sample_order("ORD-2")]);
    let (status, body) =
        patch_request("/orders/ORD-2/status", json!({ "status": "processing" }), configure_with(store.clone(), None))
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["message"], "Order status updated");
    assert_eq!(body["order"]["status"], "processing");
    let order = store.fetch_order(&OrderId::from("ORD-2")).await.unwrap().expect("Order should exist");
    assert_eq!(order.status, OrderStatusType::Processing);
    let untouched = store.fetch_order(&OrderId::from("ORD-1")).await.unwrap().expect("Order should exist");
    assert_eq!(untouched.status, OrderStatusType::Pending);
}

#[actix_web::test]
async fn update_unknown_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) = patch_request(
        "/orders/ORD-404/status",
        json!({ "status": "nonsense" }),
        configure_with(MemoryOrderStore::new(), None),
    )
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["message"], "Order ORD-404 does not exist");
}

#[actix_web::test]
async fn unknown_order_is_reported_before_a_non_string_status() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::with_orders(vec![sample_order("ORD-1")]);
    let (status, body) =
        patch_request("/orders/ORD-404/status", json!({ "status": 5 }), configure_with(store.clone(), None))
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["message"], "Order ORD-404 does not exist");

    let (status, body) = patch_request("/orders/ORD-1/status", json!({ "status": 5 }), configure_with(store, None))
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["message"], "Invalid order status: 5");
}

#[actix_web::test]
async fn update_to_an_invalid_status() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::with_orders(vec![sample_order("ORD-1")]);
    for body in [json!({ "status": "refunded" }), json!({})] {
        let (status, res) = patch_request("/orders/ORD-1/status", body, configure_with(store.clone(), None))
            .await
            .expect("Request failed");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&res)["message"].as_str().is_some_and(|m| m.starts_with("Invalid order status")));
    }
    let order = store.fetch_order(&OrderId::from("ORD-1")).await.unwrap().expect("Order should exist");
    assert_eq!(order.status, OrderStatusType::Pending);
}

#[actix_web::test]
async fn storage_failures_are_server_errors() {
    let _ = env_logger::try_init().ok();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockStore::new();
        store.expect_fetch_orders().returning(|| Ok(vec![sample_order("ORD-1")]));
        store.expect_insert_order().returning(|_| {
            Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "No space left on device")))
        });
        let api = OrderFlowApi::<MockStore, StubGateway>::new(
            store,
            Arc::new(Catalog::builtin()),
            EventProducers::default(),
            OrderIdGenerator::new(),
        );
        cfg.service(CheckoutRoute::<MockStore, StubGateway>::new()).app_data(web::Data::new(api));
    };
    let (status, body) =
        post_request("/orders", checkout_body("Manual Transfer", None), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["message"].as_str().is_some_and(|m| m.contains("No space left on device")));
}
