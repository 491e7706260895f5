//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (the order store, the payment gateway) must be awaited,
//! never blocked on.
//!
//! All routes except `/` are mounted under the `/api` scope by the server.
use actix_web::{
    get,
    http::header::{CACHE_CONTROL, LOCATION},
    web,
    HttpRequest,
    HttpResponse,
    Responder,
};
use log::*;
use serde_json::json;
use topup_engine::{
    db_types::OrderId,
    order_objects::{CheckoutRequest, PaymentNotification},
    CatalogApi,
    DashboardApi,
    OrderFlowApi,
    OrderStore,
    PaymentGateway,
};

use crate::{
    config::ProxyConfig,
    data_objects::{
        DashboardResponse,
        NotificationReceipt,
        OrderCreatedResponse,
        OrderUpdatedResponse,
        OrdersResponse,
        StatusUpdateRequest,
    },
    errors::ServerError,
    helpers::get_remote_ip,
    notifications::{event_stream, Notification, NotificationHub, DASHBOARD_INIT_TOPIC},
};

pub const SERVICE_NAME: &str = "Top-up Store API";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({ "status": "OK", "service": SERVICE_NAME }))
}

/// The storefront UI is served separately. The root just points there.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Found().insert_header((LOCATION, "/store")).finish()
}

//----------------------------------------------   Catalog  ----------------------------------------------------
#[get("/games")]
pub async fn games(api: web::Data<CatalogApi>) -> impl Responder {
    trace!("💻️ GET games");
    HttpResponse::Ok().json(api.catalog())
}

#[get("/games/{slug}")]
pub async fn game_by_slug(path: web::Path<String>, api: web::Data<CatalogApi>) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    trace!("💻️ GET game {slug}");
    let game = api.product_by_slug(&slug).ok_or_else(|| {
        debug!("💻️ No game with slug {slug}");
        ServerError::NoRecordFound(format!("Game {slug} was not found"))
    })?;
    Ok(HttpResponse::Ok().json(json!({ "game": game })))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders => Get "/orders" impl OrderStore);
/// All orders, most recent first.
pub async fn orders<B: OrderStore>(api: web::Data<DashboardApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET orders");
    let orders = api.orders_newest_first().await.map_err(|e| {
        debug!("💻️ Could not fetch orders. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(OrdersResponse { orders }))
}

route!(checkout => Post "/orders" impl OrderStore, PaymentGateway);
/// Route handler for storefront checkouts.
///
/// Responds with 201 and the new order. For the Midtrans payment method, `paymentUrl` is the hosted payment page the
/// customer should be sent to.
pub async fn checkout<B, G>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    G: PaymentGateway,
{
    let request = body.into_inner();
    debug!(
        "💻️ POST checkout from {} via {}",
        request.customer_name.as_deref().unwrap_or("(no name)"),
        request.payment_method.as_deref().unwrap_or("(no payment method)")
    );
    let result = api.checkout(request).await.map_err(|e| {
        debug!("💻️ Checkout was not accepted. {e}");
        ServerError::from(e)
    })?;
    let response = OrderCreatedResponse {
        message: "Order created".to_string(),
        order: result.order,
        payment_url: result.payment_url,
    };
    Ok(HttpResponse::Created().json(response))
}

route!(update_order_status => Patch "/orders/{order_id}/status" impl OrderStore, PaymentGateway);
/// Route handler for admin status changes. Any status can be set, from any status.
pub async fn update_order_status<B, G>(
    path: web::Path<OrderId>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    let status = body.into_inner().status_text();
    debug!("💻️ PATCH status of {order_id} to '{status}'");
    let order = api.update_status(&order_id, &status).await.map_err(|e| {
        debug!("💻️ Could not update the status of {order_id}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(OrderUpdatedResponse { message: "Order status updated".to_string(), order }))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(payment_notification => Post "/payments/notification" impl OrderStore, PaymentGateway);
/// Route handler for Midtrans payment notifications.
///
/// Notifications are authenticated by their signature, not by where they come from. The remote address is only
/// logged.
pub async fn payment_notification<B, G>(
    req: HttpRequest,
    body: web::Json<PaymentNotification>,
    api: web::Data<OrderFlowApi<B, G>>,
    proxy: web::Data<ProxyConfig>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    G: PaymentGateway,
{
    let notification = body.into_inner();
    let remote = get_remote_ip(&req, proxy.use_x_forwarded_for, proxy.use_forwarded)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "an unknown address".to_string());
    info!(
        "💻️ Payment notification for {} ({}) from {remote}",
        notification.order_id, notification.transaction_status
    );
    api.process_payment_notification(notification).await.map_err(|e| {
        warn!("💻️ Payment notification from {remote} was rejected. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(NotificationReceipt { received: true }))
}

//----------------------------------------------   Dashboard  ----------------------------------------------------
route!(dashboard => Get "/dashboard" impl OrderStore);
pub async fn dashboard<B: OrderStore>(api: web::Data<DashboardApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET dashboard");
    let dashboard = api.snapshot().await.map_err(|e| {
        debug!("💻️ Could not compute the dashboard. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(DashboardResponse { dashboard }))
}

route!(events => Get "/events" impl OrderStore);
/// The live event stream. See [`crate::notifications`].
pub async fn events<B: OrderStore>(
    api: web::Data<DashboardApi<B>>,
    hub: web::Data<NotificationHub>,
) -> Result<HttpResponse, ServerError> {
    // Subscribe before taking the snapshot so that nothing falls in between
    let rx = hub.subscribe();
    let dashboard = api.snapshot().await?;
    let first = Notification::new(DASHBOARD_INIT_TOPIC, &dashboard)
        .map_err(|e| ServerError::BackendError(format!("Could not serialize the dashboard. {e}")))?;
    debug!("💻️ New event stream viewer. {} connected", hub.viewer_count());
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(event_stream(first, rx)))
}
