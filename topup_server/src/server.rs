use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use topup_engine::{
    events::EventProducers,
    helpers::OrderIdGenerator,
    Catalog,
    CatalogApi,
    DashboardApi,
    JsonFileStore,
    MemoryOrderStore,
    OrderFlowApi,
    OrderStore,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::midtrans::MidtransGateway,
    notifications::{create_notification_handlers, NotificationHub},
    routes::{
        game_by_slug,
        games,
        health,
        index,
        CheckoutRoute,
        DashboardRoute,
        EventsRoute,
        OrdersRoute,
        PaymentNotificationRoute,
        UpdateOrderStatusRoute,
    },
};

/// Everything the workers share, regardless of which order store is in use.
#[derive(Clone)]
struct SharedState {
    catalog: Arc<Catalog>,
    hub: NotificationHub,
    producers: EventProducers,
    gateway: Option<MidtransGateway>,
    ids: OrderIdGenerator,
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let catalog = match &config.catalog_file {
        Some(path) => Catalog::from_json_file(path)?,
        None => {
            info!("🗂️ Using the built-in catalog");
            Catalog::builtin()
        },
    };
    let hub = NotificationHub::new(config.event_buffer_size);
    let handlers = create_notification_handlers(hub.clone(), config.event_buffer_size);
    let producers = handlers.producers();
    handlers.start_handlers();
    let state = SharedState {
        catalog: Arc::new(catalog),
        hub,
        producers,
        gateway: MidtransGateway::from_config(&config.midtrans),
        ids: OrderIdGenerator::new(),
    };
    let srv = match config.orders_file.clone() {
        Some(path) => {
            let store = JsonFileStore::open(&path).await?;
            create_server_instance(config, store, state)?
        },
        None => create_server_instance(config, MemoryOrderStore::new(), state)?,
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

fn create_server_instance<B>(config: ServerConfig, store: B, state: SharedState) -> Result<Server, ServerError>
where B: OrderStore + Send + 'static {
    info!("🗄️ Orders are kept in {}", store.location());
    let proxy = config.proxy_config();
    let notification_key = config.midtrans.server_key.clone();
    let srv = HttpServer::new(move || {
        let mut orders_api =
            OrderFlowApi::new(store.clone(), state.catalog.clone(), state.producers.clone(), state.ids.clone());
        if let Some(gateway) = state.gateway.clone() {
            orders_api = orders_api.with_gateway(gateway, notification_key.clone());
        }
        let dashboard_api = DashboardApi::new(store.clone(), state.catalog.clone());
        let catalog_api = CatalogApi::new(state.catalog.clone());
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into());
        let api_scope = web::scope("/api")
            .service(health)
            .service(games)
            .service(game_by_slug)
            .service(OrdersRoute::<B>::new())
            .service(CheckoutRoute::<B, MidtransGateway>::new())
            .service(UpdateOrderStatusRoute::<B, MidtransGateway>::new())
            .service(PaymentNotificationRoute::<B, MidtransGateway>::new())
            .service(DashboardRoute::<B>::new())
            .service(EventsRoute::<B>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("topup::access_log"))
            .app_data(json_config)
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(dashboard_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(state.hub.clone()))
            .app_data(web::Data::new(proxy))
            .service(api_scope)
            .service(index)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
