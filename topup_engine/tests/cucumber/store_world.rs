use std::{path::PathBuf, sync::Arc};

use cucumber::World;
use log::*;
use serde_json::Value;
use tokio::sync::mpsc;
use topup_common::Secret;
use topup_engine::{
    db_types::Order,
    events::{EventProducer, EventProducers, OrderCreatedEvent, OrderUpdatedEvent},
    helpers::OrderIdGenerator,
    Catalog,
    DashboardApi,
    GatewayError,
    GatewayRedirect,
    GatewayTransaction,
    JsonFileStore,
    OrderFlowApi,
    OrderFlowError,
    PaymentGateway,
};

pub const SERVER_KEY: &str = "SB-Mid-server-cucumber";

#[derive(Default, Debug, World)]
pub struct StoreWorld {
    pub system: Option<StoreSystem>,
    pub cart: Vec<Value>,
    pub promo_code: Option<String>,
    pub last_order: Option<Order>,
    pub last_error: Option<OrderFlowError>,
}

#[derive(Debug)]
pub struct StoreSystem {
    pub orders_path: PathBuf,
    pub api: OrderFlowApi<JsonFileStore, StubGateway>,
    pub dashboard: DashboardApi<JsonFileStore>,
    pub created_events: mpsc::Receiver<OrderCreatedEvent>,
    pub updated_events: mpsc::Receiver<OrderUpdatedEvent>,
}

impl StoreWorld {
    pub fn system(&self) -> &StoreSystem {
        self.system.as_ref().expect("Store not initialised")
    }

    pub fn system_mut(&mut self) -> &mut StoreSystem {
        self.system.as_mut().expect("Store not initialised")
    }

    pub fn api(&self) -> &OrderFlowApi<JsonFileStore, StubGateway> {
        &self.system().api
    }

    pub fn order(&self) -> &Order {
        self.last_order.as_ref().expect("No order has been placed")
    }

    pub fn record(&mut self, result: Result<Order, OrderFlowError>) {
        match result {
            Ok(order) => {
                self.last_order = Some(order);
                self.last_error = None;
            },
            Err(e) => {
                debug!("🚀️ Operation failed: {e}");
                self.last_error = Some(e);
            },
        }
    }
}

/// Hands out a fake hosted payment page for every order.
#[derive(Debug, Clone, Default)]
pub struct StubGateway;

impl PaymentGateway for StubGateway {
    fn provider_name(&self) -> &'static str {
        "midtrans"
    }

    async fn create_transaction(&self, tx: GatewayTransaction) -> Result<GatewayRedirect, GatewayError> {
        Ok(GatewayRedirect {
            token: format!("snap-{}", tx.order_id),
            redirect_url: format!("https://app.sandbox.midtrans.com/snap/v4/redirection/{}", tx.order_id),
        })
    }
}

pub fn random_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("topup_cucumber_{}.json", rand::random::<u64>()))
}

impl StoreSystem {
    pub async fn new() -> Self {
        let orders_path = random_store_path();
        let store = JsonFileStore::open(&orders_path).await.expect("Error opening the orders file");
        debug!("Created order store: {}", orders_path.display());
        let (created_tx, created_events) = mpsc::channel(50);
        let (updated_tx, updated_events) = mpsc::channel(50);
        let producers = EventProducers {
            order_created_producer: vec![EventProducer::new(created_tx)],
            order_updated_producer: vec![EventProducer::new(updated_tx)],
        };
        let catalog = Arc::new(Catalog::builtin());
        let api = OrderFlowApi::new(store.clone(), catalog.clone(), producers, OrderIdGenerator::new())
            .with_gateway(StubGateway, Secret::new(SERVER_KEY.to_string()));
        let dashboard = DashboardApi::new(store, catalog);
        Self { orders_path, api, dashboard, created_events, updated_events }
    }
}
