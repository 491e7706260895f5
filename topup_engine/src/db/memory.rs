use std::sync::Arc;

use log::*;
use tokio::sync::RwLock;

use crate::{
    db::{OrderStore, StoreError},
    db_types::{Order, OrderId},
};

/// Keeps orders in memory. Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self { orders: Arc::new(RwLock::new(orders)) }
    }
}

impl OrderStore for MemoryOrderStore {
    type Error = StoreError;

    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn insert_order(&self, order: Order) -> Result<(), Self::Error> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::OrderAlreadyExists(order.id));
        }
        trace!("🗄️ Order {} stored in memory", order.id);
        orders.push(order);
        Ok(())
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, Self::Error> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, Self::Error> {
        Ok(self.orders.read().await.clone())
    }

    async fn replace_orders(&self, orders: Vec<Order>) -> Result<(), Self::Error> {
        *self.orders.write().await = orders;
        Ok(())
    }
}
