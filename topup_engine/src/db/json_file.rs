use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::*;
use tokio::sync::RwLock;

use crate::{
    db::{OrderStore, StoreError},
    db_types::{Order, OrderId},
};

/// Persists orders as a single JSON array in one file.
///
/// The whole file is rewritten on every insert or replace, while the write lock is held, so the file always reflects
/// the in-memory list. Reads are served from memory. Clones share the same list and file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading any orders already saved there. A missing or empty file is an empty store.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let orders = match tokio::fs::read(&path).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(data) => serde_json::from_slice::<Vec<Order>>(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("🗄️ {} does not exist yet. Starting with no orders.", path.display());
                Vec::new()
            },
            Err(e) => return Err(e.into()),
        };
        info!("🗄️ Loaded {} orders from {}", orders.len(), path.display());
        Ok(Self { path: Arc::new(path), orders: Arc::new(RwLock::new(orders)) })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    async fn write_file(&self, orders: &[Order]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(orders)?;
        tokio::fs::write(self.path.as_path(), data).await?;
        trace!("🗄️ Wrote {} orders to {}", orders.len(), self.path.display());
        Ok(())
    }
}

impl OrderStore for JsonFileStore {
    type Error = StoreError;

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn insert_order(&self, order: Order) -> Result<(), Self::Error> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::OrderAlreadyExists(order.id));
        }
        orders.push(order);
        if let Err(e) = self.write_file(&orders).await {
            // Keep memory and disk in step
            orders.pop();
            error!("🗄️ Could not save new order to {}. {e}", self.path.display());
            return Err(e);
        }
        Ok(())
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, Self::Error> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, Self::Error> {
        Ok(self.orders.read().await.clone())
    }

    async fn replace_orders(&self, new_orders: Vec<Order>) -> Result<(), Self::Error> {
        let mut orders = self.orders.write().await;
        self.write_file(&new_orders).await.map_err(|e| {
            error!("🗄️ Could not save orders to {}. {e}", self.path.display());
            e
        })?;
        *orders = new_orders;
        Ok(())
    }
}
