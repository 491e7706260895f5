use std::{fmt::Debug, sync::Arc};

use log::*;
use serde::{Deserialize, Serialize};
use topup_common::Rupiah;

use crate::{
    catalog::Catalog,
    db::OrderStore,
    db_types::{Order, OrderStatusType},
    engine_api::errors::OrderFlowError,
};

/// The admin dashboard summary. Recomputed from the full order book on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Number of products in the catalog.
    pub games: usize,
    pub total_orders: usize,
    /// Orders still waiting on a payment, from the merchant or the gateway.
    pub pending_orders: usize,
    pub completed_orders: usize,
    /// Sum of order totals over paid, processing and completed orders. Capped at the largest representable amount.
    pub revenue: Rupiah,
    pub revenue_label: String,
}

impl Dashboard {
    pub fn from_orders(catalog_size: usize, orders: &[Order]) -> Self {
        let pending_orders = orders.iter().filter(|o| o.status.is_awaiting_payment()).count();
        let completed_orders = orders.iter().filter(|o| o.status == OrderStatusType::Completed).count();
        let revenue = orders
            .iter()
            .filter(|o| o.status.is_paid_equivalent())
            .map(|o| o.total)
            .fold(Rupiah::default(), Rupiah::saturating_add);
        Self {
            games: catalog_size,
            total_orders: orders.len(),
            pending_orders,
            completed_orders,
            revenue,
            revenue_label: revenue.to_string(),
        }
    }
}

pub struct DashboardApi<B> {
    store: B,
    catalog: Arc<Catalog>,
}

impl<B> Debug for DashboardApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DashboardApi")
    }
}

impl<B> DashboardApi<B> {
    pub fn new(store: B, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }
}

impl<B> DashboardApi<B>
where B: OrderStore
{
    pub async fn snapshot(&self) -> Result<Dashboard, OrderFlowError> {
        let orders = self.fetch_orders().await?;
        let dashboard = Dashboard::from_orders(self.catalog.len(), &orders);
        trace!("📊️ Dashboard: {} orders, revenue {}", dashboard.total_orders, dashboard.revenue_label);
        Ok(dashboard)
    }

    /// All orders, most recent first.
    pub async fn orders_newest_first(&self) -> Result<Vec<Order>, OrderFlowError> {
        let mut orders = self.fetch_orders().await?;
        orders.reverse();
        Ok(orders)
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        self.store.fetch_orders().await.map_err(|e| {
            error!("📊️ Could not read orders from {}. {e}", self.store.location());
            OrderFlowError::StoreError(e.to_string())
        })
    }
}
