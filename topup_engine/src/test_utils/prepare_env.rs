use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use log::*;
use topup_common::Rupiah;

use crate::db_types::{Order, OrderId, OrderItem, OrderStatusType, PaymentMethod};

pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

/// A path for a throwaway orders file in the system temp directory. The file is not created.
pub fn random_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("topup_orders_{}.json", rand::random::<u64>()))
}

/// A pending manual-transfer order for two 86 Diamond Mobile Legends packages.
pub fn sample_order(id: &str) -> Order {
    let price = Rupiah::from(18_000);
    let subtotal = price * 2;
    Order {
        id: OrderId::from(id),
        customer_name: "Budi".to_string(),
        email: "budi@example.com".to_string(),
        payment_method: PaymentMethod::ManualTransfer,
        promo_code: None,
        discount: Rupiah::default(),
        subtotal,
        total: subtotal,
        total_label: subtotal.to_string(),
        items: vec![OrderItem {
            game_id: "mlbb".to_string(),
            game_title: "Mobile Legends".to_string(),
            package_id: "dm-86".to_string(),
            package_name: "86 Diamond".to_string(),
            price,
            quantity: 2,
            subtotal,
        }],
        status: OrderStatusType::Pending,
        payment: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default(),
    }
}
