use crate::db_types::{Order, OrderId};

/// This trait defines the behaviour of order storage backends.
///
/// Orders are kept in the order they were inserted. Orders are never deleted; changes are made by reading all orders,
/// modifying the ones that need changing and writing the full list back with [`OrderStore::replace_orders`].
///
/// Backends are not required to make a read-modify-write sequence atomic. Two concurrent writers can lose an update.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    type Error: std::error::Error;

    /// A human-readable description of where the orders live, for logging.
    fn location(&self) -> String;

    /// Appends a brand-new order. If an order with the same id already exists, an error is returned and nothing is
    /// stored.
    async fn insert_order(&self, order: Order) -> Result<(), Self::Error>;

    /// Fetches the order with the given id, if it exists.
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, Self::Error>;

    /// Fetches every order, oldest first.
    async fn fetch_orders(&self) -> Result<Vec<Order>, Self::Error>;

    /// Replaces the full set of orders with `orders`.
    async fn replace_orders(&self, orders: Vec<Order>) -> Result<(), Self::Error>;
}
