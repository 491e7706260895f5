use mockall::mock;
use topup_engine::{
    db_types::{Order, OrderId},
    GatewayError,
    GatewayRedirect,
    GatewayTransaction,
    OrderStore,
    PaymentGateway,
    StoreError,
};

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        fn provider_name(&self) -> &'static str;
        async fn create_transaction(&self, transaction: GatewayTransaction) -> Result<GatewayRedirect, GatewayError>;
    }
}

mock! {
    pub Store {}
    impl Clone for Store {
        fn clone(&self) -> Self;
    }
    impl OrderStore for Store {
        type Error = StoreError;
        fn location(&self) -> String;
        async fn insert_order(&self, order: Order) -> Result<(), StoreError>;
        async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;
        async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError>;
        async fn replace_orders(&self, orders: Vec<Order>) -> Result<(), StoreError>;
    }
}
