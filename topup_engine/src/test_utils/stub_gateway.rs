use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::gateway::{GatewayError, GatewayRedirect, GatewayTransaction, PaymentGateway};

pub const STUB_REDIRECT_URL: &str = "https://pay.example.com/snap/v2/vtweb/stub-token";

/// A payment gateway that never leaves the process. It either always succeeds or always fails, and counts how many
/// sessions it was asked to create.
#[derive(Debug, Clone, Default)]
pub struct StubGateway {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    pub fn failing() -> Self {
        Self { fail: true, calls: Arc::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for StubGateway {
    fn provider_name(&self) -> &'static str {
        "stub"
    }

    async fn create_transaction(&self, transaction: GatewayTransaction) -> Result<GatewayRedirect, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError(format!("Stub gateway refused {}", transaction.order_id)));
        }
        Ok(GatewayRedirect { token: format!("token-{}", transaction.order_id), redirect_url: STUB_REDIRECT_URL.into() })
    }
}
