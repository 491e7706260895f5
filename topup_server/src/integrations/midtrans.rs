use log::*;
use midtrans_tools::{MidtransApi, MidtransApiError, MidtransConfig, SnapTransaction};
use topup_engine::{GatewayError, GatewayRedirect, GatewayTransaction, PaymentGateway};

pub const MIDTRANS_PROVIDER: &str = "midtrans";

/// Connects the engine's [`PaymentGateway`] contract to Midtrans Snap.
#[derive(Clone)]
pub struct MidtransGateway {
    api: MidtransApi,
}

impl MidtransGateway {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let api = MidtransApi::new(config)?;
        Ok(Self { api })
    }

    /// Returns `None`, with a log message, if Midtrans has not been configured or the client could not be built.
    pub fn from_config(config: &MidtransConfig) -> Option<Self> {
        if !config.is_configured() {
            info!("💳️ No Midtrans server key is set. The Midtrans payment method is disabled.");
            return None;
        }
        match Self::new(config.clone()) {
            Ok(gateway) => {
                info!("💳️ Midtrans payments are enabled via {}", config.snap_base_url());
                Some(gateway)
            },
            Err(e) => {
                error!("💳️ Could not create the Midtrans client. The Midtrans payment method is disabled. {e}");
                None
            },
        }
    }
}

impl PaymentGateway for MidtransGateway {
    fn provider_name(&self) -> &'static str {
        MIDTRANS_PROVIDER
    }

    async fn create_transaction(&self, transaction: GatewayTransaction) -> Result<GatewayRedirect, GatewayError> {
        let snap = SnapTransaction::new(
            transaction.order_id.to_string(),
            transaction.gross_amount.value(),
            transaction.customer_name,
            transaction.email,
        );
        let token = self.api.create_transaction(&snap).await.map_err(|e| GatewayError(e.to_string()))?;
        Ok(GatewayRedirect { token: token.token, redirect_url: token.redirect_url })
    }
}
