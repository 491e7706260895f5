use log::*;
use topup_common::{parse_boolean_flag, Secret};

pub const SANDBOX_SNAP_URL: &str = "https://app.sandbox.midtrans.com";
pub const PRODUCTION_SNAP_URL: &str = "https://app.midtrans.com";

#[derive(Debug, Clone, Default)]
pub struct MidtransConfig {
    /// The merchant server key. It authenticates Snap requests and is also the secret used to sign notifications.
    pub server_key: Secret<String>,
    /// If true, requests go to the production Snap endpoint. Otherwise, the sandbox is used.
    pub is_production: bool,
    /// Overrides the Snap base URL entirely. Mostly useful for pointing the client at a local mock.
    pub base_url: Option<String>,
}

impl MidtransConfig {
    pub fn new_from_env_or_default() -> Self {
        let server_key = Secret::new(std::env::var("TOPUP_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            warn!("💳️ TOPUP_MIDTRANS_SERVER_KEY not set. The Midtrans payment method will be unavailable.");
            String::default()
        }));
        let is_production = parse_boolean_flag(std::env::var("TOPUP_MIDTRANS_PRODUCTION").ok(), false);
        let base_url = std::env::var("TOPUP_MIDTRANS_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        if is_production {
            info!("💳️ Midtrans is configured for PRODUCTION. Real money will change hands.");
        }
        Self { server_key, is_production, base_url }
    }

    /// The gateway is only usable if a server key was supplied.
    pub fn is_configured(&self) -> bool {
        !self.server_key.is_blank()
    }

    pub fn snap_base_url(&self) -> &str {
        match (&self.base_url, self.is_production) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, true) => PRODUCTION_SNAP_URL,
            (None, false) => SANDBOX_SNAP_URL,
        }
    }
}
