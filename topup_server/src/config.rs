//! Server configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded first, if present). Invalid values are
//! logged and replaced by their defaults, so the server always starts.
use std::{env, path::PathBuf};

use log::*;
use midtrans_tools::MidtransConfig;
use topup_common::parse_boolean_flag;

const DEFAULT_TOPUP_HOST: &str = "127.0.0.1";
const DEFAULT_TOPUP_PORT: u16 = 3000;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where orders are saved. If `None`, orders only live in memory.
    pub orders_file: Option<PathBuf>,
    /// A catalog file to use instead of the built-in catalog.
    pub catalog_file: Option<PathBuf>,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// Capacity of the order event queues and of the live event stream.
    pub event_buffer_size: usize,
    pub midtrans: MidtransConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TOPUP_HOST.to_string(),
            port: DEFAULT_TOPUP_PORT,
            orders_file: None,
            catalog_file: None,
            use_x_forwarded_for: false,
            use_forwarded: false,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            midtrans: MidtransConfig::default(),
        }
    }
}

/// How to work out a client's address when the server runs behind a proxy.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerConfig {
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig { use_x_forwarded_for: self.use_x_forwarded_for, use_forwarded: self.use_forwarded }
    }

    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TOPUP_HOST").ok().unwrap_or_else(|| DEFAULT_TOPUP_HOST.into());
        let port = env::var("TOPUP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TOPUP_PORT. {e} Using the default, {DEFAULT_TOPUP_PORT}, \
                         instead."
                    );
                    DEFAULT_TOPUP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TOPUP_PORT);
        let orders_file = path_from_env("TOPUP_ORDERS_FILE");
        if orders_file.is_none() {
            warn!("🪛️ TOPUP_ORDERS_FILE is not set. Orders will only be kept in memory.");
        }
        let catalog_file = path_from_env("TOPUP_CATALOG_FILE");
        let use_x_forwarded_for = parse_boolean_flag(env::var("TOPUP_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("TOPUP_USE_FORWARDED").ok(), false);
        let event_buffer_size = env::var("TOPUP_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| match s.parse::<usize>() {
                Ok(0) | Err(_) => {
                    warn!(
                        "🪛️ {s} is not a valid value for TOPUP_EVENT_BUFFER_SIZE. Using the default, \
                         {DEFAULT_EVENT_BUFFER_SIZE}, instead."
                    );
                    None
                },
                Ok(n) => Some(n),
            })
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let midtrans = MidtransConfig::new_from_env_or_default();
        Self {
            host,
            port,
            orders_file,
            catalog_file,
            use_x_forwarded_for,
            use_forwarded,
            event_buffer_size,
            midtrans,
        }
    }
}

fn path_from_env(name: &str) -> Option<PathBuf> {
    env::var(name).ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from)
}
