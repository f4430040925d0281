//! Process configuration, read from the environment.

use std::net::SocketAddr;

pub const BIND_ADDR_VAR: &str = "LAUNDRYDESK_BIND_ADDR";
pub const SEED_SAMPLE_DATA_VAR: &str = "LAUNDRYDESK_SEED_SAMPLE_DATA";

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load sample categories, items, log entries, services and orders at startup.
    pub seed_sample_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            seed_sample_data: true,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their default; invalid
    /// values are logged and fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BIND_ADDR_VAR) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(
                    var = BIND_ADDR_VAR,
                    value = %raw,
                    error = %e,
                    default = %config.bind_addr,
                    "invalid bind address; using default"
                ),
            }
        }

        if let Some(raw) = lookup(SEED_SAMPLE_DATA_VAR) {
            match parse_bool(&raw) {
                Some(v) => config.seed_sample_data = v,
                None => tracing::warn!(
                    var = SEED_SAMPLE_DATA_VAR,
                    value = %raw,
                    default = config.seed_sample_data,
                    "invalid boolean; using default"
                ),
            }
        }

        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
