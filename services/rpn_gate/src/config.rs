//! Process configuration, read from the environment.
//!
//! | var                 | default               |
//! |---------------------|-----------------------|
//! | `RPN_BIND`          | `127.0.0.1:5500`      |
//! | `RPN_STORE`         | `file` (or `memory`)  |
//! | `RPN_DB_PATH`       | `rpn_calculator.json` |
//! | `RPN_TIMEOUT_SECS`  | `30`                  |
//! | `RPN_LOG`           | `info`                |
//! | `RPN_METRICS_ADDR`  | unset (no exporter)   |
//!
//! Unparseable values fall back to the default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const DEFAULT_BIND: &str = "127.0.0.1:5500";
const DEFAULT_DB_PATH: &str = "rpn_calculator.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub bind: String,
    pub store: StoreKind,
    pub request_timeout: Duration,
    pub log_level: Level,
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let bind = get("RPN_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let store = match get("RPN_STORE").as_deref() {
            Some("memory") => StoreKind::Memory,
            _ => StoreKind::File(
                get("RPN_DB_PATH")
                    .unwrap_or_else(|| DEFAULT_DB_PATH.into())
                    .into(),
            ),
        };
        let timeout_secs: u64 = get("RPN_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let log_level: Level = get("RPN_LOG")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::INFO);
        let metrics_addr = get("RPN_METRICS_ADDR").and_then(|v| v.parse().ok());
        Self {
            bind,
            store,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
            metrics_addr,
        }
    }
}
