// lib/src/config/config_structs.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use models::OrderingMode;

use crate::config::config_defaults::*;

/// Top-level configuration, mirroring the sections of `worklist.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorklistConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the persistence and generation collaborator lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: default_service_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_initial_mode")]
    pub initial_mode: OrderingMode,
    /// How long a drag-end may go unanswered by a drop before the session
    /// is cancelled.
    #[serde(default = "default_drag_cancel_timeout_ms")]
    pub drag_cancel_timeout_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            initial_mode: default_initial_mode(),
            drag_cancel_timeout_ms: default_drag_cancel_timeout_ms(),
        }
    }
}

impl BoardConfig {
    pub fn drag_cancel_timeout(&self) -> Duration {
        Duration::from_millis(self.drag_cancel_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: default_log_level() }
    }
}
