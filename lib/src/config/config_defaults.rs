// lib/src/config/config_defaults.rs

use models::OrderingMode;

pub const DEFAULT_CONFIG_FILE: &str = "worklist.toml";
pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DRAG_CANCEL_TIMEOUT_MS: u64 = 1500;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn default_service_base_url() -> String { DEFAULT_SERVICE_BASE_URL.to_string() }
pub fn default_request_timeout_secs() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }
pub fn default_initial_mode() -> OrderingMode { OrderingMode::Automatic }
pub fn default_drag_cancel_timeout_ms() -> u64 { DEFAULT_DRAG_CANCEL_TIMEOUT_MS }
pub fn default_log_level() -> String { DEFAULT_LOG_LEVEL.to_string() }
