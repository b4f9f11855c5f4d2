use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transit API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the API (e.g., "https://api.tfl.gov.uk").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Application id sent alongside the key as `app_id`.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Search radius for nearby stops in metres.
    #[serde(default = "default_radius")]
    pub radius_meters: u32,
    /// Stop categories queried during discovery.
    #[serde(default = "default_stop_types")]
    pub stop_types: Vec<String>,
    /// Number of nearest stops kept after discovery.
    #[serde(default = "default_max_stops")]
    pub max_stops: usize,
}

/// Periodic refresh settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Interval of the arrivals-only refresh timer.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

/// Location resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// IP geolocation endpoint. `None` disables device geolocation.
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: Option<String>,
    /// Acquisition timeout for a device fix.
    #[serde(default = "default_location_timeout")]
    pub timeout_seconds: u64,
    /// Fixed coordinate used when the test location is enabled.
    #[serde(default = "default_test_latitude")]
    pub test_latitude: f64,
    #[serde(default = "default_test_longitude")]
    pub test_longitude: f64,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Defaults to the user cache directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.tfl.gov.uk".to_string()
}

fn default_app_id() -> String {
    "nearboard".to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_radius() -> u32 {
    300
}

fn default_stop_types() -> Vec<String> {
    vec![
        "NaptanPublicBusCoachTram".to_string(),
        "NaptanMetroStation".to_string(),
    ]
}

fn default_max_stops() -> usize {
    10
}

fn default_interval() -> u64 {
    30
}

fn default_geolocation_url() -> Option<String> {
    Some("http://ip-api.com/json".to_string())
}

fn default_location_timeout() -> u64 {
    10
}

fn default_test_latitude() -> f64 {
    51.5181627156178
}

fn default_test_longitude() -> f64 {
    -0.1786709008541014
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl LocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: default_app_id(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            radius_meters: default_radius(),
            stop_types: default_stop_types(),
            max_stops: default_max_stops(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geolocation_url: default_geolocation_url(),
            timeout_seconds: default_location_timeout(),
            test_latitude: default_test_latitude(),
            test_longitude: default_test_longitude(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
