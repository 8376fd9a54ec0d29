use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Combined byte budget for htmlText + specification + webAuditResults
    #[serde(default = "default_max_combined_input_bytes")]
    pub max_combined_input_bytes: usize,

    /// Maximum design image size in bytes
    #[serde(default = "default_max_design_file_bytes")]
    pub max_design_file_bytes: usize,

    /// Model identifier passed to the generate call
    #[serde(default = "default_model")]
    pub model: String,

    /// Gemini API key; required to start the real backend
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL (override for proxies and tests)
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            max_combined_input_bytes: default_max_combined_input_bytes(),
            max_design_file_bytes: default_max_design_file_bytes(),
            model: default_model(),
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("pagelens").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("PAGELENS").separator("__"));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_body_size_mb() -> usize {
    16
}

fn default_max_combined_input_bytes() -> usize {
    2_000_000
}

fn default_max_design_file_bytes() -> usize {
    5_242_880
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
