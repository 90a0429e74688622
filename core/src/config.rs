//! Client configuration: base URL and User-Agent.

use serde::Deserialize;

use crate::client::DEFAULT_USER_AGENT;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root. Read from SODAM_BASE_URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header value. Read from SODAM_USER_AGENT.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Load from `.env`, an optional file named by SODAM_CONFIG, then
    /// SODAM_* environment variables (highest precedence).
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut builder = config::Config::builder();
        if let Ok(path) = std::env::var("SODAM_CONFIG") {
            builder = builder.add_source(config::File::with_name(&path));
        }
        builder = builder.add_source(config::Environment::with_prefix("SODAM"));
        Self::from_builder(builder)
    }

    /// Deserialize from an already assembled set of sources.
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
