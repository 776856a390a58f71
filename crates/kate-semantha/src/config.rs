//! Client configuration.

use kate_core::{Error, Result};

/// Connection settings for the semantha platform.
#[derive(Debug, Clone)]
pub struct SemanthaConfig {
    /// Base URL of the platform, without a trailing slash.
    pub server_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Domain holding the reference library.
    pub domain: String,
}

impl SemanthaConfig {
    /// Read the configuration from `SEMANTHA_SERVER_URL`, `SEMANTHA_API_KEY`
    /// and `SEMANTHA_DOMAIN`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_url: require("SEMANTHA_SERVER_URL")?.trim_end_matches('/').to_string(),
            api_key: require("SEMANTHA_API_KEY")?,
            domain: require("SEMANTHA_DOMAIN")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config(format!("{name} is not set")))
}
