use std::env;

use thiserror::Error;
use url::Url;

pub const API_URL_VAR: &str = "PARLOR_API_URL";
pub const API_TOKEN_VAR: &str = "PARLOR_API_TOKEN";

/// Where the backend lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base url of the backend, scheme and host included
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

impl ApiConfig {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme {}",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            token: token.to_string(),
        })
    }

    /// Reads the config from `PARLOR_API_URL` and `PARLOR_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(API_URL_VAR).map_err(|_| ConfigError::MissingVar(API_URL_VAR))?;
        let token = env::var(API_TOKEN_VAR).map_err(|_| ConfigError::MissingVar(API_TOKEN_VAR))?;

        Self::new(&base_url, &token)
    }

    /// Returns the absolute url for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}
