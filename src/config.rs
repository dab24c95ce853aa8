//! Runtime configuration read from the environment at start-up

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ACCESS_TOKEN_VAR: &str = "TMDB_ACCESS_TOKEN";
const API_KEY_VAR: &str = "TMDB_API_KEY";
const BASE_URL_VAR: &str = "TMDB_API_BASE_URL";
const TIMEOUT_VAR: &str = "FLIXTER_HTTP_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("no TMDB credentials: set TMDB_ACCESS_TOKEN or TMDB_API_KEY")]
    MissingCredentials,

    #[error("FLIXTER_HTTP_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// How requests authenticate against the provider
#[derive(Clone, PartialEq)]
pub enum Credential {
    /// v3 key, sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read access token, sent as a bearer header
    BearerToken(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credential::BearerToken(_) => f.write_str("BearerToken(***)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub credential: Credential,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source (the environment in
    /// production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let credential = match (non_empty(ACCESS_TOKEN_VAR), non_empty(API_KEY_VAR)) {
            (Some(token), _) => Credential::BearerToken(token),
            (None, Some(key)) => Credential::ApiKey(key),
            (None, None) => return Err(ConfigError::MissingCredentials),
        };

        let base_url = non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match non_empty(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            credential,
            base_url,
            timeout_secs,
        })
    }
}
