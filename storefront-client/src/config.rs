//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | STOREFRONT_API_URL | http://localhost:8000/api | Backend base URL |
//! | STOREFRONT_TIMEOUT_SECS | 30 | Per-request timeout |
//! | STOREFRONT_LOGIN_ROUTE | /login | Where an expired session redirects |

use std::time::Duration;

/// Local development backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Login entry point of the client
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Client configuration for connecting to the storefront backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; every endpoint path is relative to it
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Route an unrecoverable auth failure redirects to
    pub login_route: String,
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("STOREFRONT_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let mut config = Self::new(base_url);
        if let Some(timeout) = std::env::var("STOREFRONT_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(route) = std::env::var("STOREFRONT_LOGIN_ROUTE")
            && !route.is_empty()
        {
            config.login_route = route;
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the login route used for forced logouts
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
