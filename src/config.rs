use std::{env, fmt, time::Duration};

use crate::error::ConfigError;

/// The default timeout for every request sent to the gateway.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT_VAR: &str = "BPAY_ENDPOINT";
const USERNAME_VAR: &str = "BPAY_USERNAME";
const PASSWORD_VAR: &str = "BPAY_PASSWORD";
const TIMEOUT_VAR: &str = "BPAY_TIMEOUT_SECS";

/// The settings a [`DefaultBpayClient`](crate::client::DefaultBpayClient) is built from.
#[derive(Clone)]
pub struct ClientConfig {
    /// The gateway's base url, prefixed to every endpoint path.
    pub endpoint: String,

    /// The account identifier used to log in.
    pub username: String,

    /// The account secret used to log in.
    pub password: String,

    /// The timeout applied to each Http request.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, username: username.into(), password: password.into(), timeout: REQUEST_TIMEOUT }
    }

    /// Load the configuration from `BPAY_ENDPOINT`, `BPAY_USERNAME`, `BPAY_PASSWORD`
    /// and, optionally, `BPAY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name| lookup(name).filter(|value| !value.is_empty()).ok_or(ConfigError::Missing(name));
        let mut config = Self::new(required(ENDPOINT_VAR)?, required(USERNAME_VAR)?, required(PASSWORD_VAR)?);
        if let Some(value) = lookup(TIMEOUT_VAR) {
            let seconds = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or(ConfigError::Invalid { name: TIMEOUT_VAR, value })?;
            config.timeout = Duration::from_secs(seconds);
        }
        Ok(config)
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
