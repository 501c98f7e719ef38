use reqwest::StatusCode;

/// An error when authenticating against the gateway's login endpoint.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login endpoint answered with a non-success status.
    #[error("{timestamp}-BPay auth response: {status}")]
    Status {
        /// The local time of the failure, formatted as `YYYYMMDDHHMMSS`.
        timestamp: String,

        /// The status returned by the gateway.
        status: StatusCode,
    },

    /// The login endpoint answered with `responseCode: false`.
    #[error("{0}")]
    Gateway(String),

    /// An Http request failed.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// The login response could not be decoded.
    #[error("decoding login response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An error when invoking a gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum BpayError {
    /// Obtaining an access token failed.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    /// An Http request failed.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered the business call with a non-success status.
    #[error("{0}")]
    Status(StatusCode),

    /// The gateway answered with `responseCode: false`.
    ///
    /// The message is the gateway's `responseMsg`, verbatim.
    #[error("{0}")]
    Gateway(String),

    /// The response body could not be decoded.
    #[error("decoding response: {0}")]
    Decode(serde_json::Error),

    /// The request payload could not be encoded.
    #[error("encoding request: {0}")]
    Encode(serde_json::Error),

    /// The configured endpoint does not form a valid url.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The arguments given for an endpoint's url suffix don't match its shape.
    #[error("endpoint {endpoint} expects {expected} suffix arguments, got {got}")]
    Suffix {
        /// The endpoint's name.
        endpoint: &'static str,

        /// The number of arguments the endpoint takes.
        expected: usize,

        /// The number of arguments supplied.
        got: usize,
    },
}

impl BpayError {
    /// Returns true if this error carries a gateway business failure.
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

/// An error when loading a [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    /// An environment variable holds a value that can't be used.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// The variable's name.
        name: &'static str,

        /// The offending value.
        value: String,
    },
}
