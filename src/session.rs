use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long before a token's stated expiry it stops being reused.
pub const FRESHNESS_MARGIN: TimeDelta = TimeDelta::hours(12);

/// The account credentials used to log in to the gateway.
#[derive(Clone, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

/// The token issued by the gateway's login endpoint.
#[derive(Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionToken {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,

    /// The expiry, as a unix timestamp in seconds.
    pub expires_in: i64,

    pub user_id: i64,
    pub role_id: i64,
    pub jti: i64,
    pub payment_method_id: i64,
    pub username: String,
}

impl SessionToken {
    /// The instant the gateway says this token expires at.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_in, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether this token can still be attached to requests at `now`.
    ///
    /// Tokens are refreshed well ahead of their real expiry: a token is only
    /// reused while `now` is strictly before `expiry - FRESHNESS_MARGIN`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at().checked_sub_signed(FRESHNESS_MARGIN) {
            Some(refresh_at) => now < refresh_at,
            None => false,
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
