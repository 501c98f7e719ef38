use chrono::{Local, Utc};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    StatusCode, Url,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    endpoints::{self, Endpoint},
    error::{AuthError, BpayError},
    models::{Enveloped, LoginResponse, Payload},
    session::{Credentials, SessionToken},
};

const JSON_CONTENT: &str = "application/json";
const SUBJECT_HEADER: &str = "userId";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Sends authenticated requests to the gateway.
///
/// The engine owns the account credentials and the cached session token. The
/// token is only ever replaced by a login made under the session lock, which is
/// held for the whole round trip.
pub struct Engine {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    session: Mutex<Option<SessionToken>>,
}

impl Engine {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let credentials = Credentials::new(config.username, config.password);
        Ok(Self { client, base_url: config.endpoint, credentials, session: Mutex::new(None) })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a copy of the cached session token, if any.
    pub async fn session(&self) -> Option<SessionToken> {
        self.session.lock().await.clone()
    }

    /// Returns a token that is fresh right now, logging in if the cached one isn't.
    pub async fn ensure_fresh(&self) -> Result<SessionToken, AuthError> {
        self.refresh(false).await
    }

    /// Logs in unconditionally and replaces the cached token.
    pub async fn authenticate(&self) -> Result<SessionToken, AuthError> {
        self.refresh(true).await
    }

    // The only place the cached token is replaced.
    async fn refresh(&self, force: bool) -> Result<SessionToken, AuthError> {
        let mut session = self.session.lock().await;
        if !force {
            if let Some(token) = session.as_ref().filter(|token| token.is_fresh(Utc::now())) {
                debug!("Reusing session token expiring at {}", token.expires_at());
                return Ok(token.clone());
            }
        }

        let token = self.login().await?;
        info!("Authenticated as user_id={}, token expires at {}", token.user_id, token.expires_at());
        *session = Some(token.clone());
        Ok(token)
    }

    async fn login(&self) -> Result<SessionToken, AuthError> {
        let path = endpoints::LOGIN.path;
        let base_url = &self.base_url;
        let url = format!("{base_url}{path}");
        let response = self
            .client
            .request(endpoints::LOGIN.method, url)
            .header(CONTENT_TYPE, JSON_CONTENT)
            .json(&self.credentials)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            warn!("Login rejected: {status}");
            return Err(AuthError::Status { timestamp, status });
        }

        let body = response.bytes().await?;
        let response: LoginResponse = serde_json::from_slice(&body)?;
        let status = response.status();
        if !status.response_code {
            warn!("Login refused by gateway: {}", status.response_msg);
            return Err(AuthError::Gateway(status.response_msg.clone()));
        }
        Ok(response.data)
    }

    /// Performs an authenticated call and returns the raw response body.
    ///
    /// `subject_id` is sent in the `userId` header unless it is zero.
    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        url: Url,
        payload: Option<Payload<'_>>,
        subject_id: i64,
    ) -> Result<Vec<u8>, BpayError> {
        let token = self.ensure_fresh().await?;

        let body = match payload {
            Some(payload) => serde_json::to_vec(&payload).map_err(BpayError::Encode)?,
            None => Vec::new(),
        };

        let mut request = self
            .client
            .request(endpoint.method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT)
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token))
            .body(body);
        if subject_id != 0 {
            request = request.header(SUBJECT_HEADER, subject_id.to_string());
        }

        debug!("Calling {} {}", endpoint.method, endpoint.name);
        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("{} returned {status}", endpoint.name);
            return Err(BpayError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
