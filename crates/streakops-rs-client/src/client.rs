//! HTTP accessor for the template endpoint.

use crate::ClientError;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use streakops_rs_protocol::{ConfigKind, ConfigRecord, Credentials};

/// `updated_by` marker stamped on records this toolkit posts.
pub const AUTOMATION_MARKER: &str = "streakops_automation";

/// Network deadline for every request; there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Accessor for `GET /template/{key}` and `POST /template`.
///
/// The remote service is the sole source of truth. A fetch→mutate→post cycle
/// carries the full record, so unrelated fields survive the round trip; POST
/// is not idempotent at the protocol level and callers construct the desired
/// end state before posting.
#[derive(Clone)]
pub struct TemplateClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl fmt::Debug for TemplateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateClient")
            .field("base_url", &self.base_url)
            .field("userid", &self.credentials.userid)
            .finish()
    }
}

impl TemplateClient {
    /// Create a client for the given service root (trailing slashes are
    /// stripped).
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("userid", &self.credentials.userid)
            .header("_cred_apikey", &self.credentials.apikey)
    }

    /// Fetch one config record.
    pub async fn fetch(&self, kind: ConfigKind) -> Result<ConfigRecord, ClientError> {
        let url = format!("{}/template/{}", self.base_url, kind.key());
        debug!("fetching config (key={kind})");
        let response = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .map_err(map_network_error)?;
        let response = check_status(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;
        let record = classify_record_body(body)?;
        info!("fetched config (key={kind}, value_len={})", record.value.len());
        Ok(record)
    }

    /// Post a full record back. The caller has already set `value` to the
    /// desired end state and `updated_by` to its marker.
    pub async fn post(&self, record: &ConfigRecord) -> Result<(), ClientError> {
        let url = format!("{}/template", self.base_url);
        debug!("posting config (key={})", record.key);
        let response = self
            .with_auth(self.client.post(&url))
            .json(record)
            .send()
            .await
            .map_err(map_network_error)?;
        let response = check_status(response).await?;
        // The ack body is JSON; anything else means the write is suspect.
        response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;
        info!("posted config (key={})", record.key);
        Ok(())
    }
}

/// Map a non-2xx response onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound(if body.is_empty() {
            "resource not found".to_string()
        } else {
            body
        }),
        StatusCode::BAD_REQUEST => ClientError::Validation(if body.is_empty() {
            "bad request".to_string()
        } else {
            body
        }),
        status => ClientError::Transport(format!("status {status}: {body}")),
    })
}

/// Map a reqwest error (timeout, refused connection) onto the taxonomy.
fn map_network_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(err.to_string())
    } else if err.is_connect() {
        ClientError::Connect(err.to_string())
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// The service answers some bad requests with 200 and an error object where
/// the record should be; surface those instead of failing deserialization.
fn classify_record_body(body: Value) -> Result<ConfigRecord, ClientError> {
    if body.get("key").is_some() && body.get("value").is_some() {
        return serde_json::from_value(body)
            .map_err(|err| ClientError::InvalidResponse(err.to_string()));
    }
    let message = body
        .get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);
    match message {
        Some(message) => Err(ClientError::Service(message)),
        None => Err(ClientError::InvalidResponse(
            "response is neither a record nor an error object".to_string(),
        )),
    }
}
