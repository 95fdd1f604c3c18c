//! Content store client.
//!
//! [`ContentStore`] is the seam between the query layer and the network:
//! one GROQ query in, the `result` member of the response envelope out.
//! [`HttpStore`] implements it against the hosted query API.

use super::query::QueryParams;
use crate::config::StoreConfig;
use reqwest::{
    Url,
    blocking::Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Longest raw body quoted in a status error.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid query url: {0}")]
    Url(String),

    #[error("invalid auth header: {0}")]
    Auth(String),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Runs GROQ queries.
pub trait ContentStore: Send + Sync {
    /// Execute `query` with `params` and return the `result` value.
    fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError>;
}

/// Response envelope of the query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Query API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    endpoint: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| StoreError::Auth(err.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.query_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ContentStore for HttpStore {
    fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError> {
        let url = query_url(&self.endpoint, query, params)?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: QueryResponse = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }
}

/// Full request URL: `query` plus one `$name=<json>` pair per parameter.
pub fn query_url(endpoint: &str, query: &str, params: &QueryParams) -> Result<Url, StoreError> {
    let pairs = std::iter::once(("query".to_owned(), query.to_owned())).chain(params.encode());
    Url::parse_with_params(endpoint, pairs).map_err(|err| StoreError::Url(err.to_string()))
}

/// Human-readable message from an error response body.
///
/// The API reports errors as `{ "error": { "description": ... } }` or
/// `{ "error": "...", "message": "..." }`; anything else is quoted raw.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let described = value
            .pointer("/error/description")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(Value::as_str);
        if let Some(message) = described {
            return message.to_owned();
        }
    }

    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None if body.is_empty() => "empty response".to_owned(),
        None => body.to_owned(),
    }
}
