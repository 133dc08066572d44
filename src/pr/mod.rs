pub mod query;
pub mod schema;
pub mod types;

pub use types::PrGroups;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::quote;

/// Deadline for the single GraphQL request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// How much of a non-200 body is echoed back in the error message.
const BODY_SNIPPET_CHARS: usize = 100;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error making GitHub API request: {0}.")]
    Transport(String),

    #[error("HTTP {status}: {}", quote(.snippet))]
    Status { status: u16, snippet: String },

    #[error("GitHub API returned errors: {}.", .0.join("; "))]
    Api(Vec<String>),

    #[error("Error parsing response from GitHub: {0}.")]
    Decode(String),
}

/// Status and body of a GraphQL response, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one GraphQL document and hands back the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_query(&self, token: &str, query: &str) -> Result<RawResponse, FetchError>;
}

/// [`Transport`] over HTTPS with reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_query(&self, token: &str, query: &str) -> Result<RawResponse, FetchError> {
        debug!(endpoint = %self.endpoint, "posting GraphQL query");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&GraphqlRequest { query })
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Run `query` and decode both PR groups from the response.
///
/// Any non-200 status, GraphQL error list, or shape mismatch is fatal; there
/// is no partial result.
#[instrument(skip_all, fields(query_bytes = query.len()))]
pub async fn fetch_pr_groups(
    transport: &dyn Transport,
    token: &str,
    query: &str,
) -> Result<PrGroups, FetchError> {
    let response = transport.post_query(token, query).await?;
    debug!(status = response.status, body_bytes = response.body.len(), "received GraphQL response");

    if response.status != 200 {
        return Err(FetchError::Status {
            status: response.status,
            snippet: response.body.chars().take(BODY_SNIPPET_CHARS).collect(),
        });
    }

    let groups = decode_response(&response.body)?;
    debug!(authored = groups.authored.len(), to_review = groups.to_review.len(), "decoded PR groups");
    Ok(groups)
}

/// Decode a 200 response body into [`PrGroups`].
pub fn decode_response(body: &str) -> Result<PrGroups, FetchError> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Decode(format!("invalid JSON: {}", e)))?;

    if let Ok(Some(messages)) = schema::api_errors_schema().validate(&parsed) {
        if !messages.is_empty() {
            return Err(FetchError::Api(messages));
        }
    }

    schema::response_schema()
        .validate(&parsed)
        .map_err(|failure| FetchError::Decode(failure.render(&parsed)))
}
