use crate::{PageRequest, PageResponse, decode_page};
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::de::DeserializeOwned;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    /// Endpoints are given as absolute paths, e.g. `/api/players`.
    fn endpoint_url(&self, endpoint: &str) -> String {
        let address = self.address.trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{address}{endpoint}")
        } else {
            format!("{address}/{endpoint}")
        }
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path));

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    /// Uncached GET carrying the session cookies.
    async fn query_get(
        &self,
        url: String,
        query: &[(String, String)],
    ) -> ReqwestResult {
        let request = self
            .inner_client
            .get(url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache");

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.empty_get("health_check").await?;
        ok_empty(response).await
    }

    /// Fetch one page from a cursor-paginated list endpoint.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &PageRequest,
    ) -> Result<PageResponse<T>, ClientError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(
            %url,
            cursor = ?request.cursor,
            limit = request.limit.get(),
            "Requesting page"
        );
        let response = self.query_get(url, &request.query_pairs()).await?;
        let body = ok_json(response).await?;
        decode_page(body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A non-2xx response, with the server's `error` message if it sent one.
    #[error("{}", api_error_message(.0, .1))]
    APIError(StatusCode, Option<String>),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(e) => e.status(),
            Self::Decode(_) => None,
        }
    }
}

fn api_error_message(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("HTTP error {}", status.as_u16()),
    }
}

/// Pull a human-readable message out of an error body. `error` is preferred,
/// `__error` is accepted from older endpoints.
pub fn server_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "__error"].into_iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}

/// Parse a successful response body as JSON, or return an appropriate error.
pub async fn ok_json(
    response: reqwest::Response,
) -> Result<serde_json::Value, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::APIError(status, server_error_message(&text)));
    }
    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await?;
        return Err(ClientError::APIError(status, server_error_message(&text)));
    }
    Ok(())
}
