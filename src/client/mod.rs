use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use spdlog::debug;
use thiserror::Error;

use crate::client::session::SessionError;

pub mod auth;
pub mod blog_service;
pub mod session;
pub mod user_service;

/// Errors surfaced by the HTTP client. Messages are kept short because the
/// views print them as they are.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Failed(String),

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Thin wrapper over `reqwest::Client` bound to the API base url.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET `path` and decode the JSON body. Any failure is reported with `failure`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, failure: &'static str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self.client.get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { context: failure, source })?;

        if !resp.status().is_success() {
            debug!("GET {} returned {}", url, resp.status());
            return Err(ClientError::Failed(failure.to_string()));
        }

        resp.json::<T>()
            .await
            .map_err(|source| ClientError::Transport { context: failure, source })
    }
}

/// Message carried by an error response, or `fallback` when there is none.
pub(crate) async fn failure_message(resp: Response, fallback: &str) -> String {
    resp.json::<ErrorBody>().await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://localhost:8001/");
        assert_eq!(client.url(""), "http://localhost:8001");
        assert_eq!(client.url("/api/blog"), "http://localhost:8001/api/blog");
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Failed("Failed to fetch blogs".to_string());
        assert_eq!(err.to_string(), "Failed to fetch blogs");
    }
}
