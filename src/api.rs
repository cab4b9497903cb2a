use gloo_net::http::Request;
use thiserror::Error;

use crate::config::Config;
use crate::models::{AskRequest, PageResult, SubmitReceipt};

/// Errors from talking to the backend. All variants carry the request URL so
/// log lines identify the failing endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: gloo_net::Error,
    },

    #[error("Server error from {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("Parse error from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: gloo_net::Error,
    },

    #[error("Serialize error: {0}")]
    Serialize(#[source] gloo_net::Error),
}

/// HTTP client for the Q&A backend. Cheap to clone; holds only the resolved
/// base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn queries_url(&self, page: u32, size: u32) -> String {
        format!("{}/queries?page={page}&size={size}", self.base_url)
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    /// Fetches one page of the persisted question collection.
    pub async fn list_questions(&self, page: u32, size: u32) -> Result<PageResult, ApiError> {
        let url = self.queries_url(page, size);
        let resp = Request::get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        if !resp.ok() {
            return Err(ApiError::Status {
                url,
                status: resp.status(),
            });
        }

        resp.json::<PageResult>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    /// Submits a new question. The backend acknowledges right away and
    /// answers asynchronously; callers observe the answer through a later
    /// `list_questions` call.
    pub async fn submit_question(&self, question: &str) -> Result<SubmitReceipt, ApiError> {
        let url = self.query_url();
        let body = AskRequest {
            question: question.to_string(),
        };

        let resp = Request::post(&url)
            .json(&body)
            .map_err(ApiError::Serialize)?
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        if !resp.ok() {
            return Err(ApiError::Status {
                url,
                status: resp.status(),
            });
        }

        resp.json::<SubmitReceipt>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&Config {
            api_base_url: base.to_string(),
        })
    }

    #[test]
    fn base_url_drops_trailing_slashes() {
        assert_eq!(client("http://localhost:8000///").base_url, "http://localhost:8000");
        assert_eq!(client("http://localhost:8000").base_url, "http://localhost:8000");
    }

    #[test]
    fn list_url_carries_page_and_size() {
        let url = client("http://localhost:8000/").queries_url(3, 10);
        assert_eq!(url, "http://localhost:8000/queries?page=3&size=10");
    }

    #[test]
    fn submit_url_targets_query_endpoint() {
        let url = client("https://qa.example.com").query_url();
        assert_eq!(url, "https://qa.example.com/query");
    }
}
