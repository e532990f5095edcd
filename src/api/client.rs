//! HTTP client for the dietitian service.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::DietitianApi;
use super::types::{ChatRequest, ChatResponse, InitSessionRequest, InitSessionResponse};
use crate::error::{Error, Result};

/// The deployed dietitian service.
pub const DEFAULT_BASE_URL: &str = "https://dietitian-agent-977121587860.asia-south2.run.app";

/// HTTP client for the dietitian API.
///
/// # Example
///
/// ```rust,no_run
/// use dietitian_chat::api::{Client, DietitianApi, InitSessionRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?;
/// let session = client
///     .init_session(InitSessionRequest { session_id: "abc".into() })
///     .await?;
/// println!("session: {}", session.session_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8080")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, keeping any prefix it carries.
    ///
    /// Segments are percent-encoded, so opaque session ids are safe to pass.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".into());
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DietitianApi for Client {
    async fn init_session(&self, req: InitSessionRequest) -> Result<InitSessionResponse> {
        let url = self.url(&["init-session"]);
        debug!(name: "api.request", method = "POST", %url, "Initializing session");
        let response = self.http.post(url).json(&req).send().await?;
        Self::handle_response(response).await
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = self.url(&["chat"]);
        debug!(name: "api.request", method = "POST", %url, "Sending chat message");
        let response = self.http.post(url).json(&req).send().await?;
        Self::handle_response(response).await
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        let url = self.url(&["clear-session", session_id]);
        debug!(name: "api.request", method = "DELETE", %url, "Clearing session");
        let response = self.http.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_onto_root() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.url(&["init-session"]).as_str(),
            "http://localhost:8080/init-session"
        );
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let client = Client::new("http://localhost:8080/v1/").unwrap();
        assert_eq!(
            client.url(&["chat"]).as_str(),
            "http://localhost:8080/v1/chat"
        );

        let client = Client::new("http://localhost:8080/v1").unwrap();
        assert_eq!(
            client.url(&["chat"]).as_str(),
            "http://localhost:8080/v1/chat"
        );
    }

    #[test]
    fn test_url_encodes_session_id() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.url(&["clear-session", "a b/c"]).as_str(),
            "http://localhost:8080/clear-session/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            Client::new("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::new("mailto:someone@example.com"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
