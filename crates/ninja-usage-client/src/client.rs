//! Usage service HTTP client implementation.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CreditsResponse, RecordUsageRequest, RecordUsageResponse, UsageSummary,
};

/// Usage service API client.
///
/// Service calls authenticate with the API key; user calls forward the
/// caller's access token.
#[derive(Debug, Clone)]
pub struct NinjaUsageClient {
    client: Client,
    base_url: String,
    api_key: String,
    service_name: String,
}

impl NinjaUsageClient {
    /// Create a new usage client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the usage service (e.g., `"http://ninja-usage:8080"`)
    /// * `api_key` - Service API key for authentication
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, api_key, ClientOptions::default())
    }

    /// Create a new usage client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            service_name: options.service_name,
        })
    }

    /// Record a billable action.
    ///
    /// # Errors
    ///
    /// - `ClientError::DuplicateEvent` if the event ID was already recorded.
    /// - `ClientError::Unauthorized` if the API key is rejected.
    /// - Other variants if the request fails.
    pub async fn report_usage(
        &self,
        request: RecordUsageRequest,
    ) -> Result<RecordUsageResponse, ClientError> {
        let url = format!("{}/api/usage/events", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("x-service-name", &self.service_name)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await.map_err(|e| match e {
            ClientError::DuplicateEvent { event_id } => {
                let event_id = request.event_id.unwrap_or(event_id);
                tracing::debug!(%event_id, "Usage event already recorded");
                ClientError::DuplicateEvent { event_id }
            }
            other => other,
        })
    }

    /// Get a user's usage summary (requires the user's access token).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_stats(&self, user_jwt: &str) -> Result<UsageSummary, ClientError> {
        let url = format!("{}/api/user/stats", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a user's credit balance (requires the user's access token).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_credits(&self, user_jwt: &str) -> Result<CreditsResponse, ClientError> {
        let url = format!("{}/api/user/credits", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ApiErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::CONFLICT => Err(ClientError::DuplicateEvent { event_id: message }),
            _ => {
                tracing::warn!(status = status.as_u16(), %message, "Usage service error");
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 10).
    pub timeout_seconds: u64,
    /// Service name to include in requests.
    pub service_name: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            service_name: "unknown".to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a service name.
    #[must_use]
    pub fn with_service_name(name: impl Into<String>) -> Self {
        Self {
            service_name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = NinjaUsageClient::new("http://localhost:8080/", "test-api-key").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_rejects_empty_base_url() {
        assert!(matches!(
            NinjaUsageClient::new("/", "key"),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_service_name("resume-analyzer");
        let client =
            NinjaUsageClient::with_options("http://localhost:8080", "key", options).unwrap();
        assert_eq!(client.service_name, "resume-analyzer");
    }
}
