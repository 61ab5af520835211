use crate::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Thin Azure OpenAI REST client shared by the chat and image modules.
pub struct AzureHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    timeout: Duration,
}

impl AzureHttpClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(endpoint, api_key, timeout, Client::new())
    }

    pub fn new_with_client(
        endpoint: String,
        api_key: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Join a resource path (with or without a leading slash) onto the endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    pub async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        request: &Req,
    ) -> Result<Resp> {
        let response = self.post_raw(url, request).await?;
        Self::parse_json(response).await
    }

    /// POST and return the successful response unparsed, for callers that need headers.
    pub async fn post_raw<Req: Serialize>(&self, url: &str, request: &Req) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Azure OpenAI: {}", e);
                e
            })?;

        Self::check_status(response).await
    }

    pub async fn get_json<Resp: DeserializeOwned>(&self, url: &str) -> Result<Resp> {
        let response = self
            .client
            .get(url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to poll Azure OpenAI: {}", e);
                e
            })?;

        let response = Self::check_status(response).await?;
        Self::parse_json(response).await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await?;
        tracing::error!("Azure OpenAI API error (status {}): {}", status, error_text);

        let message = format!("Azure OpenAI API error (status {}): {}", status, error_text);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
            _ => Error::ProviderFailure(message),
        })
    }

    async fn parse_json<Resp: DeserializeOwned>(response: Response) -> Result<Resp> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Azure OpenAI response: {}\nBody: {}", e, body);
            Error::MalformedResponse(format!("Failed to parse Azure OpenAI response: {}", e))
        })
    }
}
