use super::client::AzureHttpClient;
use super::types::{ImageOperation, ImageSubmitRequest};
use crate::ai::poll::JobReport;
use crate::ai::{ImageGenerationService, JobStatus, PollPolicy};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const IMAGE_API_VERSION: &str = "2023-06-01-preview";
const IMAGE_COUNT: u32 = 2;
const IMAGE_SIZE: &str = "512x512";
const OPERATION_LOCATION: &str = "Operation-Location";

/// Submits a prompt to the asynchronous image endpoint and polls the job to completion.
pub struct AzureImageClient {
    http: AzureHttpClient,
    policy: PollPolicy,
}

impl AzureImageClient {
    pub fn new(endpoint: String, api_key: String, policy: PollPolicy) -> Self {
        Self::new_with_client(endpoint, api_key, policy, Client::new())
    }

    pub fn new_with_client(
        endpoint: String,
        api_key: String,
        policy: PollPolicy,
        client: Client,
    ) -> Self {
        Self {
            http: AzureHttpClient::new_with_client(
                endpoint,
                api_key,
                Duration::from_secs(60),
                client,
            ),
            policy,
        }
    }

    async fn submit(&self, prompt: &str) -> Result<String> {
        let url = self.http.url(&format!(
            "openai/images/generations:submit?api-version={}",
            IMAGE_API_VERSION
        ));
        let request = ImageSubmitRequest {
            prompt: prompt.to_string(),
            n: IMAGE_COUNT,
            size: IMAGE_SIZE.to_string(),
        };

        let response = self.http.post_raw(&url, &request).await?;

        response
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "Submission response has no {} header",
                    OPERATION_LOCATION
                ))
            })
    }

    async fn wait_for_result(&self, operation_location: &str) -> Result<String> {
        let (status, operation) = self
            .policy
            .wait_for(|| self.http.get_json::<ImageOperation>(operation_location))
            .await?;

        if status == JobStatus::Succeeded {
            info!("Image job succeeded");
            return Self::first_url(operation);
        }

        let detail = operation
            .error
            .and_then(|e| e.message.or(e.code))
            .unwrap_or_else(|| "no error detail".to_string());
        warn!("Image job ended with status {}: {}", operation.status, detail);
        Err(Error::ProviderFailure(format!(
            "Image job {}: {}",
            operation.status, detail
        )))
    }

    fn first_url(operation: ImageOperation) -> Result<String> {
        operation
            .result
            .and_then(|result| result.data.into_iter().next())
            .and_then(|image| image.url)
            .ok_or_else(|| {
                Error::MalformedResponse("Succeeded image job has no result URL".to_string())
            })
    }
}

impl JobReport for ImageOperation {
    fn status(&self) -> &str {
        &self.status
    }
}

#[async_trait]
impl ImageGenerationService for AzureImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let operation_location = self.submit(prompt).await?;
        info!("Image job submitted: {}", operation_location);
        self.wait_for_result(&operation_location).await
    }
}
