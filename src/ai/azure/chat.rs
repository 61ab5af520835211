use super::client::AzureHttpClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::ai::ChatService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const CHAT_API_VERSION: &str = "2023-05-15";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 120;

/// Rewrites raw user text into an image-generation prompt via a chat deployment.
pub struct AzureChatClient {
    http: AzureHttpClient,
    model: String,
}

impl AzureChatClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self::new_with_client(endpoint, api_key, model, Client::new())
    }

    pub fn new_with_client(
        endpoint: String,
        api_key: String,
        model: String,
        client: Client,
    ) -> Self {
        Self {
            http: AzureHttpClient::new_with_client(
                endpoint,
                api_key,
                Duration::from_secs(30),
                client,
            ),
            model,
        }
    }

    fn completions_url(&self) -> String {
        self.http.url(&format!(
            "openai/deployments/{}/chat/completions?api-version={}",
            self.model, CHAT_API_VERSION
        ))
    }
}

#[async_trait]
impl ChatService for AzureChatClient {
    async fn refine_prompt(&self, user_text: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::REFINER_SYSTEM),
                ChatMessage::user(user_text),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response: ChatCompletionResponse =
            self.http.post_json(&self.completions_url(), &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::MalformedResponse("No response from Azure OpenAI chat API".to_string())
            })
    }
}
