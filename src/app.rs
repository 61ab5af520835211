//! Interaction handling: refine the user's text, then generate an image from it.

use crate::ai::{AzureChatClient, AzureImageClient, ChatService, ImageGenerationService};
use crate::models::{Click, Config, InteractionOutcome};
use crate::{Error, Result};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Runs one click's worth of work against the configured AI services.
pub struct App {
    chat: Box<dyn ChatService>,
    image_gen: Box<dyn ImageGenerationService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Box<dyn ChatService>,
    pub image_gen: Box<dyn ImageGenerationService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            chat: services.chat,
            image_gen: services.image_gen,
        }
    }

    /// Construct an app talking to the Azure OpenAI resource named in `config`.
    pub fn new(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        info!("Chat deployment: {} at {}", config.chat_model, config.endpoint);
        let chat = AzureChatClient::new_with_client(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.chat_model.clone(),
            http_client.clone(),
        );

        let policy = config.poll_policy();
        match policy.max_attempts {
            Some(max) => info!(
                "Image polling every {:?}, up to {} attempts",
                policy.interval, max
            ),
            None => info!("Image polling every {:?}, unbounded", policy.interval),
        }
        let image_gen = AzureImageClient::new_with_client(
            config.endpoint.clone(),
            config.api_key.clone(),
            policy,
            http_client,
        );

        Self::with_services(AppServices {
            chat: Box::new(chat),
            image_gen: Box::new(image_gen),
        })
    }

    /// Handle one button event.
    ///
    /// Returns `Ok(None)` before the first click. Image failures are folded into
    /// the outcome's status line; refinement failures are returned as errors.
    pub async fn handle(&self, click: &Click) -> Result<Option<InteractionOutcome>> {
        if click.n_clicks == 0 {
            return Ok(None);
        }

        let span = info_span!("interaction", id = %Uuid::new_v4(), clicks = click.n_clicks);
        self.process(click.prompt.as_deref().unwrap_or_default())
            .instrument(span)
            .await
            .map(Some)
    }

    async fn process(&self, user_text: &str) -> Result<InteractionOutcome> {
        if user_text.trim().is_empty() {
            return Err(Error::InvalidInput("prompt is empty".to_string()));
        }

        info!("Refining prompt ({} chars)", user_text.chars().count());
        let refined = self.chat.refine_prompt(user_text).await.map_err(|e| {
            error!(kind = %e.kind(), "Prompt refinement failed: {}", e);
            e
        })?;
        info!("Refined prompt: {}", refined);

        match self.image_gen.generate_image(&refined).await {
            Ok(url) => {
                info!("Generated image: {}", url);
                Ok(InteractionOutcome::generated(url, &refined))
            }
            Err(e) => {
                error!(kind = %e.kind(), "Image generation failed: {}", e);
                Ok(InteractionOutcome::image_failed())
            }
        }
    }
}
