//! AI service integration for prompt refinement and image generation
//!
//! Provides interfaces to Azure OpenAI chat completions for rewriting user
//! text into image prompts, and to the asynchronous image generation API that
//! turns those prompts into hosted image URLs.

pub mod azure;
pub mod mock;
pub mod poll;

pub use azure::{AzureChatClient, AzureImageClient};
pub use mock::{MockChatClient, MockImageGenerationClient};
pub use poll::{JobStatus, PollPolicy};

use crate::Result;
use async_trait::async_trait;

/// Turns raw user text into a refined image-generation prompt.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn refine_prompt(&self, user_text: &str) -> Result<String>;
}

/// Generates an image for a prompt and returns the URL of the first result.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
