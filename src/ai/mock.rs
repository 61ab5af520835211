use super::{ChatService, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Scripted = std::result::Result<String, String>;

/// Replays scripted responses in order, cycling once exhausted.
fn next_scripted(responses: &[Scripted], count: usize) -> Option<Scripted> {
    if responses.is_empty() {
        None
    } else {
        Some(responses[(count - 1) % responses.len()].clone())
    }
}

#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<Scripted>>>,
    inputs: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            inputs: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_prompt_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn refine_prompt(&self, user_text: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.inputs.lock().unwrap().push(user_text.to_string());

        let responses = self.responses.lock().unwrap();
        match next_scripted(&responses, *count) {
            Some(Ok(prompt)) => Ok(prompt),
            Some(Err(message)) => Err(Error::ProviderFailure(message)),
            None => Ok(format!("A detailed, vivid illustration of {}", user_text)),
        }
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_url(self, url: String) -> Self {
        self.responses.lock().unwrap().push(Ok(url));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        match next_scripted(&responses, *count) {
            Some(Ok(url)) => Ok(url),
            Some(Err(message)) => Err(Error::ProviderFailure(message)),
            None => Ok("https://mock-images.example.com/generated.png".to_string()),
        }
    }
}
