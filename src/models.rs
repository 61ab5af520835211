//! Data models and structures
//!
//! Defines the request-scoped values exchanged between the page and the
//! interaction handler, plus the process configuration.

use crate::ai::PollPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 100;

/// One button press as reported by the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Click {
    pub n_clicks: u32,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl Click {
    pub fn new(n_clicks: u32, prompt: impl Into<String>) -> Self {
        Self {
            n_clicks,
            prompt: Some(prompt.into()),
        }
    }
}

/// What the page renders after an interaction: image, loading slot, status line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub image_url: Option<String>,
    pub loading_indicator: Option<String>,
    pub status: String,
}

impl InteractionOutcome {
    pub const IMAGE_ERROR: &'static str = "Error generating image. Please try again.";

    pub fn generated(image_url: String, refined_prompt: &str) -> Self {
        Self {
            image_url: Some(image_url),
            loading_indicator: None,
            status: format!("Refined Prompt: {}", refined_prompt),
        }
    }

    pub fn image_failed() -> Self {
        Self {
            image_url: None,
            loading_indicator: None,
            status: Self::IMAGE_ERROR.to_string(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub chat_model: String,
    pub poll_interval: Duration,
    /// `None` polls until the job reaches a terminal status.
    pub poll_max_attempts: Option<u32>,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} not set", key)))
        };

        let poll_interval_secs = match lookup("IMAGE_POLL_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("IMAGE_POLL_INTERVAL_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let poll_max_attempts = match lookup("IMAGE_POLL_MAX_ATTEMPTS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                Error::Config(format!("IMAGE_POLL_MAX_ATTEMPTS is not a number: {}", raw))
            })?,
            None => DEFAULT_POLL_MAX_ATTEMPTS,
        };

        Ok(Self {
            endpoint: required("AZURE_OAI_ENDPOINT")?,
            api_key: required("AZURE_OAI_KEY")?,
            chat_model: required("AZURE_OAI_MODEL")?,
            poll_interval: Duration::from_secs(poll_interval_secs),
            poll_max_attempts: (poll_max_attempts > 0).then_some(poll_max_attempts),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.poll_interval, self.poll_max_attempts)
    }
}
