//! Content classifier configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Classifier backend configuration.
///
/// The fallback order is derived from `models`: for each model the primary
/// key is tried first, then `backup_api_key` when configured.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Backend API family
    #[serde(default)]
    pub provider: ModerationProvider,

    /// Primary API key
    #[serde(default = "empty_secret")]
    pub api_key: Secret<String>,

    /// Secondary API key tried after the primary one fails
    pub backup_api_key: Option<Secret<String>>,

    /// Model variants in priority order
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Override for the provider base URL (self-hosted gateways, tests)
    pub base_url: Option<String>,

    /// Per-backend request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries against the same backend before moving on
    #[serde(default)]
    pub max_retries: u32,

    /// Screen asker replies as well as expert replies
    #[serde(default)]
    pub screen_asker_replies: bool,

    /// Characters of offending content kept in a flag record
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

/// Classifier API family
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModerationProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl ModerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_backup_key(&self) -> bool {
        self.backup_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Number of (credential, model) backends in the fallback chain.
    pub fn backend_count(&self) -> usize {
        let per_model = if self.has_backup_key() { 2 } else { 1 };
        self.models.len() * per_model
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("MODERATION__API_KEY"));
        }
        if self.models.iter().all(|m| m.trim().is_empty()) {
            return Err(ValidationError::NoClassifierModels);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.excerpt_chars == 0 {
            return Err(ValidationError::InvalidExcerptLength);
        }
        Ok(())
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            provider: ModerationProvider::default(),
            api_key: empty_secret(),
            backup_api_key: None,
            models: default_models(),
            base_url: None,
            timeout_secs: default_timeout(),
            max_retries: 0,
            screen_asker_replies: false,
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash".to_string(),
        "gemini-1.5-flash".to_string(),
        "gemini-1.5-pro".to_string(),
    ]
}

fn default_timeout() -> u64 {
    20
}

fn default_excerpt_chars() -> usize {
    100
}
