//! Text-completion providers
//!
//! Concrete HTTP clients behind [`CompletionProvider`].

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::provider::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Conventional environment variable holding the API key
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Resolved settings for one provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,

    /// API key; the provider is unavailable without one
    pub api_key: Option<String>,

    /// Model override
    pub model: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,
}

impl ProviderSettings {
    pub fn new(kind: ProviderKind, api_key: Option<String>) -> Self {
        Self {
            kind,
            api_key,
            model: None,
            base_url: None,
        }
    }
}

/// Instantiate providers in the given priority order
pub fn build_providers(
    client: &reqwest::Client,
    settings: &[ProviderSettings],
) -> Vec<Arc<dyn CompletionProvider>> {
    settings
        .iter()
        .map(|s| -> Arc<dyn CompletionProvider> {
            match s.kind {
                ProviderKind::Gemini => Arc::new(GeminiProvider::new(client.clone(), s.clone())),
                ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(client.clone(), s.clone())),
            }
        })
        .collect()
}

/// True when a key is present and not blank
fn has_key(api_key: &Option<String>) -> bool {
    api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
}
