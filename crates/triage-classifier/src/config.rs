//! Configuration for the classification engine and its providers

use crate::engine::EngineConfig;
use crate::providers::{ProviderKind, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Classification section of the service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Output-token ceiling per call
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Provider call deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Providers in priority order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderSpec>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
            timeout_ms: default_timeout_ms(),
            providers: default_providers(),
        }
    }
}

impl ClassificationConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_output_tokens: self.max_output_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// Resolve every provider's credential through `lookup`.
    ///
    /// Called once at startup; `lookup` is normally `std::env::var(..).ok()`.
    pub fn resolve_providers<F>(&self, lookup: F) -> Vec<ProviderSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.providers
            .iter()
            .map(|spec| {
                let settings = spec.resolve(&lookup);
                if settings.api_key.is_some() {
                    info!(provider = ?spec.kind, "Provider credential found");
                } else {
                    warn!(
                        provider = ?spec.kind,
                        env = spec.api_key_env(),
                        "Provider credential missing, provider will be skipped"
                    );
                }
                settings
            })
            .collect()
    }
}

/// One provider entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub kind: ProviderKind,

    /// Model override
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderSpec {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: None,
            base_url: None,
            api_key_env: None,
        }
    }

    /// Variable name to read the key from
    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.kind.default_api_key_env())
    }

    fn resolve<F>(&self, lookup: &F) -> ProviderSettings
    where
        F: Fn(&str) -> Option<String>,
    {
        ProviderSettings {
            kind: self.kind,
            api_key: lookup(self.api_key_env()).filter(|k| !k.trim().is_empty()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

fn default_max_output_tokens() -> u32 {
    100
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_providers() -> Vec<ProviderSpec> {
    vec![
        ProviderSpec::new(ProviderKind::Gemini),
        ProviderSpec::new(ProviderKind::OpenAi),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_prefer_gemini() {
        let config = ClassificationConfig::default();
        let kinds: Vec<_> = config.providers.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [ProviderKind::Gemini, ProviderKind::OpenAi]);

        let engine = config.engine_config();
        assert_eq!(engine.max_output_tokens, 100);
        assert_eq!(engine.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_resolve_uses_named_variable() {
        let yaml = r#"
timeout_ms: 2500
providers:
  - kind: openai
    api_key_env: TRIAGE_OPENAI_KEY
    model: gpt-4o-mini
  - kind: gemini
"#;
        let config: ClassificationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_output_tokens, 100);
        assert_eq!(config.engine_config().timeout, Duration::from_millis(2500));

        let settings = config.resolve_providers(|name| match name {
            "TRIAGE_OPENAI_KEY" => Some("sk-123".to_string()),
            "GEMINI_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(settings[0].kind, ProviderKind::OpenAi);
        assert_eq!(settings[0].api_key.as_deref(), Some("sk-123"));
        assert_eq!(settings[0].model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(settings[1].kind, ProviderKind::Gemini);
        assert_eq!(settings[1].api_key, None);
    }
}
