//! Classification engine with ordered provider fallback

use crate::normalize::parse_suggestion;
use crate::prompt::build_prompt;
use crate::provider::{CompletionProvider, ProviderError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub use crate::normalize::Classification;

/// Engine settings, fixed at construction
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Output-token ceiling passed to the provider
    pub max_output_tokens: u32,

    /// Deadline for a single provider call
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 100,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Why a classification produced no result.
///
/// All variants surface to clients the same way; they stay distinct for logs,
/// metrics and tests.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// No configured provider reported itself available
    #[error("no classification provider is available")]
    NoProviderAvailable,

    /// The selected provider failed or timed out
    #[error("provider {provider} failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// The provider answered, but not with a JSON object
    #[error("provider {provider} returned a malformed response: {reason}")]
    MalformedResponse {
        provider: String,
        raw: String,
        reason: String,
    },
}

impl ClassificationError {
    /// Stable label for metrics
    pub fn cause(&self) -> &'static str {
        match self {
            Self::NoProviderAvailable => "no_provider",
            Self::Provider {
                source: ProviderError::Timeout(_),
                ..
            } => "provider_timeout",
            Self::Provider { .. } => "provider_error",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}

/// Suggests a category and priority for ticket descriptions
pub struct ClassificationEngine {
    /// Providers in priority order
    providers: Vec<Arc<dyn CompletionProvider>>,
    config: EngineConfig,
}

impl ClassificationEngine {
    /// Create an engine over providers in priority order
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>, config: EngineConfig) -> Self {
        info!(
            providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            max_output_tokens = config.max_output_tokens,
            timeout_ms = config.timeout.as_millis() as u64,
            "Classification engine configured"
        );
        Self { providers, config }
    }

    /// First available provider, if any
    pub fn select_provider(&self) -> Option<&Arc<dyn CompletionProvider>> {
        self.providers.iter().find(|p| p.is_available())
    }

    /// Classify a description.
    ///
    /// Makes at most one provider call. Dropping the returned future abandons
    /// the in-flight request.
    pub async fn classify(&self, description: &str) -> Result<Classification, ClassificationError> {
        let result = self.run(description).await;

        match &result {
            Ok(classification) => {
                debug!(
                    category = ?classification.category,
                    priority = ?classification.priority,
                    "Classification succeeded"
                );
                metrics::counter!("triage_classifications_total", "outcome" => "success")
                    .increment(1);
            }
            Err(e) => {
                match e {
                    ClassificationError::NoProviderAvailable => {
                        warn!(
                            configured = self.providers.len(),
                            "No classification provider available"
                        );
                    }
                    ClassificationError::Provider { provider, source } => {
                        error!(provider = %provider, error = %source, "Classification provider call failed");
                    }
                    ClassificationError::MalformedResponse {
                        provider,
                        raw,
                        reason,
                    } => {
                        warn!(
                            provider = %provider,
                            raw = %raw,
                            reason = %reason,
                            "Provider response is not a JSON object"
                        );
                    }
                }
                metrics::counter!("triage_classifications_total", "outcome" => e.cause())
                    .increment(1);
            }
        }

        result
    }

    async fn run(&self, description: &str) -> Result<Classification, ClassificationError> {
        let provider = self
            .select_provider()
            .ok_or(ClassificationError::NoProviderAvailable)?;
        let name = provider.name().to_string();
        debug!(provider = %name, "Selected classification provider");

        let prompt = build_prompt(description);
        let start = Instant::now();

        let outcome = tokio::time::timeout(
            self.config.timeout,
            provider.complete(&prompt, self.config.max_output_tokens),
        )
        .await;

        metrics::histogram!("triage_provider_latency_us", "provider" => name.clone())
            .record(start.elapsed().as_micros() as f64);

        let raw = match outcome {
            Ok(Ok(raw)) => raw,
            Ok(Err(source)) => {
                return Err(ClassificationError::Provider {
                    provider: name,
                    source,
                })
            }
            Err(_) => {
                return Err(ClassificationError::Provider {
                    provider: name,
                    source: ProviderError::Timeout(self.config.timeout),
                })
            }
        };

        parse_suggestion(&raw).map_err(|reason| ClassificationError::MalformedResponse {
            provider: name,
            raw,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_output_tokens, 100);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_cause_labels() {
        assert_eq!(ClassificationError::NoProviderAvailable.cause(), "no_provider");

        let timeout = ClassificationError::Provider {
            provider: "gemini".into(),
            source: ProviderError::Timeout(Duration::from_secs(1)),
        };
        assert_eq!(timeout.cause(), "provider_timeout");

        let failed = ClassificationError::Provider {
            provider: "openai".into(),
            source: ProviderError::EmptyCompletion,
        };
        assert_eq!(failed.cause(), "provider_error");

        let malformed = ClassificationError::MalformedResponse {
            provider: "openai".into(),
            raw: "billing".into(),
            reason: "expected value".into(),
        };
        assert_eq!(malformed.cause(), "malformed_response");
    }

    #[tokio::test]
    async fn test_empty_provider_list() {
        let engine = ClassificationEngine::new(Vec::new(), EngineConfig::default());
        assert!(engine.select_provider().is_none());
        assert!(matches!(
            engine.classify("anything").await,
            Err(ClassificationError::NoProviderAvailable)
        ));
    }
}
