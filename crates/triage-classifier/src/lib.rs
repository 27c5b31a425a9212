//! Triage Classifier
//!
//! Suggests a category and priority for a free-text ticket description.
//!
//! The engine holds an ordered list of text-completion providers and uses the
//! first one that is available. Provider output must be a JSON object; the
//! `category` and `priority` strings are validated independently against the
//! fixed taxonomy, so an unknown value in one field never discards the other.
//!
//! Every failure (no provider, provider error, malformed output) is reported
//! as a distinct [`ClassificationError`] variant so callers and logs can tell
//! them apart even though the HTTP surface maps them all to 503.

pub mod config;
pub mod engine;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod request;

pub use config::{ClassificationConfig, ProviderSpec};
pub use engine::{Classification, ClassificationEngine, ClassificationError, EngineConfig};
pub use provider::{CompletionProvider, ProviderError};
pub use providers::{build_providers, GeminiProvider, OpenAiProvider, ProviderKind, ProviderSettings};
pub use request::ClassificationRequest;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{Classification, ClassificationEngine, ClassificationError};
    pub use crate::provider::{CompletionProvider, ProviderError};
}
