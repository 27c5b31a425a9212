//! Application state shared across requests

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use triage_classifier::{build_providers, ClassificationEngine};
use triage_core::{InMemoryTicketStore, TicketStore};
use triage_stats::StatsAggregator;

use crate::config::ServerConfig;

/// Extra slack for the HTTP client over the engine deadline
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Ticket persistence
    pub store: Arc<dyn TicketStore>,

    /// Category/priority suggestion engine
    pub engine: Arc<ClassificationEngine>,

    /// Stats over the same store
    pub stats: StatsAggregator,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TicketStore>,
        engine: ClassificationEngine,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            stats: StatsAggregator::new(store.clone()),
            store,
            engine: Arc::new(engine),
            metrics_handle,
        }
    }

    /// Initialize application state from configuration.
    ///
    /// Provider credentials are read from the environment here, once.
    pub fn from_config(
        config: &ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let engine_config = config.classification.engine_config();

        // Create HTTP client for provider requests
        let http_client = reqwest::Client::builder()
            .timeout(engine_config.timeout + CLIENT_TIMEOUT_SLACK)
            .build()?;

        let settings = config
            .classification
            .resolve_providers(|name| std::env::var(name).ok());
        let providers = build_providers(&http_client, &settings);
        let available = providers.iter().filter(|p| p.is_available()).count();
        info!(
            "Loaded {} classification providers ({} available)",
            providers.len(),
            available
        );

        let engine = ClassificationEngine::new(providers, engine_config);
        let store: Arc<dyn TicketStore> = Arc::new(InMemoryTicketStore::new());

        Ok(Self::new(store, engine, metrics_handle))
    }
}
