//! Triage Server
//!
//! Support ticket API with AI-suggested category and priority.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use triage_server::{build_app, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting triage server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded from {}", cli.config);
    info!(
        "Classification: {} providers, {} max tokens, {}ms timeout",
        config.classification.providers.len(),
        config.classification.max_output_tokens,
        config.classification.timeout_ms
    );

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let state = AppState::from_config(&config, Some(metrics_handle))?;
    let app = build_app(state, &config.cors);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            warn!("{} received, draining connections", signal);
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve once SIGINT or SIGTERM arrives; returns the signal name
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    match unix_signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = interrupt() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        },
        Err(e) => {
            warn!("SIGTERM handler unavailable: {}", e);
            interrupt().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    interrupt().await;
    "Ctrl+C"
}

/// Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Ctrl+C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize tracing. `--verbose` wins over `RUST_LOG`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !verbose => filter,
        _ if verbose => EnvFilter::new("triage=debug,tower_http=debug"),
        _ => EnvFilter::new("triage=info,tower_http=warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "triage_requests_total",
        "Total number of API requests by route"
    );
    metrics::describe_counter!(
        "triage_classifications_total",
        "Classification attempts by outcome"
    );
    metrics::describe_histogram!(
        "triage_provider_latency_us",
        metrics::Unit::Microseconds,
        "Text-completion provider latency in microseconds"
    );
    metrics::describe_counter!(
        "triage_stats_snapshots_total",
        "Number of stats snapshots computed"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
