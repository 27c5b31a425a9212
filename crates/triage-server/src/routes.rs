//! HTTP routes and handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use triage_classifier::{Classification, ClassificationRequest};
use triage_core::{Ticket, TicketFilter, TicketInput};
use triage_stats::StatsSnapshot;

use crate::config::CorsConfig;
use crate::error::AppError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/tickets/", get(list_tickets).post(create_ticket))
        .route("/tickets/classify/", post(classify_ticket))
        .route("/tickets/stats/", get(ticket_stats))
        .route("/tickets/:id/", patch(update_ticket));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .fallback(fallback)
        .with_state(state)
}

/// Router with request tracing and CORS for the web frontend
pub fn build_app(state: AppState, cors: &CorsConfig) -> Router {
    create_router(state)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn list_tickets(
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    metrics::counter!("triage_requests_total", "route" => "list_tickets").increment(1);
    let tickets = state.store.list(&filter).await?;
    Ok(Json(tickets))
}

async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    metrics::counter!("triage_requests_total", "route" => "create_ticket").increment(1);
    let Json(input) = payload?;

    let ticket = state.store.create(input.into_new_ticket()?).await?;
    info!(id = ticket.id, "Ticket created");

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Partial update; fields left out of the body are unchanged
async fn update_ticket(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> Result<Json<Ticket>, AppError> {
    metrics::counter!("triage_requests_total", "route" => "update_ticket").increment(1);
    let Path(id) = path?;
    let Json(input) = payload?;

    let ticket = state.store.update(id, input.into_patch()?).await?;
    info!(id, "Ticket updated");

    Ok(Json(ticket))
}

/// Suggest category and priority.
///
/// Every engine failure maps to 503 with both suggestions empty; the engine
/// has already logged the specific cause.
async fn classify_ticket(
    State(state): State<AppState>,
    payload: Result<Json<ClassificationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    metrics::counter!("triage_requests_total", "route" => "classify_ticket").increment(1);
    let Json(request) = payload?;
    let description = request.into_description()?;

    let response = match state.engine.classify(&description).await {
        Ok(classification) => Json(classification).into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Classification::unset()),
        )
            .into_response(),
    };

    Ok(response)
}

async fn ticket_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, AppError> {
    metrics::counter!("triage_requests_total", "route" => "ticket_stats").increment(1);
    Ok(Json(state.stats.snapshot().await?))
}

async fn fallback() -> AppError {
    AppError::NotFound("Not found".to_string())
}
