//! Triage Server
//!
//! HTTP surface for the ticket triage backend: ticket listing, creation and
//! partial updates, AI category/priority suggestions, and aggregate stats.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::{CorsConfig, ServerConfig};
pub use error::AppError;
pub use routes::{build_app, create_router};
pub use state::AppState;
