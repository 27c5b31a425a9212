//! Triage Core
//!
//! Core types, traits, and utilities shared across the triage components.
//!
//! This crate provides:
//! - The ticket model and the closed category/priority/status taxonomies
//! - Error types and result handling
//! - The `TicketStore` trait consumed by the stats and HTTP layers
//! - An in-process ticket store

pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result, ValidationErrors};
pub use store::{InMemoryTicketStore, TicketStore};
pub use types::{
    Category, Choice, NewTicket, Priority, Status, Ticket, TicketField, TicketFilter,
    TicketInput, TicketPatch,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result, ValidationErrors};
    pub use crate::store::{InMemoryTicketStore, TicketStore};
    pub use crate::types::{Category, Priority, Status, Ticket, TicketFilter};
}
