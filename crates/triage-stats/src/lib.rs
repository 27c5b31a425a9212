//! Triage Stats
//!
//! Ticket statistics computed on demand from the ticket store.
//!
//! Provides:
//! - Total and open ticket counts
//! - Average tickets per day since the first ticket
//! - Priority and category breakdowns

pub mod aggregator;
pub mod snapshot;

pub use aggregator::StatsAggregator;
pub use snapshot::{round_one_decimal, tickets_per_day, StatsSnapshot};
