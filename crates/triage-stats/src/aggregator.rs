//! Stats aggregation over the ticket store

use crate::snapshot::{tickets_per_day, StatsSnapshot};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use triage_core::{Result, Status, TicketField, TicketFilter, TicketStore};

/// Computes stats snapshots from the live ticket collection
#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn TicketStore>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Snapshot as of now
    pub async fn snapshot(&self) -> Result<StatsSnapshot> {
        self.snapshot_at(Utc::now()).await
    }

    /// Snapshot using `now` as the reference instant.
    ///
    /// Each figure is a separate store query; store errors propagate as-is.
    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> Result<StatsSnapshot> {
        let start = Instant::now();

        let total_tickets = self.store.count(&TicketFilter::all()).await?;
        let open_tickets = self
            .store
            .count(&TicketFilter::all().with_status(Status::Open))
            .await?;
        let earliest = self.store.earliest_created_at().await?;
        let priority_breakdown = self.store.group_count(TicketField::Priority).await?;
        let category_breakdown = self.store.group_count(TicketField::Category).await?;

        let snapshot = StatsSnapshot {
            total_tickets,
            open_tickets,
            avg_tickets_per_day: tickets_per_day(total_tickets, earliest, now),
            priority_breakdown,
            category_breakdown,
        };

        metrics::counter!("triage_stats_snapshots_total").increment(1);
        debug!(
            total = snapshot.total_tickets,
            open = snapshot.open_tickets,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Stats snapshot computed"
        );

        Ok(snapshot)
    }
}
