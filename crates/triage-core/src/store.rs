//! Ticket store abstraction and the in-process implementation

use crate::error::{Error, Result};
use crate::types::{NewTicket, Ticket, TicketField, TicketFilter, TicketPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Persistence collaborator for tickets.
///
/// Every method observes a single consistent state of the collection, but
/// two separate calls may see different states.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Tickets matching the filter, newest first
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    /// Fetch a single ticket
    async fn get(&self, id: u64) -> Result<Ticket>;

    /// Insert a new ticket, assigning id and creation time
    async fn create(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Apply a partial update and return the updated ticket
    async fn update(&self, id: u64, patch: TicketPatch) -> Result<Ticket>;

    /// Number of tickets matching the filter
    async fn count(&self, filter: &TicketFilter) -> Result<u64>;

    /// Earliest `created_at` across all tickets, `None` when empty
    async fn earliest_created_at(&self) -> Result<Option<DateTime<Utc>>>;

    /// Ticket counts per value of `field`; unset is keyed as `""`
    async fn group_count(&self, field: TicketField) -> Result<BTreeMap<String, u64>>;
}

/// Ticket store held in process memory
#[derive(Default)]
pub struct InMemoryTicketStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    tickets: BTreeMap<u64, Ticket>,
    last_id: u64,
}

impl InMemoryTicketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time (imports, fixtures)
    pub fn insert_at(&self, ticket: NewTicket, created_at: DateTime<Utc>) -> Ticket {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let ticket = ticket.into_ticket(inner.last_id, created_at);
        inner.tickets.insert(ticket.id, ticket.clone());
        debug!(id = ticket.id, "ticket inserted");
        ticket
    }

    /// Number of stored tickets
    pub fn len(&self) -> usize {
        self.inner.read().tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let inner = self.inner.read();
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    async fn get(&self, id: u64) -> Result<Ticket> {
        self.inner
            .read()
            .tickets
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        Ok(self.insert_at(ticket, Utc::now()))
    }

    async fn update(&self, id: u64, patch: TicketPatch) -> Result<Ticket> {
        let mut inner = self.inner.write();
        let ticket = inner.tickets.get_mut(&id).ok_or(Error::NotFound(id))?;
        patch.apply(ticket);
        debug!(id, "ticket updated");
        Ok(ticket.clone())
    }

    async fn count(&self, filter: &TicketFilter) -> Result<u64> {
        let inner = self.inner.read();
        Ok(inner.tickets.values().filter(|t| filter.matches(t)).count() as u64)
    }

    async fn earliest_created_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.inner.read().tickets.values().map(|t| t.created_at).min())
    }

    async fn group_count(&self, field: TicketField) -> Result<BTreeMap<String, u64>> {
        let inner = self.inner.read();
        let mut groups = BTreeMap::new();
        for ticket in inner.tickets.values() {
            *groups.entry(field.key(ticket).to_string()).or_insert(0) += 1;
        }
        Ok(groups)
    }
}
