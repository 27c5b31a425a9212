//! Core types for the triage backend

use crate::error::{Error, Result, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum title length accepted on create/update
pub const MAX_TITLE_LEN: usize = 200;

/// A member of one of the closed ticket taxonomies
pub trait Choice: Copy + Sized + 'static {
    /// Human name used in parse errors
    const KIND: &'static str;

    /// Every member, in declaration order
    const ALL: &'static [Self];

    /// Lower-case wire value
    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup of a wire value
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

impl Choice for Category {
    const KIND: &'static str = "category";
    const ALL: &'static [Self] = &[Self::Billing, Self::Technical, Self::Account, Self::General];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Technical => "technical",
            Self::Account => "account",
            Self::General => "general",
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Choice for Priority {
    const KIND: &'static str = "priority";
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Choice for Status {
    const KIND: &'static str = "status";
    const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

/// Error returned when a string is not a member of a taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{value}\" is not a valid {kind}")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_choice_traits {
    ($($ty:ty),+) => {$(
        impl FromStr for $ty {
            type Err = ParseChoiceError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                <$ty as Choice>::parse(s).ok_or_else(|| ParseChoiceError {
                    kind: <$ty as Choice>::KIND,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )+};
}

impl_choice_traits!(Category, Priority, Status);

/// Serde adapter for optional taxonomy fields.
///
/// Unset is always written as `""`. Both `""` and `null` read back as unset.
pub mod unset {
    use super::Choice;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Choice,
    {
        serializer.serialize_str(as_wire(*value))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Choice,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(value) => T::parse(value).map(Some).ok_or_else(|| {
                D::Error::custom(format!("\"{}\" is not a valid {}", value, T::KIND))
            }),
        }
    }

    /// Wire value of an optional taxonomy member
    pub fn as_wire<T: Choice>(value: Option<T>) -> &'static str {
        value.map(|v| v.as_str()).unwrap_or("")
    }
}

/// A support ticket as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(with = "unset", default)]
    pub category: Option<Category>,
    #[serde(with = "unset", default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a ticket about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Status,
}

impl NewTicket {
    /// An open, unclassified ticket
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: None,
            priority: None,
            status: Status::Open,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Materialize with a store-assigned id and timestamp
    pub fn into_ticket(self, id: u64, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            status: self.status,
            created_at,
        }
    }
}

/// Partial update. `None` leaves a field untouched; for the optional
/// taxonomy fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<Category>>,
    pub priority: Option<Option<Priority>>,
    pub status: Option<Status>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Apply the set fields to a ticket in place
    pub fn apply(self, ticket: &mut Ticket) {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(description) = self.description {
            ticket.description = description;
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
    }
}

/// Unvalidated ticket fields as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TicketInput {
    /// Validate as a full create payload
    pub fn into_new_ticket(self) -> Result<NewTicket> {
        let mut errors = ValidationErrors::new();

        let title = required_text(&mut errors, "title", self.title, Some(MAX_TITLE_LEN));
        let description = required_text(&mut errors, "description", self.description, None);
        let category = optional_choice::<Category>(&mut errors, "category", self.category);
        let priority = optional_choice::<Priority>(&mut errors, "priority", self.priority);
        let status = match self.status {
            Some(raw) => required_choice::<Status>(&mut errors, "status", &raw),
            None => Some(Status::Open),
        };

        errors.into_result()?;

        match (title, description, category, priority, status) {
            (Some(title), Some(description), Some(category), Some(priority), Some(status)) => {
                Ok(NewTicket {
                    title,
                    description,
                    category,
                    priority,
                    status,
                })
            }
            _ => Err(Error::internal("ticket validation passed with missing fields")),
        }
    }

    /// Validate as a partial update; absent fields stay untouched
    pub fn into_patch(self) -> Result<TicketPatch> {
        let mut errors = ValidationErrors::new();
        let mut patch = TicketPatch::default();

        if self.title.is_some() {
            patch.title = required_text(&mut errors, "title", self.title, Some(MAX_TITLE_LEN));
        }
        if self.description.is_some() {
            patch.description = required_text(&mut errors, "description", self.description, None);
        }
        if self.category.is_some() {
            patch.category = optional_choice::<Category>(&mut errors, "category", self.category);
        }
        if self.priority.is_some() {
            patch.priority = optional_choice::<Priority>(&mut errors, "priority", self.priority);
        }
        if let Some(raw) = self.status {
            patch.status = required_choice::<Status>(&mut errors, "status", &raw);
        }

        errors.into_result()?;
        Ok(patch)
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: Option<usize>,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, "This field is required.");
        return None;
    };
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
        return None;
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }
    Some(value)
}

/// `Some(None)` for an unset value, `None` when the value was rejected
fn optional_choice<T: Choice>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<Option<T>> {
    match value.as_deref() {
        None | Some("") => Some(None),
        Some(raw) => required_choice::<T>(errors, field, raw).map(Some),
    }
}

fn required_choice<T: Choice>(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<T> {
    let parsed = T::parse(raw);
    if parsed.is_none() {
        errors.add(field, format!("\"{}\" is not a valid choice.", raw));
    }
    parsed
}

/// List filter. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Case-insensitive substring over title or description
    #[serde(default)]
    pub search: Option<String>,
}

impl TicketFilter {
    /// Filter that matches every ticket
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(category) = active(&self.category) {
            if unset::as_wire(ticket.category) != category {
                return false;
            }
        }
        if let Some(priority) = active(&self.priority) {
            if unset::as_wire(ticket.priority) != priority {
                return false;
            }
        }
        if let Some(status) = active(&self.status) {
            if ticket.status.as_str() != status {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            let needle = search.to_lowercase();
            if !ticket.title.to_lowercase().contains(&needle)
                && !ticket.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Ticket attribute that can be grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Category,
    Priority,
}

impl TicketField {
    /// Group key of a ticket for this field; unset maps to `""`
    pub fn key(&self, ticket: &Ticket) -> &'static str {
        match self {
            Self::Category => unset::as_wire(ticket.category),
            Self::Priority => unset::as_wire(ticket.priority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(title: &str, description: &str) -> Ticket {
        NewTicket::new(title, description)
            .into_ticket(1, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_choice_parse_is_exact() {
        assert_eq!("billing".parse::<Category>(), Ok(Category::Billing));
        assert_eq!("critical".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("in_progress".parse::<Status>(), Ok(Status::InProgress));
        assert!("Billing".parse::<Category>().is_err());

        let err = "shipping".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "\"shipping\" is not a valid category");
    }

    #[test]
    fn test_unset_serializes_as_empty_string() {
        let json = serde_json::to_value(ticket("Login", "cannot log in")).unwrap();
        assert_eq!(json["category"], "");
        assert_eq!(json["priority"], "");
        assert_eq!(json["status"], "open");

        let back: Ticket = serde_json::from_value(json).unwrap();
        assert_eq!(back.category, None);
    }

    #[test]
    fn test_unset_accepts_null_and_rejects_unknown() {
        let mut json = serde_json::to_value(ticket("a", "b")).unwrap();
        json["category"] = serde_json::Value::Null;
        json["priority"] = "high".into();
        let parsed: Ticket = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.priority, Some(Priority::High));

        json["priority"] = "urgent".into();
        assert!(serde_json::from_value::<Ticket>(json).is_err());
    }

    #[test]
    fn test_input_into_new_ticket_defaults() {
        let input = TicketInput {
            title: Some("Refund".into()),
            description: Some("Charged twice".into()),
            category: Some("".into()),
            ..Default::default()
        };
        let new = input.into_new_ticket().unwrap();
        assert_eq!(new.category, None);
        assert_eq!(new.priority, None);
        assert_eq!(new.status, Status::Open);
    }

    #[test]
    fn test_input_reports_every_bad_field() {
        let input = TicketInput {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            description: Some("   ".into()),
            category: Some("shipping".into()),
            priority: Some("HIGH".into()),
            status: Some("later".into()),
        };
        let Err(Error::Validation(errors)) = input.into_new_ticket() else {
            panic!("expected validation error");
        };
        assert!(errors.field("title").is_some());
        assert_eq!(
            errors.field("description"),
            Some(&["This field may not be blank.".to_string()][..])
        );
        assert!(errors.field("category").is_some());
        assert!(errors.field("priority").is_some());
        assert!(errors.field("status").is_some());
    }

    #[test]
    fn test_missing_required_fields() {
        let Err(Error::Validation(errors)) = TicketInput::default().into_new_ticket() else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.field("title"),
            Some(&["This field is required.".to_string()][..])
        );
        assert!(errors.field("description").is_some());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut t = ticket("Printer", "on fire");
        t.category = Some(Category::Technical);

        let patch = TicketInput {
            priority: Some("critical".into()),
            category: Some("".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert!(!patch.is_empty());
        patch.apply(&mut t);

        assert_eq!(t.title, "Printer");
        assert_eq!(t.category, None);
        assert_eq!(t.priority, Some(Priority::Critical));
        assert_eq!(t.status, Status::Open);
    }

    #[test]
    fn test_patch_rejects_blank_title() {
        let input = TicketInput {
            title: Some("".into()),
            ..Default::default()
        };
        assert!(matches!(input.into_patch(), Err(Error::Validation(_))));
        assert!(TicketInput::default().into_patch().unwrap().is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let mut t = ticket("Invoice missing", "Where is my PDF?");
        t.category = Some(Category::Billing);

        assert!(TicketFilter::all().matches(&t));
        assert!(TicketFilter::all().with_category("billing").matches(&t));
        assert!(!TicketFilter::all().with_category("account").matches(&t));
        assert!(TicketFilter::all().with_priority("").matches(&t));
        assert!(!TicketFilter::all().with_priority("low").matches(&t));
        assert!(TicketFilter::all().with_status(Status::Open).matches(&t));
        assert!(TicketFilter::all().with_search("INVOICE").matches(&t));
        assert!(TicketFilter::all().with_search("pdf").matches(&t));
        assert!(!TicketFilter::all().with_search("refund").matches(&t));
    }

    #[test]
    fn test_field_keys() {
        let mut t = ticket("a", "b");
        assert_eq!(TicketField::Category.key(&t), "");
        t.priority = Some(Priority::Medium);
        assert_eq!(TicketField::Priority.key(&t), "medium");
    }
}
