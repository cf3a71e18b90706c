//! Domain types shared across the sync framework.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An event record as returned by the source system's listing endpoint.
///
/// Identity is the `id` string; two events with the same `id` are the same
/// event. Everything else is optional payload that the projector maps onto
/// whatever fields the destination collection actually defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvent {
    /// Stable unique identifier assigned by the source system
    pub id: String,

    /// Display title
    pub title: Option<String>,

    /// Raw start timestamp text, parsed only during projection
    pub start_local: Option<String>,

    /// Public event page URL
    pub url: Option<String>,

    /// Venue city
    pub venue_city: Option<String>,

    /// Venue state/region
    pub venue_state: Option<String>,

    /// Event type label (e.g. "Concert", "Workshop")
    pub category: Option<String>,

    /// Event image URL
    pub logo_url: Option<String>,

    /// Publication-state flag; unlisted events are never synced
    pub listed: bool,
}

impl SourceEvent {
    /// Create a minimal listed event with only an id and title set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        SourceEvent {
            id: id.into(),
            title: Some(title.into()),
            start_local: None,
            url: None,
            venue_city: None,
            venue_state: None,
            category: None,
            logo_url: None,
            listed: true,
        }
    }
}

/// The destination collection's writable field slugs, fetched once per run.
///
/// Used only for membership tests during projection; never mutated. The
/// backing set is ordered so that iteration (e.g. the `schema` CLI command)
/// is deterministic.
#[derive(Debug, Clone, Default)]
pub struct CollectionSchema {
    slugs: BTreeSet<String>,
}

impl CollectionSchema {
    /// Build a schema from an iterator of field slugs.
    pub fn new<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CollectionSchema {
            slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the collection defines a field with this slug.
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    /// Probe an ordered candidate list against the schema; first match wins.
    pub fn first_match<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.contains(c))
    }

    /// Iterate the field slugs in lexicographic order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

/// One page of existing destination items.
///
/// Items are kept as raw JSON objects: the destination schema is
/// caller-defined, so there is no fixed struct to deserialize into. The
/// dedup scanner only probes each object for the stored source identifier.
#[derive(Debug, Clone, Default)]
pub struct ItemPage {
    pub items: Vec<serde_json::Value>,
}

impl ItemPage {
    /// Whether this page signals exhaustion for the given requested limit.
    pub fn is_short(&self, limit: usize) -> bool {
        self.items.len() < limit
    }
}

/// A single failed creation, recorded without aborting the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteFailure {
    /// Source identifier of the event whose write failed
    pub event_id: String,
    /// Rendered error message from the destination
    pub message: String,
}

/// Result of one reconciliation run.
///
/// Constructed at the end of a run and returned to the caller; the core
/// never persists it.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    /// Source records considered (the full listing, including already-synced
    /// and unlisted events)
    pub total: usize,
    /// Destination records newly created this run
    pub created: usize,
    /// Per-record creation failures
    pub failures: Vec<WriteFailure>,
}

impl SyncSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
