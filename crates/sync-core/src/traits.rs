//! Capability traits consumed by the sync engine.
//!
//! The engine never talks HTTP itself; it drives these traits, and the
//! concrete clients (eventbrite-source, webflow-sink, the Slack notifier)
//! implement them. Tests substitute in-memory fakes.

use crate::error::SyncError;
use crate::project::FieldMap;
use crate::types::{CollectionSchema, ItemPage, SourceEvent};

/// A source system exposing the current list of candidate events.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Authenticate and return the current full list of candidate events.
    ///
    /// Implementations perform their own credential exchange first and fail
    /// with [`SyncError::Auth`] when it is rejected.
    async fn list_events(&self) -> Result<Vec<SourceEvent>, SyncError>;
}

/// A destination content store with a caller-defined field schema.
#[async_trait::async_trait]
pub trait ContentSink: Send + Sync {
    /// Fetch the collection's current writable field slugs.
    async fn collection_schema(&self) -> Result<CollectionSchema, SyncError>;

    /// Fetch one page of existing items at the given offset.
    ///
    /// A page with fewer than `limit` items signals exhaustion.
    async fn list_items(&self, offset: usize, limit: usize) -> Result<ItemPage, SyncError>;

    /// Create one item from the projected fields, returning its id.
    ///
    /// The created item must always land unpublished (draft), regardless of
    /// the fields passed in.
    async fn create_item(&self, fields: &FieldMap) -> Result<String, SyncError>;
}

/// Out-of-band notification collaborator.
///
/// Invoked by the engine with the list of newly created events after the
/// write loop completes. Failures are the caller's to log and swallow; they
/// must never surface as a sync failure.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_created(&self, events: &[SourceEvent]) -> anyhow::Result<()>;
}
