//! Core types for the gig-sync framework.
//!
//! This crate provides the foundational types used across the sync
//! framework, including:
//!
//! - [`SourceEvent`] - An event record as listed by the source system
//! - [`CollectionSchema`] - The destination collection's writable field slugs
//! - [`SyncSummary`] - Per-run result counts and failure records
//! - [`SyncError`] - Error taxonomy shared by sources and sinks
//! - [`project`] - Pure projection of a source event onto a field schema
//!
//! # Architecture
//!
//! The sync-core crate sits at the foundation of the workspace:
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── eventbrite-source  (implements EventSource)
//!    ├─── webflow-sink       (implements ContentSink)
//!    └─── gig-sync           (engine consuming both through the traits)
//! ```
//!
//! Everything here is transport-free: the traits in [`traits`] describe the
//! capabilities the engine consumes, and the concrete HTTP clients live in
//! their own crates.

pub mod error;
pub mod pages;
pub mod project;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use error::SyncError;
pub use pages::ItemPages;
pub use project::{
    has_identifier_field, project, slugify, stored_source_id, FieldMap, DEFAULT_TITLE,
};
pub use traits::{ContentSink, EventSource, Notifier};
pub use types::{CollectionSchema, ItemPage, SourceEvent, SyncSummary, WriteFailure};
