//! Reconciliation engine for gig-sync
//!
//! One run is a linear pass with no back-edges:
//!
//! 1. Probe the destination collection schema (fatal on failure)
//! 2. List the source events (fatal on failure)
//! 3. Scan every existing destination item into a dedup index (fatal on
//!    failure; a partial index would re-create synced records)
//! 4. Diff: an event is new iff it is listed and its id is absent from the
//!    index
//! 5. Write: strictly sequential draft creations in source-listing order,
//!    with a fixed pacing delay after every attempt and per-record failure
//!    capture
//!
//! The dedup index is recomputed from the destination on every run; there is
//! no local state. A record created by a concurrent external writer between
//! the scan and the write loop is not detected — an accepted limitation.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use sync_core::{
    has_identifier_field, project, stored_source_id, ContentSink, EventSource, ItemPages,
    Notifier, SourceEvent, SyncError, SyncSummary, WriteFailure,
};

/// Engine configuration. Loaded once at process start, immutable for the
/// run's duration.
#[derive(Debug, Clone)]
pub struct SyncOpts {
    /// Page size for the destination dedup scan
    pub scan_page_size: usize,
    /// Minimum delay enforced after every write attempt, sized for the
    /// destination's requests-per-minute ceiling
    pub write_delay: Duration,
    /// Compute the diff and projections but skip writes and notification
    pub dry_run: bool,
}

impl Default for SyncOpts {
    fn default() -> Self {
        SyncOpts {
            scan_page_size: 100,
            write_delay: Duration::from_millis(1100),
            dry_run: false,
        }
    }
}

/// Orchestrates one reconciliation run over a source and a sink.
pub struct SyncEngine<S, K> {
    source: S,
    sink: K,
    notifier: Option<Box<dyn Notifier>>,
    opts: SyncOpts,
}

impl<S: EventSource, K: ContentSink> SyncEngine<S, K> {
    pub fn new(source: S, sink: K, opts: SyncOpts) -> Self {
        SyncEngine {
            source,
            sink,
            notifier: None,
            opts,
        }
    }

    /// Attach the out-of-band notification collaborator.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Run one reconciliation pass and return its summary.
    ///
    /// Read-phase failures abort the run with no summary; write-phase
    /// failures are recorded per record and never abort the batch.
    pub async fn run(&self) -> anyhow::Result<SyncSummary> {
        let schema = self
            .sink
            .collection_schema()
            .await
            .context("loading destination collection schema")?;
        tracing::info!("Destination schema loaded: {} writable fields", schema.len());
        if !has_identifier_field(&schema) {
            tracing::warn!(
                "Collection has no identifier field; created items cannot be \
                 recognized as synced on later runs"
            );
        }

        let events = self
            .source
            .list_events()
            .await
            .context("listing source events")?;

        let index = self
            .build_dedup_index()
            .await
            .context("scanning destination for existing source ids")?;
        tracing::info!("Dedup index covers {} existing items", index.len());

        let new_events: Vec<&SourceEvent> = events
            .iter()
            .filter(|e| e.listed && !index.contains(&e.id))
            .collect();
        tracing::info!(
            "{} of {} source events are new",
            new_events.len(),
            events.len()
        );

        let mut created: Vec<SourceEvent> = Vec::new();
        let mut failures: Vec<WriteFailure> = Vec::new();

        for event in new_events {
            let fields = project(event, &schema);

            if self.opts.dry_run {
                tracing::info!(
                    "[dry-run] would create item for event {} as {}",
                    event.id,
                    fields.get("slug").and_then(|v| v.as_str()).unwrap_or("?")
                );
                continue;
            }

            match self.sink.create_item(&fields).await {
                Ok(item_id) => {
                    tracing::info!("Created draft item {} for event {}", item_id, event.id);
                    created.push(event.clone());
                }
                Err(e) => {
                    tracing::warn!("Failed to create item for event {}: {}", event.id, e);
                    failures.push(WriteFailure {
                        event_id: event.id.clone(),
                        message: e.to_string(),
                    });
                }
            }

            // A rejected write still counts against the destination's
            // request ceiling, so failures are paced too.
            tokio::time::sleep(self.opts.write_delay).await;
        }

        if !self.opts.dry_run {
            self.notify(&created).await;
        }

        let summary = SyncSummary {
            total: events.len(),
            created: created.len(),
            failures,
        };
        tracing::info!(
            "Sync complete: {} source events, {} created, {} failed",
            summary.total,
            summary.created,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Collect the source identifier of every existing destination item.
    ///
    /// Consumes the page cursor to exhaustion. Items without a stored
    /// identifier (e.g. hand-authored records predating the sync) are
    /// skipped, not errors.
    async fn build_dedup_index(&self) -> Result<HashSet<String>, SyncError> {
        let mut index = HashSet::new();
        let mut scanned = 0usize;

        let mut pages = ItemPages::new(&self.sink, self.opts.scan_page_size);
        while let Some(page) = pages.next_page().await {
            let page = page?;
            scanned += page.items.len();
            for item in &page.items {
                if let Some(id) = stored_source_id(item) {
                    index.insert(id.to_string());
                }
            }
        }

        tracing::debug!(
            "Scanned {} destination items ({} carry a source id)",
            scanned,
            index.len()
        );
        Ok(index)
    }

    async fn notify(&self, created: &[SourceEvent]) {
        let Some(notifier) = self.notifier.as_deref() else {
            return;
        };
        if created.is_empty() {
            return;
        }
        if let Err(e) = notifier.notify_created(created).await {
            tracing::warn!("Notification delivery failed: {e:#}");
        }
    }
}
