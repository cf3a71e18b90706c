//! gig-sync library
//!
//! A tool for one-way, idempotent syncing of Eventbrite events into a
//! Webflow CMS collection as unpublished drafts.
//!
//! # Features
//!
//! - Existence-based deduplication: the set of already-synced events is
//!   recomputed from the destination on every run; no local state
//! - Schema-adaptive field mapping: the projector probes the collection's
//!   actual field slugs, so renamed or missing optional fields degrade
//!   gracefully instead of failing the run
//! - Partial-failure isolation: one rejected creation never aborts the batch
//! - Rate-limit pacing: writes are strictly sequential with a fixed delay
//!
//! # CLI Usage
//!
//! ```bash
//! # One reconciliation pass
//! gig-sync sync \
//!   --eventbrite-organization-id 90001 \
//!   --webflow-collection-id 5f0c... \
//!   --dry-run
//!
//! # Inspect the destination collection's writable field slugs
//! gig-sync schema --webflow-collection-id 5f0c...
//! ```
//!
//! Credentials come from the environment (`EVENTBRITE_CLIENT_ID`,
//! `EVENTBRITE_CLIENT_SECRET`, `WEBFLOW_API_TOKEN`, `SLACK_WEBHOOK_URL`).

use clap::Parser;
use std::time::Duration;

pub mod notify;
pub mod sync;

#[derive(Parser, Clone)]
pub struct EventbriteArgs {
    /// Eventbrite API base URL
    #[arg(
        long,
        default_value = "https://www.eventbriteapi.com/v3",
        env = "EVENTBRITE_API_BASE"
    )]
    pub eventbrite_api_base: String,

    /// OAuth client id
    #[arg(long, env = "EVENTBRITE_CLIENT_ID")]
    pub eventbrite_client_id: String,

    /// OAuth client secret
    #[arg(long, env = "EVENTBRITE_CLIENT_SECRET")]
    pub eventbrite_client_secret: String,

    /// Organization whose events are synced
    #[arg(long, env = "EVENTBRITE_ORGANIZATION_ID")]
    pub eventbrite_organization_id: String,

    /// Bound for the single listing call
    #[arg(long, default_value = "200")]
    pub source_page_size: usize,
}

// CLI type → source library type conversion
impl From<&EventbriteArgs> for eventbrite_source::SourceOpts {
    fn from(args: &EventbriteArgs) -> Self {
        Self {
            api_base: args.eventbrite_api_base.clone(),
            client_id: args.eventbrite_client_id.clone(),
            client_secret: args.eventbrite_client_secret.clone(),
            organization_id: args.eventbrite_organization_id.clone(),
            page_size: args.source_page_size,
        }
    }
}

#[derive(Parser, Clone)]
pub struct WebflowArgs {
    /// Webflow API base URL
    #[arg(long, default_value = "https://api.webflow.com", env = "WEBFLOW_API_BASE")]
    pub webflow_api_base: String,

    /// Webflow API token
    #[arg(long, env = "WEBFLOW_API_TOKEN")]
    pub webflow_api_token: String,

    /// Target collection id
    #[arg(long, env = "WEBFLOW_COLLECTION_ID")]
    pub webflow_collection_id: String,
}

// CLI type → sink library type conversion
impl From<&WebflowArgs> for webflow_sink::SinkOpts {
    fn from(args: &WebflowArgs) -> Self {
        Self {
            api_base: args.webflow_api_base.clone(),
            api_token: args.webflow_api_token.clone(),
            collection_id: args.webflow_collection_id.clone(),
        }
    }
}

#[derive(Parser, Clone)]
pub struct SyncArgs {
    /// Page size for the destination dedup scan
    #[arg(long, default_value = "100")]
    pub scan_page_size: usize,

    /// Minimum delay after every write attempt, in milliseconds (Webflow
    /// allows 60 requests per minute)
    #[arg(long, default_value = "1100")]
    pub write_delay_ms: u64,

    /// Dry run mode - don't actually write data
    #[arg(long)]
    pub dry_run: bool,
}

impl From<&SyncArgs> for sync::SyncOpts {
    fn from(args: &SyncArgs) -> Self {
        Self {
            scan_page_size: args.scan_page_size,
            write_delay: Duration::from_millis(args.write_delay_ms),
            dry_run: args.dry_run,
        }
    }
}
