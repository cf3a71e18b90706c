//! Command-line interface for gig-sync
//!
//! # Usage Examples
//!
//! ## One reconciliation pass
//! ```bash
//! gig-sync sync \
//!   --eventbrite-organization-id 90001 \
//!   --webflow-collection-id 5f0cabc... \
//!   --write-delay-ms 1100
//! ```
//!
//! ## Dry run (diff and project, write nothing)
//! ```bash
//! gig-sync sync \
//!   --eventbrite-organization-id 90001 \
//!   --webflow-collection-id 5f0cabc... \
//!   --dry-run
//! ```
//!
//! ## Inspect the destination schema
//! ```bash
//! gig-sync schema --webflow-collection-id 5f0cabc...
//! ```
//!
//! Credentials are read from the environment: `EVENTBRITE_CLIENT_ID`,
//! `EVENTBRITE_CLIENT_SECRET`, `WEBFLOW_API_TOKEN`, and optionally
//! `SLACK_WEBHOOK_URL` for the created-events notification.

use anyhow::Context;
use clap::{Parser, Subcommand};
use eventbrite_source::EventbriteSource;
use gig_sync::notify::SlackNotifier;
use gig_sync::sync::SyncEngine;
use gig_sync::{EventbriteArgs, SyncArgs, WebflowArgs};
use sync_core::ContentSink;
use webflow_sink::WebflowSink;

#[derive(Parser)]
#[command(name = "gig-sync")]
#[command(about = "A tool for syncing Eventbrite events into a Webflow CMS collection")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reconciliation pass (list, dedup, create drafts)
    Sync {
        /// Source API options
        #[command(flatten)]
        eventbrite: EventbriteArgs,

        /// Destination collection options
        #[command(flatten)]
        webflow: WebflowArgs,

        /// Engine options
        #[command(flatten)]
        sync: SyncArgs,

        /// Slack incoming-webhook URL for the created-events notification
        /// (omit to disable)
        #[arg(long, env = "SLACK_WEBHOOK_URL")]
        slack_webhook_url: Option<String>,
    },

    /// Print the destination collection's writable field slugs
    Schema {
        /// Destination collection options
        #[command(flatten)]
        webflow: WebflowArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            eventbrite,
            webflow,
            sync,
            slack_webhook_url,
        } => {
            let source = EventbriteSource::new((&eventbrite).into())
                .context("building Eventbrite client")?;
            let sink = WebflowSink::new((&webflow).into()).context("building Webflow client")?;

            let mut engine = SyncEngine::new(source, sink, (&sync).into());
            if let Some(url) = slack_webhook_url {
                let notifier = SlackNotifier::new(url).context("building Slack notifier")?;
                engine = engine.with_notifier(Box::new(notifier));
            }

            let summary = engine.run().await?;

            if summary.has_failures() {
                tracing::warn!(
                    "{} of {} new events failed to sync; they are absent from \
                     the destination and will be picked up on the next run",
                    summary.failures.len(),
                    summary.created + summary.failures.len()
                );
            }

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Schema { webflow } => {
            let sink = WebflowSink::new((&webflow).into()).context("building Webflow client")?;
            let schema = sink
                .collection_schema()
                .await
                .context("loading destination collection schema")?;
            for slug in schema.slugs() {
                println!("{slug}");
            }
        }
    }

    Ok(())
}
