//! Slack notification for newly synced events.
//!
//! The sync posts a short message to an incoming-webhook URL after a batch
//! that created at least one draft, so reviewers know there is something to
//! publish. Delivery is fire-and-forget: the engine logs a failed post and
//! moves on; it never becomes a sync failure.

use anyhow::Context;
use std::time::Duration;
use sync_core::{Notifier, SourceEvent, DEFAULT_TITLE};

/// Webhook timeout; a slow Slack must not stall the process.
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Posts created-event summaries to a Slack incoming webhook.
pub struct SlackNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(SlackNotifier {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

/// Render the message text for a batch of created events.
fn format_message(events: &[SourceEvent]) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(format!(
        "{} new event{} synced to Webflow as drafts:",
        events.len(),
        if events.len() == 1 { "" } else { "s" }
    ));
    for event in events {
        let title = event.title.as_deref().unwrap_or(DEFAULT_TITLE);
        match event.start_local.as_deref() {
            Some(start) => lines.push(format!("- {title} ({start})")),
            None => lines.push(format!("- {title}")),
        }
    }
    lines.join("\n")
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn notify_created(&self, events: &[SourceEvent]) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "text": format_message(events) }))
            .send()
            .await
            .context("posting Slack webhook")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Slack webhook returned HTTP {status}: {body}");
        }

        tracing::debug!("Notified Slack about {} created events", events.len());
        Ok(())
    }
}
