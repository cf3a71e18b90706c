//! Eventbrite source implementation
//!
//! This crate reads the current list of candidate events from the
//! Eventbrite API: one credential exchange against the OAuth token
//! endpoint, then one bounded listing call with venue and format
//! expansions. The listing is deliberately a single page ([`SourceOpts::page_size`]
//! events); organizations large enough to outgrow that bound need a
//! paginating reader, which this source does not provide.

use serde::Deserialize;
use std::time::Duration;
use sync_core::{EventSource, SourceEvent, SyncError};

/// Default bound for the single listing call.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// HTTP timeout for token and listing calls.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Source API connection options (library type without clap).
#[derive(Clone, Debug)]
pub struct SourceOpts {
    /// API base, e.g. `https://www.eventbriteapi.com/v3`
    pub api_base: String,
    pub client_id: String,
    pub client_secret: String,
    /// Organization whose events are listed
    pub organization_id: String,
    /// Fixed bound for the single listing call
    pub page_size: usize,
}

/// Eventbrite listing client implementing [`EventSource`].
pub struct EventbriteSource {
    opts: SourceOpts,
    client: reqwest::Client,
}

impl EventbriteSource {
    pub fn new(opts: SourceOpts) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(EventbriteSource { opts, client })
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// A 4xx from the token endpoint means the credentials were rejected;
    /// anything else non-success is a transport failure.
    pub async fn acquire_token(&self) -> Result<String, SyncError> {
        let url = format!("{}/oauth/token/", self.opts.api_base.trim_end_matches('/'));
        tracing::debug!("Exchanging credentials at {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.opts.client_id.as_str()),
                ("client_secret", self.opts.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SyncError::connection("source token exchange", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.is_client_error() {
                return Err(SyncError::Auth {
                    reason: format!("HTTP {}: {body}", status.as_u16()),
                });
            }
            return Err(SyncError::transport(
                "source token exchange",
                status.as_u16(),
                body,
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SyncError::connection("source token exchange", e))?;
        Ok(token.access_token)
    }

    async fn fetch_events(&self, token: &str) -> Result<Vec<SourceEvent>, SyncError> {
        let url = format!(
            "{}/organizations/{}/events/",
            self.opts.api_base.trim_end_matches('/'),
            self.opts.organization_id
        );

        let page_size = self.opts.page_size.to_string();
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("page_size", page_size.as_str()),
                ("expand", "venue,format"),
                ("order_by", "start_asc"),
            ])
            .send()
            .await
            .map_err(|e| SyncError::connection("source event listing", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::transport(
                "source event listing",
                status.as_u16(),
                body,
            ));
        }

        let listing: EventListResponse = response
            .json()
            .await
            .map_err(|e| SyncError::connection("source event listing", e))?;

        Ok(listing.events.into_iter().map(SourceEvent::from).collect())
    }
}

#[async_trait::async_trait]
impl EventSource for EventbriteSource {
    async fn list_events(&self) -> Result<Vec<SourceEvent>, SyncError> {
        let token = self.acquire_token().await?;
        let events = self.fetch_events(&token).await?;
        tracing::info!("Listed {} events from Eventbrite", events.len());
        Ok(events)
    }
}

// ============================================================================
// Wire Format
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    events: Vec<ApiEvent>,
}

/// One event as the listing endpoint serves it (expansions included).
#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(default)]
    name: Option<ApiText>,
    #[serde(default)]
    start: Option<ApiStart>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    venue: Option<ApiVenue>,
    #[serde(default)]
    format: Option<ApiFormat>,
    #[serde(default)]
    logo: Option<ApiLogo>,
    /// Absent on some legacy records; those are treated as listed
    #[serde(default = "default_listed")]
    listed: bool,
}

fn default_listed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ApiText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiStart {
    #[serde(default)]
    local: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiVenue {
    #[serde(default)]
    address: Option<ApiAddress>,
}

#[derive(Debug, Deserialize)]
struct ApiAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiFormat {
    #[serde(default)]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLogo {
    #[serde(default)]
    url: Option<String>,
}

impl From<ApiEvent> for SourceEvent {
    fn from(api: ApiEvent) -> Self {
        let address = api.venue.and_then(|v| v.address);
        SourceEvent {
            id: api.id,
            title: api.name.and_then(|n| n.text),
            start_local: api.start.and_then(|s| s.local),
            url: api.url,
            venue_city: address.as_ref().and_then(|a| a.city.clone()),
            venue_state: address.and_then(|a| a.region),
            category: api.format.and_then(|f| f.short_name),
            logo_url: api.logo.and_then(|l| l.url),
            listed: api.listed,
        }
    }
}
