//! Webflow CMS sink implementation
//!
//! This crate talks to the Webflow v1 collection API: probing the
//! collection's field schema, paging through existing items for
//! deduplication, and creating new items. Creation always lands as an
//! unpublished draft; publication is a human decision made in the Webflow
//! designer, never by the sync.
//!
//! Rate limiting is the caller's concern: Webflow allows 60 requests per
//! minute and the engine paces its write loop accordingly.

use serde::Deserialize;
use std::time::Duration;
use sync_core::{CollectionSchema, ContentSink, FieldMap, ItemPage, SyncError};

/// Webflow's maximum (and our default) item page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// HTTP timeout for collection API calls.
const HTTP_TIMEOUT_SECS: u64 = 30;

const ACCEPT_VERSION: &str = "1.0.0";

/// Destination collection options (library type without clap).
#[derive(Clone, Debug)]
pub struct SinkOpts {
    /// API base, e.g. `https://api.webflow.com`
    pub api_base: String,
    pub api_token: String,
    /// Target collection id
    pub collection_id: String,
}

/// Webflow collection client implementing [`ContentSink`].
pub struct WebflowSink {
    opts: SinkOpts,
    client: reqwest::Client,
}

impl WebflowSink {
    pub fn new(opts: SinkOpts) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(WebflowSink { opts, client })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}",
            self.opts.api_base.trim_end_matches('/'),
            self.opts.collection_id
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.opts.api_token)
            .header("accept-version", ACCEPT_VERSION)
    }

    /// Read a response body as JSON, converting non-success statuses into
    /// [`SyncError::Transport`] carrying the status and body text.
    async fn read_json<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<T, SyncError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::transport(operation, status.as_u16(), body));
        }
        response
            .json()
            .await
            .map_err(|e| SyncError::connection(operation, e))
    }
}

#[async_trait::async_trait]
impl ContentSink for WebflowSink {
    async fn collection_schema(&self) -> Result<CollectionSchema, SyncError> {
        let operation = "collection schema probe";
        tracing::debug!("Probing collection {}", self.opts.collection_id);

        let response = self
            .request(self.client.get(self.collection_url()))
            .send()
            .await
            .map_err(|e| SyncError::connection(operation, e))?;

        let collection: ApiCollection = Self::read_json(operation, response).await?;
        let schema = CollectionSchema::new(
            collection
                .fields
                .into_iter()
                .filter(|f| f.editable)
                .map(|f| f.slug),
        );
        tracing::debug!("Collection defines {} writable fields", schema.len());
        Ok(schema)
    }

    async fn list_items(&self, offset: usize, limit: usize) -> Result<ItemPage, SyncError> {
        let operation = "listing collection items";

        let response = self
            .request(self.client.get(format!("{}/items", self.collection_url())))
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| SyncError::connection(operation, e))?;

        let page: ApiItemPage = Self::read_json(operation, response).await?;
        tracing::debug!(
            "Fetched {} items at offset {} (limit {})",
            page.items.len(),
            offset,
            limit
        );
        Ok(ItemPage { items: page.items })
    }

    async fn create_item(&self, fields: &FieldMap) -> Result<String, SyncError> {
        let operation = "creating collection item";

        // Creation never publishes directly; pending human review.
        let mut body = serde_json::Map::new();
        for (key, value) in fields {
            body.insert(key.clone(), value.clone());
        }
        body.insert("_archived".to_string(), serde_json::Value::Bool(false));
        body.insert("_draft".to_string(), serde_json::Value::Bool(true));

        let response = self
            .request(self.client.post(format!("{}/items", self.collection_url())))
            .json(&serde_json::json!({ "fields": body }))
            .send()
            .await
            .map_err(|e| SyncError::connection(operation, e))?;

        let created: ApiCreatedItem = Self::read_json(operation, response).await?;
        Ok(created.id)
    }
}

// ============================================================================
// Wire Format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiCollection {
    #[serde(default)]
    fields: Vec<ApiField>,
}

#[derive(Debug, Deserialize)]
struct ApiField {
    slug: String,
    #[serde(default = "default_editable")]
    editable: bool,
}

fn default_editable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ApiItemPage {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiCreatedItem {
    #[serde(rename = "_id")]
    id: String,
}
