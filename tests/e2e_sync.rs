//! End-to-end reconciliation tests over mocked Eventbrite and Webflow APIs.
//!
//! These drive the real HTTP clients through the engine; trait-level engine
//! behavior is covered by the unit tests in `src/sync.rs`.

use eventbrite_source::{EventbriteSource, SourceOpts};
use gig_sync::sync::{SyncEngine, SyncOpts};
use serde_json::json;
use std::time::Duration;
use webflow_sink::{SinkOpts, WebflowSink};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "90001";
const COLLECTION: &str = "col-1";

fn source(server: &MockServer) -> EventbriteSource {
    EventbriteSource::new(SourceOpts {
        api_base: server.uri(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        organization_id: ORG.to_string(),
        page_size: 200,
    })
    .unwrap()
}

fn sink(server: &MockServer) -> WebflowSink {
    WebflowSink::new(SinkOpts {
        api_base: server.uri(),
        api_token: "wf-token".to_string(),
        collection_id: COLLECTION.to_string(),
    })
    .unwrap()
}

fn fast_opts() -> SyncOpts {
    SyncOpts {
        scan_page_size: 100,
        write_delay: Duration::ZERO,
        dry_run: false,
    }
}

fn listed_event(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": { "text": format!("Event {id}") },
        "start": { "local": "2026-09-18T19:30:00" },
        "url": format!("https://www.eventbrite.com/e/{id}"),
        "listed": true,
        "logo": { "url": "http://img.evbuc.com/splash.png" }
    })
}

async fn mount_eventbrite(server: &MockServer, events: Vec<serde_json::Value>) {
    Mock::given(method("POST"))
        .and(path("/oauth/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/organizations/{ORG}/events/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "events": events })))
        .mount(server)
        .await;
}

async fn mount_webflow_schema(server: &MockServer, slugs: &[&str]) {
    let fields: Vec<_> = slugs
        .iter()
        .map(|slug| json!({ "name": slug, "slug": slug, "editable": true }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": COLLECTION,
            "fields": fields
        })))
        .mount(server)
        .await;
}

async fn mount_webflow_items_page(server: &MockServer, offset: usize, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_creates_missing_events_as_drafts() {
    let eventbrite = MockServer::start().await;
    let webflow = MockServer::start().await;

    mount_eventbrite(
        &eventbrite,
        vec![listed_event("1"), listed_event("2"), listed_event("3")],
    )
    .await;
    mount_webflow_schema(&webflow, &["name", "slug", "eventbrite-id", "splash-id"]).await;
    mount_webflow_items_page(&webflow, 0, vec![json!({ "eventbrite-id": "2" })]).await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .and(body_partial_json(json!({
            "fields": { "_draft": true, "_archived": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "item-new" })))
        .expect(2)
        .mount(&webflow)
        .await;

    let engine = SyncEngine::new(source(&eventbrite), sink(&webflow), fast_opts());
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.created, 2);
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn test_second_run_with_unchanged_source_creates_nothing() {
    let eventbrite = MockServer::start().await;
    let webflow = MockServer::start().await;

    mount_eventbrite(
        &eventbrite,
        vec![listed_event("1"), listed_event("2"), listed_event("3")],
    )
    .await;
    mount_webflow_schema(&webflow, &["name", "slug", "eventbrite-id"]).await;
    // Everything the source lists is already stored
    mount_webflow_items_page(
        &webflow,
        0,
        vec![
            json!({ "eventbrite-id": "1" }),
            json!({ "eventbrite-id": "2" }),
            json!({ "eventbrite-id": "3" }),
        ],
    )
    .await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "never" })))
        .expect(0)
        .mount(&webflow)
        .await;

    let engine = SyncEngine::new(source(&eventbrite), sink(&webflow), fast_opts());
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.created, 0);
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn test_dedup_scan_is_exhaustive_across_pages() {
    let eventbrite = MockServer::start().await;
    let webflow = MockServer::start().await;

    // "249" is stored on the last, short page; only "300" is new
    mount_eventbrite(&eventbrite, vec![listed_event("249"), listed_event("300")]).await;
    mount_webflow_schema(&webflow, &["name", "slug", "eventbrite-id"]).await;

    let page = |range: std::ops::Range<usize>| -> Vec<serde_json::Value> {
        range
            .map(|i| json!({ "eventbrite-id": i.to_string() }))
            .collect()
    };
    mount_webflow_items_page(&webflow, 0, page(0..100)).await;
    mount_webflow_items_page(&webflow, 100, page(100..200)).await;
    mount_webflow_items_page(&webflow, 200, page(200..250)).await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .and(body_partial_json(json!({ "fields": { "eventbrite-id": "300" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "item-300" })))
        .expect(1)
        .mount(&webflow)
        .await;

    let engine = SyncEngine::new(source(&eventbrite), sink(&webflow), fast_opts());
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.created, 1);
}

#[tokio::test]
async fn test_scan_failure_aborts_with_no_writes() {
    let eventbrite = MockServer::start().await;
    let webflow = MockServer::start().await;

    mount_eventbrite(&eventbrite, vec![listed_event("1")]).await;
    mount_webflow_schema(&webflow, &["name", "slug", "eventbrite-id"]).await;

    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&webflow)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "never" })))
        .expect(0)
        .mount(&webflow)
        .await;

    let engine = SyncEngine::new(source(&eventbrite), sink(&webflow), fast_opts());
    let err = engine.run().await.unwrap_err();
    assert!(err.to_string().contains("scanning destination"));
}

#[tokio::test]
async fn test_write_rejection_is_recorded_not_fatal() {
    let eventbrite = MockServer::start().await;
    let webflow = MockServer::start().await;

    mount_eventbrite(&eventbrite, vec![listed_event("1"), listed_event("2")]).await;
    mount_webflow_schema(&webflow, &["name", "slug", "eventbrite-id"]).await;
    mount_webflow_items_page(&webflow, 0, vec![]).await;

    // Event 1 is rejected by validation; event 2 goes through
    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .and(body_partial_json(json!({ "fields": { "eventbrite-id": "1" } })))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"msg":"Validation Failure"}"#),
        )
        .expect(1)
        .mount(&webflow)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/items")))
        .and(body_partial_json(json!({ "fields": { "eventbrite-id": "2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "item-2" })))
        .expect(1)
        .mount(&webflow)
        .await;

    let engine = SyncEngine::new(source(&eventbrite), sink(&webflow), fast_opts());
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].event_id, "1");
    assert!(summary.failures[0].message.contains("400"));
}
