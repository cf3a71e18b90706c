//! Pure projection of a source event onto the destination field schema.
//!
//! Collection schemas drift: sites rename fields, and different sites spell
//! the same logical field differently. Rather than branching per field name,
//! each logical field carries an ordered list of candidate slugs that is
//! probed against the schema set; the first match wins and a miss drops the
//! field. Projection is total over its inputs: nothing here performs I/O or
//! returns an error, and a malformed timestamp degrades to field omission.

use crate::types::{CollectionSchema, SourceEvent};
use chrono::{DateTime, NaiveDateTime, SecondsFormat};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Ordered destination field map produced per source event.
pub type FieldMap = BTreeMap<String, Value>;

/// Title used when the source record has no usable title.
pub const DEFAULT_TITLE: &str = "Untitled Event";

/// Slug length cap; the destination enforces uniqueness, not us.
const MAX_SLUG_LEN: usize = 100;

// Candidate slug spellings per logical field, most specific first.
const ID_FIELDS: &[&str] = &["eventbrite-id", "event-id", "source-id"];
const URL_FIELDS: &[&str] = &["event-url", "eventbrite-url", "url", "link"];
const CITY_FIELDS: &[&str] = &["city", "venue-city"];
const STATE_FIELDS: &[&str] = &["state", "venue-state", "region"];
const CATEGORY_FIELDS: &[&str] = &["event-type", "category", "type"];
const DATE_FIELDS: &[&str] = &["event-date", "date", "start-date"];
const TIME_FIELDS: &[&str] = &["event-time", "time", "start-time"];
const IMAGE_FIELDS: &[&str] = &["splash-id", "splash", "event-image", "image"];

/// Map one source event into a destination field map.
///
/// Always emits `name` and `slug` (every collection defines both); all other
/// keys are conditional on schema membership and source-value availability.
/// Deterministic: identical inputs yield an identical map.
pub fn project(event: &SourceEvent, schema: &CollectionSchema) -> FieldMap {
    let title = event
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let mut fields = FieldMap::new();
    fields.insert("name".to_string(), Value::String(title.to_string()));
    fields.insert("slug".to_string(), Value::String(slugify(title)));

    if let Some(start) = event.start_local.as_deref() {
        if let Some(dt) = parse_start(start) {
            if let Some(key) = schema.first_match(DATE_FIELDS) {
                fields.insert(
                    key.to_string(),
                    Value::String(dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
            }
            if let Some(key) = schema.first_match(TIME_FIELDS) {
                fields.insert(
                    key.to_string(),
                    Value::String(dt.format("%-I:%M %p").to_string()),
                );
            }
        }
    }

    insert_text(&mut fields, schema, ID_FIELDS, Some(event.id.as_str()));
    insert_text(&mut fields, schema, URL_FIELDS, event.url.as_deref());
    insert_text(&mut fields, schema, CITY_FIELDS, event.venue_city.as_deref());
    insert_text(
        &mut fields,
        schema,
        STATE_FIELDS,
        event.venue_state.as_deref(),
    );
    insert_text(&mut fields, schema, CATEGORY_FIELDS, event.category.as_deref());

    if let Some(logo) = event.logo_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        if let Some(key) = schema.first_match(IMAGE_FIELDS) {
            fields.insert(key.to_string(), json!({ "url": upgrade_to_https(logo) }));
        }
    }

    fields
}

/// Derive a URL slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen, strips leading/trailing hyphens, and caps the length.
/// Distinct titles can collide after truncation; slug uniqueness is the
/// destination's concern.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Whether the schema exposes any identifier alias the projector could
/// write. Without one, created items cannot be recognized by later runs.
pub fn has_identifier_field(schema: &CollectionSchema) -> bool {
    schema.first_match(ID_FIELDS).is_some()
}

/// Read the stored source identifier out of an existing destination item.
///
/// Probes the same identifier aliases the projector writes, skipping empty
/// values. Items without one (e.g. manually authored records predating the
/// identifier field) return `None`.
pub fn stored_source_id(item: &Value) -> Option<&str> {
    ID_FIELDS
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn insert_text(
    fields: &mut FieldMap,
    schema: &CollectionSchema,
    candidates: &[&str],
    value: Option<&str>,
) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    if let Some(key) = schema.first_match(candidates) {
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Parse the raw start timestamp; `None` means the date/time fields are
/// dropped from the projection.
fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
