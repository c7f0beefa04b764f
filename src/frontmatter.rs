//! # Front-Matter Codec
//!
//! Parses and serializes the structured header block embedded at the top
//! of every note file:
//!
//! ```text
//! ---
//! title: Gardening Tips
//! tags:
//! - gardening
//! - hobby
//! created: 2024-01-01T10:00:00Z
//! updated: 2024-01-02T12:30:00Z
//! ---
//!
//! Remember to water the plants.
//! ```
//!
//! Parsing is **best-effort and never fails**: a missing, unterminated,
//! or malformed header degrades to a default record with the entire
//! input treated as body. Unknown header keys are preserved opaquely in
//! [`NoteMeta::extra`] and re-emitted unchanged, so newer fields survive
//! a round-trip through an older build.
//!
//! Serialization emits keys in a deterministic order (`title`, `tags`,
//! `created`, `updated`, then extras sorted by key) so saved files diff
//! cleanly. Pure transformation, no I/O.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_yaml::{Mapping, Value};

use crate::model::NoteMeta;

const DELIMITER: &str = "---";

/// Splits raw file content into a metadata record and body text.
///
/// Never returns an error; see the module docs for the degradation
/// rules.
pub fn parse(raw: &str) -> (NoteMeta, String) {
    let Some((header, body)) = split_header(raw) else {
        return (NoteMeta::default(), raw.to_string());
    };

    let mapping: Mapping = match serde_yaml::from_str(header) {
        Ok(m) => m,
        // Not a mapping, or not YAML at all: no valid front-matter.
        Err(_) => return (NoteMeta::default(), raw.to_string()),
    };

    let mut meta = NoteMeta::default();
    for (key, value) in mapping {
        let Value::String(key) = key else { continue };
        match key.as_str() {
            "title" => {
                if let Some(s) = value.as_str() {
                    meta.title = s.to_string();
                }
            }
            "tags" => meta.tags = parse_tags(value),
            "created" => meta.created = parse_timestamp(&value),
            "updated" => meta.updated = parse_timestamp(&value),
            _ => {
                meta.extra.insert(key, value);
            }
        }
    }

    (meta, strip_separator(body).to_string())
}

/// Produces the canonical on-disk form: header, blank line, body.
pub fn serialize(meta: &NoteMeta, body: &str) -> String {
    let mut map = Mapping::new();
    map.insert("title".into(), Value::String(meta.title.clone()));
    if !meta.tags.is_empty() {
        let tags = meta.tags.iter().cloned().map(Value::String).collect();
        map.insert("tags".into(), Value::Sequence(tags));
    }
    if let Some(ts) = meta.created {
        map.insert("created".into(), Value::String(format_timestamp(ts)));
    }
    if let Some(ts) = meta.updated {
        map.insert("updated".into(), Value::String(format_timestamp(ts)));
    }
    for (key, value) in &meta.extra {
        map.insert(Value::String(key.clone()), value.clone());
    }

    // A mapping with string keys cannot fail to serialize; the fallback
    // keeps the codec total.
    let yaml = serde_yaml::to_string(&map).unwrap_or_else(|_| "{}\n".to_string());
    format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{body}")
}

/// Returns `(yaml, rest)` when the input starts with a delimited header.
fn split_header(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n').trim_end_matches('\r') == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    // Opening delimiter without a closing one: not a header.
    None
}

/// Strips the single blank line that `serialize` places after the
/// closing delimiter.
fn strip_separator(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

fn parse_tags(value: Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        // A bare string is accepted as a single tag.
        Value::String(tag) => vec![tag],
        _ => Vec::new(),
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
