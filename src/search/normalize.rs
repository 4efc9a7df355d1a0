//! Record Normalizer
//!
//! Maps loosely-structured works records onto [`NormalizedRow`]. Every
//! field is optional upstream; each one degrades to its own default instead
//! of failing the row.

use crate::models::{NormalizedRow, Published, RawWorkRecord};
use serde_json::Value;

/// Normalize a page of records, one row per record, in upstream order.
pub fn normalize(items: &[RawWorkRecord]) -> Vec<NormalizedRow> {
    items.iter().map(normalize_record).collect()
}

pub fn normalize_record(record: &RawWorkRecord) -> NormalizedRow {
    NormalizedRow {
        title: first_string(record.get("title")),
        authors: join_family_names(record.get("author")),
        journal: first_string(record.get("container-title")),
        doi: plain_string(record.get("DOI")),
        link: plain_string(record.get("URL")),
        published: issued_year(record.get("issued")),
    }
}

/// First element of a string sequence, or "".
fn first_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn plain_string(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Family names in upstream order; authors without one are skipped.
fn join_family_names(value: Option<&Value>) -> String {
    let Some(authors) = value.and_then(Value::as_array) else {
        return String::new();
    };

    authors
        .iter()
        .filter_map(|author| author.get("family").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `issued.date-parts[0][0]` when it is an integer.
fn issued_year(value: Option<&Value>) -> Published {
    value
        .and_then(|issued| issued.get("date-parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(Value::as_array)
        .and_then(|first| first.first())
        .and_then(Value::as_i64)
        .map(Published::Year)
        .unwrap_or(Published::Unknown)
}
