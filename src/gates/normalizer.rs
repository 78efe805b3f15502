//! Legacy rule-set normalization.
//!
//! Task files carry hard gates in one of two shapes: the canonical ordered
//! gate list, or the legacy two-list form (`must_contain` /
//! `forbidden_terms`). The normalizer resolves the shape exactly once at
//! load time; the evaluator only ever sees the canonical form.

use serde_json::{Map, Value};
use tracing::debug;

use crate::gates::gate::{Gate, GateKind};

/// Convert a raw `hard_gates` value into the canonical gate sequence.
///
/// Infallible: a malformed or unrecognized rule shape degrades to an empty
/// (or partial) gate list rather than failing, so a single bad task never
/// aborts the whole benchmark. Normalizing an already-canonical list is a
/// pass-through, making the operation idempotent.
pub fn normalize(rules: &Value) -> Vec<Gate> {
    match rules {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(gate) => Some(gate),
                Err(err) => {
                    debug!(%err, "skipping malformed gate entry");
                    None
                }
            })
            .collect(),
        Value::Object(fields) => normalize_legacy(fields),
        _ => Vec::new(),
    }
}

fn normalize_legacy(fields: &Map<String, Value>) -> Vec<Gate> {
    let mut gates = Vec::new();

    if let Some(expected) = non_empty_list(fields.get("must_contain")) {
        let mut params = Map::new();
        params.insert("expected".to_string(), Value::Array(expected));
        gates.push(Gate::new(
            GateKind::CrmContactMatch,
            "legacy_must_contain",
            params,
        ));
    }

    if let Some(terms) = non_empty_list(fields.get("forbidden_terms")) {
        let mut params = Map::new();
        params.insert("terms".to_string(), Value::Array(terms));
        gates.push(Gate::new(GateKind::ForbiddenTerms, "legacy_forbidden", params));
    }

    gates
}

fn non_empty_list(value: Option<&Value>) -> Option<Vec<Value>> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.clone()),
        _ => None,
    }
}
