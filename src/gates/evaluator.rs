//! Hard-gate evaluation.
//!
//! `evaluate` is a pure function of the response text and the canonical
//! gate sequence: no I/O, no hidden state. Each gate kind has its own
//! check function; adding a kind means adding a match arm and a function,
//! nothing else changes.

use serde_json::Value;

use crate::extraction::extract_json;
use crate::gates::gate::{Gate, GateKind, Verdict};

/// Parameter keys whose values are containment targets.
///
/// Several gate kinds are historical aliases for the same generic
/// containment check; they all pull their targets from these keys.
const CONTAINMENT_KEYS: &[&str] = &[
    "expected_account_id",
    "expected_contact_id",
    "expected_email",
    "expected_deal_id",
    "expected_value",
    "expected",
    "patterns",
];

/// Apply an ordered gate sequence to a response.
///
/// Gate order affects only the ordering of failure reasons, never the
/// pass/fail outcome. Unknown gate kinds contribute nothing.
pub fn evaluate(response_text: &str, gates: &[Gate]) -> Verdict {
    let mut verdict = Verdict::pass();
    for gate in gates {
        match gate.kind {
            GateKind::JsonSchemaValidate => check_json_shape(response_text, gate, &mut verdict),
            GateKind::CrmContactMatch
            | GateKind::CrmDealMatch
            | GateKind::CrmFieldCheck
            | GateKind::CrmNumericReferenceCheck
            | GateKind::RegexAll
            | GateKind::RegexAny
            | GateKind::FieldEquals => check_containment(response_text, gate, &mut verdict),
            GateKind::ForbiddenTerms => check_forbidden_terms(response_text, gate, &mut verdict),
            GateKind::CitationCheck => check_citation(response_text, gate, &mut verdict),
            GateKind::Unknown => {}
        }
    }
    verdict
}

/// The response must contain extractable JSON whose top-level keys include
/// every entry of `params.required_fields` (case-sensitive).
fn check_json_shape(response_text: &str, gate: &Gate, verdict: &mut Verdict) {
    let (parsed, valid) = extract_json(response_text);
    if !valid {
        verdict.fail(format!("{}: Output was not valid JSON.", gate.name));
        return;
    }

    let missing: Vec<String> = string_list(gate.params.get("required_fields"))
        .into_iter()
        .filter(|field| parsed.get(field.as_str()).is_none())
        .collect();
    if !missing.is_empty() {
        verdict.fail(format!(
            "{}: Missing keys {}",
            gate.name,
            format_list(&missing)
        ));
    }
}

/// Generic containment: every target string collected from the gate's
/// params must occur as a case-insensitive substring of the response.
/// Agents are not guaranteed to preserve the casing of identifiers.
fn check_containment(response_text: &str, gate: &Gate, verdict: &mut Verdict) {
    let haystack = response_text.to_lowercase();
    for key in CONTAINMENT_KEYS {
        for target in scalar_strings(gate.params.get(*key)) {
            if !haystack.contains(&target.to_lowercase()) {
                verdict.fail(format!("{}: Missing '{}'", gate.name, target));
            }
        }
    }
}

/// No string in `params.terms` may appear in the response
/// (case-insensitive).
fn check_forbidden_terms(response_text: &str, gate: &Gate, verdict: &mut Verdict) {
    let haystack = response_text.to_lowercase();
    for term in string_list(gate.params.get("terms")) {
        if haystack.contains(&term.to_lowercase()) {
            verdict.fail(format!("{}: Forbidden term '{}' found", gate.name, term));
        }
    }
}

/// At least one entry of `params.must_include_any_of` must appear
/// verbatim. Citations are filenames, and filenames are case-sensitive on
/// most filesystems, so this is the one exact-match check.
fn check_citation(response_text: &str, gate: &Gate, verdict: &mut Verdict) {
    let files = string_list(gate.params.get("must_include_any_of"));
    if files.is_empty() {
        return;
    }
    if !files.iter().any(|file| response_text.contains(file.as_str())) {
        verdict.fail(format!(
            "{}: No citation from {}",
            gate.name,
            format_list(&files)
        ));
    }
}

/// Coerce a scalar-or-list param value into its target strings.
fn scalar_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_scalar).collect(),
        Some(scalar) => coerce_scalar(scalar).into_iter().collect(),
        None => Vec::new(),
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Param values that are only meaningful as lists of strings.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_scalar).collect(),
        _ => Vec::new(),
    }
}

/// Render a list the way the persisted reason strings expect:
/// `['amount', 'id']`.
fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::normalize;
    use serde_json::json;

    fn gate(value: serde_json::Value) -> Gate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_gate_set_always_passes() {
        for response in ["", "anything at all", "```json\nnot json\n```"] {
            let verdict = evaluate(response, &[]);
            assert!(verdict.passed);
            assert!(verdict.failed_reasons.is_empty());
        }
    }

    #[test]
    fn test_containment_match_is_case_insensitive() {
        let g = gate(json!({
            "type": "crm_contact_match",
            "name": "has_email",
            "params": {"expected_email": "x@y.com"}
        }));
        let verdict = evaluate("The email is X@Y.COM.", &[g]);
        assert!(verdict.passed);
    }

    #[test]
    fn test_containment_miss_reports_target() {
        let g = gate(json!({
            "type": "crm_contact_match",
            "name": "has_email",
            "params": {"expected_email": "x@y.com"}
        }));
        let verdict = evaluate("I could not find it.", &[g]);
        assert!(!verdict.passed);
        assert_eq!(verdict.failed_reasons, vec!["has_email: Missing 'x@y.com'"]);
    }

    #[test]
    fn test_containment_collects_lists_and_numbers() {
        let g = gate(json!({
            "type": "crm_numeric_reference_check",
            "name": "deal_figures",
            "params": {"expected_value": 125000, "patterns": ["ACME-77", "Q3"]}
        }));
        let verdict = evaluate("Deal ACME-77 closed in Q3 at 125000 USD.", std::slice::from_ref(&g));
        assert!(verdict.passed, "{:?}", verdict.failed_reasons);

        let verdict = evaluate("Deal ACME-77 closed in Q3.", &[g]);
        assert!(!verdict.passed);
        assert_eq!(verdict.failed_reasons, vec!["deal_figures: Missing '125000'"]);
    }

    #[test]
    fn test_forbidden_term_detected_case_insensitively() {
        let g = gate(json!({
            "type": "forbidden_terms",
            "name": "no_pii",
            "params": {"terms": ["ssn"]}
        }));
        let verdict = evaluate("Customer SSN is 123", std::slice::from_ref(&g));
        assert!(!verdict.passed);
        assert_eq!(
            verdict.failed_reasons,
            vec!["no_pii: Forbidden term 'ssn' found"]
        );

        let verdict = evaluate("No sensitive data here.", &[g]);
        assert!(verdict.passed);
    }

    #[test]
    fn test_json_schema_gate_rejects_non_json() {
        let g = gate(json!({
            "type": "json_schema_validate",
            "name": "shape",
            "params": {"required_fields": ["id"]}
        }));
        let verdict = evaluate("plain prose, no json", &[g]);
        assert!(!verdict.passed);
        assert_eq!(
            verdict.failed_reasons,
            vec!["shape: Output was not valid JSON."]
        );
    }

    #[test]
    fn test_json_schema_gate_reports_missing_keys_together() {
        let g = gate(json!({
            "type": "json_schema_validate",
            "name": "shape",
            "params": {"required_fields": ["id", "amount"]}
        }));
        let verdict = evaluate("```json\n{\"id\": 1}\n```", &[g]);
        assert!(!verdict.passed);
        assert_eq!(verdict.failed_reasons, vec!["shape: Missing keys ['amount']"]);
    }

    #[test]
    fn test_json_schema_gate_passes_on_full_shape() {
        let g = gate(json!({
            "type": "json_schema_validate",
            "name": "shape",
            "params": {"required_fields": ["id", "amount"]}
        }));
        let verdict = evaluate("{\"id\": 1, \"amount\": 2, \"extra\": 3}", &[g]);
        assert!(verdict.passed);
    }

    #[test]
    fn test_citation_check_is_case_sensitive() {
        let g = gate(json!({
            "type": "citation_check",
            "name": "sources",
            "params": {"must_include_any_of": ["rfp_2024.md", "pricing.csv"]}
        }));
        let verdict = evaluate("See pricing.csv for details.", std::slice::from_ref(&g));
        assert!(verdict.passed);

        let verdict = evaluate("See PRICING.CSV for details.", &[g]);
        assert!(!verdict.passed);
        assert_eq!(
            verdict.failed_reasons,
            vec!["sources: No citation from ['rfp_2024.md', 'pricing.csv']"]
        );
    }

    #[test]
    fn test_unknown_gate_kind_is_a_no_op() {
        let g = gate(json!({
            "type": "embedding_similarity",
            "name": "future",
            "params": {"threshold": 0.9}
        }));
        let verdict = evaluate("anything", &[g]);
        assert!(verdict.passed);
    }

    #[test]
    fn test_reason_ordering_follows_gate_order() {
        let gates = vec![
            gate(json!({"type": "forbidden_terms", "name": "a", "params": {"terms": ["bad"]}})),
            gate(json!({"type": "crm_field_check", "name": "b", "params": {"expected": ["good"]}})),
        ];
        let verdict = evaluate("bad output", &gates);
        assert_eq!(
            verdict.failed_reasons,
            vec!["a: Forbidden term 'bad' found", "b: Missing 'good'"]
        );
    }

    #[test]
    fn test_evaluate_after_legacy_normalization() {
        let rules = json!({"must_contain": ["Policy #42"], "forbidden_terms": ["guess"]});
        let gates = normalize(&rules);

        let verdict = evaluate("Per policy #42, the limit is 10.", &gates);
        assert!(verdict.passed);

        let verdict = evaluate("I would guess around 10.", &gates);
        assert!(!verdict.passed);
        assert_eq!(
            verdict.failed_reasons,
            vec![
                "legacy_must_contain: Missing 'Policy #42'",
                "legacy_forbidden: Forbidden term 'guess' found"
            ]
        );
    }
}
