//! Canonical gate model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The known gate kinds, dispatched by the evaluator.
///
/// The CRM-prefixed kinds, the regex kinds, and `field_equals` are all
/// evaluated as generic containment checks; the names are kept distinct
/// because task files use them and future kinds may diverge. Unrecognized
/// type strings deserialize to [`GateKind::Unknown`], which evaluates as a
/// no-op so that new gate types can be introduced without breaking older
/// engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    JsonSchemaValidate,
    CrmContactMatch,
    CrmDealMatch,
    CrmFieldCheck,
    CrmNumericReferenceCheck,
    RegexAll,
    RegexAny,
    FieldEquals,
    ForbiddenTerms,
    CitationCheck,
    #[serde(other)]
    Unknown,
}

/// One declarative, typed correctness check applied to an agent response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    /// Gate kind; drives evaluator dispatch.
    #[serde(rename = "type")]
    pub kind: GateKind,
    /// Free-form label, used only in failure messages.
    #[serde(default)]
    pub name: String,
    /// Kind-specific parameters (scalars or lists of scalars).
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Gate {
    pub fn new(kind: GateKind, name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            kind,
            name: name.into(),
            params,
        }
    }
}

/// Aggregate pass/fail outcome for one (task, agent) evaluation.
///
/// Gates are independent predicates combined conjunctively: each gate can
/// only add failure reasons, never clear them. An empty gate list yields a
/// passing verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub failed_reasons: Vec<String>,
}

impl Verdict {
    /// The initial, passing verdict.
    pub fn pass() -> Self {
        Self {
            passed: true,
            failed_reasons: Vec::new(),
        }
    }

    /// Record one gate failure.
    pub fn fail(&mut self, reason: String) {
        self.passed = false;
        self.failed_reasons.push(reason);
    }

    /// Failure reasons joined for the tabular summary.
    pub fn joined_reasons(&self) -> String {
        self.failed_reasons.join("; ")
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gate_kind_deserializes_snake_case() {
        let kind: GateKind = serde_json::from_value(json!("json_schema_validate")).unwrap();
        assert_eq!(kind, GateKind::JsonSchemaValidate);
        let kind: GateKind = serde_json::from_value(json!("crm_contact_match")).unwrap();
        assert_eq!(kind, GateKind::CrmContactMatch);
    }

    #[test]
    fn test_unrecognized_kind_maps_to_unknown() {
        let kind: GateKind = serde_json::from_value(json!("semantic_similarity_v2")).unwrap();
        assert_eq!(kind, GateKind::Unknown);
    }

    #[test]
    fn test_gate_deserializes_with_defaults() {
        let gate: Gate = serde_json::from_value(json!({"type": "forbidden_terms"})).unwrap();
        assert_eq!(gate.kind, GateKind::ForbiddenTerms);
        assert!(gate.name.is_empty());
        assert!(gate.params.is_empty());
    }

    #[test]
    fn test_verdict_accumulates_failures() {
        let mut verdict = Verdict::pass();
        assert!(verdict.passed);
        verdict.fail("a: first".to_string());
        verdict.fail("b: second".to_string());
        assert!(!verdict.passed);
        assert_eq!(verdict.joined_reasons(), "a: first; b: second");
    }
}
