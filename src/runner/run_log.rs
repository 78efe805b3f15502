//! Result rows and the run log.

use serde::{Deserialize, Serialize};

/// One immutable row of the run log: the outcome of a single
/// (task, agent) pair.
///
/// Rows are created once and never mutated afterward. `duration_seconds`
/// covers the agent invocation only, not gate evaluation or soft scoring.
/// `error` is true iff the agent invocation itself failed; judge failures
/// surface only through the neutral default score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub task_id: String,
    pub task_name: String,
    pub agent: String,
    pub passed: bool,
    pub quality_score: i64,
    pub duration_seconds: f64,
    /// Failure reasons joined with "; ", empty when passed.
    pub fail_reasons: String,
    pub error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_serializes_with_summary_field_names() {
        let row = ResultRow {
            task_id: "t1".to_string(),
            task_name: "email-lookup".to_string(),
            agent: "Agent A".to_string(),
            passed: false,
            quality_score: 2,
            duration_seconds: 1.25,
            fail_reasons: "has_email: Missing 'x@y.com'".to_string(),
            error: false,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "task_id": "t1",
                "task_name": "email-lookup",
                "agent": "Agent A",
                "passed": false,
                "quality_score": 2,
                "duration_seconds": 1.25,
                "fail_reasons": "has_email: Missing 'x@y.com'",
                "error": false
            })
        );
    }

    #[test]
    fn test_row_round_trips_through_json() {
        let row = ResultRow {
            task_id: "unknown".to_string(),
            task_name: "t".to_string(),
            agent: "a".to_string(),
            passed: true,
            quality_score: 5,
            duration_seconds: 0.0,
            fail_reasons: String::new(),
            error: true,
        };
        let text = serde_json::to_string(&row).unwrap();
        let back: ResultRow = serde_json::from_str(&text).unwrap();
        assert_eq!(back, row);
    }
}
