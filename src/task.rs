//! Benchmark task definitions.
//!
//! Tasks are produced by an external loader (YAML files in the reference
//! layout) and are immutable once loaded; the runner owns them for the
//! duration of a run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::errors::BenchmarkError;

/// Rubric used when a task does not supply `soft_score_rubric`.
pub const DEFAULT_RUBRIC: &str = "Is it helpful?";

fn default_task_id() -> String {
    "unknown".to_string()
}

/// One benchmark task: a prompt plus the rules its answers are graded by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkTask {
    /// Stable identifier; defaults to "unknown" when the file omits it.
    #[serde(default = "default_task_id")]
    pub task_id: String,
    /// Human-readable task name.
    pub name: String,
    /// The prompt handed to each agent.
    pub input_prompt: String,
    /// Hard gates and the optional soft rubric.
    #[serde(default)]
    pub eval_rules: EvalRules,
}

/// Evaluation rules for one task.
///
/// `hard_gates` is kept as raw JSON here: it may be the canonical gate
/// list or the legacy two-list shape, and the normalizer resolves that
/// exactly once per run (see [`crate::gates::normalize`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalRules {
    #[serde(default)]
    pub hard_gates: Value,
    #[serde(default)]
    pub soft_score_rubric: Option<String>,
}

impl BenchmarkTask {
    /// The rubric to grade this task with, falling back to the generic one.
    pub fn rubric(&self) -> &str {
        self.eval_rules
            .soft_score_rubric
            .as_deref()
            .unwrap_or(DEFAULT_RUBRIC)
    }
}

/// Load and concatenate task definitions from a list of YAML files.
///
/// Each file holds a sequence of tasks; load order is preserved and
/// becomes the iteration order of the run. A missing file or a task
/// missing its required fields is a configuration error: the benchmark
/// cannot begin, so this propagates instead of degrading.
pub fn load_tasks_from_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<BenchmarkTask>, BenchmarkError> {
    let mut tasks = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            BenchmarkError::config(format!("cannot read task file {}: {err}", path.display()))
        })?;
        let mut batch: Vec<BenchmarkTask> = serde_yaml::from_str(&content).map_err(|err| {
            BenchmarkError::config(format!("invalid task file {}: {err}", path.display()))
        })?;
        tasks.append(&mut batch);
    }
    Ok(tasks)
}
