//! # agentbench
//!
//! Gate-based benchmark evaluation engine for AI agent outputs.
//!
//! The engine consumes (task definition, agent response) pairs and
//! produces structured pass/fail verdicts plus a 1-5 quality score
//! obtained from an external judge. Agents and the judge are opaque
//! async collaborators; the engine never calls a generative model
//! itself. A benchmark run always completes: agent failures, judge
//! failures, and malformed rules are absorbed as data in the run log,
//! never surfaced as process-level failures.

pub mod agents;
pub mod extraction;
pub mod gates;
pub mod judge;
pub mod runner;
pub mod task;
pub mod utilities;

pub use agents::Agent;
pub use extraction::extract_json;
pub use gates::{evaluate, normalize, Gate, GateKind, Verdict};
pub use judge::{Judge, QualityScorer, NEUTRAL_SCORE};
pub use runner::run_log::ResultRow;
pub use runner::{BenchmarkRunner, RunState};
pub use task::{load_tasks_from_yaml, BenchmarkTask, EvalRules};
pub use utilities::errors::{BenchmarkError, InvocationError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
