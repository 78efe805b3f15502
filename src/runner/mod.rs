//! Benchmark runner: drives the task×agent matrix and persists results.
//!
//! The runner owns the tasks, the registered agents, and the run log for
//! one execution. Reference behavior is sequential; a bounded worker pool
//! can fan out across (task, agent) pairs since gate evaluation is pure
//! and every result row is independent. Agent and judge failures are
//! absorbed into the log as data, so the benchmark always completes and
//! always produces a summary and trace.

pub mod reports;
pub mod run_log;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::Agent;
use crate::gates::{evaluate, normalize};
use crate::judge::QualityScorer;
use crate::runner::run_log::ResultRow;
use crate::task::BenchmarkTask;
use crate::utilities::errors::{BenchmarkError, InvocationError};

/// Lifecycle of one runner instance. A runner executes exactly once; a
/// fresh run starts from a fresh runner with an empty log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

/// Drives one full benchmark execution over every (task, agent) pair.
pub struct BenchmarkRunner {
    tasks: Vec<BenchmarkTask>,
    agents: Vec<(String, Arc<dyn Agent>)>,
    scorer: QualityScorer,
    output_dir: PathBuf,
    concurrency: usize,
    agent_timeout: Option<Duration>,
    state: RunState,
    run_id: Uuid,
}

impl BenchmarkRunner {
    pub fn new(tasks: Vec<BenchmarkTask>, scorer: QualityScorer) -> Self {
        Self {
            tasks,
            agents: Vec::new(),
            scorer,
            output_dir: PathBuf::from("outputs"),
            concurrency: 1,
            agent_timeout: None,
            state: RunState::Idle,
            run_id: Uuid::new_v4(),
        }
    }

    /// Register an agent under a display name. Registration order is the
    /// enumeration order of the run matrix.
    pub fn register_agent(mut self, name: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        self.agents.push((name.into(), agent));
        self
    }

    /// Directory receiving the summary and trace files.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Maximum number of (task, agent) pairs in flight. 1 (the default)
    /// is the sequential reference behavior.
    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    /// Deadline for each agent invocation; a timeout is recorded like any
    /// other agent failure.
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the full matrix and persist the run log.
    ///
    /// Returns the log; the same rows are written to `leaderboard.csv`
    /// (overwritten) and to a timestamped trace file (never overwritten)
    /// in the output directory.
    pub async fn run(&mut self) -> Result<Vec<ResultRow>, BenchmarkError> {
        if self.state != RunState::Idle {
            return Err(BenchmarkError::invalid_state(
                "runner has already executed; build a new runner for a new run",
            ));
        }
        self.state = RunState::Running;
        let started_at = Utc::now();
        info!(
            run_id = %self.run_id,
            tasks = self.tasks.len(),
            agents = self.agents.len(),
            concurrency = self.concurrency,
            "starting benchmark"
        );

        let rows = if self.concurrency == 1 {
            self.run_sequential().await
        } else {
            self.run_parallel().await
        };

        std::fs::create_dir_all(&self.output_dir)?;
        reports::write_summary_csv(&self.output_dir.join(reports::SUMMARY_FILE), &rows)?;
        reports::write_trace(
            &self.output_dir.join(reports::trace_filename(started_at)),
            &rows,
        )?;

        self.state = RunState::Completed;
        info!(run_id = %self.run_id, rows = rows.len(), "benchmark completed");
        Ok(rows)
    }

    async fn run_sequential(&self) -> Vec<ResultRow> {
        let mut rows = Vec::with_capacity(self.tasks.len() * self.agents.len());
        for task in &self.tasks {
            for (agent_name, agent) in &self.agents {
                rows.push(
                    run_pair(
                        task.clone(),
                        agent_name.clone(),
                        Arc::clone(agent),
                        self.scorer.clone(),
                        self.agent_timeout,
                    )
                    .await,
                );
            }
        }
        rows
    }

    /// Bounded fan-out across pairs. Each worker handles one pair end to
    /// end; the log takes synchronized appends in completion order, and
    /// persistence happens only after every worker has joined.
    async fn run_parallel(&self) -> Vec<ResultRow> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let log = Arc::new(Mutex::new(Vec::with_capacity(
            self.tasks.len() * self.agents.len(),
        )));

        let mut handles = Vec::new();
        for task in &self.tasks {
            for (agent_name, agent) in &self.agents {
                let semaphore = Arc::clone(&semaphore);
                let log = Arc::clone(&log);
                let task = task.clone();
                let agent_name = agent_name.clone();
                let agent = Arc::clone(agent);
                let scorer = self.scorer.clone();
                let timeout = self.agent_timeout;
                handles.push(tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let row = run_pair(task, agent_name, agent, scorer, timeout).await;
                    log.lock().push(row);
                }));
            }
        }
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(%err, "benchmark worker panicked");
            }
        }

        Arc::try_unwrap(log)
            .map(|mutex| mutex.into_inner())
            .unwrap_or_default()
    }
}

/// Process one (task, agent) pair: timed agent call, hard gates, soft
/// score, one immutable row. Never fails; agent errors become the row's
/// response text with `error = true` and evaluation proceeds against that
/// substituted text.
async fn run_pair(
    task: BenchmarkTask,
    agent_name: String,
    agent: Arc<dyn Agent>,
    scorer: QualityScorer,
    timeout: Option<Duration>,
) -> ResultRow {
    info!(task = %task.name, agent = %agent_name, "running pair");

    let start = Instant::now();
    let outcome = invoke_agent(agent.as_ref(), &task.input_prompt, timeout).await;
    let duration_seconds = start.elapsed().as_secs_f64();

    let (response, error) = match outcome {
        Ok(response) => (response, false),
        Err(err) => {
            warn!(task = %task.name, agent = %agent_name, %err, "agent invocation failed");
            (err.to_string(), true)
        }
    };

    let gates = normalize(&task.eval_rules.hard_gates);
    let verdict = evaluate(&response, &gates);
    let quality_score = scorer
        .grade(&task.input_prompt, &response, task.rubric())
        .await;

    info!(
        task = %task.name,
        agent = %agent_name,
        passed = verdict.passed,
        quality_score,
        "pair scored"
    );

    ResultRow {
        task_id: task.task_id,
        task_name: task.name,
        agent: agent_name,
        passed: verdict.passed,
        quality_score,
        duration_seconds,
        fail_reasons: verdict.joined_reasons(),
        error,
    }
}

async fn invoke_agent(
    agent: &dyn Agent,
    prompt: &str,
    timeout: Option<Duration>,
) -> Result<String, InvocationError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, agent.run(prompt))
            .await
            .map_err(|_| InvocationError::timed_out(limit.as_secs_f64()))?,
        None => agent.run(prompt).await,
    }
}
