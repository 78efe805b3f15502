//! Soft quality scoring through an external judge.
//!
//! The judge is an opaque text-in/text-out capability. The adapter here
//! builds the grading prompt, parses the numeric rating out of whatever
//! the judge replies, and absorbs every failure into a neutral default
//! score so that a single ungraded task never aborts the benchmark.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::utilities::errors::InvocationError;

/// Score substituted when the judge cannot be invoked or its reply
/// contains no digits.
pub const NEUTRAL_SCORE: i64 = 3;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// External judge collaborator: rates a response given a grading prompt.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, InvocationError>;
}

/// Adapter from the judge collaborator to a numeric quality score.
#[derive(Clone)]
pub struct QualityScorer {
    judge: Arc<dyn Judge>,
    /// Optional deadline per judge call; a timeout grades as the neutral
    /// default like any other invocation failure.
    timeout: Option<Duration>,
}

impl QualityScorer {
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self {
            judge,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Grade a response 1-5 against a rubric.
    ///
    /// The rating is the first maximal run of digits anywhere in the
    /// judge's reply, taken as-is: an out-of-range reply like "42" is
    /// recorded unclamped. Any invocation failure or digit-free reply
    /// falls back to [`NEUTRAL_SCORE`].
    pub async fn grade(&self, task_prompt: &str, response_text: &str, rubric: &str) -> i64 {
        let prompt = build_grading_prompt(task_prompt, rubric, response_text);
        let reply = match self.invoke_with_deadline(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, "judge invocation failed, using neutral score");
                return NEUTRAL_SCORE;
            }
        };
        parse_score(&reply).unwrap_or_else(|| {
            warn!(reply = %reply.trim(), "judge reply had no digits, using neutral score");
            NEUTRAL_SCORE
        })
    }

    async fn invoke_with_deadline(&self, prompt: &str) -> Result<String, InvocationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.judge.invoke(prompt))
                .await
                .map_err(|_| InvocationError::timed_out(limit.as_secs_f64()))?,
            None => self.judge.invoke(prompt).await,
        }
    }
}

fn build_grading_prompt(task_prompt: &str, rubric: &str, response_text: &str) -> String {
    format!(
        "You are a strict grader reviewing an AI agent's answer.\n\
         Original Task: {task_prompt}\n\
         Grading Rubric: {rubric}\n\
         --------------------------------------------------\n\
         Agent Response:\n{response_text}\n\
         --------------------------------------------------\n\
         Grade this response from 1 to 5 based strictly on the rubric.\n\
         Return ONLY the number (e.g., 4)."
    )
}

/// First maximal digit run in the reply, or `None` if there is none.
fn parse_score(reply: &str) -> Option<i64> {
    DIGIT_RUN.find(reply)?.as_str().parse().ok()
}
