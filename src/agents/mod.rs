//! Agent collaborator boundary.
//!
//! Agents are black boxes to the engine: each one takes a prompt and
//! yields a response string, possibly doing arbitrary tool or model work
//! on the way, possibly failing. The runner treats a failure as data (an
//! error row), never as a reason to stop the benchmark.

use async_trait::async_trait;

use crate::utilities::errors::InvocationError;

/// An external agent under evaluation.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Produce a response to the task prompt.
    async fn run(&self, prompt: &str) -> Result<String, InvocationError>;
}
