//! Error types for the benchmark engine.

use thiserror::Error;

/// Fatal errors that prevent a benchmark from starting or completing.
///
/// Per-pair failures (an agent raising, a judge timing out, a malformed
/// gate rule) are never represented here; those are absorbed into the
/// Run Log as data. This enum covers the configuration and persistence
/// failures that genuinely have no fallback.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// Missing or malformed task-definition source; fatal at startup.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The runner was driven through an invalid state transition.
    #[error("invalid runner state: {message}")]
    InvalidState { message: String },

    /// Failure while persisting the summary or trace.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure serializing the trace document.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl BenchmarkError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

/// Error raised by an external collaborator (agent or judge) invocation.
///
/// Collaborators are opaque; all we keep is the message. Timeouts are
/// folded into the same class as any other invocation failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InvocationError {
    pub message: String,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The substituted message for an invocation that exceeded its deadline.
    pub fn timed_out(seconds: f64) -> Self {
        Self::new(format!("invocation timed out after {seconds:.1}s"))
    }
}
