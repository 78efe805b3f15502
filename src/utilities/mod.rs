//! Utility modules for the benchmark engine.

pub mod errors;

pub use errors::{BenchmarkError, InvocationError};
