//! Declarative hard gates: the canonical rule model, the legacy-format
//! normalizer, and the evaluator that applies gates to agent responses.

pub mod evaluator;
pub mod gate;
pub mod normalizer;

pub use evaluator::evaluate;
pub use gate::{Gate, GateKind, Verdict};
pub use normalizer::normalize;
