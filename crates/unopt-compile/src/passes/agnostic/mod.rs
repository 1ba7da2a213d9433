//! Target-agnostic compilation passes.

pub mod decompose;
pub mod optimization;

pub use decompose::Decompose;
pub use optimization::{CancelCX, OptimizationLoop, Optimize1qGates, RemoveIdentity};
