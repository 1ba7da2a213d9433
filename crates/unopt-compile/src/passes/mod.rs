//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: passes that need nothing but the circuit
//! - [`target`]: passes that read the target basis from the `PropertySet`

pub mod agnostic;
pub mod target;

pub use agnostic::{CancelCX, Decompose, OptimizationLoop, Optimize1qGates, RemoveIdentity};
pub use target::{BasisTranslation, UnrollCustomDefinitions};
