//! Circuit compilation for unopt.
//!
//! This crate provides the pass framework the unoptimization recipe relies on
//! for its decomposition and resynthesis stages, together with an exact
//! synthesizer for dense unitaries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   PassManager                     │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │              PropertySet                    │  │
//! │  │  - basis_gates  (e.g. cx, u)                │  │
//! │  │  - custom typed properties                  │  │
//! │  └────────────────────────────────────────────┘  │
//! │                                                   │
//! │  Unroll → Translate → Optimize1q → CancelCX → …   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes |
//! |-------|--------|
//! | 0 | `UnrollCustomDefinitions`, `BasisTranslation` |
//! | 1 | level 0 + `Optimize1qGates` |
//! | 2 | level 1 + `CancelCX`, `Optimize1qGates` |
//! | 3 | level 2 + `OptimizationLoop` (merge, cancel, drop identities) |
//!
//! # Example
//!
//! ```rust
//! use unopt_compile::PassManagerBuilder;
//! use unopt_ir::{Circuit, Operator, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! let before = Operator::from_circuit(&circuit).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(3)
//!     .build();
//! pm.run(&mut circuit, &mut props).unwrap();
//!
//! assert!(circuit.instructions().iter().all(|i| i.name() == "u" || i.name() == "cx"));
//! assert!(Operator::from_circuit(&circuit).unwrap().equiv(&before, 1e-9));
//! ```

pub mod definitions;
pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;
pub mod synthesis;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::agnostic::optimization::{LoopIterations, MAX_LOOP_ITERATIONS};
pub use property::{BasisGates, PropertySet};
pub use synthesis::synthesize;
