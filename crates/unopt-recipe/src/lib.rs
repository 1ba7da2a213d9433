//! Elementary unoptimization: make a circuit larger without changing what it
//! computes.
//!
//! Each round of the recipe picks an anchor two-qubit gate `B1`, inserts a
//! random two-qubit unitary `A` and its adjoint right after it on a qubit pair
//! sharing exactly one qubit with `B1`, moves `B1` past `A†` by conjugation,
//! expands the matrix-defined gates and finally resynthesizes the circuit into
//! `cx` and `u`. Every step preserves the unitary up to global phase, so an
//! optimizing compiler is then asked to undo structure that is really there.
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌───────────────┐   ┌─────────────┐
//! │ insertion │──▶│ conjugation │──▶│ decomposition │──▶│ resynthesis │
//! └───────────┘   └─────────────┘   └───────────────┘   └─────────────┘
//!   B1 A† A         Ã† B1 A           cx + 1q gates       cx + u
//! ```
//!
//! # Example
//!
//! ```rust
//! use unopt_ir::{Circuit, QubitId};
//! use unopt_recipe::{Recipe, RecipeConfig, verify_equivalence};
//!
//! let mut circuit = Circuit::with_size("pair", 3, 0);
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.cx(QubitId(1), QubitId(2)).unwrap();
//!
//! let recipe = Recipe::new(RecipeConfig::new().with_iterations(2).with_seed(7)).unwrap();
//! let (inflated, report) = recipe.run_with_report(&circuit).unwrap();
//!
//! assert_eq!(report.applied(), 2);
//! assert!(inflated.len() > circuit.len());
//! assert!(verify_equivalence(&circuit, &inflated, 1e-9).unwrap());
//! ```

pub mod config;
pub mod conjugation;
pub mod decomposition;
pub mod error;
pub mod index;
pub mod insertion;
pub mod provenance;
pub mod recipe;
pub mod synthesis;
pub mod verify;

pub use config::{DecompositionMethod, MAX_OPTIMIZATION_LEVEL, RecipeConfig, Strategy};
pub use error::{RecipeError, RecipeResult};
pub use insertion::{InsertionPlan, SkipReason};
pub use provenance::Provenance;
pub use recipe::{Recipe, RecipeReport, RoundOutcome, RoundReport, Stage, unoptimize};
pub use synthesis::{PassManagerResynthesizer, Resynthesizer};
pub use verify::verify_equivalence;
