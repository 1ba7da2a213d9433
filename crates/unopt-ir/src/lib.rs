//! Circuit model for the unopt workspace.
//!
//! This crate holds the data every other crate works on: an ordered list of
//! [`Instruction`]s over flat qubit and classical-bit ids, the standard gate
//! library with exact matrices, and dense [`Operator`] algebra used to check
//! that rewritten circuits still implement the same unitary.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] and named
//!   [`Register`]s
//! - **Gates**: [`StandardGate`] for built-in gates, [`CustomGate`] for opaque
//!   declarations, [`UnitaryGate`] for matrix-defined operations
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] builder API with operand validation
//! - **Operators**: [`Operator`] for adjoints, products, subspace embedding and
//!   equivalence up to global phase; [`Unitary2x2`] for single-qubit algebra
//!
//! # Example: Checking Equivalence
//!
//! ```rust
//! use unopt_ir::{Circuit, Operator, QubitId};
//!
//! let mut swap = Circuit::with_size("swap", 2, 0);
//! swap.swap(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut three_cx = Circuit::with_size("three_cx", 2, 0);
//! three_cx
//!     .cx(QubitId(0), QubitId(1)).unwrap()
//!     .cx(QubitId(1), QubitId(0)).unwrap()
//!     .cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let a = Operator::from_circuit(&swap).unwrap();
//! let b = Operator::from_circuit(&three_cx).unwrap();
//! assert!(a.equiv(&b, 1e-12));
//! ```
//!
//! # Matrix Convention
//!
//! Operand `j` of an instruction is bit `j` of its matrix index
//! (little-endian), both for gate matrices and for embedding into a register.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod operator;
pub mod qubit;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, CustomGate, Gate, GateKind, StandardGate, UnitaryGate};
pub use instruction::{Instruction, InstructionKind};
pub use operator::{MAX_DENSE_QUBITS, Operator};
pub use qubit::{ClbitId, QubitId, Register};
pub use unitary::{Unitary2x2, ZyzAngles};
