//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Measurement with unequal qubit and classical bit lists.
    #[error("Measurement maps {qubits} qubits onto {clbits} classical bits")]
    ClbitCountMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of target classical bits.
        clbits: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical condition refers to a register the circuit does not declare.
    #[error("Unknown classical register '{0}'")]
    UnknownRegister(String),

    /// A register with this name already exists.
    #[error("Register '{0}' is already declared")]
    DuplicateRegister(String),

    /// Adding a register would overflow the 32-bit bit index space.
    #[error("Register '{name}' of size {size} does not fit after {existing} existing bits")]
    RegisterOverflow {
        /// Register name.
        name: String,
        /// Requested size.
        size: u32,
        /// Bits of the same kind already declared.
        existing: u32,
    },

    /// Matrix does not have the shape of an n-qubit operator.
    #[error("Invalid operator matrix: {0}")]
    InvalidMatrix(String),

    /// Matrix is not unitary within tolerance.
    #[error("Matrix is not unitary (max deviation from identity {deviation:.3e})")]
    NotUnitary {
        /// Largest entry of |U†U - I|.
        deviation: f64,
    },

    /// Gate carries no matrix (opaque declaration).
    #[error("Gate '{0}' has no known matrix")]
    NoMatrix(String),

    /// Instruction has no unitary action.
    #[error("Instruction '{0}' is not unitary")]
    NonUnitaryInstruction(String),

    /// Dense operator would be too large.
    #[error("Cannot build a dense operator on {num_qubits} qubits (limit {max})")]
    TooManyQubits {
        /// Requested number of qubits.
        num_qubits: usize,
        /// Largest supported size.
        max: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
