//! Error types for the compile crate.

use thiserror::Error;
use unopt_ir::IrError;

/// Errors raised by passes and synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// No equivalence is known for a gate in the requested basis.
    #[error("Gate '{0}' has no known equivalence in the target basis")]
    GateNotInBasis(String),

    /// A basis-dependent pass ran without basis gates.
    #[error("Missing basis gates in property set")]
    MissingBasisGates,

    /// The basis cannot express every circuit.
    #[error("Basis {0:?} is not universal; it must contain 'cx' and 'u'")]
    UnsupportedBasis(Vec<String>),

    /// Matrix size does not match the operand list.
    #[error("Cannot synthesize a {matrix_qubits}-qubit unitary onto {operands} operands")]
    SynthesisArity {
        /// Qubits the matrix acts on.
        matrix_qubits: usize,
        /// Operands supplied.
        operands: usize,
    },

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
