//! Error types for the recipe.

use thiserror::Error;
use unopt_compile::CompileError;
use unopt_ir::IrError;

use crate::config::Strategy;
use crate::recipe::Stage;

/// Errors that can occur while configuring or running the recipe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecipeError {
    /// Unknown insertion strategy name.
    #[error("Unknown strategy '{0}'. Available strategies are 'concatenated' and 'random'")]
    UnknownStrategy(String),

    /// Unknown decomposition method name.
    #[error("Unknown decomposition method '{0}'. Available methods are 'default', 'kak' and 'basis'")]
    UnknownDecompositionMethod(String),

    /// Optimization level outside `0..=3`.
    #[error("Optimization level {0} is out of range (expected 0 to 3)")]
    InvalidOptimizationLevel(u8),

    /// The decomposition or resynthesis back end failed.
    #[error("Round {round} ({strategy}, {num_qubits} qubits) failed during {stage}: {source}")]
    Collaborator {
        /// Zero-based round index.
        round: usize,
        /// Insertion strategy in use.
        strategy: Strategy,
        /// Qubits in the circuit being rewritten.
        num_qubits: usize,
        /// Stage that failed.
        stage: Stage,
        /// The back end's error.
        #[source]
        source: CompileError,
    },

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),
}

impl RecipeError {
    /// Whether this error stems from configuration rather than from the
    /// circuit or a back end.
    ///
    /// An opaque gate with no equivalence under `basis` decomposition counts
    /// as a configuration error.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::UnknownStrategy(_)
            | Self::UnknownDecompositionMethod(_)
            | Self::InvalidOptimizationLevel(_) => true,
            Self::Collaborator { source, .. } => matches!(
                source,
                CompileError::GateNotInBasis(_) | CompileError::UnsupportedBasis(_)
            ),
            _ => false,
        }
    }
}

/// Result type for recipe operations.
pub type RecipeResult<T> = Result<T, RecipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(RecipeError::UnknownStrategy("bogus".into()).is_configuration());
        assert!(RecipeError::InvalidOptimizationLevel(4).is_configuration());

        let opaque = RecipeError::Collaborator {
            round: 0,
            strategy: Strategy::Concatenated,
            num_qubits: 3,
            stage: Stage::Decomposition,
            source: CompileError::GateNotInBasis("oracle".into()),
        };
        assert!(opaque.is_configuration());
        assert!(opaque.to_string().starts_with("Round 0 (concatenated, 3 qubits)"));

        let ir = RecipeError::Ir(IrError::NoMatrix("oracle".into()));
        assert!(!ir.is_configuration());
    }

    #[test]
    fn test_collaborator_keeps_source() {
        use std::error::Error as _;

        let err = RecipeError::Collaborator {
            round: 2,
            strategy: Strategy::Random,
            num_qubits: 5,
            stage: Stage::Synthesis,
            source: CompileError::MissingBasisGates,
        };
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Round 2 (random, 5 qubits) failed during synthesis: Missing basis gates in property set"
        );
    }
}
