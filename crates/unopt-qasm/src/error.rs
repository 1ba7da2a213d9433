//! Error types for the OpenQASM 2 front end.

use thiserror::Error;

/// Errors raised while reading or writing OpenQASM 2.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0} (expected 2.0)")]
    InvalidVersion(String),

    /// Include of anything but the standard library.
    #[error("Unsupported include: \"{0}\"")]
    UnsupportedInclude(String),

    /// Undefined identifier.
    #[error("Undefined identifier: {0}")]
    UndefinedIdentifier(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Unknown gate.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Unknown function in a parameter expression.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Broadcast over registers of different sizes.
    #[error("Register size mismatch in '{0}'")]
    RegisterSizeMismatch(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Register declared larger than the front end accepts.
    #[error("Register '{register}' of size {size} exceeds the limit of {max}")]
    RegisterTooLarge {
        register: String,
        size: u32,
        max: u32,
    },

    /// Construct the circuit model cannot hold.
    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// Instruction with no OpenQASM 2 spelling.
    #[error("Cannot emit '{0}' as OpenQASM 2")]
    Unemittable(String),

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] unopt_ir::IrError),
}

/// Result type for parsing and emission.
pub type ParseResult<T> = Result<T, ParseError>;
