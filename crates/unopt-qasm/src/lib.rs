//! `OpenQASM` 2 parser and emitter for unopt circuits.
//!
//! Benchmark circuits are read from and written back to `OpenQASM` 2.0 with
//! the `qelib1.inc` gate library. Parsing lowers straight to a
//! [`unopt_ir::Circuit`]: user gate definitions are inlined and legacy
//! names (`u1`, `u2`, `u3`, `cu1`, `cu3`) map onto native gates.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Standard include | ✅ | `include "qelib1.inc";` |
//! | Registers | ✅ | `qreg q[5];`, `creg c[5];` |
//! | Parameterized gates | ✅ | `rz(-pi/4) q[0];` |
//! | Register broadcast | ✅ | `h q;`, `cx a,b;` |
//! | Gate definitions | ✅ | `gate g(t) a,b { ... }` |
//! | Opaque gates | ✅ | `opaque oracle a,b;` |
//! | Measurements | ✅ | `measure q -> c;` |
//! | Conditions | ✅ | `if(c==1) x q[0];` |
//! | Barriers and reset | ✅ | `barrier q;`, `reset q[0];` |
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use unopt_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0],q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 4);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use unopt_ir::Circuit;
//! use unopt_qasm::{emit_with_header, parse};
//!
//! let circuit = Circuit::ghz(3).unwrap();
//! let header = vec!["ghz state".to_string()];
//! let qasm = emit_with_header(&circuit, &header).unwrap();
//! assert!(qasm.starts_with("// ghz state\nOPENQASM 2.0;"));
//!
//! let reparsed = parse(&qasm).unwrap();
//! assert_eq!(reparsed.instructions(), circuit.instructions());
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::{emit, emit_with_header};
pub use error::{ParseError, ParseResult};
pub use parser::{MAX_REGISTER_SIZE, parse, parse_ast};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
