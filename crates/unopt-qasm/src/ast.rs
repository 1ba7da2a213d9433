//! Abstract Syntax Tree for OpenQASM 2.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A complete OpenQASM 2 program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Version string, always "2.0" once parsed.
    pub version: String,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

/// A top-level statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// `include "file";`
    Include(String),

    /// `qreg name[size];`
    QregDecl { name: String, size: u32 },

    /// `creg name[size];`
    CregDecl { name: String, size: u32 },

    /// `gate name(params) qubits { body }`
    GateDef(GateDef),

    /// `opaque name(params) qubits;`
    Opaque {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },

    /// A quantum operation.
    Operation(Operation),

    /// `if (creg == value) operation;`
    If {
        register: String,
        value: u64,
        operation: Operation,
    },
}

/// A user gate definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDef {
    pub name: String,
    pub params: Vec<String>,
    pub qubits: Vec<String>,
    /// Gate calls and barriers over the formal qubit names.
    pub body: Vec<Operation>,
}

/// A quantum operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Gate application.
    Gate(GateCall),
    /// `measure q -> c;`
    Measure { qubit: Argument, bit: Argument },
    /// `reset q;`
    Reset(Argument),
    /// `barrier a, b;`
    Barrier(Vec<Argument>),
}

/// A gate call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub args: Vec<Argument>,
}

/// A whole register `q` or one element `q[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub register: String,
    pub index: Option<u32>,
}

impl Argument {
    /// One element of a register.
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// A whole register, or a formal qubit inside a gate body.
    pub fn register(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

/// A parameter expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    Int(u64),
    Real(f64),
    Pi,
    /// A gate parameter name.
    Identifier(String),
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// One of `sin`, `cos`, `tan`, `exp`, `ln`, `sqrt`.
    FnCall { name: String, arg: Box<Expression> },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Expression {
    /// Evaluate with gate parameters bound in `env`.
    #[allow(clippy::cast_precision_loss)]
    pub fn eval(&self, env: &FxHashMap<String, f64>) -> ParseResult<f64> {
        Ok(match self {
            Expression::Int(v) => *v as f64,
            Expression::Real(v) => *v,
            Expression::Pi => std::f64::consts::PI,
            Expression::Identifier(name) => *env
                .get(name)
                .ok_or_else(|| ParseError::UndefinedIdentifier(name.clone()))?,
            Expression::Neg(e) => -e.eval(env)?,
            Expression::BinOp { left, op, right } => {
                let l = left.eval(env)?;
                let r = right.eval(env)?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Expression::FnCall { name, arg } => {
                let x = arg.eval(env)?;
                match name.as_str() {
                    "sin" => x.sin(),
                    "cos" => x.cos(),
                    "tan" => x.tan(),
                    "exp" => x.exp(),
                    "ln" => x.ln(),
                    "sqrt" => x.sqrt(),
                    other => return Err(ParseError::UnknownFunction(other.to_string())),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_expression_eval() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Pi),
            op: BinOp::Div,
            right: Box::new(Expression::Int(2)),
        };
        let result = expr.eval(&FxHashMap::default()).unwrap();
        assert!((result - PI / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_bound_parameter() {
        let expr = Expression::FnCall {
            name: "cos".into(),
            arg: Box::new(Expression::Neg(Box::new(Expression::Identifier(
                "theta".into(),
            )))),
        };
        let mut env = FxHashMap::default();
        env.insert("theta".to_string(), PI);
        assert!((expr.eval(&env).unwrap() + 1.0).abs() < 1e-15);

        let err = expr.eval(&FxHashMap::default()).unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(ref s) if s == "theta"));
    }
}
