//! Statement parsing for OpenQASM 2.

use super::Parser;
use crate::ast::{Argument, GateCall, GateDef, Operation, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a top-level statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qreg => {
                self.advance();
                let (name, size) = self.parse_register_decl()?;
                Ok(Statement::QregDecl { name, size })
            }
            Token::Creg => {
                self.advance();
                let (name, size) = self.parse_register_decl()?;
                Ok(Statement::CregDecl { name, size })
            }
            Token::Gate => self.parse_gate_def(),
            Token::Opaque => self.parse_opaque(),
            Token::If => self.parse_if(),
            Token::Measure
            | Token::Reset
            | Token::Barrier
            | Token::Identifier(_)
            | Token::GateU
            | Token::GateCX => Ok(Statement::Operation(self.parse_operation()?)),
            other => Err(Self::unexpected(line, "statement", Some(other))),
        }
    }

    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let line = self.line();
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            other => return Err(Self::unexpected(line, "string literal", other)),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// `name[size];` after `qreg` or `creg`.
    fn parse_register_decl(&mut self) -> ParseResult<(String, u32)> {
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_u32()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok((name, size))
    }

    /// `(params)? qubits` shared by `gate` and `opaque`.
    fn parse_gate_signature(&mut self) -> ParseResult<(String, Vec<String>, Vec<String>)> {
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let p = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };
        let qubits = self.parse_identifier_list()?;
        Ok((name, params, qubits))
    }

    fn parse_gate_def(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Gate)?;
        let (name, params, qubits) = self.parse_gate_signature()?;

        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&Token::RBrace) {
            let line = self.line();
            match self.peek() {
                Some(Token::Barrier | Token::Identifier(_) | Token::GateU | Token::GateCX) => {
                    body.push(self.parse_operation()?);
                }
                _ => {
                    let found = self.advance();
                    return Err(Self::unexpected(line, "gate call or barrier", found));
                }
            }
        }
        self.expect(Token::RBrace)?;

        Ok(Statement::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    fn parse_opaque(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Opaque)?;
        let (name, params, qubits) = self.parse_gate_signature()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Opaque {
            name,
            params,
            qubits,
        })
    }

    /// `if (creg == n) operation`
    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let register = self.parse_identifier()?;
        self.expect(Token::EqEq)?;
        let line = self.line();
        let value = match self.advance() {
            Some(Token::IntLiteral(v)) => v,
            other => return Err(Self::unexpected(line, "integer", other)),
        };
        self.expect(Token::RParen)?;
        let operation = self.parse_operation()?;
        Ok(Statement::If {
            register,
            value,
            operation,
        })
    }

    /// Parse a gate call, measurement, reset or barrier.
    fn parse_operation(&mut self) -> ParseResult<Operation> {
        let line = self.line();
        let op = match self.advance() {
            Some(Token::Measure) => {
                let qubit = self.parse_argument()?;
                self.expect(Token::Arrow)?;
                let bit = self.parse_argument()?;
                Operation::Measure { qubit, bit }
            }
            Some(Token::Reset) => Operation::Reset(self.parse_argument()?),
            Some(Token::Barrier) => Operation::Barrier(self.parse_arguments()?),
            Some(Token::GateU) => self.parse_gate_call("U".into())?,
            Some(Token::GateCX) => self.parse_gate_call("CX".into())?,
            Some(Token::Identifier(name)) => self.parse_gate_call(name)?,
            other => return Err(Self::unexpected(line, "quantum operation", other)),
        };
        self.expect(Token::Semicolon)?;
        Ok(op)
    }

    fn parse_gate_call(&mut self, name: String) -> ParseResult<Operation> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };
        let args = self.parse_arguments()?;
        Ok(Operation::Gate(GateCall { name, params, args }))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Argument>> {
        let mut args = vec![self.parse_argument()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_argument()?);
        }
        Ok(args)
    }

    /// `name` or `name[index]`.
    fn parse_argument(&mut self) -> ParseResult<Argument> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_u32()?;
            self.expect(Token::RBracket)?;
            Ok(Argument::single(register, index))
        } else {
            Ok(Argument::register(register))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_ast;
    use crate::ast::{Argument, Operation, Statement};

    #[test]
    fn test_gate_definition() {
        let program = parse_ast(
            "OPENQASM 2.0; gate rot(a, b) x, y { U(a, 0, b) x; barrier x, y; CX x, y; }",
        )
        .unwrap();
        let Statement::GateDef(def) = &program.statements[0] else {
            panic!("expected a gate definition");
        };
        assert_eq!(def.name, "rot");
        assert_eq!(def.params, vec!["a", "b"]);
        assert_eq!(def.qubits, vec!["x", "y"]);
        assert_eq!(def.body.len(), 3);
        assert!(matches!(&def.body[1], Operation::Barrier(args) if args.len() == 2));
    }

    #[test]
    fn test_opaque_without_params() {
        let program = parse_ast("OPENQASM 2.0; opaque oracle() a, b, c;").unwrap();
        assert!(matches!(
            &program.statements[0],
            Statement::Opaque { name, params, qubits }
                if name == "oracle" && params.is_empty() && qubits.len() == 3
        ));
    }

    #[test]
    fn test_measure_arguments() {
        let program = parse_ast("OPENQASM 2.0; measure q[1] -> c[0]; measure q -> c;").unwrap();
        let Statement::Operation(Operation::Measure { qubit, bit }) = &program.statements[0] else {
            panic!("expected a measurement");
        };
        assert_eq!(qubit, &Argument::single("q", 1));
        assert_eq!(bit, &Argument::single("c", 0));
        assert!(matches!(
            &program.statements[1],
            Statement::Operation(Operation::Measure { qubit, .. }) if qubit.index.is_none()
        ));
    }

    #[test]
    fn test_measure_not_allowed_in_gate_body() {
        let err = parse_ast("OPENQASM 2.0; gate g a { measure a -> c; }").unwrap_err();
        assert!(err.to_string().contains("gate call or barrier"));
    }
}
