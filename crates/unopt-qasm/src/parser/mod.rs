//! Parser for OpenQASM 2.

mod expression;
mod lowering;
mod statement;

pub use lowering::MAX_REGISTER_SIZE;
pub(crate) use lowering::{STANDARD_INCLUDE, lower_to_circuit};

use unopt_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse an OpenQASM 2 source string into a Circuit.
///
/// User gates are inlined at their call sites and `opaque` gates become
/// opaque named gates.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_ast(source)?;
    lower_to_circuit(&program)
}

/// Parse an OpenQASM 2 source string into an AST Program.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| ParseError::LexerError { line, message })?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn unexpected(line: usize, expected: &str, found: Option<Token>) -> ParseError {
        match found {
            Some(found) => ParseError::UnexpectedToken {
                line,
                expected: expected.into(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.into()),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_version(&mut self) -> ParseResult<String> {
        let line = self.line();
        let version = match self.advance() {
            Some(Token::RealLiteral(v)) => format!("{v:.1}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            other => return Err(Self::unexpected(line, "version number", other)),
        };
        if version == "2.0" {
            Ok(version)
        } else {
            Err(ParseError::InvalidVersion(version))
        }
    }

    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            other => Err(Self::unexpected(line, "identifier", other)),
        }
    }

    pub(super) fn parse_u32(&mut self) -> ParseResult<u32> {
        let line = self.line();
        match self.advance() {
            Some(Token::IntLiteral(v)) => {
                u32::try_from(v).map_err(|_| ParseError::UnexpectedToken {
                    line,
                    expected: "32-bit integer".into(),
                    found: v.to_string(),
                })
            }
            other => Err(Self::unexpected(line, "integer", other)),
        }
    }
}
