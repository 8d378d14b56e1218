
use std::io::BufRead;

use while_diagnostic::sources::SourceId;
use while_diagnostic::span::Span;
use while_diagnostic::{Diagnostic, IntoDiagnostic, Snippet};

use crate::ast::{Statement, Var};
use crate::scanner::{ScanError, Scanner};
use crate::token::{Token, TokenKind};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: Token },

    #[error("invalid variable `{literal}`, expected `x` followed by a number up to {}", u32::MAX)]
    InvalidVariable { literal: String, span: Span },

    #[error("increment must use the same variable on both sides, found `{lhs}` and `{rhs}`")]
    VariableMismatch { lhs: Var, rhs: Var, span: Span },
}

impl ParseError {
    fn expected(expected: impl Into<String>, found: Token) -> Self {
        Self::Expected {
            expected: expected.into(),
            found,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::Scan(err) => err.span,
            ParseError::Expected { found, .. } => found.span,
            ParseError::InvalidVariable { span, .. } | ParseError::VariableMismatch { span, .. } => {
                *span
            }
        }
    }
}

impl IntoDiagnostic for ParseError {
    fn into_diagnostic(self, source_id: SourceId) -> Diagnostic {
        let span = self.span();
        let message = self.to_string();

        match self {
            ParseError::Scan(err) => err.into_diagnostic(source_id),

            ParseError::Expected { expected, .. } => Diagnostic::error()
                .with_message(message)
                .with_snippet(Snippet::primary(
                    format!("expected {expected} here"),
                    source_id,
                    span,
                )),

            ParseError::InvalidVariable { .. } => Diagnostic::error()
                .with_message(message)
                .with_snippet(Snippet::primary("this variable", source_id, span))
                .with_note("variables are named `x0`, `x1`, `x2`, ..."),

            ParseError::VariableMismatch { lhs, .. } => Diagnostic::error()
                .with_message(message)
                .with_snippet(Snippet::primary(
                    format!("expected `{lhs}`"),
                    source_id,
                    span,
                ))
                .with_note("only `xN := xN + 1` and `xN := xN - 1` are valid assignments"),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

enum StatementStart {
    Increment(Statement),
    While(Var),
}

/// `a; b; c` as `Sequence(a, Sequence(b, c))`.
fn nest_right(statements: Vec<Statement>) -> Option<Statement> {
    statements
        .into_iter()
        .rev()
        .reduce(|tail, statement| Statement::sequence(statement, tail))
}

/// Predictive parser with a single token of lookahead.
pub struct Parser<R> {
    scanner: Scanner<R>,
    pushback: Option<Token>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            scanner: Scanner::new(reader),
            pushback: None,
        }
    }

    /// Parses a whole program. Anything but the end of input after the last
    /// statement is an error.
    pub fn parse(mut self) -> ParseResult<Statement> {
        let program = self.parse_program()?;

        let token = self.scan_ignore_whitespace()?;
        match token.kind {
            TokenKind::Eof => Ok(program),
            _ => Err(ParseError::expected("`;` or end of input", token)),
        }
    }

    /// `Statement (";" Program)?`, nested to the right.
    ///
    /// Loop bodies are kept on an explicit stack of open blocks, so neither
    /// long sequences nor deeply nested loops recurse.
    fn parse_program(&mut self) -> ParseResult<Statement> {
        let mut open: Vec<(Var, Vec<Statement>)> = vec![];
        let mut statements = vec![];

        loop {
            match self.parse_statement()? {
                StatementStart::Increment(statement) => statements.push(statement),
                StatementStart::While(var) => {
                    open.push((var, std::mem::take(&mut statements)));
                    continue;
                }
            }

            // close every block that ends here
            loop {
                let token = self.scan_ignore_whitespace()?;
                if token.kind == TokenKind::Semicolon {
                    break;
                }

                let Some(block) = nest_right(std::mem::take(&mut statements)) else {
                    return Err(ParseError::expected("a statement", token));
                };
                self.unscan(token);

                let Some((var, outer)) = open.pop() else {
                    return Ok(block);
                };

                self.expect(TokenKind::End)?;
                statements = outer;
                statements.push(Statement::While {
                    var,
                    body: Box::new(block),
                });
            }
        }
    }

    fn parse_statement(&mut self) -> ParseResult<StatementStart> {
        let token = self.scan_ignore_whitespace()?;

        match token.kind {
            TokenKind::Variable => {
                self.unscan(token);
                self.parse_increment().map(StatementStart::Increment)
            }

            TokenKind::While => {
                self.unscan(token);
                self.parse_while().map(StatementStart::While)
            }

            _ => Err(ParseError::expected("a statement", token)),
        }
    }

    fn parse_increment(&mut self) -> ParseResult<Statement> {
        let (lhs, _) = self.expect_variable()?;
        self.expect(TokenKind::Assign)?;

        let (rhs, rhs_span) = self.expect_variable()?;
        if lhs != rhs {
            return Err(ParseError::VariableMismatch {
                lhs,
                rhs,
                span: rhs_span,
            });
        }

        let token = self.scan_ignore_whitespace()?;
        let decrement = match token.kind {
            TokenKind::Plus => false,
            TokenKind::Minus => true,
            _ => return Err(ParseError::expected("`+` or `-`", token)),
        };

        self.expect_constant("1")?;

        Ok(Statement::Increment {
            var: lhs,
            decrement,
        })
    }

    /// `WHILE xN != 0 DO`. The body and `END` are handled by `parse_program`.
    fn parse_while(&mut self) -> ParseResult<Var> {
        self.expect(TokenKind::While)?;

        let (var, _) = self.expect_variable()?;
        self.expect(TokenKind::NotEqual)?;
        self.expect_constant("0")?;
        self.expect(TokenKind::Do)?;

        Ok(var)
    }

    fn expect_variable(&mut self) -> ParseResult<(Var, Span)> {
        let token = self.expect(TokenKind::Variable)?;

        let digits = token.literal.strip_prefix('x').unwrap_or_default();
        match digits.parse() {
            Ok(index) => Ok((Var(index), token.span)),
            Err(_) => Err(ParseError::InvalidVariable {
                literal: token.literal,
                span: token.span,
            }),
        }
    }

    fn expect_constant(&mut self, value: &str) -> ParseResult<Token> {
        let token = self.scan_ignore_whitespace()?;

        if token.kind == TokenKind::Constant && token.literal == value {
            Ok(token)
        } else {
            Err(ParseError::expected(format!("`{value}`"), token))
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.scan_ignore_whitespace()?;

        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::expected(kind.token_name(), token))
        }
    }

    fn scan_ignore_whitespace(&mut self) -> ParseResult<Token> {
        let token = self.scan()?;

        if token.kind == TokenKind::Ws {
            self.scan()
        } else {
            Ok(token)
        }
    }

    fn scan(&mut self) -> ParseResult<Token> {
        match self.pushback.take() {
            Some(token) => Ok(token),
            None => Ok(self.scanner.scan()?),
        }
    }

    fn unscan(&mut self, token: Token) {
        debug_assert!(self.pushback.is_none(), "only one token can be unscanned");
        self.pushback = Some(token);
    }
}
