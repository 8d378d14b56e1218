#[macro_use]
extern crate macro_rules_attribute;

mod parser;
mod scanner;

pub mod ast;
pub mod token;

use std::io::BufRead;

pub use parser::{ParseError, ParseResult, Parser};
pub use scanner::{ScanError, ScanErrorKind, ScanResult, Scanner};

use ast::Statement;

derive_alias! {
    #[derive(Node!)] = #[derive(Debug, Clone, PartialEq, Eq)];
    #[derive(NodeCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)];
}

/// Parses a program from a byte stream.
pub fn parse(reader: impl BufRead) -> ParseResult<Statement> {
    let program = Parser::new(reader).parse();

    match &program {
        Ok(_) => tracing::debug!("parsed program"),
        Err(err) => tracing::debug!(%err, "failed to parse program"),
    }

    program
}

pub fn parse_str(source: &str) -> ParseResult<Statement> {
    parse(source.as_bytes())
}
