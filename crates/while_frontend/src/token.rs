use std::fmt;

use while_diagnostic::span::Span;

use crate::{Node, NodeCopy};

#[derive(Node!)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Ws => write!(f, "whitespace"),
            TokenKind::Illegal => write!(f, "unknown character {:?}", self.literal),
            _ => write!(f, "`{}`", self.literal),
        }
    }
}

#[derive(NodeCopy!)]
pub enum TokenKind {
    Eof,
    Ws,
    Illegal,

    Variable,
    Constant,

    Semicolon,
    Assign,
    NotEqual,

    Plus,
    Minus,

    While,
    Do,
    End,
}

impl TokenKind {
    pub fn token_name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Ws => "whitespace",
            TokenKind::Illegal => "unknown character",
            TokenKind::Variable => "a variable",
            TokenKind::Constant => "a constant",
            TokenKind::Semicolon => "`;`",
            TokenKind::Assign => "`:=`",
            TokenKind::NotEqual => "`!=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::While => "keyword `WHILE`",
            TokenKind::Do => "keyword `DO`",
            TokenKind::End => "keyword `END`",
        }
    }
}
