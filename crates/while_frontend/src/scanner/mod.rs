#[cfg(test)]
mod tests;

use std::io::{self, BufRead};

use while_diagnostic::sources::SourceId;
use while_diagnostic::span::Span;
use while_diagnostic::{Diagnostic, IntoDiagnostic, Snippet};

use crate::token::{Token, TokenKind};

#[derive(thiserror::Error, Debug)]
#[error("{kind}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub span: Span,
}

#[derive(thiserror::Error, Debug)]
pub enum ScanErrorKind {
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    #[error("source is not valid UTF-8")]
    InvalidUtf8,

    #[error("expected `{expected}`, found {}", describe_mismatch(.matched, .found))]
    Mismatch {
        expected: &'static str,
        matched: String,
        found: Option<char>,
    },
}

fn describe_mismatch(matched: &str, found: &Option<char>) -> String {
    match found {
        Some(ch) => format!("`{matched}{ch}`"),
        None => format!("`{matched}` followed by end of input"),
    }
}

impl IntoDiagnostic for ScanError {
    fn into_diagnostic(self, source_id: SourceId) -> Diagnostic {
        let label = match &self.kind {
            ScanErrorKind::Mismatch { expected, .. } => format!("expected `{expected}` here"),
            _ => "here".to_owned(),
        };

        Diagnostic::error()
            .with_message(self.kind.to_string())
            .with_snippet(Snippet::primary(label, source_id, self.span))
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Pull-based scanner over a UTF-8 byte stream.
///
/// Keeps exactly one character of pushback, so a token is decided by looking
/// at most one character past its end.
pub struct Scanner<R> {
    reader: R,

    pushback: Option<char>,
    last: Option<char>,

    pos: usize,
    token_start: usize,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,

            pushback: None,
            last: None,

            pos: 0,
            token_start: 0,
        }
    }

    /// Scans the next token. Whitespace is returned as a single `Ws` token
    /// per run; the end of the stream yields `Eof`.
    pub fn scan(&mut self) -> ScanResult<Token> {
        self.token_start = self.pos;

        let Some(ch) = self.read()? else {
            return Ok(self.token(TokenKind::Eof, String::new()));
        };

        let token = match ch {
            ch if is_whitespace(ch) => self.scan_whitespace(ch)?,

            'x' => self.scan_variable()?,
            '0' | '1' => self.token(TokenKind::Constant, ch),

            ':' => self.scan_exact(TokenKind::Assign, ":=")?,
            '!' => self.scan_exact(TokenKind::NotEqual, "!=")?,

            ';' => self.token(TokenKind::Semicolon, ch),
            '+' => self.token(TokenKind::Plus, ch),
            '-' => self.token(TokenKind::Minus, ch),

            'W' => self.scan_exact(TokenKind::While, "WHILE")?,
            'D' => self.scan_exact(TokenKind::Do, "DO")?,
            'E' => self.scan_exact(TokenKind::End, "END")?,

            ch => self.token(TokenKind::Illegal, ch),
        };

        tracing::trace!(kind = ?token.kind, literal = ?token.literal, "scanned token");

        Ok(token)
    }

    fn scan_whitespace(&mut self, first: char) -> ScanResult<Token> {
        let mut literal = String::from(first);

        while let Some(ch) = self.read()? {
            if !is_whitespace(ch) {
                self.unread();
                break;
            }
            literal.push(ch);
        }

        Ok(self.token(TokenKind::Ws, literal))
    }

    fn scan_variable(&mut self) -> ScanResult<Token> {
        let mut literal = String::from('x');

        while let Some(ch) = self.read()? {
            if !ch.is_ascii_digit() {
                self.unread();
                break;
            }
            literal.push(ch);
        }

        Ok(self.token(TokenKind::Variable, literal))
    }

    /// Matches the rest of a fixed literal whose first character has already
    /// been read.
    fn scan_exact(&mut self, kind: TokenKind, expected: &'static str) -> ScanResult<Token> {
        let mut wanted = expected.chars();
        let mut matched: String = wanted.next().into_iter().collect();

        for want in wanted {
            match self.read()? {
                Some(ch) if ch == want => matched.push(ch),
                found => {
                    return Err(self.error(ScanErrorKind::Mismatch {
                        expected,
                        matched,
                        found,
                    }))
                }
            }
        }

        Ok(self.token(kind, matched))
    }

    fn read(&mut self) -> ScanResult<Option<char>> {
        let ch = match self.pushback.take() {
            Some(ch) => Some(ch),
            None => self.decode()?,
        };

        if let Some(ch) = ch {
            self.pos += ch.len_utf8();
        }
        self.last = ch;

        Ok(ch)
    }

    fn unread(&mut self) {
        debug_assert!(self.pushback.is_none(), "only one character can be unread");

        if let Some(ch) = self.last.take() {
            self.pos -= ch.len_utf8();
            self.pushback = Some(ch);
        }
    }

    fn decode(&mut self) -> ScanResult<Option<char>> {
        let first = loop {
            match self.reader.fill_buf().map(|buf| buf.first().copied()) {
                Ok(Some(byte)) => break byte,
                Ok(None) => return Ok(None),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(self.decode_error(ScanErrorKind::Io(err))),
            }
        };
        self.reader.consume(1);

        let width =
            utf8_width(first).ok_or_else(|| self.decode_error(ScanErrorKind::InvalidUtf8))?;

        let mut bytes = [first, 0, 0, 0];
        if let Err(err) = self.reader.read_exact(&mut bytes[1..width]) {
            let kind = match err.kind() {
                io::ErrorKind::UnexpectedEof => ScanErrorKind::InvalidUtf8,
                _ => ScanErrorKind::Io(err),
            };
            return Err(self.decode_error(kind));
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.decode_error(ScanErrorKind::InvalidUtf8))
    }

    fn token(&self, kind: TokenKind, literal: impl Into<String>) -> Token {
        Token::new(kind, literal, Span::new(self.token_start, self.pos))
    }

    fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError {
            kind,
            span: Span::new(self.token_start, self.pos),
        }
    }

    fn decode_error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError {
            kind,
            span: Span::new(self.pos, self.pos + 1),
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn utf8_width(byte: u8) -> Option<usize> {
    match byte {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}
