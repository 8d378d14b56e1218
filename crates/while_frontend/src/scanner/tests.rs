use std::io::{self, BufReader, Read};

use super::{ScanErrorKind, ScanResult, Scanner};
use crate::token::{Token, TokenKind};
use while_diagnostic::span::Span;

/// Scans up to and including `Eof`, or up to the first error.
fn tokens(reader: impl io::BufRead) -> Vec<ScanResult<Token>> {
    let mut scanner = Scanner::new(reader);
    let mut tokens = vec![];

    loop {
        let result = scanner.scan();
        let done = matches!(&result, Ok(Token { kind: TokenKind::Eof, .. }) | Err(_));
        tokens.push(result);

        if done {
            return tokens;
        }
    }
}

fn scan(source: &str) -> String {
    tokens(source.as_bytes())
        .into_iter()
        .map(|result| match result {
            Ok(token) => format!("{:?} {:?}", token.kind, token.literal),
            Err(err) => format!("error: {err}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn scan_one(source: &str) -> Token {
    let mut scanner = Scanner::new(source.as_bytes());
    let token = scanner.scan().unwrap();
    assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof, "{source:?}");
    token
}

fn scan_error(source: &str) -> ScanErrorKind {
    tokens(source.as_bytes())
        .into_iter()
        .find_map(Result::err)
        .unwrap_or_else(|| panic!("no error scanning {source:?}"))
        .kind
}

#[test]
fn single_tokens() {
    let cases = [
        (":=", TokenKind::Assign),
        ("!=", TokenKind::NotEqual),
        ("WHILE", TokenKind::While),
        ("DO", TokenKind::Do),
        ("END", TokenKind::End),
        (";", TokenKind::Semicolon),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("0", TokenKind::Constant),
        ("1", TokenKind::Constant),
        ("x0", TokenKind::Variable),
        ("x42", TokenKind::Variable),
    ];

    for (source, kind) in cases {
        let token = scan_one(source);
        assert_eq!(token.kind, kind, "{source:?}");
        assert_eq!(token.literal, source);
        assert_eq!(token.span, Span::new(0, source.len()));
    }
}

#[test]
fn whitespace_runs() {
    for source in ["   ", "\t\t", "\n\n", "\n\t ", "\r\n"] {
        let token = scan_one(source);
        assert_eq!(token.kind, TokenKind::Ws);
        assert_eq!(token.literal, source);
    }
}

#[test]
fn empty_source() {
    let mut scanner = Scanner::new(&b""[..]);
    let token = scanner.scan().unwrap();
    assert_eq!(token, Token::new(TokenKind::Eof, "", Span::new(0, 0)));

    // the end of input is sticky
    assert_eq!(scanner.scan().unwrap().kind, TokenKind::Eof);
}

#[test]
fn variables() {
    assert_eq!(scan_one("x").literal, "x");
    assert_eq!(scan_one("x042").literal, "x042");
    assert_eq!(scan_one("x18446744073709551616").literal, "x18446744073709551616");

    assert_eq!(scan("x1;"), "Variable \"x1\"\nSemicolon \";\"\nEof \"\"");
}

#[test]
fn other_digits_are_illegal() {
    assert_eq!(scan_one("2").kind, TokenKind::Illegal);
    assert_eq!(scan("10"), "Constant \"1\"\nConstant \"0\"\nEof \"\"");
}

#[test]
fn unknown_characters() {
    assert_eq!(
        scan("x1#x2"),
        "Variable \"x1\"\nIllegal \"#\"\nVariable \"x2\"\nEof \"\""
    );

    let token = scan_one("é");
    assert_eq!(token.kind, TokenKind::Illegal);
    assert_eq!(token.span, Span::new(0, 2));

    // keywords are case sensitive, lowercase letters are just unknown
    assert_eq!(scan_one("w").kind, TokenKind::Illegal);
}

#[test]
fn mutated_operators() {
    for (source, expected, found) in [
        (":!", ":=", Some('!')),
        ("!!", "!=", Some('!')),
        (":", ":=", None),
        ("! =", "!=", Some(' ')),
    ] {
        match scan_error(source) {
            ScanErrorKind::Mismatch {
                expected: e,
                found: f,
                ..
            } => {
                assert_eq!(e, expected, "{source:?}");
                assert_eq!(f, found, "{source:?}");
            }
            other => panic!("unexpected error {other:?} for {source:?}"),
        }
    }
}

#[test]
fn mutated_keywords() {
    for (source, expected, matched) in [
        ("WHIL", "WHILE", "WHIL"),
        ("WHILST", "WHILE", "WHIL"),
        ("DA", "DO", "D"),
        ("EMD", "END", "E"),
    ] {
        match scan_error(source) {
            ScanErrorKind::Mismatch {
                expected: e,
                matched: m,
                ..
            } => {
                assert_eq!(e, expected, "{source:?}");
                assert_eq!(m, matched, "{source:?}");
            }
            other => panic!("unexpected error {other:?} for {source:?}"),
        }
    }
}

#[test]
fn keyword_followed_by_partial_keyword() {
    assert_eq!(
        scan("ENDE"),
        "End \"END\"\nerror: expected `END`, found `E` followed by end of input"
    );
}

#[test]
fn mismatch_message() {
    let err = tokens(&b"x0 WHx"[..])
        .into_iter()
        .find_map(Result::err)
        .unwrap();

    assert_eq!(err.to_string(), "expected `WHILE`, found `WHx`");
    assert_eq!(err.span, Span::new(3, 6));
}

#[test]
fn spans() {
    let spans: Vec<_> = tokens(&b"x12 := x12"[..])
        .into_iter()
        .map(|t| t.unwrap().span)
        .collect();

    assert_eq!(
        spans,
        [
            Span::new(0, 3),
            Span::new(3, 4),
            Span::new(4, 6),
            Span::new(6, 7),
            Span::new(7, 10),
            Span::new(10, 10),
        ]
    );
}

#[test]
fn invalid_utf8() {
    let mut scanner = Scanner::new(&[b'x', b'1', 0xff][..]);
    let err = scanner.scan().unwrap_err();

    assert!(matches!(err.kind, ScanErrorKind::InvalidUtf8));
    assert_eq!(err.span, Span::new(2, 3));

    // truncated multi-byte sequence
    let mut scanner = Scanner::new(&[0xc3][..]);
    assert!(matches!(
        scanner.scan().unwrap_err().kind,
        ScanErrorKind::InvalidUtf8
    ));
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
    }
}

#[test]
fn read_errors_propagate() {
    let mut scanner = Scanner::new(BufReader::new(BrokenReader));
    let err = scanner.scan().unwrap_err();

    assert!(matches!(err.kind, ScanErrorKind::Io(_)));
    assert_eq!(err.to_string(), "failed to read source: device unplugged");

    let results = tokens(BufReader::new(BrokenReader));
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}

#[test]
fn loop_program() {
    insta::assert_snapshot!(scan("WHILE x1 != 0 DO\n\tx1 := x1 - 1\nEND"), @r###"
    While "WHILE"
    Ws " "
    Variable "x1"
    Ws " "
    NotEqual "!="
    Ws " "
    Constant "0"
    Ws " "
    Do "DO"
    Ws "\n\t"
    Variable "x1"
    Ws " "
    Assign ":="
    Ws " "
    Variable "x1"
    Ws " "
    Minus "-"
    Ws " "
    Constant "1"
    Ws "\n"
    End "END"
    Eof ""
    "###);
}

#[test]
fn stops_at_first_error() {
    insta::assert_snapshot!(scan("x1 := x1 !+ 1"), @r###"
    Variable "x1"
    Ws " "
    Assign ":="
    Ws " "
    Variable "x1"
    Ws " "
    error: expected `!=`, found `!+`
    "###);
}
