//! Parse errors.

use source_span::Span;
use thiserror::Error;

/// A parse error with the span of the offending text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid indentation: {message}")]
    InvalidIndentation { message: String },

    #[error("invalid f-string: {message}")]
    InvalidFString { message: String },

    #[error("syntax error: {message}")]
    SyntaxError { message: String },
}
