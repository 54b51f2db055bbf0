//! Error handling for the Ago compiler
//!
//! These are the hard failures: a program that does not lex or parse never
//! reaches the semantic checker. Semantic problems are `Diagnostic` values
//! collected by the checker, not `Error`s.

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler error
#[derive(Error, Debug, Clone)]
#[allow(dead_code)]
pub enum Error {
    // ==================== Lexer Errors ====================

    #[error("Unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Invalid escape sequence '\\{ch}'")]
    InvalidEscape { ch: char, span: Span },

    // ==================== Parser Errors ====================

    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("Expected expression")]
    ExpectedExpr { span: Span },

    #[error("Expected identifier")]
    ExpectedIdent { span: Span },

    #[error("Empty program")]
    EmptyProgram,

    // ==================== Driver Errors ====================

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedChar { span, .. } => Some(*span),
            Self::UnterminatedString { span } => Some(*span),
            Self::InvalidEscape { span, .. } => Some(*span),
            Self::UnexpectedToken { span, .. } => Some(*span),
            Self::ExpectedExpr { span } => Some(*span),
            Self::ExpectedIdent { span } => Some(*span),
            Self::EmptyProgram | Self::Io(_) => None,
        }
    }
}
