//! Error types, diagnostics, and result aliases for mexl.
//!
//! All parse-time failures are variants of [`MexlError`], rendered via `miette`
//! diagnostics. Evaluation itself never fails: indeterminate outcomes are the
//! `Unknown` value, not an error.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::token::SourceLocation;

/// Main error type for mexl expression parsing
#[derive(Error, Debug, Diagnostic)]
pub enum MexlError {
    #[error("unexpected character")]
    #[diagnostic(code(E0001), help("{help}"))]
    UnexpectedCharacter {
        #[source_code]
        src: String,
        #[label("unexpected: '{ch}'")]
        span: SourceSpan,
        ch: char,
        help: String,
    },

    #[error("unexpected token")]
    #[diagnostic(code(E0002), help("{help}"))]
    UnexpectedToken {
        #[source_code]
        src: String,
        #[label("unexpected: {found}")]
        span: SourceSpan,
        expected: String,
        found: String,
        help: String,
    },

    #[error("unterminated string")]
    #[diagnostic(code(E0003), help("add closing quote at end of string"))]
    UnterminatedString {
        #[source_code]
        src: String,
        #[label("string started here but never closed")]
        span: SourceSpan,
    },

    #[error("invalid escape sequence")]
    #[diagnostic(code(E0004), help("{help}"))]
    InvalidEscapeSequence {
        #[source_code]
        src: String,
        #[label("invalid escape: {sequence}")]
        span: SourceSpan,
        sequence: String,
        help: String,
    },

    #[error("expression nesting too deep")]
    #[diagnostic(code(E0005), help("{help}"))]
    NestingTooDeep {
        #[source_code]
        src: String,
        #[label("nesting too deep here")]
        span: SourceSpan,
        help: String,
    },
}

impl MexlError {
    /// Create an UnexpectedCharacter error
    pub fn unexpected_character(
        src: impl Into<String>,
        location: &SourceLocation,
        ch: char,
    ) -> Self {
        let help = match ch {
            '=' => "use '==' for equality comparison".to_string(),
            '&' => "use '&&' (or 'and') for logical conjunction".to_string(),
            '|' => "use '||' (or 'or') for logical disjunction".to_string(),
            ';' => "expressions are single-valued; remove the ';'".to_string(),
            _ => format!("'{}' is not valid expression syntax", ch),
        };
        MexlError::UnexpectedCharacter {
            src: src.into(),
            span: (location.offset, location.length).into(),
            ch,
            help,
        }
    }

    /// Create an UnexpectedToken error
    pub fn unexpected_token(
        src: impl Into<String>,
        location: &SourceLocation,
        expected: impl Into<String>,
        found: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        MexlError::UnexpectedToken {
            src: src.into(),
            span: (location.offset, location.length).into(),
            expected: expected.into(),
            found: found.into(),
            help: help.into(),
        }
    }

    /// Create an UnterminatedString error
    pub fn unterminated_string(src: impl Into<String>, location: &SourceLocation) -> Self {
        MexlError::UnterminatedString {
            src: src.into(),
            span: (location.offset, location.length).into(),
        }
    }

    /// Create an InvalidEscapeSequence error
    pub fn invalid_escape_sequence(
        src: impl Into<String>,
        location: &SourceLocation,
        sequence: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        MexlError::InvalidEscapeSequence {
            src: src.into(),
            span: (location.offset, location.length).into(),
            sequence: sequence.into(),
            help: help.into(),
        }
    }

    /// Create a NestingTooDeep error
    pub fn nesting_too_deep(
        src: impl Into<String>,
        location: &SourceLocation,
        max_depth: usize,
    ) -> Self {
        MexlError::NestingTooDeep {
            src: src.into(),
            span: (location.offset, location.length).into(),
            help: format!(
                "expression nesting exceeds maximum depth of {}; simplify the expression",
                max_depth
            ),
        }
    }

    /// Get a simple error message (without source context)
    pub fn message(&self) -> String {
        match self {
            MexlError::UnexpectedCharacter { ch, .. } => {
                format!("unexpected character: '{}'", ch)
            }
            MexlError::UnexpectedToken {
                expected, found, ..
            } => {
                format!("unexpected token: expected {}, found {}", expected, found)
            }
            MexlError::UnterminatedString { .. } => "unterminated string".to_string(),
            MexlError::InvalidEscapeSequence { sequence, .. } => {
                format!("invalid escape sequence: {}", sequence)
            }
            MexlError::NestingTooDeep { .. } => "expression nesting too deep".to_string(),
        }
    }
}

/// Result type for mexl operations
pub type MexlResult<T> = Result<T, MexlError>;
