//! Centralised error hierarchy for the **Scrawl front end**.
//!
//! The token source, the cursor and every grammar production convert their
//! failure modes into one of the variants defined here.  Parsing is
//! fail-fast: the first error aborts the whole `parse()` call and no partial
//! tree is returned.
//!
//! The module **does not** print diagnostics itself

use thiserror::Error;

use log::debug;

/// Canonical error type used throughout the crate.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// An expected token or construct was missing.
    #[error("Syntax error: {message} (found {found})")]
    Syntax {
        /// What the grammar expected at this point.
        message: String,

        /// Lexeme of the token actually found.
        found: String,
    },

    /// A statement production yielded no node.
    #[error("Incomplete/unparsable statement at {found}")]
    IncompleteStatement { found: String },

    /// A token in operator position maps to no known operator.
    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// A literal token matched its category but not its format.
    #[error("Literal format error: {literal} (expected {expected})")]
    LiteralFormat { literal: String, expected: String },

    /// Tokens remain after the root scope.
    #[error("Unexpected token at end of input: {found}")]
    UnexpectedTrailingInput { found: String },

    /// Failure reported by the token source.
    #[error("[line {line}] Error: {message}")]
    Lex { message: String, line: usize },

    /// UTF‑8 decoding failure when ingesting raw bytes.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ParseError {
    /// Helper constructor for missing tokens / constructs.
    pub fn syntax<M: Into<String>, F: Into<String>>(msg: M, found: F) -> Self {
        let message: String = msg.into();
        let found: String = found.into();

        debug!("Creating Syntax error: msg={}, found={}", message, found);

        ParseError::Syntax { message, found }
    }

    pub fn incomplete<F: Into<String>>(found: F) -> Self {
        let found: String = found.into();

        debug!("Creating IncompleteStatement error: found={}", found);

        ParseError::IncompleteStatement { found }
    }

    pub fn unsupported<S: Into<String>>(operator: S) -> Self {
        let operator: String = operator.into();

        debug!("Creating UnsupportedOperator error: op={}", operator);

        ParseError::UnsupportedOperator { operator }
    }

    pub fn literal_format<L: Into<String>, E: Into<String>>(literal: L, expected: E) -> Self {
        let literal: String = literal.into();
        let expected: String = expected.into();

        debug!(
            "Creating LiteralFormat error: literal={}, expected={}",
            literal, expected
        );

        ParseError::LiteralFormat { literal, expected }
    }

    pub fn trailing<F: Into<String>>(found: F) -> Self {
        let found: String = found.into();

        debug!("Creating UnexpectedTrailingInput error: found={}", found);

        ParseError::UnexpectedTrailingInput { found }
    }

    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        ParseError::Lex { message, line }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, ParseError>;
