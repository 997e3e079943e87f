//! Error types for CDCN parsing and formatting.
//!
//! This module provides error reporting with enough context to locate and fix
//! malformed input without looking at the implementation.
//!
//! ## Error Categories
//!
//! - **Lexical Errors**: no token pattern matches at the current position
//! - **Syntax Errors**: an expected token or rule is absent
//! - **Unknown Context**: a well-formed collection names a tag that the
//!   registry cannot build
//! - **Unsupported Values**: the formatter was handed something outside the
//!   value model
//! - **I/O Errors**: reader/writer failures in the convenience wrappers
//!
//! ## Diagnostic Context
//!
//! Every parse error carries:
//! - Line and column numbers (1-based)
//! - The failing source line, and the one before it, with a caret under the
//!   offending column
//! - The grammar rules that were being attempted, with their productions
//!
//! ## Examples
//!
//! ```rust
//! use cdcn::{parse_source, Error};
//!
//! let err = parse_source("[bad](array)\n").unwrap_err();
//! assert!(matches!(err, Error::Lexical { line: 1, col: 2, .. }));
//! assert!(err.to_string().contains('^'));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while parsing or formatting CDCN.
///
/// None of them is recoverable within a single call.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// No token pattern matched
    #[error("Lexical error at line {line}, column {col}: {msg}\n{context}")]
    Lexical {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// Grammar violation with caret diagnostic and cited productions
    #[error("Syntax error at line {line}, column {col}: {msg}\n{context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// Context tag not registered for this kind of collection
    #[error("Unknown context {tag:?} for {aggregate} at line {line}, column {col}\n{context}")]
    UnknownContext {
        line: usize,
        col: usize,
        tag: String,
        aggregate: String,
        context: String,
    },

    /// Value outside the supported model, reported by the formatter
    #[error("Unsupported value: {0}")]
    Unsupported(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error for an unmatchable character.
    pub fn lexical(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Lexical {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates a syntax error with its rendered diagnostic context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::Error;
    ///
    /// let err = Error::syntax(3, 7, "unexpected Delimiter \"]\"", "");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an unknown-context error.
    pub fn unknown_context(
        line: usize,
        col: usize,
        tag: &str,
        aggregate: &str,
        context: &str,
    ) -> Self {
        Error::UnknownContext {
            line,
            col,
            tag: tag.to_string(),
            aggregate: aggregate.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an unsupported value error for things the formatter cannot render.
    pub fn unsupported(msg: &str) -> Self {
        Error::Unsupported(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The 1-based source line of a parse error, if it has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lexical { line, .. }
            | Error::Syntax { line, .. }
            | Error::UnknownContext { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The 1-based source column of a parse error, if it has one.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::Lexical { col, .. }
            | Error::Syntax { col, .. }
            | Error::UnknownContext { col, .. } => Some(*col),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
