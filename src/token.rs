//! Lexical tokens produced by the [`Scanner`](crate::Scanner).
//!
//! A [`Token`] is an immutable record of what was matched and where. The parser
//! consumes each token exactly once, except when it puts a token back while
//! backtracking between the `associations` and `values` rules.

use std::fmt;

/// The closed set of token kinds.
///
/// [`TokenKind::Space`] exists for completeness of the model but is never
/// emitted: runs of spaces are skipped by the scanner. [`TokenKind::Error`] and
/// [`TokenKind::EndOfFile`] are terminal; exactly one of them ends a
/// well-formed stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Boolean,
    Complex,
    Context,
    Delimiter,
    EndOfLine,
    EndOfFile,
    Float,
    Hexadecimal,
    Integer,
    Nil,
    Rune,
    Space,
    String,
    Error,
}

impl TokenKind {
    /// Returns the display name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Boolean => "Boolean",
            TokenKind::Complex => "Complex",
            TokenKind::Context => "Context",
            TokenKind::Delimiter => "Delimiter",
            TokenKind::EndOfLine => "EndOfLine",
            TokenKind::EndOfFile => "EndOfFile",
            TokenKind::Float => "Float",
            TokenKind::Hexadecimal => "Hexadecimal",
            TokenKind::Integer => "Integer",
            TokenKind::Nil => "Nil",
            TokenKind::Rune => "Rune",
            TokenKind::Space => "Space",
            TokenKind::String => "String",
            TokenKind::Error => "Error",
        }
    }

    /// Returns `true` for the kinds that can stand in for a `primitive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::TokenKind;
    ///
    /// assert!(TokenKind::Rune.is_primitive());
    /// assert!(!TokenKind::Delimiter.is_primitive());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            TokenKind::Boolean
                | TokenKind::Complex
                | TokenKind::Float
                | TokenKind::Hexadecimal
                | TokenKind::Integer
                | TokenKind::Nil
                | TokenKind::Rune
                | TokenKind::String
        )
    }

    /// Returns `true` for the two kinds that end a token stream.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::EndOfFile | TokenKind::Error)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scanned token.
///
/// `line` and `column` are 1-based and point at the first character of
/// `text`. Columns count characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Returns `true` if this is the delimiter `d`.
    #[inline]
    #[must_use]
    pub fn is_delimiter(&self, d: char) -> bool {
        self.kind == TokenKind::Delimiter && self.text.len() == 1 && self.text.starts_with(d)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at line {}, column {}",
            self.kind, self.text, self.line, self.column
        )
    }
}
