//! Tokenizer for CDCN source text.
//!
//! The [`Scanner`] is a pull-based tokenizer: the parser asks for the next
//! token on demand and the scanner matches the remaining input against an
//! ordered table of patterns. The first pattern that matches a non-empty
//! prefix wins, so the order of the pattern table matters (floats and hexadecimal
//! literals must be tried before plain integers, complex literals before the
//! `(` delimiter).
//!
//! ## Stream shape
//!
//! A stream ends with exactly one terminal token:
//!
//! - [`TokenKind::EndOfFile`] when the single trailing end-of-line marker is
//!   reached exactly at end of input
//! - [`TokenKind::Error`] (one character wide) when nothing matches
//!
//! If the input simply runs out without its trailing newline, the stream ends
//! with no terminal token at all and the parser reports the missing
//! `EndOfFile`.
//!
//! ```rust
//! use cdcn::{scan, TokenKind};
//!
//! let kinds: Vec<_> = scan("[1](Array)\n").into_iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Delimiter,
//!         TokenKind::Integer,
//!         TokenKind::Delimiter,
//!         TokenKind::Delimiter,
//!         TokenKind::Context,
//!         TokenKind::Delimiter,
//!         TokenKind::EndOfFile,
//!     ]
//! );
//! ```

use crate::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Escape sequences accepted inside rune and string literals.
const ESCAPE: &str = r#"\\(?:[abfnrtv\\'"]|x[0-9a-fA-F]{2}|u[0-9a-fA-F]{4}|U[0-9a-fA-F]{8})"#;

/// Unsigned decimal magnitude, with optional fraction and exponent.
const MAGNITUDE: &str = r"(?:[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?|Inf|NaN)";

static PATTERNS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    let table = [
        (TokenKind::Boolean, r"^(?:true|false)".to_string()),
        (
            TokenKind::Complex,
            format!(r"^\([+-]?{m}[+-]{m}i\)", m = MAGNITUDE),
        ),
        (
            TokenKind::Context,
            r"^(?:Array|List|Set|Stack|Queue|Map|Catalog|array|map)".to_string(),
        ),
        (TokenKind::Delimiter, r"^[\[\]():,]".to_string()),
        (TokenKind::EndOfLine, r"^\r?\n".to_string()),
        (
            TokenKind::Float,
            r"^(?:[+-]?(?:[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+|Inf)|NaN)"
                .to_string(),
        ),
        (TokenKind::Hexadecimal, r"^0x[0-9a-fA-F]+".to_string()),
        (TokenKind::Integer, r"^[+-]?[0-9]+".to_string()),
        (TokenKind::Nil, r"^<nil>".to_string()),
        (
            TokenKind::Rune,
            format!(r#"^'(?:[^'\\\r\n]|{e})'"#, e = ESCAPE),
        ),
        (
            TokenKind::String,
            format!(r#"^"(?:[^"\\\r\n]|{e})*""#, e = ESCAPE),
        ),
    ];

    table
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(&pattern).expect("valid token pattern")))
        .collect()
});

/// Splits a complex literal into its real part, sign and imaginary magnitude.
static COMPLEX_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\((?P<re>[+-]?{m})(?P<sign>[+-])(?P<im>{m})i\)$",
        m = MAGNITUDE
    ))
    .expect("valid complex pattern")
});

/// Returns `(real, sign, imaginary)` for a complex literal such as `(1.0-2.5i)`.
pub(crate) fn split_complex(text: &str) -> Option<(&str, char, &str)> {
    let caps = COMPLEX_PARTS.captures(text)?;
    let re = caps.name("re")?.as_str();
    let sign = caps.name("sign")?.as_str().chars().next()?;
    let im = caps.name("im")?.as_str();
    Some((re, sign, im))
}

/// Pull-based tokenizer over a source string.
///
/// Iterating yields tokens in strict source order. Spaces are consumed
/// silently and never produce a token.
pub struct Scanner<'a> {
    source: &'a str,
    cursor: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            cursor: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Current `(line, column)` of the cursor.
    pub fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Returns `true` once a terminal token was emitted or input ran out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn skip_spaces(&mut self) {
        let rest = &self.source[self.cursor..];
        let spaces = rest.len() - rest.trim_start_matches(' ').len();
        self.cursor += spaces;
        self.column += spaces;
    }

    fn advance(&mut self, text: &str) {
        self.cursor += text.len();
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        self.skip_spaces();
        let rest = &self.source[self.cursor..];
        if rest.is_empty() {
            self.finished = true;
            return None;
        }

        let (line, column) = self.location();
        for (kind, pattern) in PATTERNS.iter() {
            let Some(found) = pattern.find(rest) else {
                continue;
            };
            if found.is_empty() {
                continue;
            }

            let text = found.as_str();
            let mut kind = *kind;
            if kind == TokenKind::EndOfLine && text.len() == rest.len() {
                kind = TokenKind::EndOfFile;
                self.finished = true;
            }
            self.advance(text);
            return Some(Token::new(kind, text, line, column));
        }

        self.finished = true;
        let bad = rest.chars().next().map(String::from).unwrap_or_default();
        Some(Token::new(TokenKind::Error, bad, line, column))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if let Some(token) = &token {
            log::trace!("scanned {}", token);
        }
        token
    }
}

/// Tokenizes `source` completely.
///
/// The returned vector ends with an `EndOfFile` or `Error` token, unless the
/// input ran out before its trailing newline.
#[must_use]
pub fn scan(source: &str) -> Vec<Token> {
    Scanner::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        scan(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_patterns_compile() {
        assert_eq!(PATTERNS.len(), 11);
        assert!(COMPLEX_PARTS.is_match("(1.0+2.0i)"));
    }

    #[test]
    fn test_primitive_literals() {
        let cases = [
            ("true", TokenKind::Boolean),
            ("false", TokenKind::Boolean),
            ("(1.5-2.0i)", TokenKind::Complex),
            ("(-1.0+Infi)", TokenKind::Complex),
            ("2.0", TokenKind::Float),
            ("-3.25E-7", TokenKind::Float),
            ("1E21", TokenKind::Float),
            ("+Inf", TokenKind::Float),
            ("NaN", TokenKind::Float),
            ("0x1f", TokenKind::Hexadecimal),
            ("42", TokenKind::Integer),
            ("-7", TokenKind::Integer),
            ("<nil>", TokenKind::Nil),
            ("'a'", TokenKind::Rune),
            (r"'\n'", TokenKind::Rune),
            (r"'\''", TokenKind::Rune),
            (r#""hello \"world\"""#, TokenKind::String),
            (r#""é""#, TokenKind::String),
        ];

        for (source, expected) in cases {
            let tokens = scan(source);
            assert_eq!(tokens.len(), 1, "{:?} scanned as {:?}", source, tokens);
            assert_eq!(tokens[0].kind, expected, "{:?}", source);
            assert_eq!(tokens[0].text, source);
        }
    }

    #[test]
    fn test_float_and_hex_win_over_integer() {
        assert_eq!(texts("12.5"), vec!["12.5"]);
        assert_eq!(kinds("0x10"), vec![TokenKind::Hexadecimal]);
        assert_eq!(kinds("10"), vec![TokenKind::Integer]);
    }

    #[test]
    fn test_spaces_are_skipped() {
        assert_eq!(texts("[   1 ,  2 ]"), vec!["[", "1", ",", "2", "]"]);
        assert!(!kinds("[ ]").contains(&TokenKind::Space));
    }

    #[test]
    fn test_trailing_newline_is_end_of_file() {
        let tokens = scan("[\n1\n](Array)\n");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::EndOfFile);
        assert_eq!((last.line, last.column), (3, 9));

        let eol = tokens.iter().filter(|t| t.kind == TokenKind::EndOfLine).count();
        assert_eq!(eol, 2);
    }

    #[test]
    fn test_missing_terminator_has_no_terminal_token() {
        let tokens = scan("[1](Array)");
        assert!(tokens.iter().all(|t| !t.kind.is_terminal()));
    }

    #[test]
    fn test_error_token_stops_scanning() {
        let tokens = scan("[bad](array)\n");
        assert_eq!(tokens.len(), 2);
        let error = &tokens[1];
        assert_eq!(error.kind, TokenKind::Error);
        assert_eq!(error.text, "b");
        assert_eq!((error.line, error.column), (1, 2));

        let mut scanner = Scanner::new("[bad](array)\n");
        assert_eq!(scanner.next().map(|t| t.kind), Some(TokenKind::Delimiter));
        assert!(!scanner.is_finished());
        assert_eq!(scanner.next().map(|t| t.kind), Some(TokenKind::Error));
        assert!(scanner.is_finished());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_invalid_escape_is_lexical_error() {
        let tokens = scan(r#""\q""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].text, "\"");
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = scan("[\"é\", 'ü'](Array)\n");
        let comma = &tokens[2];
        assert!(comma.is_delimiter(','));
        assert_eq!(comma.column, 5);
        assert_eq!(tokens[3].column, 7);
    }

    #[test]
    fn test_split_complex() {
        assert_eq!(split_complex("(1.0+2.0i)"), Some(("1.0", '+', "2.0")));
        assert_eq!(split_complex("(-1E-5-3.5i)"), Some(("-1E-5", '-', "3.5")));
        assert_eq!(split_complex("(NaN+Infi)"), Some(("NaN", '+', "Inf")));
        assert_eq!(split_complex("1.0+2.0i"), None);
    }
}
