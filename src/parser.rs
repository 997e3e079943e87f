//! CDCN parsing.
//!
//! This module provides the [`Parser`] that turns CDCN source text into a
//! [`Value`] tree.
//!
//! ## Overview
//!
//! The parser is a recursive descent over the rules in
//! [`GRAMMAR`](crate::GRAMMAR), pulling tokens from a [`Scanner`] one at a
//! time:
//!
//! - **Bounded backtracking**: the only ambiguity in the grammar is whether a
//!   leading primitive is a key or a value. The parser tries `associations`
//!   first and, if the primitive is not followed by `:`, puts the tokens back
//!   (at most three) and parses `values` instead.
//! - **Pluggable construction**: the elements of each literal are handed to a
//!   [`Registry`] together with the context tag.
//! - **Diagnostics**: every error shows where it happened and which rules were
//!   being attempted.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use cdcn::{parse_source, Primitive};
//!
//! let value = parse_source("[\n    \"x\": 1\n    \"y\": 2\n](Map)\n").unwrap();
//! let map = value.as_collection().unwrap();
//! assert_eq!(map.get(&Primitive::from("y")).and_then(|v| v.as_i64()), Some(2));
//! ```
//!
//! ## Diagnostics
//!
//! ```rust
//! use cdcn::parse_source;
//!
//! let err = parse_source("[\n    1\n    2,\n](Array)\n").unwrap_err();
//! let text = err.to_string();
//! assert!(text.contains("line 3, column 6"));
//! assert!(text.contains("3 |     2,"));
//! assert!(text.contains("values       = "));
//! ```

use crate::scanner::split_complex;
use crate::{
    Association, Error, Primitive, Registry, Result, Rule, Scanner, Token, TokenKind, Value,
};
use num_complex::Complex64;

/// Most tokens the parser ever holds back: end-of-line, key, `:`.
const LOOKAHEAD: usize = 3;

/// Deepest collection nesting the parser accepts.
///
/// Each level costs several stack frames, so anything deeper is reported as
/// a syntax error instead of exhausting the stack.
pub const MAX_NESTING: usize = 100;

/// The CDCN parser.
///
/// A parser reads exactly one document. Create one with [`Parser::new`] and
/// consume it with [`Parser::parse`].
pub struct Parser<'a> {
    source: &'a str,
    scanner: Scanner<'a>,
    registry: &'a Registry,
    putback: Vec<Token>,
    trail: Vec<Rule>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, registry: &'a Registry) -> Self {
        Parser {
            source,
            scanner: Scanner::new(source),
            registry,
            putback: Vec::with_capacity(LOOKAHEAD),
            trail: Vec::new(),
            depth: 0,
        }
    }

    /// Parses the whole source as `collection EOF`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lexical`] on unscannable input, [`Error::Syntax`] on
    /// a grammar violation, a bad literal or nesting deeper than
    /// [`MAX_NESTING`], [`Error::UnknownContext`] when the
    /// registry has no constructor for a tag, or whatever error a registered
    /// constructor reports.
    pub fn parse(mut self) -> Result<Value> {
        log::debug!("parsing {} bytes of source", self.source.len());

        let value = self.rule(Rule::Source, |p| {
            let value = p.collection()?;
            let token = p.next()?;
            if token.kind != TokenKind::EndOfFile {
                return Err(p.unexpected(&token, "end of input"));
            }
            Ok(value)
        })?;

        log::debug!(
            "parsed {} collection",
            value.context().map_or("untagged", |c| c.as_str())
        );
        Ok(value)
    }

    fn rule<T>(&mut self, rule: Rule, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.trail.push(rule);
        let result = f(self);
        self.trail.pop();
        result
    }

    fn next(&mut self) -> Result<Token> {
        let token = match self.putback.pop() {
            Some(token) => token,
            None => match self.scanner.next() {
                Some(token) => token,
                None => {
                    let (line, col) = self.scanner.location();
                    return Err(self.syntax_error(
                        line,
                        col,
                        "unexpected end of input, expected EndOfFile",
                    ));
                }
            },
        };

        if token.kind == TokenKind::Error {
            return Err(Error::lexical(
                token.line,
                token.column,
                &format!("no token matches {:?}", token.text),
                &self.diagnostic(token.line, token.column),
            ));
        }
        Ok(token)
    }

    fn put_back(&mut self, token: Token) {
        log::trace!("put back {}", token);
        debug_assert!(self.putback.len() < LOOKAHEAD, "put-back buffer overflow");
        self.putback.push(token);
    }

    fn expect_delimiter(&mut self, delimiter: char) -> Result<Token> {
        let token = self.next()?;
        if !token.is_delimiter(delimiter) {
            return Err(self.unexpected(&token, &format!("{:?}", delimiter.to_string())));
        }
        Ok(token)
    }

    fn expect_end_of_line(&mut self) -> Result<()> {
        let token = self.next()?;
        if token.kind != TokenKind::EndOfLine {
            return Err(self.unexpected(&token, "EndOfLine"));
        }
        Ok(())
    }

    /// Peeks for the `]` that ends the elements.
    fn at_close(&mut self) -> Result<bool> {
        let token = self.next()?;
        let close = token.is_delimiter(']');
        self.put_back(token);
        Ok(close)
    }

    fn collection(&mut self) -> Result<Value> {
        self.rule(Rule::Collection, |p| {
            let open = p.expect_delimiter('[')?;
            if p.depth == MAX_NESTING {
                return Err(p.syntax_error(
                    open.line,
                    open.column,
                    &format!("collections nested deeper than {} levels", MAX_NESTING),
                ));
            }

            p.depth += 1;
            let value = p.collection_body();
            p.depth -= 1;
            value
        })
    }

    /// Everything after the opening `[`.
    fn collection_body(&mut self) -> Result<Value> {
        let collection = match self.associations()? {
            Some(associations) => {
                let tag = self.suffix()?;
                match self.registry.build_associations(&tag.text, associations) {
                    Some(built) => built?,
                    None => return Err(self.unknown_context(&tag, "associations")),
                }
            }
            None => {
                let values = self.values()?;
                let tag = self.suffix()?;
                match self.registry.build_values(&tag.text, values) {
                    Some(built) => built?,
                    None => return Err(self.unknown_context(&tag, "values")),
                }
            }
        };

        Ok(Value::Collection(collection))
    }

    /// Reads `"]" "(" CONTEXT ")"` and returns the context token.
    fn suffix(&mut self) -> Result<Token> {
        self.expect_delimiter(']')?;
        self.expect_delimiter('(')?;
        let tag = self.next()?;
        if tag.kind != TokenKind::Context {
            return Err(self.unexpected(&tag, "Context"));
        }
        self.expect_delimiter(')')?;
        Ok(tag)
    }

    /// Attempts the `associations` rule.
    ///
    /// Returns `Ok(None)`, with every consumed token put back, when the
    /// elements do not start with `key ":"`.
    fn associations(&mut self) -> Result<Option<Vec<Association>>> {
        self.rule(Rule::Associations, |p| {
            let first = p.next()?;

            if first.is_delimiter(':') {
                return Ok(Some(Vec::new()));
            }

            if first.kind == TokenKind::EndOfLine {
                let key = p.next()?;
                if !key.kind.is_primitive() {
                    p.put_back(key);
                    p.put_back(first);
                    return Ok(None);
                }
                let colon = p.next()?;
                if !colon.is_delimiter(':') {
                    p.put_back(colon);
                    p.put_back(key);
                    p.put_back(first);
                    return Ok(None);
                }

                let mut associations = vec![p.association_after_key(key)?];
                p.expect_end_of_line()?;
                while !p.at_close()? {
                    associations.push(p.association()?);
                    p.expect_end_of_line()?;
                }
                return Ok(Some(associations));
            }

            if first.kind.is_primitive() {
                let colon = p.next()?;
                if !colon.is_delimiter(':') {
                    p.put_back(colon);
                    p.put_back(first);
                    return Ok(None);
                }

                let mut associations = vec![p.association_after_key(first)?];
                loop {
                    let token = p.next()?;
                    if token.is_delimiter(',') {
                        associations.push(p.association()?);
                    } else if token.is_delimiter(']') {
                        p.put_back(token);
                        return Ok(Some(associations));
                    } else {
                        return Err(p.unexpected(&token, "\",\" or \"]\""));
                    }
                }
            }

            p.put_back(first);
            Ok(None)
        })
    }

    fn association(&mut self) -> Result<Association> {
        self.rule(Rule::Association, |p| {
            let key = p.next()?;
            if !key.kind.is_primitive() {
                return p.rule(Rule::Key, |p| Err(p.unexpected(&key, "primitive")));
            }
            p.expect_delimiter(':')?;
            p.association_body(key)
        })
    }

    /// Finishes an association whose key and `:` were already consumed.
    fn association_after_key(&mut self, key: Token) -> Result<Association> {
        self.rule(Rule::Association, |p| p.association_body(key))
    }

    fn association_body(&mut self, key: Token) -> Result<Association> {
        let key = self.rule(Rule::Key, |p| p.primitive(key))?;
        let value = self.value()?;
        Ok(Association { key, value })
    }

    fn values(&mut self) -> Result<Vec<Value>> {
        self.rule(Rule::Values, |p| {
            let first = p.next()?;

            if first.is_delimiter(']') {
                p.put_back(first);
                return Ok(Vec::new());
            }

            let mut values = Vec::new();
            if first.kind == TokenKind::EndOfLine {
                loop {
                    values.push(p.value()?);
                    p.expect_end_of_line()?;
                    if p.at_close()? {
                        return Ok(values);
                    }
                }
            }

            p.put_back(first);
            values.push(p.value()?);
            loop {
                let token = p.next()?;
                if token.is_delimiter(',') {
                    values.push(p.value()?);
                } else if token.is_delimiter(']') {
                    p.put_back(token);
                    return Ok(values);
                } else {
                    return Err(p.unexpected(&token, "\",\" or \"]\""));
                }
            }
        })
    }

    fn value(&mut self) -> Result<Value> {
        self.rule(Rule::Value, |p| {
            let token = p.next()?;
            if token.is_delimiter('[') {
                p.put_back(token);
                return p.collection();
            }
            if !token.kind.is_primitive() {
                return Err(p.unexpected(&token, "primitive or collection"));
            }
            p.primitive(token).map(Value::Primitive)
        })
    }

    fn primitive(&mut self, token: Token) -> Result<Primitive> {
        self.rule(Rule::Primitive, |p| {
            let text = token.text.as_str();
            let primitive = match token.kind {
                TokenKind::Boolean => Primitive::Bool(text == "true"),
                TokenKind::Nil => Primitive::Nil,
                TokenKind::Integer => Primitive::Int(
                    text.parse()
                        .map_err(|_| p.invalid(&token, "integer out of range"))?,
                ),
                TokenKind::Hexadecimal => Primitive::Uint(
                    u64::from_str_radix(&text[2..], 16)
                        .map_err(|_| p.invalid(&token, "hexadecimal out of range"))?,
                ),
                TokenKind::Float => Primitive::Float(
                    parse_float(text).ok_or_else(|| p.invalid(&token, "invalid float"))?,
                ),
                TokenKind::Complex => Primitive::Complex(
                    parse_complex(text).ok_or_else(|| p.invalid(&token, "invalid complex"))?,
                ),
                TokenKind::Rune => {
                    let body = unescape(&text[1..text.len() - 1])
                        .ok_or_else(|| p.invalid(&token, "invalid escape"))?;
                    let mut chars = body.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Primitive::Rune(c),
                        _ => return Err(p.invalid(&token, "rune must hold one character")),
                    }
                }
                TokenKind::String => Primitive::String(
                    unescape(&text[1..text.len() - 1])
                        .ok_or_else(|| p.invalid(&token, "invalid escape"))?,
                ),
                _ => return Err(p.unexpected(&token, "primitive")),
            };
            Ok(primitive)
        })
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Error {
        self.syntax_error(
            token.line,
            token.column,
            &format!(
                "unexpected {} {:?}, expected {}",
                token.kind, token.text, expected
            ),
        )
    }

    fn invalid(&self, token: &Token, reason: &str) -> Error {
        self.syntax_error(
            token.line,
            token.column,
            &format!("{} in {} {:?}", reason, token.kind, token.text),
        )
    }

    fn unknown_context(&self, tag: &Token, aggregate: &str) -> Error {
        Error::unknown_context(
            tag.line,
            tag.column,
            &tag.text,
            aggregate,
            &self.diagnostic(tag.line, tag.column),
        )
    }

    fn syntax_error(&self, line: usize, col: usize, msg: &str) -> Error {
        Error::syntax(line, col, msg, &self.diagnostic(line, col))
    }

    /// Renders the failing line (and the one before it) with a caret under
    /// `col`, followed by the active rules, innermost first.
    fn diagnostic(&self, line: usize, col: usize) -> String {
        let lines: Vec<&str> = self
            .source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let width = line.to_string().len();
        let mut out = Vec::new();

        if line >= 2 {
            if let Some(previous) = lines.get(line - 2) {
                out.push(format!("{:>w$} | {}", line - 1, previous, w = width));
            }
        }
        let current = lines.get(line.saturating_sub(1)).copied().unwrap_or("");
        out.push(format!("{:>w$} | {}", line, current, w = width));
        out.push(format!(
            "{:>w$} | {}^",
            "",
            " ".repeat(col.saturating_sub(1)),
            w = width
        ));

        if !self.trail.is_empty() {
            out.push("while parsing:".to_string());
            for rule in self.trail.iter().rev() {
                out.push(format!("    {:<12} = {}", rule.name(), rule.production()));
            }
        }

        out.join("\n")
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Inf" | "+Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => text.parse().ok(),
    }
}

fn parse_complex(text: &str) -> Option<Complex64> {
    let (re, sign, im) = split_complex(text)?;
    let re = parse_float(re)?;
    let im = parse_float(im)?;
    Some(Complex64::new(re, if sign == '-' { -im } else { im }))
}

/// Resolves the escape sequences of a rune or string body.
///
/// Returns `None` for an escape the scanner should not have let through, or
/// a code point that is not a valid `char`.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\u{0007}',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{000B}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
