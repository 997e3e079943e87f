//! # cdcn
//!
//! A parser and formatter for CDCN, a line-oriented textual notation for
//! nested, typed collections.
//!
//! ## What is CDCN?
//!
//! CDCN writes every collection as a bracketed literal followed by a context
//! tag naming its concrete type. Values hold primitives or further
//! collections; associations map primitive keys to values:
//!
//! ```text
//! [
//!     "name": "Alice"
//!     "scores": [
//!         98
//!         87
//!     ](List)
//!     "admin": true
//! ](Map)
//! ```
//!
//! ## Key Features
//!
//! - **Typed**: the tag decides the concrete collection (`Array`, `Set`,
//!   `Queue`, `Catalog`, ...), so a round trip rebuilds the same kinds
//! - **Canonical**: formatting is deterministic and idempotent, so formatted
//!   text can be diffed and compared as a string
//! - **Pluggable**: collections are built by a [`Registry`] of constructor
//!   closures that callers can replace
//! - **Precise errors**: parse errors point at the offending column and list
//!   the grammar rules being attempted
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use cdcn::{format_collection, parse_source, Primitive};
//!
//! let source = "[\n    \"a\": 1\n    \"b\": [2.5](Set)\n](Map)\n";
//!
//! let value = parse_source(source).unwrap();
//! let map = value.as_collection().unwrap();
//! assert_eq!(map.get(&Primitive::from("a")).and_then(|v| v.as_i64()), Some(1));
//!
//! // Formatting the parsed value reproduces the canonical text
//! assert_eq!(format_collection(&value).unwrap(), source);
//! ```
//!
//! ### Formatting Native Data
//!
//! Anything implementing [`Notate`] can be formatted, including the standard
//! collections, which are written with the untyped `array` and `map` tags:
//!
//! ```rust
//! use cdcn::format_collection;
//!
//! let text = format_collection(&vec![Some(1), None]).unwrap();
//! assert_eq!(text, "[\n    1\n    <nil>\n](array)\n");
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Scanning**: one anchored regex attempt per pattern per token
//! - **Parsing**: O(n) with at most three tokens of backtracking
//! - **Formatting**: O(n) into a single pre-allocated buffer
//!
//! ## Format Reference
//!
//! The grammar, primitive syntax and context tags are documented in the
//! [`grammar`] module.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - parse, inspect and format a document
//! - **`custom_options.rs`** - depth limits and indentation
//! - **`custom_registry.rs`** - validating constructors
//!
//! Run any example with: `cargo run --example <name>`

pub mod collection;
pub mod error;
pub mod format;
pub mod grammar;
pub mod notate;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

pub use collection::{Collection, Context, Registry};
pub use error::{Error, Result};
pub use format::Formatter;
pub use grammar::{Rule, GRAMMAR};
pub use notate::{Entries, Items, Notate, Shape};
pub use options::FormatOptions;
pub use parser::{Parser, MAX_NESTING};
pub use scanner::{scan, Scanner};
pub use token::{Token, TokenKind};
pub use value::{Association, Primitive, Value};

use std::io;

/// Parse a CDCN document using the built-in collection constructors.
///
/// The source must hold exactly one collection followed by a single trailing
/// newline.
///
/// # Examples
///
/// ```rust
/// use cdcn::{parse_source, Context};
///
/// let value = parse_source("[1, 2, 2](Set)\n").unwrap();
/// assert_eq!(value.context(), Some(Context::Set));
/// assert_eq!(value.as_collection().unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the source is not valid CDCN. Error messages include
/// line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_source(source: &str) -> Result<Value> {
    parse_source_with(source, Registry::global())
}

/// Parse a CDCN document, building collections with `registry`.
///
/// # Examples
///
/// ```rust
/// use cdcn::{parse_source_with, Error, Registry};
///
/// let err = parse_source_with("[ ](Array)\n", &Registry::empty()).unwrap_err();
/// assert!(matches!(err, Error::UnknownContext { .. }));
/// ```
///
/// # Errors
///
/// Returns an error if the source is not valid CDCN, names a tag the registry
/// cannot build, or a constructor rejects its elements.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_source_with(source: &str, registry: &Registry) -> Result<Value> {
    Parser::new(source, registry).parse()
}

/// Format any `T: Notate` as a canonical CDCN document.
///
/// The text ends with exactly one newline, so it can be parsed back with
/// [`parse_source`].
///
/// # Examples
///
/// ```rust
/// use cdcn::format_collection;
///
/// assert_eq!(format_collection(&Vec::<i32>::new()).unwrap(), "[ ](array)\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Unsupported`] if the value is not a collection or holds
/// something outside the value model.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_collection<T>(value: &T) -> Result<String>
where
    T: ?Sized + Notate,
{
    format_collection_with_options(value, FormatOptions::default())
}

/// Format any `T: Notate` with custom options.
///
/// # Errors
///
/// Returns [`Error::Unsupported`] if the value is not a collection or holds
/// something outside the value model.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_collection_with_options<T>(value: &T, options: FormatOptions) -> Result<String>
where
    T: ?Sized + Notate,
{
    log::debug!(
        "formatting with max depth {}, indent {}",
        options.max_depth,
        options.indent
    );
    let mut formatter = Formatter::new(options);
    formatter.format_document(value)?;
    let mut text = formatter.into_inner();
    text.push('\n');
    log::debug!("formatted {} bytes", text.len());
    Ok(text)
}

/// Format any `T: Notate` to a writer as a canonical CDCN document.
///
/// # Examples
///
/// ```rust
/// use cdcn::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![true]).unwrap();
/// assert_eq!(buffer, b"[true](array)\n");
/// ```
///
/// # Errors
///
/// Returns an error if formatting fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Notate,
{
    let text = format_collection(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse a CDCN document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use cdcn::from_reader;
/// use std::io::Cursor;
///
/// let value = from_reader(Cursor::new(b"['x'](Queue)\n")).unwrap();
/// assert_eq!(value.as_collection().unwrap().len(), 1);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid UTF-8, or it is
/// not valid CDCN.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse_source(&string)
}

/// Parse a CDCN document from bytes.
///
/// # Examples
///
/// ```rust
/// use cdcn::from_slice;
///
/// let value = from_slice(b"[<nil>](List)\n").unwrap();
/// assert!(value.as_collection().unwrap().values().unwrap().all(|v| v.is_nil()));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid CDCN.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Value> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    parse_source(s)
}
