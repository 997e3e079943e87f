//! Canonical CDCN formatting.
//!
//! This module provides the [`Formatter`] that renders any [`Notate`] value
//! as CDCN text.
//!
//! ## Overview
//!
//! The layout rules are fixed:
//!
//! - **Empty collections**: `[ ](TAG)` for values, `[:](TAG)` for associations
//! - **One element**: written inline, e.g. `[1](Array)`
//! - **Two or more**: one element per line, indented per nesting level, with
//!   the closing bracket on its own line
//! - **Depth limit**: a collection that would open past `max_depth` is written
//!   as `...`
//!
//! The depth limit is what keeps very deep (or self-referential) structures
//! bounded; deep but finite data past the limit is truncated the same way.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use cdcn::{format_collection, parse_source};
//!
//! let value = parse_source("[1, 2](Set)\n").unwrap();
//! assert_eq!(format_collection(&value).unwrap(), "[\n    1\n    2\n](Set)\n");
//! ```
//!
//! ## Direct Formatter Usage
//!
//! ```rust
//! use cdcn::{Formatter, FormatOptions};
//!
//! let mut formatter = Formatter::new(FormatOptions::new());
//! formatter.format(&vec!['a']).unwrap();
//! assert_eq!(formatter.into_inner(), "[\'a\'](array)");
//! ```

use crate::notate::{Entries, Items, Shape};
use crate::{Context, Error, FormatOptions, Notate, Primitive, Result};

/// The CDCN formatter.
///
/// Holds only call-local state (output buffer and current depth), so separate
/// formatters can run concurrently on different values.
pub struct Formatter {
    output: String,
    options: FormatOptions,
    depth: usize,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Formatter {
            output: String::with_capacity(256),
            options,
            depth: 0,
        }
    }

    /// Appends the text of `value` to the output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if `value` (or anything inside it) has
    /// an opaque shape, or if an association key is not a primitive.
    pub fn format<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Notate,
    {
        self.write_shape(value.shape())
    }

    /// Appends `value` as a whole document body, which must be a collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if `value` is a primitive or opaque, or
    /// for anything [`Formatter::format`] rejects.
    pub fn format_document<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Notate,
    {
        match value.shape() {
            Shape::Primitive(p) => Err(Error::unsupported(&format!(
                "a document must be a collection, found {}",
                p.type_name()
            ))),
            shape => self.write_shape(shape),
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_shape(&mut self, shape: Shape<'_>) -> Result<()> {
        match shape {
            Shape::Primitive(p) => {
                write_primitive(&mut self.output, &p);
                Ok(())
            }
            Shape::Values { context, items } => self.write_values(context, items),
            Shape::Associations { context, entries } => {
                self.write_associations(context, entries)
            }
            Shape::Opaque(name) => Err(Error::unsupported(&format!(
                "{} is neither a primitive nor a collection",
                name
            ))),
        }
    }

    /// Opens a collection level; returns `false` when the depth limit is hit.
    fn open(&mut self) -> bool {
        if self.depth >= self.options.max_depth {
            log::warn!(
                "collection nested past depth {}, truncated",
                self.options.max_depth
            );
            self.output.push_str("...");
            return false;
        }
        self.depth += 1;
        self.output.push('[');
        true
    }

    fn close(&mut self, context: Context) {
        self.depth -= 1;
        self.output.push(']');
        self.output.push('(');
        self.output.push_str(context.as_str());
        self.output.push(')');
    }

    fn write_indent(&mut self, level: usize) {
        self.output.push('\n');
        for _ in 0..level * self.options.indent {
            self.output.push(' ');
        }
    }

    fn write_values(&mut self, context: Context, items: Items<'_>) -> Result<()> {
        if !self.open() {
            return Ok(());
        }

        match items.len() {
            0 => self.output.push(' '),
            1 => {
                for item in items {
                    self.write_shape(item.shape())?;
                }
            }
            _ => {
                for item in items {
                    self.write_indent(self.depth);
                    self.write_shape(item.shape())?;
                }
                self.write_indent(self.depth - 1);
            }
        }

        self.close(context);
        Ok(())
    }

    fn write_associations(&mut self, context: Context, entries: Entries<'_>) -> Result<()> {
        if !self.open() {
            return Ok(());
        }

        match entries.len() {
            0 => self.output.push(':'),
            1 => {
                for (key, value) in entries {
                    self.write_association(key, value)?;
                }
            }
            _ => {
                for (key, value) in entries {
                    self.write_indent(self.depth);
                    self.write_association(key, value)?;
                }
                self.write_indent(self.depth - 1);
            }
        }

        self.close(context);
        Ok(())
    }

    fn write_association(&mut self, key: &dyn Notate, value: &dyn Notate) -> Result<()> {
        match key.shape() {
            Shape::Primitive(p) => write_primitive(&mut self.output, &p),
            _ => {
                return Err(Error::unsupported(
                    "association keys must be primitives",
                ))
            }
        }
        self.output.push_str(": ");
        self.write_shape(value.shape())
    }
}

pub(crate) fn write_primitive(output: &mut String, primitive: &Primitive) {
    match primitive {
        Primitive::Nil => output.push_str("<nil>"),
        Primitive::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Primitive::Int(i) => output.push_str(&i.to_string()),
        Primitive::Uint(u) => output.push_str(&format!("0x{:x}", u)),
        Primitive::Float(f) => write_float(output, *f),
        Primitive::Complex(c) => {
            output.push('(');
            write_float(output, c.re);
            output.push(if c.im.is_sign_negative() && !c.im.is_nan() {
                '-'
            } else {
                '+'
            });
            write_magnitude(output, c.im.abs());
            output.push_str("i)");
        }
        Primitive::Rune(c) => {
            output.push('\'');
            write_escaped(output, *c, '\'');
            output.push('\'');
        }
        Primitive::String(s) => {
            output.push('"');
            for ch in s.chars() {
                write_escaped(output, ch, '"');
            }
            output.push('"');
        }
    }
}

fn write_float(output: &mut String, f: f64) {
    if f.is_nan() {
        output.push_str("NaN");
        return;
    }
    if f.is_sign_negative() {
        output.push('-');
    } else if f.is_infinite() {
        output.push('+');
    }
    write_magnitude(output, f.abs());
}

/// Writes a non-negative float: plain decimal in `[1e-4, 1e21)`, `E`
/// notation outside it, with `.0` added to bare integers.
fn write_magnitude(output: &mut String, f: f64) {
    if f.is_nan() {
        output.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        output.push_str("Inf");
        return;
    }

    let text = if f != 0.0 && !(1e-4..1e21).contains(&f) {
        format!("{:E}", f)
    } else {
        f.to_string()
    };
    output.push_str(&text);
    if !text.contains('.') && !text.contains('E') {
        output.push_str(".0");
    }
}

fn write_escaped(output: &mut String, ch: char, quote: char) {
    match ch {
        '\u{0007}' => output.push_str("\\a"),
        '\u{0008}' => output.push_str("\\b"),
        '\u{000C}' => output.push_str("\\f"),
        '\n' => output.push_str("\\n"),
        '\r' => output.push_str("\\r"),
        '\t' => output.push_str("\\t"),
        '\u{000B}' => output.push_str("\\v"),
        '\\' => output.push_str("\\\\"),
        c if c == quote => {
            output.push('\\');
            output.push(c);
        }
        c if c.is_ascii_control() => output.push_str(&format!("\\x{:02x}", c as u32)),
        c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
        c => output.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Association, Collection, Value};
    use num_complex::Complex64;

    fn render(primitive: Primitive) -> String {
        let mut output = String::new();
        write_primitive(&mut output, &primitive);
        output
    }

    fn format(value: &Value) -> String {
        let mut formatter = Formatter::new(FormatOptions::default());
        formatter.format(value).unwrap();
        formatter.into_inner()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(Primitive::Nil), "<nil>");
        assert_eq!(render(Primitive::Bool(false)), "false");
        assert_eq!(render(Primitive::Int(-120)), "-120");
        assert_eq!(render(Primitive::Int(0)), "0");
        assert_eq!(render(Primitive::Uint(0xBEEF)), "0xbeef");
    }

    #[test]
    fn test_floats() {
        assert_eq!(render(Primitive::Float(2.0)), "2.0");
        assert_eq!(render(Primitive::Float(-0.5)), "-0.5");
        assert_eq!(render(Primitive::Float(-0.0)), "-0.0");
        assert_eq!(render(Primitive::Float(1e21)), "1E21");
        assert_eq!(render(Primitive::Float(1.5e-7)), "1.5E-7");
        assert_eq!(render(Primitive::Float(123456.75)), "123456.75");
        assert_eq!(render(Primitive::Float(f64::INFINITY)), "+Inf");
        assert_eq!(render(Primitive::Float(f64::NEG_INFINITY)), "-Inf");
        assert_eq!(render(Primitive::Float(f64::NAN)), "NaN");
    }

    #[test]
    fn test_complex() {
        assert_eq!(
            render(Primitive::Complex(Complex64::new(1.0, 2.0))),
            "(1.0+2.0i)"
        );
        assert_eq!(
            render(Primitive::Complex(Complex64::new(-1.5, -0.25))),
            "(-1.5-0.25i)"
        );
        assert_eq!(
            render(Primitive::Complex(Complex64::new(0.0, f64::INFINITY))),
            "(0.0+Infi)"
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(render(Primitive::Rune('\'')), r"'\''");
        assert_eq!(render(Primitive::Rune('"')), "'\"'");
        assert_eq!(render(Primitive::Rune('\u{0}')), r"'\x00'");
        assert_eq!(render(Primitive::Rune('\u{85}')), r"'\u0085'");
        assert_eq!(
            render(Primitive::from("tab\there \"q\" \\ 'ok'")),
            r#""tab\there \"q\" \\ 'ok'""#
        );
        assert_eq!(render(Primitive::from("日本")), "\"日本\"");
    }

    #[test]
    fn test_empty_markers() {
        let empty = Value::from(Collection::List(vec![]));
        assert_eq!(format(&empty), "[ ](List)");

        let empty = Value::from(Collection::from_associations(Context::Catalog, vec![]).unwrap());
        assert_eq!(format(&empty), "[:](Catalog)");
    }

    #[test]
    fn test_single_element_inline() {
        let map = Collection::from_associations(Context::Map, vec![Association::new(1, 2)]);
        assert_eq!(format(&Value::from(map.unwrap())), "[1: 2](Map)");
    }

    #[test]
    fn test_multi_line_layout() {
        let inner = Collection::Stack(vec![Value::from(true), Value::from(false)]);
        let outer = Collection::from_associations(
            Context::Map,
            vec![
                Association::new("a", inner),
                Association::new("b", Collection::Queue(vec![Value::from('x')].into())),
            ],
        )
        .unwrap();

        assert_eq!(
            format(&Value::from(outer)),
            "[\n    \"a\": [\n        true\n        false\n    ](Stack)\n    \"b\": ['x'](Queue)\n](Map)"
        );
    }

    #[test]
    fn test_depth_truncation() {
        let mut value = Value::from(1);
        for _ in 0..10 {
            value = Value::from(Collection::Array(vec![value]));
        }

        let text = format(&value);
        assert_eq!(text.matches("...").count(), 1);
        assert_eq!(text.matches('[').count(), 8);
        assert!(!text.contains('1'));
    }

    #[test]
    fn test_non_primitive_key_is_unsupported() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1], 2);

        let mut formatter = Formatter::new(FormatOptions::default());
        let err = formatter.format(&map).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_opaque_is_unsupported() {
        struct Handle;

        impl Notate for Handle {
            fn shape(&self) -> Shape<'_> {
                Shape::Opaque("Handle")
            }
        }

        let mut formatter = Formatter::new(FormatOptions::default());
        let err = formatter.format(&vec![Handle]).unwrap_err();
        assert!(err.to_string().contains("Handle"));
    }

    #[test]
    fn test_document_must_be_a_collection() {
        let mut formatter = Formatter::new(FormatOptions::default());
        let err = formatter.format_document(&5i32).unwrap_err();
        assert!(err.to_string().contains("found integer"));
        assert!(formatter.into_inner().is_empty());

        let mut formatter = Formatter::new(FormatOptions::default());
        formatter.format_document(&vec![5i32]).unwrap();
        assert_eq!(formatter.into_inner(), "[5](array)");
    }
}
