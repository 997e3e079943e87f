//! Dynamic value representation for CDCN data.
//!
//! This module provides the [`Value`] enum which represents anything a CDCN
//! document can hold, and the [`Primitive`] leaves it is built from.
//!
//! ## Core Types
//!
//! - [`Primitive`]: nil, boolean, signed/unsigned integer, float, complex,
//!   rune or string
//! - [`Value`]: a primitive or a [`Collection`]
//! - [`Association`]: a primitive key paired with a value
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use cdcn::{Collection, Primitive, Value};
//!
//! let nil = Value::from(Primitive::Nil);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let array = Value::from(Collection::Array(vec![number.clone(), text.clone()]));
//!
//! assert!(nil.is_nil());
//! assert!(array.is_collection());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use cdcn::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ## Equality of floats
//!
//! Primitives are used as map keys, so equality, hashing and ordering are
//! total: floats and complex parts compare by bit pattern. `NaN` equals
//! itself and `0.0` differs from `-0.0`.

use crate::{Collection, Context};
use num_complex::Complex64;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A leaf value with no children.
///
/// # Examples
///
/// ```rust
/// use cdcn::Primitive;
///
/// assert_eq!(Primitive::Uint(255).to_string(), "0xff");
/// assert_eq!(Primitive::Float(2.0).to_string(), "2.0");
/// assert_eq!(Primitive::Rune('\n').to_string(), r"'\n'");
/// ```
#[derive(Clone, Debug, Default)]
pub enum Primitive {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex64),
    Rune(char),
    String(String),
}

impl Primitive {
    const fn rank(&self) -> u8 {
        match self {
            Primitive::Nil => 0,
            Primitive::Bool(_) => 1,
            Primitive::Int(_) => 2,
            Primitive::Uint(_) => 3,
            Primitive::Float(_) => 4,
            Primitive::Complex(_) => 5,
            Primitive::Rune(_) => 6,
            Primitive::String(_) => 7,
        }
    }

    /// Name of the primitive type, as used in conversion errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Primitive::Nil => "nil",
            Primitive::Bool(_) => "boolean",
            Primitive::Int(_) => "integer",
            Primitive::Uint(_) => "unsigned integer",
            Primitive::Float(_) => "float",
            Primitive::Complex(_) => "complex",
            Primitive::Rune(_) => "rune",
            Primitive::String(_) => "string",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Primitive::Nil)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Primitive {}

impl Ord for Primitive {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Primitive::Nil, Primitive::Nil) => Ordering::Equal,
            (Primitive::Bool(a), Primitive::Bool(b)) => a.cmp(b),
            (Primitive::Int(a), Primitive::Int(b)) => a.cmp(b),
            (Primitive::Uint(a), Primitive::Uint(b)) => a.cmp(b),
            (Primitive::Float(a), Primitive::Float(b)) => a.total_cmp(b),
            (Primitive::Complex(a), Primitive::Complex(b)) => {
                a.re.total_cmp(&b.re).then_with(|| a.im.total_cmp(&b.im))
            }
            (Primitive::Rune(a), Primitive::Rune(b)) => a.cmp(b),
            (Primitive::String(a), Primitive::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Primitive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Primitive::Nil => {}
            Primitive::Bool(b) => b.hash(state),
            Primitive::Int(i) => i.hash(state),
            Primitive::Uint(u) => u.hash(state),
            Primitive::Float(f) => f.to_bits().hash(state),
            Primitive::Complex(c) => {
                c.re.to_bits().hash(state);
                c.im.to_bits().hash(state);
            }
            Primitive::Rune(c) => c.hash(state),
            Primitive::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        crate::format::write_primitive(&mut text, self);
        f.write_str(&text)
    }
}

impl Serialize for Primitive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Primitive::Nil => serializer.serialize_unit(),
            Primitive::Bool(b) => serializer.serialize_bool(*b),
            Primitive::Int(i) => serializer.serialize_i64(*i),
            Primitive::Uint(u) => serializer.serialize_u64(*u),
            Primitive::Float(f) => serializer.serialize_f64(*f),
            Primitive::Complex(c) => {
                use serde::ser::SerializeTuple;
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(&c.re)?;
                tuple.serialize_element(&c.im)?;
                tuple.end()
            }
            Primitive::Rune(c) => serializer.serialize_char(*c),
            Primitive::String(s) => serializer.serialize_str(s),
        }
    }
}

/// A primitive key paired with a value inside an associative collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    pub key: Primitive,
    pub value: Value,
}

impl Association {
    pub fn new(key: impl Into<Primitive>, value: impl Into<Value>) -> Self {
        Association {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Any value a CDCN document can hold.
///
/// # Examples
///
/// ```rust
/// use cdcn::{parse_source, Context, Value};
///
/// let value = parse_source("[1: \"one\"](Map)\n").unwrap();
/// assert_eq!(value.context(), Some(Context::Map));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Primitive(Primitive),
    Collection(Collection),
}

impl Default for Value {
    fn default() -> Self {
        Value::Primitive(Primitive::Nil)
    }
}

impl Value {
    /// Returns `true` if the value is nil.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Primitive(Primitive::Nil))
    }

    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Value::Primitive(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Value::Collection(_))
    }

    #[inline]
    #[must_use]
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Value::Primitive(p) => Some(p),
            Value::Collection(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            Value::Primitive(_) => None,
        }
    }

    /// The context tag of a collection value.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<Context> {
        self.as_collection().map(Collection::context)
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(Primitive::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a signed integer, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::Value;
    ///
    /// assert_eq!(Value::from(-3).as_i64(), Some(-3));
    /// assert_eq!(Value::from(3u64).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Primitive(Primitive::Int(i)) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Primitive(Primitive::Uint(u)) => Some(*u),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Primitive(Primitive::Float(f)) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Primitive(Primitive::Complex(c)) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Primitive(Primitive::Rune(c)) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Primitive(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the canonical text of the value, without a trailing newline.
    ///
    /// Values nested deeper than the default limit are truncated to `...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = crate::Formatter::new(crate::FormatOptions::default());
        formatter.format(self).map_err(|_| fmt::Error)?;
        f.write_str(&formatter.into_inner())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Primitive(p) => p.serialize(serializer),
            Value::Collection(c) => c.serialize(serializer),
        }
    }
}

/// Names what a value holds, for conversion errors.
fn describe(value: &Value) -> String {
    match value {
        Value::Primitive(p) => p.type_name().to_string(),
        Value::Collection(c) => format!("{} collection", c.context()),
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::Int(i)) => Ok(i),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for u64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::Uint(u)) => Ok(u),
            _ => Err(crate::Error::custom(format!(
                "expected unsigned integer, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::Float(f)) => Ok(f),
            _ => Err(crate::Error::custom(format!(
                "expected float, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::Bool(b)) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected boolean, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for char {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::Rune(c)) => Ok(c),
            _ => Err(crate::Error::custom(format!(
                "expected rune, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Primitive(Primitive::String(s)) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                describe(&value)
            ))),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Collection(c) => Ok(c),
            _ => Err(crate::Error::custom(format!(
                "expected collection, found {}",
                describe(&value)
            ))),
        }
    }
}

// From implementations for creating primitives from Rust values
impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

impl From<i8> for Primitive {
    fn from(value: i8) -> Self {
        Primitive::Int(value as i64)
    }
}

impl From<i16> for Primitive {
    fn from(value: i16) -> Self {
        Primitive::Int(value as i64)
    }
}

impl From<i32> for Primitive {
    fn from(value: i32) -> Self {
        Primitive::Int(value as i64)
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Int(value)
    }
}

impl From<u8> for Primitive {
    fn from(value: u8) -> Self {
        Primitive::Uint(value as u64)
    }
}

impl From<u16> for Primitive {
    fn from(value: u16) -> Self {
        Primitive::Uint(value as u64)
    }
}

impl From<u32> for Primitive {
    fn from(value: u32) -> Self {
        Primitive::Uint(value as u64)
    }
}

impl From<u64> for Primitive {
    fn from(value: u64) -> Self {
        Primitive::Uint(value)
    }
}

impl From<f32> for Primitive {
    fn from(value: f32) -> Self {
        Primitive::Float(value as f64)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Float(value)
    }
}

impl From<Complex64> for Primitive {
    fn from(value: Complex64) -> Self {
        Primitive::Complex(value)
    }
}

impl From<char> for Primitive {
    fn from(value: char) -> Self {
        Primitive::Rune(value)
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::String(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::String(value.to_string())
    }
}

macro_rules! value_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Primitive(Primitive::from(value))
                }
            }
        )*
    };
}

value_from_primitive!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, Complex64, char, String, &str);

impl From<Primitive> for Value {
    fn from(value: Primitive) -> Self {
        Value::Primitive(value)
    }
}

impl From<Collection> for Value {
    fn from(value: Collection) -> Self {
        Value::Collection(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        let value = Value::from(42);
        let result: i64 = TryFrom::try_from(value).unwrap();
        assert_eq!(result, 42);

        let err = i64::try_from(Value::from("test")).unwrap_err();
        assert_eq!(err.to_string(), "Error: expected integer, found string");
    }

    #[test]
    fn test_tryfrom_f64() {
        let value = Value::from(3.5);
        let result: f64 = TryFrom::try_from(value).unwrap();
        assert_eq!(result, 3.5);

        assert!(f64::try_from(Value::from(42)).is_err());
    }

    #[test]
    fn test_tryfrom_misc() {
        assert!(bool::try_from(Value::from(true)).unwrap());
        assert_eq!(char::try_from(Value::from('x')).unwrap(), 'x');
        assert_eq!(u64::try_from(Value::from(7u8)).unwrap(), 7);
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(Collection::try_from(Value::from(1)).is_err());

        let set = Value::from(Collection::set(vec![Value::from(1)]));
        let err = bool::try_from(set).unwrap_err();
        assert_eq!(err.to_string(), "Error: expected boolean, found Set collection");
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Primitive(Primitive::Bool(true)));
        assert_eq!(Value::from(42i32), Value::Primitive(Primitive::Int(42)));
        assert_eq!(Value::from(42u32), Value::Primitive(Primitive::Uint(42)));
        assert_eq!(Value::from(3.5f64), Value::Primitive(Primitive::Float(3.5)));
        assert_eq!(
            Value::from("test"),
            Value::Primitive(Primitive::String("test".to_string()))
        );
        assert_eq!(Value::default(), Value::Primitive(Primitive::Nil));
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(Primitive::Float(f64::NAN), Primitive::Float(f64::NAN));
        assert_ne!(Primitive::Float(0.0), Primitive::Float(-0.0));

        let mut keys = HashSet::new();
        keys.insert(Primitive::Float(1.5));
        assert!(keys.contains(&Primitive::Float(1.5)));
        assert!(!keys.contains(&Primitive::Int(1)));
    }

    #[test]
    fn test_ordering_groups_by_type() {
        let mut keys = vec![
            Primitive::from("b"),
            Primitive::from(2),
            Primitive::Nil,
            Primitive::from("a"),
            Primitive::from(true),
            Primitive::from(1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Primitive::Nil,
                Primitive::from(true),
                Primitive::from(1),
                Primitive::from(2),
                Primitive::from("a"),
                Primitive::from("b"),
            ]
        );
    }

    #[test]
    fn test_accessors() {
        let value = Value::from(Complex64::new(1.0, -2.0));
        assert_eq!(value.as_complex(), Some(Complex64::new(1.0, -2.0)));
        assert!(value.is_primitive());
        assert_eq!(value.context(), None);
        assert_eq!(value.as_str(), None);
    }
}
