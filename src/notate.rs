//! The introspection protocol used by the formatter.
//!
//! Anything implementing [`Notate`] can be rendered as CDCN text. The
//! formatter only asks one question, "what shape are you?", and gets back a
//! [`Shape`]: a primitive, a sized run of values, a sized run of associations,
//! or [`Shape::Opaque`] for things outside the model.
//!
//! Besides [`Value`], the protocol is implemented for Rust primitives,
//! `Option`, and the standard sequence and map types, so native data can be
//! written without converting it first:
//!
//! ```rust
//! use cdcn::format_collection;
//!
//! let text = format_collection(&vec![vec![1, 2], vec![3]]).unwrap();
//! assert_eq!(text, "[\n    [\n        1\n        2\n    ](array)\n    [3](array)\n](array)\n");
//! ```

use crate::{Collection, Context, Primitive, Value};
use indexmap::IndexMap;
use num_complex::Complex64;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;

/// Elements of a sequence shape.
pub type Items<'a> = Box<dyn ExactSizeIterator<Item = &'a dyn Notate> + 'a>;

/// Key/value pairs of an associative shape.
pub type Entries<'a> = Box<dyn ExactSizeIterator<Item = (&'a dyn Notate, &'a dyn Notate)> + 'a>;

/// What a value looks like to the formatter.
pub enum Shape<'a> {
    Primitive(Cow<'a, Primitive>),
    Values {
        context: Context,
        items: Items<'a>,
    },
    Associations {
        context: Context,
        entries: Entries<'a>,
    },
    /// Not representable; carries a type name for the error message.
    Opaque(&'static str),
}

/// Collection-introspection protocol.
pub trait Notate {
    fn shape(&self) -> Shape<'_>;
}

impl Notate for Primitive {
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Cow::Borrowed(self))
    }
}

impl Notate for Collection {
    fn shape(&self) -> Shape<'_> {
        let context = self.context();
        if let Some(values) = self.values() {
            return Shape::Values {
                context,
                items: Box::new(values.map(|v| v as &dyn Notate)),
            };
        }
        match self.associations() {
            Some(entries) => Shape::Associations {
                context,
                entries: Box::new(entries.map(|(k, v)| (k as &dyn Notate, v as &dyn Notate))),
            },
            None => Shape::Opaque("Collection"),
        }
    }
}

impl Notate for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Primitive(p) => p.shape(),
            Value::Collection(c) => c.shape(),
        }
    }
}

macro_rules! notate_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Notate for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Primitive(Cow::Owned(Primitive::from(self.clone())))
                }
            }
        )*
    };
}

notate_primitive!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, String, Complex64);

impl Notate for isize {
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Cow::Owned(Primitive::Int(*self as i64)))
    }
}

impl Notate for usize {
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Cow::Owned(Primitive::Uint(*self as u64)))
    }
}

impl Notate for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Cow::Owned(Primitive::String(self.to_string())))
    }
}

impl<T: Notate> Notate for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Primitive(Cow::Owned(Primitive::Nil)),
        }
    }
}

impl<T: Notate + ?Sized> Notate for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Notate + ?Sized> Notate for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Notate> Notate for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Values {
            context: Context::UntypedArray,
            items: Box::new(self.iter().map(|v| v as &dyn Notate)),
        }
    }
}

impl<T: Notate> Notate for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<T: Notate> Notate for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Values {
            context: Context::UntypedArray,
            items: Box::new(self.iter().map(|v| v as &dyn Notate)),
        }
    }
}

impl<K: Notate, V: Notate, S: BuildHasher> Notate for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Associations {
            context: Context::UntypedMap,
            entries: Box::new(
                self.iter()
                    .map(|(k, v)| (k as &dyn Notate, v as &dyn Notate)),
            ),
        }
    }
}

impl<K: Notate, V: Notate> Notate for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Associations {
            context: Context::UntypedMap,
            entries: Box::new(
                self.iter()
                    .map(|(k, v)| (k as &dyn Notate, v as &dyn Notate)),
            ),
        }
    }
}

impl<K: Notate, V: Notate, S: BuildHasher> Notate for IndexMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Associations {
            context: Context::UntypedMap,
            entries: Box::new(
                self.iter()
                    .map(|(k, v)| (k as &dyn Notate, v as &dyn Notate)),
            ),
        }
    }
}
