//! Concrete collections and the context registry.
//!
//! The parser never builds a collection itself. After reading the elements of
//! a literal and its `(TAG)` suffix, it asks a [`Registry`] to turn them into
//! a [`Collection`]. The registry is a plain map from tag to constructor
//! closure, so callers can swap in their own constructors (for example to
//! validate contents) without touching the parser.
//!
//! ## Examples
//!
//! ```rust
//! use cdcn::{parse_source_with, Collection, Context, Error, Registry, Value};
//!
//! let mut registry = Registry::default();
//! registry.register_values(Context::Set, |values: Vec<Value>| {
//!     if values.iter().any(Value::is_collection) {
//!         return Err(Error::custom("sets hold primitives only"));
//!     }
//!     Ok(Collection::set(values))
//! });
//!
//! assert!(parse_source_with("[1](Set)\n", &registry).is_ok());
//! assert!(parse_source_with("[[1](Array)](Set)\n", &registry).is_err());
//! ```

use crate::{Association, Error, Primitive, Result, Value};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The context tag naming a concrete collection type.
///
/// # Examples
///
/// ```rust
/// use cdcn::Context;
///
/// assert_eq!("Catalog".parse::<Context>().unwrap(), Context::Catalog);
/// assert_eq!(Context::UntypedMap.as_str(), "map");
/// assert!("catalog".parse::<Context>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Context {
    Array,
    List,
    Set,
    Stack,
    Queue,
    Map,
    Catalog,
    /// `array`: a plain sequence with no named type.
    UntypedArray,
    /// `map`: a plain hash map with no named type.
    UntypedMap,
}

impl Context {
    pub const ALL: [Context; 9] = [
        Context::Array,
        Context::List,
        Context::Set,
        Context::Stack,
        Context::Queue,
        Context::Map,
        Context::Catalog,
        Context::UntypedArray,
        Context::UntypedMap,
    ];

    /// Returns the tag as written between parentheses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Context::Array => "Array",
            Context::List => "List",
            Context::Set => "Set",
            Context::Stack => "Stack",
            Context::Queue => "Queue",
            Context::Map => "Map",
            Context::Catalog => "Catalog",
            Context::UntypedArray => "array",
            Context::UntypedMap => "map",
        }
    }

    /// Returns `true` for contexts built from associations.
    #[inline]
    #[must_use]
    pub const fn is_associative(&self) -> bool {
        matches!(self, Context::Map | Context::Catalog | Context::UntypedMap)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Context::ALL
            .into_iter()
            .find(|context| context.as_str() == s)
            .ok_or_else(|| Error::custom(format!("unknown context {:?}", s)))
    }
}

/// A concrete collection built from a CDCN literal.
///
/// Sequence kinds keep their elements in the order written. `Set` drops
/// later duplicates, `Catalog` keeps keys sorted, and `Dictionary` (`map`)
/// iterates in hash order, which is why its canonical text is only stable up
/// to reordering.
#[derive(Clone, Debug, PartialEq)]
pub enum Collection {
    Array(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Bottom of the stack first.
    Stack(Vec<Value>),
    /// Front of the queue first.
    Queue(VecDeque<Value>),
    Sequence(Vec<Value>),
    Map(IndexMap<Primitive, Value>),
    Catalog(BTreeMap<Primitive, Value>),
    Dictionary(HashMap<Primitive, Value>),
}

impl Collection {
    /// Builds a set, keeping the first occurrence of each value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::{Collection, Value};
    ///
    /// let set = Collection::set(vec![Value::from(1), Value::from(2), Value::from(1)]);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[must_use]
    pub fn set(values: Vec<Value>) -> Self {
        let mut seen: HashSet<Primitive> = HashSet::with_capacity(values.len());
        let mut unique: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            // Primitives hash; only nested collections need a linear scan.
            let fresh = match &value {
                Value::Primitive(p) => seen.insert(p.clone()),
                Value::Collection(_) => !unique.contains(&value),
            };
            if fresh {
                unique.push(value);
            }
        }
        Collection::Set(unique)
    }

    /// Builds the sequence kind named by `context`.
    ///
    /// Returns `None` for associative contexts.
    #[must_use]
    pub fn from_values(context: Context, values: Vec<Value>) -> Option<Self> {
        let collection = match context {
            Context::Array => Collection::Array(values),
            Context::List => Collection::List(values),
            Context::Set => Collection::set(values),
            Context::Stack => Collection::Stack(values),
            Context::Queue => Collection::Queue(values.into()),
            Context::UntypedArray => Collection::Sequence(values),
            Context::Map | Context::Catalog | Context::UntypedMap => return None,
        };
        Some(collection)
    }

    /// Builds the associative kind named by `context`.
    ///
    /// Later associations replace earlier ones with an equal key. Returns
    /// `None` for sequence contexts.
    #[must_use]
    pub fn from_associations(context: Context, associations: Vec<Association>) -> Option<Self> {
        let pairs = associations.into_iter().map(|a| (a.key, a.value));
        let collection = match context {
            Context::Map => Collection::Map(pairs.collect()),
            Context::Catalog => Collection::Catalog(pairs.collect()),
            Context::UntypedMap => Collection::Dictionary(pairs.collect()),
            _ => return None,
        };
        Some(collection)
    }

    /// The context tag this collection is written with.
    #[must_use]
    pub const fn context(&self) -> Context {
        match self {
            Collection::Array(_) => Context::Array,
            Collection::List(_) => Context::List,
            Collection::Set(_) => Context::Set,
            Collection::Stack(_) => Context::Stack,
            Collection::Queue(_) => Context::Queue,
            Collection::Sequence(_) => Context::UntypedArray,
            Collection::Map(_) => Context::Map,
            Collection::Catalog(_) => Context::Catalog,
            Collection::Dictionary(_) => Context::UntypedMap,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Collection::Array(v)
            | Collection::List(v)
            | Collection::Set(v)
            | Collection::Stack(v)
            | Collection::Sequence(v) => v.len(),
            Collection::Queue(q) => q.len(),
            Collection::Map(m) => m.len(),
            Collection::Catalog(m) => m.len(),
            Collection::Dictionary(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the elements of a sequence kind; `None` for associative kinds.
    pub fn values(&self) -> Option<Box<dyn ExactSizeIterator<Item = &Value> + '_>> {
        match self {
            Collection::Array(v)
            | Collection::List(v)
            | Collection::Set(v)
            | Collection::Stack(v)
            | Collection::Sequence(v) => Some(Box::new(v.iter())),
            Collection::Queue(q) => Some(Box::new(q.iter())),
            _ => None,
        }
    }

    /// Iterates the entries of an associative kind; `None` for sequence kinds.
    #[allow(clippy::type_complexity)]
    pub fn associations(
        &self,
    ) -> Option<Box<dyn ExactSizeIterator<Item = (&Primitive, &Value)> + '_>> {
        match self {
            Collection::Map(m) => Some(Box::new(m.iter())),
            Collection::Catalog(m) => Some(Box::new(m.iter())),
            Collection::Dictionary(m) => Some(Box::new(m.iter())),
            _ => None,
        }
    }

    /// Looks up `key` in an associative collection.
    #[must_use]
    pub fn get(&self, key: &Primitive) -> Option<&Value> {
        match self {
            Collection::Map(m) => m.get(key),
            Collection::Catalog(m) => m.get(key),
            Collection::Dictionary(m) => m.get(key),
            _ => None,
        }
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(values) = self.values() {
            use serde::ser::SerializeSeq;
            let mut seq = serializer.serialize_seq(Some(values.len()))?;
            for element in values {
                seq.serialize_element(element)?;
            }
            return seq.end();
        }

        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.associations().into_iter().flatten() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Builds a collection from the values of a literal.
pub type ValuesConstructor = Arc<dyn Fn(Vec<Value>) -> Result<Collection> + Send + Sync>;

/// Builds a collection from the associations of a literal.
pub type AssociationsConstructor =
    Arc<dyn Fn(Vec<Association>) -> Result<Collection> + Send + Sync>;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::default);

/// Maps context tags to collection constructors.
///
/// Values and associations are registered separately: `[1, 2](Map)` fails
/// because `Map` has no values constructor, even though the tag itself is
/// known.
#[derive(Clone)]
pub struct Registry {
    values: HashMap<String, ValuesConstructor>,
    associations: HashMap<String, AssociationsConstructor>,
}

impl Registry {
    /// Creates a registry with no constructors at all.
    #[must_use]
    pub fn empty() -> Self {
        Registry {
            values: HashMap::new(),
            associations: HashMap::new(),
        }
    }

    /// The shared registry holding the built-in constructors.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Registers (or replaces) the values constructor for `context`.
    pub fn register_values<F>(&mut self, context: Context, constructor: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> Result<Collection> + Send + Sync + 'static,
    {
        self.values
            .insert(context.as_str().to_string(), Arc::new(constructor));
        self
    }

    /// Registers (or replaces) the associations constructor for `context`.
    pub fn register_associations<F>(&mut self, context: Context, constructor: F) -> &mut Self
    where
        F: Fn(Vec<Association>) -> Result<Collection> + Send + Sync + 'static,
    {
        self.associations
            .insert(context.as_str().to_string(), Arc::new(constructor));
        self
    }

    /// Builds a collection of values for `tag`, or `None` if nothing is registered.
    pub fn build_values(&self, tag: &str, values: Vec<Value>) -> Option<Result<Collection>> {
        self.values.get(tag).map(|constructor| constructor(values))
    }

    /// Builds a collection of associations for `tag`, or `None` if nothing is registered.
    pub fn build_associations(
        &self,
        tag: &str,
        associations: Vec<Association>,
    ) -> Option<Result<Collection>> {
        self.associations
            .get(tag)
            .map(|constructor| constructor(associations))
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        for context in Context::ALL {
            if context.is_associative() {
                registry.register_associations(context, move |associations| {
                    Collection::from_associations(context, associations)
                        .ok_or_else(|| Error::custom(format!("{} holds values", context)))
                });
            } else {
                registry.register_values(context, move |values| {
                    Collection::from_values(context, values)
                        .ok_or_else(|| Error::custom(format!("{} holds associations", context)))
                });
            }
        }
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values: Vec<_> = self.values.keys().collect();
        let mut associations: Vec<_> = self.associations.keys().collect();
        values.sort();
        associations.sort();
        f.debug_struct("Registry")
            .field("values", &values)
            .field("associations", &associations)
            .finish()
    }
}
