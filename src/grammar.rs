//! CDCN grammar and format reference.
//!
//! # Overview
//!
//! A CDCN document is a single collection literal followed by one trailing
//! newline. Every collection carries a context tag naming the concrete type to
//! build:
//!
//! ```text
//! [
//!     "alpha": 1
//!     "beta": [true](Set)
//! ](Map)
//! ```
//!
//! # Grammar
//!
//! ```text
//! source       = collection EOF
//! collection   = "[" (associations | values) "]" "(" CONTEXT ")"
//! associations = association ("," association)* | EOL (association EOL)+ | ":"
//! association  = key ":" value
//! key          = primitive
//! values       = value ("," value)* | EOL (value EOL)+ | " "
//! value        = primitive | collection
//! primitive    = BOOLEAN | COMPLEX | FLOAT | HEXADECIMAL | INTEGER | NIL | RUNE | STRING
//! ```
//!
//! Spaces between tokens are insignificant, so the empty-values marker `" "`
//! amounts to "nothing between the brackets": `[ ]` and `[]` read the same.
//!
//! # Primitives
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Boolean | `true` or `false` | `true` |
//! | Integer | Decimal digits, optional sign | `-42` |
//! | Unsigned | `0x` and hex digits | `0x2a` |
//! | Float | Decimal with `.` or exponent | `2.0`, `1.5E-7`, `+Inf`, `NaN` |
//! | Complex | `(` real, sign, imaginary, `i)` | `(1.0-2.0i)` |
//! | Rune | Single-quoted character | `'x'`, `'\n'` |
//! | String | Double-quoted text | `"hello"` |
//! | Nil | `<nil>` | `<nil>` |
//!
//! Runes and strings share one escape set: `\a \b \f \n \r \t \v \\ \' \"`,
//! `\xHH`, `\uHHHH` and `\UHHHHHHHH`.
//!
//! # Contexts
//!
//! | Tag | Holds | Order |
//! |-----|-------|-------|
//! | `Array`, `List`, `array` | values | as written |
//! | `Set` | values | as written, duplicates dropped |
//! | `Stack` | values | bottom to top |
//! | `Queue` | values | front to back |
//! | `Map` | associations | as written |
//! | `Catalog` | associations | sorted by key |
//! | `map` | associations | unspecified (hash order) |
//!
//! # Layout
//!
//! The canonical form writes empty collections as `[ ](TAG)` or `[:](TAG)`,
//! a single element inline (`[1](Array)`), and two or more elements one per
//! line, indented four spaces per nesting level.

use std::fmt;

/// A named rule of the CDCN grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Source,
    Collection,
    Associations,
    Association,
    Key,
    Values,
    Value,
    Primitive,
}

/// Rule names and productions, in grammar order.
pub const GRAMMAR: &[(Rule, &str, &str)] = &[
    (Rule::Source, "source", "collection EOF"),
    (
        Rule::Collection,
        "collection",
        r#""[" (associations | values) "]" "(" CONTEXT ")""#,
    ),
    (
        Rule::Associations,
        "associations",
        r#"association ("," association)* | EOL (association EOL)+ | ":""#,
    ),
    (Rule::Association, "association", r#"key ":" value"#),
    (Rule::Key, "key", "primitive"),
    (
        Rule::Values,
        "values",
        r#"value ("," value)* | EOL (value EOL)+ | " ""#,
    ),
    (Rule::Value, "value", "primitive | collection"),
    (
        Rule::Primitive,
        "primitive",
        "BOOLEAN | COMPLEX | FLOAT | HEXADECIMAL | INTEGER | NIL | RUNE | STRING",
    ),
];

impl Rule {
    fn entry(&self) -> &'static (Rule, &'static str, &'static str) {
        // GRAMMAR lists every variant in declaration order.
        &GRAMMAR[*self as usize]
    }

    /// The rule's name as written in the grammar.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// The right-hand side of the rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdcn::Rule;
    ///
    /// assert_eq!(Rule::Association.production(), r#"key ":" value"#);
    /// ```
    #[must_use]
    pub fn production(&self) -> &'static str {
        self.entry().2
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name(), self.production())
    }
}
