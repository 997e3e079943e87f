//! Configuration options for CDCN formatting.
//!
//! [`FormatOptions`] controls the two knobs of the formatter:
//!
//! - `max_depth`: how many collections may be open at once before the next one
//!   is replaced by `...` (default 8)
//! - `indent`: spaces per nesting level in the multi-line layout (default 4)
//!
//! Only the defaults produce canonical text. Other indentation widths still
//! parse back to the same value, since spaces between tokens are ignored.
//!
//! ## Examples
//!
//! ```rust
//! use cdcn::{format_collection_with_options, FormatOptions};
//!
//! let nested = vec![vec![vec![1]]];
//!
//! let options = FormatOptions::new().with_max_depth(2);
//! let text = format_collection_with_options(&nested, options).unwrap();
//! assert_eq!(text, "[[...](array)](array)\n");
//! ```

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Default indentation width of the canonical layout.
pub const DEFAULT_INDENT: usize = 4;

/// Configuration options for CDCN formatting.
///
/// # Examples
///
/// ```rust
/// use cdcn::FormatOptions;
///
/// let options = FormatOptions::new();
/// assert_eq!(options.max_depth, 8);
/// assert_eq!(options.indent, 4);
///
/// let options = FormatOptions::new().with_max_depth(3).with_indent(2);
/// assert_eq!(options.max_depth, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub max_depth: usize,
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            indent: DEFAULT_INDENT,
        }
    }
}

impl FormatOptions {
    /// Creates the canonical options (depth 8, 4-space indent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of nested collections.
    ///
    /// With `0`, even the outermost collection is written as `...`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
