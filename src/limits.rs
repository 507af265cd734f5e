//! Processing limits to mitigate malicious SVGs.
//!
//! These are the defaults for [`Limits`]; every [`Validator`] carries its own
//! copy, so different callers can tighten or relax them independently.
//!
//! [`Validator`]: crate::Validator

/// Maximum effective amplification of `#fragment` references.
///
/// Imagine the XML [billion laughs attack], but done in SVG's terms:
/// a group of ten `<use>` elements is referenced ten times from a second
/// group, which is referenced ten times from a third group, and so on.
/// Seven levels of this are a few kilobytes of markup, but a renderer that
/// honors the references ends up drawing ten million objects.
///
/// The validator keeps, for each element with an `id`, the number of objects
/// that drawing it would draw through references, and rejects the document as
/// soon as any of them goes over this number.
///
/// [billion laughs attack]: https://bitbucket.org/tiran/defusedxml
pub const MAX_REFERENCES: u64 = 500;

/// Maximum nesting of `{}`, `()` and `[]` blocks inside a `<style>` element.
///
/// The CSS scanner descends into nested blocks recursively; this keeps a
/// stylesheet made of thousands of opening braces from exhausting the stack.
/// This one is configured on [`StyleValidator`](crate::StyleValidator), not in
/// [`Limits`].
pub const MAX_CSS_NESTING: usize = 32;

/// Maximum nesting depth of elements, and of id-scopes in the reference graph.
///
/// This is the same default depth limit that libxml2 uses.  Besides keeping the
/// validator's stacks small, it bounds the length of the parent chains that the
/// reference counter walks, so checking a reference costs at most this many steps.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum number of elements per document.
///
/// This is a mitigation for SVG files which create millions of elements in
/// an attempt to keep the validator busy.
pub const MAX_LOADED_ELEMENTS: usize = 1_000_000;

/// Limits applied by one [`Validator`](crate::Validator).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    /// See [`MAX_REFERENCES`].
    pub max_references: u64,

    /// See [`MAX_NESTING_DEPTH`].
    pub max_nesting_depth: usize,

    /// See [`MAX_LOADED_ELEMENTS`].
    pub max_loaded_elements: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_references: MAX_REFERENCES,
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_loaded_elements: MAX_LOADED_ELEMENTS,
        }
    }
}
