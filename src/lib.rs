//! Reject unsafe SVG documents before they are rendered or stored.
//!
//! This crate checks untrusted SVG markup against a whitelist of elements and
//! attributes, and against a few policies for the values that can do harm on their
//! own.  It does not repair or rewrite documents: a document is either accepted as
//! it is, or rejected with a [`ValidationError`] that names the first problem found.
//!
//! A document is rejected if it has any of the following:
//!
//! * An element or attribute that is not in the [`Whitelist`].  The default whitelist
//!   has the static SVG vocabulary, and no `<script>`, `<foreignObject>`, animation
//!   elements, or `on*` event handlers.
//!
//! * A processing instruction other than the XML declaration.
//!
//! * An attribute value that starts with `javascript:`, or a `data:` URL in `href`
//!   whose MIME type is not one of a few raster image types.
//!
//! * A `<style>` element that imports other stylesheets, references remote URLs, or
//!   calls CSS functions.
//!
//! * A DOCTYPE that declares entities, which could be used for the [billion laughs
//!   attack] or to read local files.
//!
//! * Chains of `<use>` references that amplify the document beyond
//!   [`Limits::max_references`].  This is the SVG analog of the billion laughs attack.
//!
//! Validation streams through the document and keeps only a small amount of state
//! per open element, so it can be run on large inputs directly from a file or a
//! socket.
//!
//! # Example
//!
//! ```
//! use safesvg::{ValidationError, Validator};
//!
//! let validator = Validator::new();
//!
//! let good = r##"<?xml version="1.0" encoding="UTF-8"?>
//! <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
//!      width="50" height="50">
//!   <defs><rect id="r" width="10" height="10"/></defs>
//!   <use xlink:href="#r" x="10" y="10" fill="red"/>
//! </svg>"##;
//!
//! assert!(validator.validate_str(good).is_ok());
//!
//! let bad = r#"<svg xmlns="http://www.w3.org/2000/svg" onload="alert(1)"/>"#;
//!
//! assert!(matches!(
//!     validator.validate_str(bad),
//!     Err(ValidationError::InvalidAttribute(ref key)) if key == "onload"
//! ));
//! ```
//!
//! # Logging
//!
//! Set the `SAFESVG_LOG` environment variable to get a line on standard output for
//! each rejected document, and a summary for each accepted one.
//!
//! [billion laughs attack]: https://en.wikipedia.org/wiki/Billion_laughs_attack

#![allow(rustdoc::private_intra_doc_links)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

// The public API is exported here
pub use crate::api::*;

pub use crate::css::{validate_style, StyleValidator};
pub use crate::href::{HrefValidator, SchemeValidator, ALLOWED_DATA_MIME_TYPES};
pub use crate::limits::{MAX_CSS_NESTING, MAX_LOADED_ELEMENTS, MAX_NESTING_DEPTH, MAX_REFERENCES};

mod api;
mod css;
mod error;
mod href;
pub mod limits;
mod log;
pub mod minify;
mod references;
mod registry;
mod session;
pub mod whitelist;
mod xml;

#[doc(hidden)]
pub mod bench_only {
    pub use crate::references::ReferenceGraph;
    pub use crate::xml::{XmlEvent, XmlEventReader};
}

#[doc(hidden)]
pub mod tests_only {
    pub use crate::references::{NodeIndex, ReferenceGraph};
    pub use crate::xml::{AttributeName, Attributes};
}
