//! Error types.

use std::fmt;
use std::io;

use thiserror::Error;

/// Errors that can happen while validating an SVG document.
///
/// Every one of these is terminal: validation stops at the first problem it finds,
/// and the document must be rejected as a whole.  No partially-validated content
/// should ever be used.
///
/// The policy variants carry the offending element name, attribute key or value,
/// so that rejections can be diagnosed.  To see why a document was rejected as it
/// happens, set the `SAFESVG_LOG=1` environment variable.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An element, or a processing instruction, is not in the whitelist.
    #[error("[svg] invalid element: {0}")]
    InvalidElement(String),

    /// An attribute key is not in the whitelist.
    #[error("[svg] invalid attribute: {0}")]
    InvalidAttribute(String),

    /// A stylesheet uses a forbidden at-rule, like `@import`.
    #[error("[svg] unallowed css attribute: {0}")]
    UnallowedCssAttribute(String),

    /// A stylesheet uses a forbidden value, like a remote `url()` or a function call.
    #[error("[svg] unallowed css attribute value: {0}")]
    UnallowedCssAttributeValue(String),

    /// An attribute value uses a forbidden URL scheme or `data:` MIME type.
    #[error("[svg] unallowed href attribute value: {0}")]
    UnallowedHrefAttributeValue(String),

    /// The DOCTYPE declares entities.
    #[error("[svg] unallowed entity attribute: {0}")]
    UnallowedEntityAttribute(String),

    /// Fragment references amplify the document beyond the configured maximum.
    #[error("[svg] too many references: more than {max} (>{found})")]
    TooManyReferences { max: u64, found: u64 },

    /// A particular implementation-defined limit was exceeded.
    #[error("[svg] limit exceeded: {0}")]
    LimitExceeded(ImplementationLimit),

    /// The input is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParseError(String),

    /// The input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ValidationError {
    /// Whether the document was rejected by policy, as opposed to being unreadable
    /// or malformed.
    pub fn is_policy_violation(&self) -> bool {
        !matches!(
            *self,
            ValidationError::XmlParseError(_) | ValidationError::Io(_)
        )
    }
}

impl From<quick_xml::Error> for ValidationError {
    fn from(e: quick_xml::Error) -> ValidationError {
        match e {
            quick_xml::Error::Io(e) => ValidationError::Io(io::Error::new(e.kind(), e.to_string())),
            e => ValidationError::XmlParseError(e.to_string()),
        }
    }
}

/// Errors for implementation-defined limits, to mitigate malicious SVG documents.
///
/// These get emitted as [`ValidationError::LimitExceeded`].  Amplification through
/// fragment references has its own variant, [`ValidationError::TooManyReferences`],
/// since it is the main thing this crate defends against.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImplementationLimit {
    /// Document exceeded the maximum number of elements that can be loaded.
    ///
    /// This is a mitigation for SVG files which create millions of elements in an
    /// attempt to keep the validator busy.  See [`Limits::max_loaded_elements`].
    ///
    /// [`Limits::max_loaded_elements`]: crate::Limits::max_loaded_elements
    TooManyLoadedElements,

    /// Document exceeded the maximum nesting depth of elements or of id-scopes.
    ///
    /// See [`Limits::max_nesting_depth`].
    ///
    /// [`Limits::max_nesting_depth`]: crate::Limits::max_nesting_depth
    MaximumNestingDepthExceeded,
}

impl fmt::Display for ImplementationLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ImplementationLimit::TooManyLoadedElements => {
                write!(f, "cannot load more than the maximum number of elements")
            }

            ImplementationLimit::MaximumNestingDepthExceeded => {
                write!(f, "elements or id-scopes are nested too deeply")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_offending_name() {
        let e = ValidationError::InvalidElement("script".to_string());
        assert_eq!(e.to_string(), "[svg] invalid element: script");

        let e = ValidationError::TooManyReferences {
            max: 500,
            found: 1000,
        };
        assert_eq!(e.to_string(), "[svg] too many references: more than 500 (>1000)");
    }

    #[test]
    fn parse_errors_are_not_policy_violations() {
        assert!(!ValidationError::XmlParseError("eof".to_string()).is_policy_violation());
        assert!(ValidationError::InvalidAttribute("onload".to_string()).is_policy_violation());
        assert!(
            ValidationError::LimitExceeded(ImplementationLimit::TooManyLoadedElements)
                .is_policy_violation()
        );
    }
}
