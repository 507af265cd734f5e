//! Validation of URL-valued attributes.
//!
//! Every attribute value goes through [`SchemeValidator`] unless a more specific
//! validator is registered for it.  The `href` attribute, and `xlink:href` through its
//! local name, additionally go through [`HrefValidator`], which restricts `data:` URLs
//! to a handful of raster image types.  An SVG embedded as `data:image/svg+xml` would
//! bypass this validator entirely, so it is not on the list.

use data_url::DataUrl;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::registry::AttributeValidator;

/// MIME types allowed in `data:` URLs.
pub const ALLOWED_DATA_MIME_TYPES: &[&str] =
    &["image/png", "image/jpg", "image/jpeg", "image/pjpeg", "image/gif"];

const JAVASCRIPT_SCHEME: &str = "javascript:";

/// `<type>/<subtype>;` at the start of what follows `data:`.
static DATA_URL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*[^/]+/[^/;]+\s*;\s*").expect("valid regex"));

/// What to do with a `data:` URL whose MIME type is not followed by parameters,
/// like `data:image/png,iVBOR...` or `data:garbage`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DataUrlPolicy {
    /// Parse the URL properly and accept it only if its MIME type is allowed.
    #[default]
    Strict,

    /// Accept the URL without looking at it further.
    ///
    /// This is what older versions of this validator did; it lets through `data:`
    /// URLs that browsers will happily sniff as something else.
    Permissive,
}

/// Rejects values that use the `javascript:` scheme.
///
/// The value is trimmed, and the tab and newline characters that URL parsers strip
/// out are ignored, so `"  JavaScript:alert(1)"` and `"java\tscript:"` are both
/// rejected.
#[derive(Debug, Copy, Clone, Default)]
pub struct SchemeValidator;

impl AttributeValidator for SchemeValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        validate_scheme(value)
    }
}

/// Validator for `href` and `xlink:href`.
///
/// Applies [`SchemeValidator`], and checks `data:` URLs against
/// [`ALLOWED_DATA_MIME_TYPES`].
#[derive(Debug, Copy, Clone, Default)]
pub struct HrefValidator {
    policy: DataUrlPolicy,
}

impl HrefValidator {
    pub fn new(policy: DataUrlPolicy) -> HrefValidator {
        HrefValidator { policy }
    }

    pub fn policy(&self) -> DataUrlPolicy {
        self.policy
    }
}

impl AttributeValidator for HrefValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        validate_scheme(value)?;

        let value = value.trim();

        match strip_prefix_ignore_ascii_case(value, "data:") {
            Some(rest) if !rest.is_empty() => validate_data_url(value, rest, self.policy),
            _ => Ok(()),
        }
    }
}

pub(crate) fn validate_scheme(value: &str) -> Result<(), ValidationError> {
    let normalized: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    if strip_prefix_ignore_ascii_case(&normalized, JAVASCRIPT_SCHEME).is_some() {
        return Err(ValidationError::UnallowedHrefAttributeValue(value.to_string()));
    }

    Ok(())
}

/// `value` is the whole URL; `rest` is what follows `data:`.
fn validate_data_url(value: &str, rest: &str, policy: DataUrlPolicy) -> Result<(), ValidationError> {
    if DATA_URL_SHAPE.is_match(rest) {
        // The MIME type must match exactly; " image/png" is not "image/png".
        let mime = rest.split(';').next().unwrap_or("").to_lowercase();

        return if is_allowed_mime_type(&mime) {
            Ok(())
        } else {
            Err(ValidationError::UnallowedHrefAttributeValue(value.to_string()))
        };
    }

    match policy {
        DataUrlPolicy::Permissive => Ok(()),

        DataUrlPolicy::Strict => {
            let data_url = DataUrl::process(value)
                .map_err(|_| ValidationError::UnallowedHrefAttributeValue(value.to_string()))?;

            let mime = data_url.mime_type();
            let essence = format!("{}/{}", mime.type_, mime.subtype);

            if is_allowed_mime_type(&essence) {
                Ok(())
            } else {
                Err(ValidationError::UnallowedHrefAttributeValue(value.to_string()))
            }
        }
    }
}

fn is_allowed_mime_type(mime: &str) -> bool {
    ALLOWED_DATA_MIME_TYPES.contains(&mime)
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&s[prefix.len()..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn href(value: &str) -> Result<(), ValidationError> {
        HrefValidator::default().validate(value)
    }

    #[test]
    fn rejects_javascript_scheme() {
        for value in &[
            "javascript:",
            "JAVASCRIPT:",
            "javascript:alert(1)",
            "  JavaScript:alert(1)  ",
            "java\tscript:alert(1)",
            "java\nscript:",
        ] {
            assert!(
                matches!(
                    SchemeValidator.validate(value),
                    Err(ValidationError::UnallowedHrefAttributeValue(_))
                ),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn accepts_other_values() {
        for value in &["", "javascript", "javascrip:", "#foo", "foo.png", "http://example.com/javascript:"] {
            assert!(SchemeValidator.validate(value).is_ok(), "{:?} should be accepted", value);
        }
    }

    #[test]
    fn does_not_panic_on_multibyte_values() {
        assert!(SchemeValidator.validate("javascrïpt:").is_ok());
        assert!(SchemeValidator.validate("ñ").is_ok());
        assert!(href("dätä:").is_ok());
    }

    #[test]
    fn accepts_allowed_data_mime_types() {
        assert!(href("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(href("data:image/JPEG;base64,/9j/4AAQ").is_ok());
        assert!(href("DATA:image/gif;base64,R0lGODlh").is_ok());
        assert!(href("data:image/pjpeg;charset=binary,xx").is_ok());
    }

    #[test]
    fn rejects_other_data_mime_types() {
        for value in &[
            "data:image/svg+xml;base64,PHN2Zz4=",
            "data:text/html;base64,PHNjcmlwdD4=",
            "data:application/javascript;base64,YWxlcnQoMSk=",
        ] {
            assert!(
                matches!(href(value), Err(ValidationError::UnallowedHrefAttributeValue(_))),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn mime_types_with_surrounding_whitespace_are_rejected() {
        assert!(href("data: image/png;base64,AA").is_err());
        assert!(href("data:image/png ;base64,AA").is_err());
        assert!(href("data:\timage/gif;base64,AA").is_err());
    }

    #[test]
    fn strict_policy_parses_data_urls_without_parameters() {
        assert!(href("data:image/png,abcd").is_ok());
        assert!(href("data:text/html,<script>alert(1)</script>").is_err());
        assert!(href("data:garbage").is_err());
    }

    #[test]
    fn permissive_policy_passes_malformed_data_urls() {
        let v = HrefValidator::new(DataUrlPolicy::Permissive);

        assert!(v.validate("data:text/html,<script>alert(1)</script>").is_ok());
        assert!(v.validate("data:garbage").is_ok());

        // the well-formed case is checked regardless of policy
        assert!(v.validate("data:image/svg+xml;base64,PHN2Zz4=").is_err());
        assert!(v.validate("javascript:alert(1)").is_err());
    }
}
