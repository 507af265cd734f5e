//! Public Rust API for safesvg.
//!
//! This gets re-exported from the toplevel `lib.rs`.

#![warn(missing_docs)]

pub use crate::{
    error::{ImplementationLimit, ValidationError},
    href::DataUrlPolicy,
    limits::Limits,
    registry::{AttributeValidator, ContentValidator},
    session::Session,
    whitelist::Whitelist,
};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::href::HrefValidator;
use crate::registry::Registry;
use crate::xml::validate_stream;

/// Checks SVG documents against a whitelist.
///
/// This is the starting point for using safesvg.  A `Validator` holds a whitelist of
/// element names and attribute keys, a registry of validators for attribute values
/// and element contents, and the [`Limits`] that bound the work done on one document.
/// You can configure it with the `with_*` builder methods when you create it, and
/// change the whitelist and the registry later with the mutator methods.
///
/// The `validate*` methods take `&self`, so a single `Validator` can check documents
/// from several threads at once.  Cloning a `Validator` gives an independent copy of
/// its configuration.
///
/// # Example:
///
/// ```
/// let validator = safesvg::Validator::new();
///
/// assert!(validator
///     .validate_str(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="10"/></svg>"#)
///     .is_ok());
///
/// assert!(validator
///     .validate_str(r#"<svg><script>alert(1)</script></svg>"#)
///     .is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    pub(crate) whitelist: Whitelist,
    pub(crate) registry: Registry,
    pub(crate) limits: Limits,
    pub(crate) session: Session,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a `Validator` with the default configuration.
    ///
    /// * The whitelist is seeded with [`DEFAULT_ELEMENTS`] and [`DEFAULT_ATTRIBUTES`].
    ///
    /// * `<style>` elements are checked with a [`StyleValidator`], and `href`
    ///   attributes with an [`HrefValidator`] using [`DataUrlPolicy::Strict`].  Every
    ///   other attribute value is checked with the [`SchemeValidator`].
    ///
    /// * The [`Limits`] are the defaults from the [`limits`](crate::limits) module.
    ///
    /// * Logging is enabled if the `SAFESVG_LOG` environment variable is set.
    ///
    /// [`DEFAULT_ELEMENTS`]: crate::whitelist::DEFAULT_ELEMENTS
    /// [`DEFAULT_ATTRIBUTES`]: crate::whitelist::DEFAULT_ATTRIBUTES
    /// [`StyleValidator`]: crate::StyleValidator
    /// [`HrefValidator`]: crate::HrefValidator
    /// [`SchemeValidator`]: crate::SchemeValidator
    pub fn new() -> Self {
        Validator {
            whitelist: Whitelist::default(),
            registry: Registry::with_defaults(),
            limits: Limits::default(),
            session: Session::default(),
        }
    }

    /// Sets the maximum reference amplification.
    ///
    /// See [`MAX_REFERENCES`](crate::MAX_REFERENCES) for what this means.
    ///
    /// # Example:
    ///
    /// ```
    /// let validator = safesvg::Validator::new().with_max_references(50);
    ///
    /// let doc = r##"<svg>
    ///   <g id="a"/>
    ///   <g id="b"><use href="#a"/><use href="#a"/><use href="#a"/><use href="#a"/><use href="#a"/></g>
    ///   <g id="c"><use href="#b"/><use href="#b"/><use href="#b"/><use href="#b"/><use href="#b"/></g>
    ///   <g id="d"><use href="#c"/><use href="#c"/><use href="#c"/></g>
    /// </svg>"##;
    ///
    /// assert!(matches!(
    ///     validator.validate_str(doc),
    ///     Err(safesvg::ValidationError::TooManyReferences { max: 50, .. })
    /// ));
    /// ```
    pub fn with_max_references(mut self, max_references: u64) -> Self {
        self.limits.max_references = max_references;
        self
    }

    /// Replaces all the limits at once.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets what to do with `data:` URLs in `href` that have no MIME parameters.
    ///
    /// This replaces the validator registered for `href` with an [`HrefValidator`]
    /// using `policy`.
    ///
    /// # Example:
    ///
    /// ```
    /// use safesvg::{DataUrlPolicy, Validator};
    ///
    /// let doc = r#"<svg><image href="data:garbage"/></svg>"#;
    ///
    /// assert!(Validator::new().validate_str(doc).is_err());
    /// assert!(Validator::new()
    ///     .with_data_url_policy(DataUrlPolicy::Permissive)
    ///     .validate_str(doc)
    ///     .is_ok());
    /// ```
    pub fn with_data_url_policy(mut self, policy: DataUrlPolicy) -> Self {
        self.registry
            .set_attribute_validator("href", HrefValidator::new(policy));
        self
    }

    /// Sets the session used for logging.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// The limits in use.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// The whitelist in use.
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Adds element names to the whitelist.
    ///
    /// # Example:
    ///
    /// ```
    /// let mut validator = safesvg::Validator::new();
    /// let doc = "<svg><sodipodi/></svg>";
    ///
    /// assert!(validator.validate_str(doc).is_err());
    /// validator.add_elements(["sodipodi"]);
    /// assert!(validator.validate_str(doc).is_ok());
    /// validator.remove_elements(["sodipodi"]);
    /// assert!(validator.validate_str(doc).is_err());
    /// ```
    pub fn add_elements<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist.add_elements(names);
        self
    }

    /// Removes element names from the whitelist.
    pub fn remove_elements<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist.remove_elements(names);
        self
    }

    /// Adds attribute keys to the whitelist.
    ///
    /// Namespaced keys are written with their usual prefix, like `xlink:title`.
    pub fn add_attributes<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist.add_attributes(keys);
        self
    }

    /// Removes attribute keys from the whitelist.
    pub fn remove_attributes<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist.remove_attributes(keys);
        self
    }

    /// Registers a validator for the text content of an element.
    ///
    /// The validator gets all the text inside the element, including that of nested
    /// elements, once the element is closed.  Any previous validator for the same
    /// element is replaced.
    ///
    /// # Example:
    ///
    /// ```
    /// use safesvg::{ValidationError, Validator};
    ///
    /// let mut validator = Validator::new();
    /// validator.set_content_validator("title", |text: &str| {
    ///     if text.len() > 10 {
    ///         Err(ValidationError::InvalidElement("title".to_string()))
    ///     } else {
    ///         Ok(())
    ///     }
    /// });
    ///
    /// assert!(validator.validate_str("<svg><title>short</title></svg>").is_ok());
    /// assert!(validator.validate_str("<svg><title>much too long</title></svg>").is_err());
    /// ```
    pub fn set_content_validator<V>(&mut self, element: &str, validator: V) -> &mut Self
    where
        V: ContentValidator + 'static,
    {
        self.registry.set_content_validator(element, validator);
        self
    }

    /// Removes the content validator for an element, if there is one.
    pub fn remove_content_validator(&mut self, element: &str) -> &mut Self {
        self.registry.remove_content_validator(element);
        self
    }

    /// Registers a validator for the value of an attribute.
    ///
    /// This replaces the default [`SchemeValidator`](crate::SchemeValidator) for that
    /// key, so include its check in your validator if you still want it.  A
    /// validator registered for an unprefixed key also runs for namespaced variants
    /// of it.
    pub fn set_attribute_validator<V>(&mut self, key: &str, validator: V) -> &mut Self
    where
        V: AttributeValidator + 'static,
    {
        self.registry.set_attribute_validator(key, validator);
        self
    }

    /// Removes the validator for an attribute, if there is one.
    ///
    /// Values of that attribute are then checked with the default
    /// [`SchemeValidator`](crate::SchemeValidator).
    pub fn remove_attribute_validator(&mut self, key: &str) -> &mut Self {
        self.registry.remove_attribute_validator(key);
        self
    }

    /// Validates a document in memory.
    pub fn validate(&self, data: &[u8]) -> Result<(), ValidationError> {
        self.validate_buffered(data)
    }

    /// Validates a document in a string.
    pub fn validate_str(&self, s: &str) -> Result<(), ValidationError> {
        self.validate(s.as_bytes())
    }

    /// Validates a document from a stream.
    ///
    /// The stream is read incrementally; validation stops reading as soon as it
    /// finds a problem.
    pub fn validate_reader<R: Read>(&self, reader: R) -> Result<(), ValidationError> {
        self.validate_buffered(BufReader::new(reader))
    }

    /// Validates the document in the file at `path`.
    ///
    /// Failure to open or read the file is returned as [`ValidationError::Io`].
    pub fn validate_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ValidationError> {
        let file = File::open(path)?;
        self.validate_reader(file)
    }

    fn validate_buffered<R: std::io::BufRead>(&self, source: R) -> Result<(), ValidationError> {
        validate_stream(
            source,
            &self.whitelist,
            &self.registry,
            self.limits,
            &self.session,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new().with_session(Session::new_for_test_suite())
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }

    #[test]
    fn builders_set_limits() {
        let v = validator().with_max_references(7);
        assert_eq!(v.limits().max_references, 7);

        let limits = Limits {
            max_references: 1,
            max_nesting_depth: 2,
            max_loaded_elements: 3,
        };
        let v = validator().with_limits(limits);
        assert_eq!(*v.limits(), limits);
    }

    #[test]
    fn mutators_chain() {
        let mut v = validator();
        v.add_elements(["foo"])
            .add_attributes(["bar"])
            .remove_elements(["rect"])
            .remove_attributes(["fill"]);

        assert!(v.whitelist().contains_element("foo"));
        assert!(v.whitelist().contains_attribute("bar"));
        assert!(!v.whitelist().contains_element("rect"));
        assert!(!v.whitelist().contains_attribute("fill"));
    }

    #[test]
    fn clone_is_independent() {
        let a = validator();
        let mut b = a.clone();

        b.remove_elements(["rect"]);

        assert!(a.validate_str("<svg><rect/></svg>").is_ok());
        assert!(b.validate_str("<svg><rect/></svg>").is_err());
    }

    #[test]
    fn removed_attribute_validator_falls_back_to_scheme_check() {
        let mut v = validator();
        v.remove_attribute_validator("href");

        // only the data: check goes away
        assert!(v
            .validate_str(r#"<svg><image href="data:text/html;base64,AA"/></svg>"#)
            .is_ok());
        assert!(v
            .validate_str(r#"<svg><a href="javascript:alert(1)"/></svg>"#)
            .is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = validator().validate_path("/nonexistent/file.svg");
        assert!(matches!(res, Err(ValidationError::Io(_))));
    }
}
