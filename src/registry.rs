//! Per-instance registry of value validators.
//!
//! A [`Registry`] maps element names to [`ContentValidator`]s, which check the text
//! inside an element, and attribute keys to [`AttributeValidator`]s, which check an
//! attribute's value.  Keys are case-folded.  Each [`Validator`](crate::Validator) owns
//! its registry; cloning the validator clones the map but shares the validators
//! themselves.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::css::StyleValidator;
use crate::error::ValidationError;
use crate::href::HrefValidator;
use crate::whitelist::fold_case;

/// Checks the value of an attribute.
///
/// Implemented for closures of type `Fn(&str) -> Result<(), ValidationError>`.
pub trait AttributeValidator: Send + Sync {
    fn validate(&self, value: &str) -> Result<(), ValidationError>;
}

/// Checks the text content of an element, like the stylesheet inside `<style>`.
///
/// Implemented for closures of type `Fn(&str) -> Result<(), ValidationError>`.
pub trait ContentValidator: Send + Sync {
    fn validate(&self, content: &str) -> Result<(), ValidationError>;
}

impl<F> AttributeValidator for F
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self(value)
    }
}

impl<F> ContentValidator for F
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, content: &str) -> Result<(), ValidationError> {
        self(content)
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    content: HashMap<String, Arc<dyn ContentValidator>>,
    attributes: HashMap<String, Arc<dyn AttributeValidator>>,
}

impl Registry {
    /// Creates a registry with a [`StyleValidator`] for `<style>` and an
    /// [`HrefValidator`] for `href`.
    pub fn with_defaults() -> Registry {
        let mut registry = Registry::default();
        registry.set_content_validator("style", StyleValidator::default());
        registry.set_attribute_validator("href", HrefValidator::default());
        registry
    }

    pub fn set_content_validator<V>(&mut self, element: &str, validator: V)
    where
        V: ContentValidator + 'static,
    {
        self.content.insert(fold_case(element), Arc::new(validator));
    }

    pub fn remove_content_validator(&mut self, element: &str) {
        self.content.remove(&fold_case(element));
    }

    pub fn content_validator(&self, element: &str) -> Option<&dyn ContentValidator> {
        self.content.get(&fold_case(element)).map(|v| v.as_ref())
    }

    pub fn set_attribute_validator<V>(&mut self, key: &str, validator: V)
    where
        V: AttributeValidator + 'static,
    {
        self.attributes.insert(fold_case(key), Arc::new(validator));
    }

    pub fn remove_attribute_validator(&mut self, key: &str) {
        self.attributes.remove(&fold_case(key));
    }

    pub fn attribute_validator(&self, key: &str) -> Option<&dyn AttributeValidator> {
        self.attributes.get(&fold_case(key)).map(|v| v.as_ref())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut content: Vec<_> = self.content.keys().collect();
        let mut attributes: Vec<_> = self.attributes.keys().collect();
        content.sort();
        attributes.sort();

        f.debug_struct("Registry")
            .field("content", &content)
            .field("attributes", &attributes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject_everything(value: &str) -> Result<(), ValidationError> {
        Err(ValidationError::InvalidAttribute(value.to_string()))
    }

    #[test]
    fn defaults_cover_style_and_href() {
        let r = Registry::with_defaults();

        assert!(r.content_validator("style").is_some());
        assert!(r.content_validator("STYLE").is_some());
        assert!(r.attribute_validator("href").is_some());
        assert!(r.attribute_validator("xlink:href").is_none());
    }

    #[test]
    fn set_overrides_and_remove_deletes() {
        let mut r = Registry::with_defaults();

        assert!(r.attribute_validator("href").unwrap().validate("#a").is_ok());

        r.set_attribute_validator("HREF", reject_everything);
        assert!(r.attribute_validator("href").unwrap().validate("#a").is_err());

        r.remove_attribute_validator("href");
        assert!(r.attribute_validator("href").is_none());

        // removing twice is fine
        r.remove_attribute_validator("href");
        r.remove_content_validator("nonexistent");
    }

    #[test]
    fn clones_are_independent() {
        let a = Registry::with_defaults();
        let mut b = a.clone();

        b.remove_content_validator("style");

        assert!(a.content_validator("style").is_some());
        assert!(b.content_validator("style").is_none());
    }
}
