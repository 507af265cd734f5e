//! Store XML element attributes and their values.

use std::slice;

use crate::whitelist::fold_case;

/// Case-folded name of an attribute, as the whitelist sees it.
///
/// The prefix is not the literal one from the document, but the one for the
/// namespace the attribute is bound to: an attribute in the XLink namespace always
/// gets `xlink`, whatever the document calls that namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeName {
    key: String,
    prefix_len: Option<usize>,
}

impl AttributeName {
    pub fn new(prefix: Option<&str>, local: &str) -> AttributeName {
        match prefix {
            Some(prefix) if !prefix.is_empty() => {
                let prefix = fold_case(prefix);
                AttributeName {
                    key: format!("{}:{}", prefix, fold_case(local)),
                    prefix_len: Some(prefix.len()),
                }
            }

            _ => AttributeName {
                key: fold_case(local),
                prefix_len: None,
            },
        }
    }

    /// The full key, like `xlink:href` or `fill`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix_len.map(|len| &self.key[..len])
    }

    /// The part after the prefix; the same as the key for unprefixed attributes.
    pub fn local(&self) -> &str {
        match self.prefix_len {
            Some(len) => &self.key[len + 1..],
            None => &self.key,
        }
    }

    /// `id` or `xml:id`.
    pub fn is_id(&self) -> bool {
        self.key == "id" || self.key == "xml:id"
    }

    /// `href` or `xlink:href`.
    pub fn is_href(&self) -> bool {
        self.key == "href" || self.key == "xlink:href"
    }
}

/// The attributes of one start tag, in document order.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    attrs: Box<[(AttributeName, String)]>,
}

/// Iterator from `Attributes.iter`.
pub struct AttributesIter<'a>(slice::Iter<'a, (AttributeName, String)>);

impl Attributes {
    pub fn new(attrs: Vec<(AttributeName, String)>) -> Attributes {
        Attributes {
            attrs: attrs.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> AttributesIter<'_> {
        AttributesIter(self.attrs.iter())
    }

    /// Value of the first attribute with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name.key() == key)
            .map(|(_, value)| value.as_str())
    }
}

impl<'a> Iterator for AttributesIter<'a> {
    type Item = (&'a AttributeName, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(name, value)| (name, value.as_str()))
    }
}
