//! Adapter from `quick-xml`'s pull parser to the events that the validator consumes.
//!
//! `quick-xml` hands us raw tags; this module resolves namespace prefixes, unescapes
//! text and attribute values, and folds attribute names the way the whitelist
//! expects them.  It also checks that every element that was opened gets closed,
//! since the parser itself does not complain about a truncated document.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::attributes::{AttributeName, Attributes};
use crate::error::ValidationError;
use crate::whitelist::fold_case;

const XML_NAMESPACE: &[u8] = b"http://www.w3.org/XML/1998/namespace";
const XLINK_NAMESPACE: &[u8] = b"http://www.w3.org/1999/xlink";

/// One parse event, in document order.
#[derive(Debug, Clone)]
pub enum XmlEvent {
    /// Start tag.  Empty-element tags produce this and then an `EndElement`.
    StartElement { name: String, attributes: Attributes },

    EndElement { name: String },

    /// Unescaped text, or the contents of a CDATA section.
    Characters(String),

    Comment,

    /// `<?target content?>`.  The XML declaration comes through with target `xml`.
    ProcessingInstruction { target: String, content: String },

    /// Raw text of a `<!...>` declaration, like `DOCTYPE svg [ ... ]`.
    Directive(String),
}

pub struct XmlEventReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    depth: usize,
    done: bool,
}

impl<R: BufRead> XmlEventReader<R> {
    pub fn new(source: R) -> XmlEventReader<R> {
        let mut reader = NsReader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;

        XmlEventReader {
            reader,
            buf: Vec::new(),
            depth: 0,
            done: false,
        }
    }

    /// Returns the next event, or `None` at a clean end of input.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ValidationError> {
        if self.done {
            return Ok(None);
        }

        loop {
            self.buf.clear();

            let event = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) => {
                    self.depth += 1;
                    let name = element_name(&self.reader, e);
                    let attributes = collect_attributes(&self.reader, e)?;
                    XmlEvent::StartElement { name, attributes }
                }

                Event::End(ref e) => {
                    self.depth = self.depth.saturating_sub(1);
                    let (_, local) = self.reader.resolve_element(e.name());
                    XmlEvent::EndElement {
                        name: fold_case(&utf8(local.as_ref())?),
                    }
                }

                // expand_empty_elements is on, so these never come out of the parser
                Event::Empty(_) => continue,

                Event::Text(ref e) => XmlEvent::Characters(e.unescape()?.into_owned()),

                Event::CData(e) => XmlEvent::Characters(utf8(&e.into_inner())?),

                Event::Comment(_) => XmlEvent::Comment,

                Event::Decl(_) => XmlEvent::ProcessingInstruction {
                    target: "xml".to_string(),
                    content: String::new(),
                },

                Event::PI(ref e) => XmlEvent::ProcessingInstruction {
                    target: utf8(e.target())?,
                    content: utf8(e.content())?.trim_start().to_string(),
                },

                Event::DocType(ref e) => XmlEvent::Directive(format!("DOCTYPE {}", utf8(e)?)),

                Event::Eof => {
                    self.done = true;

                    if self.depth > 0 {
                        return Err(ValidationError::XmlParseError(format!(
                            "unexpected end of document with {} unclosed element(s)",
                            self.depth
                        )));
                    }

                    return Ok(None);
                }
            };

            return Ok(Some(event));
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ValidationError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ValidationError::XmlParseError(format!("invalid UTF-8: {}", e)))
}

fn element_name<R>(reader: &NsReader<R>, e: &BytesStart<'_>) -> String {
    let (_, local) = reader.resolve_element(e.name());
    fold_case(&String::from_utf8_lossy(local.as_ref()))
}

fn collect_attributes<R>(
    reader: &NsReader<R>,
    e: &BytesStart<'_>,
) -> Result<Attributes, ValidationError> {
    let mut attrs = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();

        let name = if attr.key.as_namespace_binding().is_some() {
            // xmlns and xmlns:foo keep their literal spelling
            AttributeName::new(None, &utf8(attr.key.as_ref())?)
        } else {
            let (ns, local) = reader.resolve_attribute(attr.key);
            let local = utf8(local.as_ref())?;

            match ns {
                ResolveResult::Unbound => AttributeName::new(None, &local),
                ResolveResult::Bound(ns) => {
                    let prefix = namespace_prefix(ns.as_ref())?;
                    AttributeName::new(Some(&prefix), &local)
                }
                ResolveResult::Unknown(prefix) => AttributeName::new(Some(&utf8(&prefix)?), &local),
            }
        };

        attrs.push((name, value));
    }

    Ok(Attributes::new(attrs))
}

/// The prefix that the whitelist uses for a namespace URI.
///
/// The XML and XLink namespaces get their usual prefixes; any other namespace is
/// spelled out in full, which will not be in any sensible whitelist.
fn namespace_prefix(uri: &[u8]) -> Result<String, ValidationError> {
    if uri == XML_NAMESPACE {
        Ok("xml".to_string())
    } else if uri == XLINK_NAMESPACE {
        Ok("xlink".to_string())
    } else {
        utf8(uri)
    }
}
