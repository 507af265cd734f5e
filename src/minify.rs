//! Compaction of documents that have already been validated.
//!
//! This re-serializes a document without its comments and without the whitespace
//! between elements, and squeezes runs of whitespace anywhere inside `<style>` down
//! to a single space.  It does not check anything; run a
//! [`Validator`](crate::Validator) over the document first.

use std::io;
use std::str::Utf8Error;

use quick_xml::events::{BytesCData, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Errors from [`minify`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid UTF-8 in text: {0}")]
    Utf8(#[from] Utf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Elements whose whitespace-only text is significant.
const TEXT_ELEMENTS: &[&str] = &["text", "tspan", "textpath", "tref", "title", "desc"];

/// Returns a compacted copy of `data`.
///
/// ```
/// let out = safesvg::minify::minify(b"<svg>\n  <!-- hi -->\n  <rect/>\n</svg>").unwrap();
/// assert_eq!(out, b"<svg><rect/></svg>");
/// ```
pub fn minify(data: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let mut reader = Reader::from_reader(data);
    let mut writer = Writer::new(Vec::with_capacity(data.len()));
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    loop {
        buf.clear();

        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,

            Event::Comment(_) => (),

            Event::Start(e) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).to_lowercase());
                writer.write_event(Event::Start(e))?;
            }

            Event::End(e) => {
                stack.pop();
                writer.write_event(Event::End(e))?;
            }

            // The stylesheet is all the text under <style>, nested elements included,
            // so a run of whitespace there may be the only thing separating two tokens.
            Event::Text(e) => {
                if in_style(&stack) {
                    let text = collapse_whitespace(std::str::from_utf8(&e)?);
                    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
                } else if !e.iter().all(u8::is_ascii_whitespace) || in_text_element(&stack) {
                    writer.write_event(Event::Text(e))?;
                }
            }

            Event::CData(e) => {
                if in_style(&stack) {
                    let text = collapse_whitespace(std::str::from_utf8(&e)?);
                    writer.write_event(Event::CData(BytesCData::new(text)))?;
                } else {
                    writer.write_event(Event::CData(e))?;
                }
            }

            e => writer.write_event(e)?,
        }
    }

    Ok(writer.into_inner())
}

fn in_text_element(stack: &[String]) -> bool {
    stack
        .iter()
        .any(|name| TEXT_ELEMENTS.contains(&name.as_str()))
}

fn in_style(stack: &[String]) -> bool {
    stack.iter().any(|name| name == "style")
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;

    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}
