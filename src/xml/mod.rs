//! The streaming validator.
//!
//! An [`XmlState`] consumes the events from an [`XmlEventReader`] in document order
//! and checks each one against the whitelist, the registered value validators, and
//! the reference counter.  It stops at the first violation.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ImplementationLimit, ValidationError};
use crate::href::SchemeValidator;
use crate::limits::Limits;
use crate::references::{NodeIndex, ReferenceGraph};
use crate::registry::{AttributeValidator, Registry};
use crate::safesvg_log;
use crate::session::Session;
use crate::whitelist::Whitelist;

mod attributes;
mod reader;

pub use attributes::{AttributeName, Attributes};
pub use reader::{XmlEvent, XmlEventReader};

static ENTITY_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!\s*ENTITY").expect("valid regex"));

/// An element that has been opened and not closed yet.
struct OpenElement {
    name: String,

    /// The id-scope active inside this element.
    scope: NodeIndex,

    /// Text content collected so far, if the element has a content validator.
    content: Option<String>,
}

/// Everything the validator needs to remember while it goes through one document.
///
/// This borrows the configuration of a [`Validator`](crate::Validator) and owns the
/// per-document reference graph, which goes away along with the state.
pub struct XmlState<'v> {
    whitelist: &'v Whitelist,
    registry: &'v Registry,
    limits: Limits,
    session: &'v Session,

    references: ReferenceGraph,
    element_stack: Vec<OpenElement>,
    num_loaded_elements: usize,
}

impl<'v> XmlState<'v> {
    pub fn new(
        whitelist: &'v Whitelist,
        registry: &'v Registry,
        limits: Limits,
        session: &'v Session,
    ) -> XmlState<'v> {
        XmlState {
            whitelist,
            registry,
            limits,
            session,
            references: ReferenceGraph::new(limits.max_references, limits.max_nesting_depth),
            element_stack: Vec::new(),
            num_loaded_elements: 0,
        }
    }

    fn current_scope(&self) -> NodeIndex {
        self.element_stack
            .last()
            .map(|e| e.scope)
            .unwrap_or_else(|| self.references.root())
    }

    fn check_limits(&self) -> Result<(), ValidationError> {
        if self.num_loaded_elements > self.limits.max_loaded_elements {
            return Err(ValidationError::LimitExceeded(
                ImplementationLimit::TooManyLoadedElements,
            ));
        }

        if self.element_stack.len() >= self.limits.max_nesting_depth {
            return Err(ValidationError::LimitExceeded(
                ImplementationLimit::MaximumNestingDepthExceeded,
            ));
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: XmlEvent) -> Result<(), ValidationError> {
        match event {
            XmlEvent::StartElement { name, attributes } => self.start_element(name, &attributes),
            XmlEvent::EndElement { name } => self.end_element(&name),
            XmlEvent::Characters(text) => self.characters(&text),
            XmlEvent::Comment => Ok(()),
            XmlEvent::ProcessingInstruction { target, .. } => self.processing_instruction(&target),
            XmlEvent::Directive(text) => self.directive(&text),
        }
    }

    pub fn start_element(
        &mut self,
        name: String,
        attributes: &Attributes,
    ) -> Result<(), ValidationError> {
        self.num_loaded_elements += 1;
        self.check_limits()?;

        if !self.whitelist.contains_element(&name) {
            return Err(ValidationError::InvalidElement(name));
        }

        let mut id = None;
        let mut targets = Vec::new();

        for (attr, value) in attributes.iter() {
            self.validate_attribute(attr, value)?;

            if attr.is_id() {
                id = Some(value);
            } else if attr.is_href() {
                if let Some(target) = fragment_target(value) {
                    targets.push(target);
                }
            }
        }

        // <use id="u" href="#t"/> draws t whenever u is drawn, so its references
        // belong to its own scope.
        let outer = self.current_scope();
        let scope = match id {
            Some(id) => self.references.declare(outer, id)?,
            None => outer,
        };

        for target in &targets {
            let amplification = self.references.reference(scope, target)?;
            safesvg_log!(
                self.session,
                "reference to #{} from <{}>, amplification now {}",
                target,
                name,
                amplification
            );
        }

        let content = self.registry.content_validator(&name).map(|_| String::new());

        self.element_stack.push(OpenElement {
            name,
            scope,
            content,
        });

        Ok(())
    }

    fn validate_attribute(&self, attr: &AttributeName, value: &str) -> Result<(), ValidationError> {
        // A validator registered for the local name applies to every namespaced
        // variant of it, so the one for href also checks xlink:href.
        if attr.prefix().is_some() {
            if let Some(validator) = self.registry.attribute_validator(attr.local()) {
                validator.validate(value)?;
            }
        }

        if !self.whitelist.contains_attribute(attr.key()) {
            return Err(ValidationError::InvalidAttribute(attr.key().to_string()));
        }

        match self.registry.attribute_validator(attr.key()) {
            Some(validator) => validator.validate(value),
            None => SchemeValidator.validate(value),
        }
    }

    pub fn end_element(&mut self, name: &str) -> Result<(), ValidationError> {
        if !self.whitelist.contains_element(name) {
            return Err(ValidationError::InvalidElement(name.to_string()));
        }

        // The parser has already checked that tags are balanced.
        if let Some(element) = self.element_stack.pop() {
            if let Some(content) = element.content {
                if let Some(validator) = self.registry.content_validator(&element.name) {
                    validator.validate(&content)?;
                }
            }
        }

        Ok(())
    }

    pub fn characters(&mut self, text: &str) -> Result<(), ValidationError> {
        for element in self.element_stack.iter_mut() {
            if let Some(ref mut content) = element.content {
                content.push_str(text);
            }
        }

        Ok(())
    }

    pub fn processing_instruction(&self, target: &str) -> Result<(), ValidationError> {
        if target.eq_ignore_ascii_case("xml") {
            Ok(())
        } else {
            Err(ValidationError::InvalidElement(target.to_string()))
        }
    }

    pub fn directive(&self, text: &str) -> Result<(), ValidationError> {
        let text = text.trim();

        let is_doctype = text
            .get(..7)
            .map(|s| s.eq_ignore_ascii_case("DOCTYPE"))
            .unwrap_or(false);

        if is_doctype && ENTITY_DECLARATION.is_match(text) {
            return Err(ValidationError::UnallowedEntityAttribute(text.to_string()));
        }

        Ok(())
    }

    /// Settles the references to ids that were declared after being referenced.
    pub fn finish(&mut self) -> Result<(), ValidationError> {
        let highest = self.references.finish()?;
        safesvg_log!(self.session, "highest reference amplification {}", highest);
        Ok(())
    }

    /// Highest reference amplification reached in the document so far.
    pub fn peak_amplification(&self) -> u64 {
        self.references.peak()
    }

    pub fn num_loaded_elements(&self) -> usize {
        self.num_loaded_elements
    }
}

/// The id in an `href="#id"` value, if that is what it is.
fn fragment_target(value: &str) -> Option<&str> {
    value
        .trim()
        .strip_prefix('#')
        .filter(|id| !id.is_empty())
}

/// Runs a whole document through a fresh [`XmlState`].
pub fn validate_stream<R: BufRead>(
    source: R,
    whitelist: &Whitelist,
    registry: &Registry,
    limits: Limits,
    session: &Session,
) -> Result<(), ValidationError> {
    let mut reader = XmlEventReader::new(source);
    let mut state = XmlState::new(whitelist, registry, limits, session);

    let res = loop {
        match reader.next_event() {
            Ok(Some(event)) => {
                if let Err(e) = state.handle_event(event) {
                    break Err(e);
                }
            }

            Ok(None) => break state.finish(),
            Err(e) => break Err(e),
        }
    };

    match res {
        Ok(()) => {
            safesvg_log!(
                session,
                "accepted document with {} elements, peak reference amplification {}",
                state.num_loaded_elements(),
                state.peak_amplification()
            );
        }

        Err(ref e) => {
            safesvg_log!(session, "rejected document: {}", e);
        }
    }

    res
}
