//! Minimal owned element tree over `quick-xml` events.
//!
//! The questionnaire walker only needs DOM-like queries (attributes, child
//! elements, descendants by name, text content), so the event stream is folded
//! into a small tree once and queried from there.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Name given to the synthetic node wrapping the whole document.
pub const DOCUMENT_NODE: &str = "#document";

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed XML at byte {position}: {source}")]
    Malformed {
        position: u64,
        source: quick_xml::Error,
    },
    #[error("Unexpected end of document inside <{0}>")]
    Unclosed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements().filter(move |child| child.name == name)
    }

    /// Every element below this one with the given name, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    pub fn first_descendant_named<'a>(&'a self, name: &str) -> Option<&'a XmlElement> {
        self.child_elements().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.first_descendant_named(name)
            }
        })
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        push_text(self, &mut text);
        text
    }
}

fn collect_named<'a>(element: &'a XmlElement, name: &str, found: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        if child.name == name {
            found.push(child);
        }
        collect_named(child, name, found);
    }
}

fn push_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(child) => push_text(child, out),
        }
    }
}

/// Parse a document into a tree rooted at a synthetic [`DOCUMENT_NODE`].
pub fn parse_document(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![XmlElement::new(DOCUMENT_NODE.to_string(), Vec::new())];

    let malformed = |reader: &Reader<&[u8]>, source: quick_xml::Error| XmlError::Malformed {
        position: reader.buffer_position() as u64,
        source,
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|source| malformed(&reader, source))?;

        match event {
            Event::Start(start) => {
                let element = element_from_start(&start).map_err(|e| malformed(&reader, e))?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start).map_err(|e| malformed(&reader, e))?;
                append(&mut stack, XmlNode::Element(element));
            }
            Event::End(_) => {
                // quick-xml has already checked the end name against the start
                if stack.len() > 1
                    && let Some(element) = stack.pop()
                {
                    append(&mut stack, XmlNode::Element(element));
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| malformed(&reader, quick_xml::Error::from(e)))?;
                if stack.len() > 1 {
                    append(&mut stack, XmlNode::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                if stack.len() > 1 {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    append(&mut stack, XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no content
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(XmlError::Unclosed(open));
    }

    Ok(stack.pop().unwrap_or_else(|| XmlElement::new(DOCUMENT_NODE.to_string(), Vec::new())))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement::new(name, attributes))
}

fn append(stack: &mut [XmlElement], node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}
