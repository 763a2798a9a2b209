//! Owned element tree for serialized SVG output.
//!
//! Only what the export path needs: elements, attributes in source order,
//! text and CDATA. Comments, processing instructions and the XML
//! declaration are dropped on parse.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SvgError {
    #[error("malformed markup: {0}")]
    Xml(String),
    #[error("markup has no root element")]
    NoRoot,
    #[error("unexpected content after root element")]
    TrailingContent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
    CData(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgElement {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn parse(markup: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(markup);
        let mut stack: Vec<SvgElement> = Vec::new();
        let mut root: Option<SvgElement> = None;
        loop {
            let event = reader
                .read_event()
                .map_err(|err| SvgError::Xml(err.to_string()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(SvgError::TrailingContent);
                    }
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(SvgError::TrailingContent);
                    }
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, SvgNode::Element(element));
                }
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        return Err(SvgError::Xml("closing tag without opening tag".into()));
                    };
                    attach(&mut stack, &mut root, SvgNode::Element(element));
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|err| SvgError::Xml(err.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(SvgNode::Text(value.into_owned()));
                    } else if !value.trim().is_empty() {
                        return Err(if root.is_some() {
                            SvgError::TrailingContent
                        } else {
                            SvgError::Xml("text outside root element".into())
                        });
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(SvgNode::CData(value));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        if !stack.is_empty() {
            return Err(SvgError::Xml("unclosed element".into()));
        }
        root.ok_or(SvgError::NoRoot)
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Replaces the value in place or appends a new attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    pub fn style_property(&self, property: &str) -> Option<String> {
        let style = self.attr("style")?;
        style_declarations(style)
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut declarations = self
            .attr("style")
            .map(style_declarations)
            .unwrap_or_default();
        match declarations
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(property))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr("style", style);
    }

    pub fn elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|child| match child {
            SvgNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Every descendant (self included) with the given local name, in
    /// document order.
    pub fn find_all<'a>(&'a self, local_name: &str) -> Vec<&'a SvgElement> {
        let mut found = Vec::new();
        collect_named(self, local_name, &mut found);
        found
    }

    pub fn insert_child(&mut self, index: usize, node: SvgNode) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    pub fn push_child(&mut self, node: SvgNode) {
        self.children.push(node);
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                SvgNode::Element(element) => out.push_str(&element.text_content()),
                SvgNode::Text(text) | SvgNode::CData(text) => out.push_str(text),
            }
        }
        out
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<SvgElement, SvgError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = SvgElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| SvgError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| SvgError::Xml(err.to_string()))?;
        element.attrs.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [SvgElement], root: &mut Option<SvgElement>, node: SvgNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if let SvgNode::Element(element) = node {
        *root = Some(element);
    }
}

fn collect_named<'a>(element: &'a SvgElement, local_name: &str, found: &mut Vec<&'a SvgElement>) {
    if element.local_name() == local_name {
        found.push(element);
    }
    for child in element.elements() {
        collect_named(child, local_name, found);
    }
}

fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn write_element(element: &SvgElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            SvgNode::Element(child) => write_element(child, out),
            SvgNode::Text(text) => out.push_str(&escape_text(text)),
            SvgNode::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if text.contains(['&', '<', '>']) {
        escape(text)
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let svg = SvgElement::parse(
            r##"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="2ex"><g fill="red"><use xlink:href="#MJX-1"/></g></svg>"##,
        )
        .expect("parse");
        assert_eq!(svg.name, "svg");
        assert_eq!(svg.attr("width"), Some("2ex"));
        let uses = svg.find_all("use");
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].attr("xlink:href"), Some("#MJX-1"));
    }

    #[test]
    fn escaped_values_survive_a_pass() {
        let markup = r#"<svg><text data-tex="a &lt; b &amp; c">x &gt; y</text></svg>"#;
        let svg = SvgElement::parse(markup).expect("parse");
        let text = svg.find_all("text")[0];
        assert_eq!(text.attr("data-tex"), Some("a < b & c"));
        assert_eq!(text.text_content(), "x > y");
        let again = SvgElement::parse(&svg.to_markup()).expect("reparse");
        assert_eq!(again, svg);
    }

    #[test]
    fn unclosed_markup_is_rejected() {
        assert!(matches!(
            SvgElement::parse("<svg><g></svg>"),
            Err(SvgError::Xml(_))
        ));
        assert_eq!(SvgElement::parse("   "), Err(SvgError::NoRoot));
        assert_eq!(
            SvgElement::parse("<svg/><svg/>"),
            Err(SvgError::TrailingContent)
        );
    }

    #[test]
    fn style_property_is_replaced_in_place() {
        let mut svg = SvgElement::new("svg");
        svg.set_attr("style", "vertical-align: -0.2ex; color: red");
        svg.set_style_property("color", "#000000");
        assert_eq!(
            svg.attr("style"),
            Some("vertical-align: -0.2ex; color: #000000")
        );
        svg.set_style_property("opacity", "1");
        assert_eq!(svg.style_property("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn prefixed_names_match_by_local_name() {
        let svg = SvgElement::parse(r#"<svg:svg><svg:defs/></svg:svg>"#).expect("parse");
        assert_eq!(svg.local_name(), "svg");
        assert_eq!(svg.find_all("defs").len(), 1);
    }
}
