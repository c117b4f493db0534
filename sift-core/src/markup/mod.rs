//! Lenient markup tree for pre-rendered listing pages
//!
//! The listing is server-rendered HTML, so the parser tolerates void
//! elements, unclosed tags, stray end tags and bare ampersands. Every element remembers the
//! byte ranges of its inner and outer markup so fragments can be re-emitted
//! verbatim.

mod escape;
mod selector;

pub use escape::{escape_attr, escape_text};
pub use selector::Selector;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;
use tracing::trace;

use crate::error::{Result, SiftError};

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Index of a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug)]
enum NodeData {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    inner: Range<usize>,
    outer: Range<usize>,
}

/// A parsed page
#[derive(Debug)]
pub struct Document {
    source: String,
    nodes: Vec<Node>,
}

impl Document {
    /// Parse markup into a tree
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let nodes = build_tree(&source)?;
        trace!(nodes = nodes.len(), "Parsed markup document");
        Ok(Self { source, nodes })
    }

    /// The original markup
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Look up an element by node id
    pub fn get(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match self.nodes.get(id.0).map(|n| &n.data) {
            Some(NodeData::Element(_)) => Some(ElementRef { doc: self, id }),
            _ => None,
        }
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node.data, NodeData::Element(_)))
            .map(move |(index, _)| ElementRef {
                doc: self,
                id: NodeId(index),
            })
    }

    /// All elements matching the selector, in document order
    pub fn select(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.elements().filter(|el| selector.matches(*el)).collect()
    }

    /// First element matching the selector
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.elements().find(|el| selector.matches(*el))
    }

    fn element(&self, id: NodeId) -> &Element {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => element,
            _ => unreachable!("ElementRef always points at an element node"),
        }
    }
}

/// Borrowed view of one element
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        &self.doc.element(self.id).name
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.doc
            .element(self.id)
            .attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn classes(&self) -> impl Iterator<Item = &'a str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        let parent = self.doc.nodes[self.id.0].parent?;
        self.doc.get(parent)
    }

    /// Direct element children
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let doc = self.doc;
        doc.nodes[self.id.0]
            .children
            .iter()
            .filter_map(move |child| doc.get(*child))
    }

    /// All descendant elements in document order
    pub fn descendants(&self) -> Vec<ElementRef<'a>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.doc.nodes[self.id.0]
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            if let Some(el) = self.doc.get(id) {
                out.push(el);
                stack.extend(self.doc.nodes[id.0].children.iter().rev().copied());
            }
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self.doc, self.id, &mut out);
        out
    }

    pub fn inner_html(&self) -> &'a str {
        let range = self.doc.element(self.id).inner.clone();
        &self.doc.source[range]
    }

    pub fn outer_html(&self) -> &'a str {
        let range = self.doc.element(self.id).outer.clone();
        &self.doc.source[range]
    }

    /// Descendants matching the selector, in document order
    pub fn select(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.descendants()
            .into_iter()
            .filter(|el| selector.matches(*el))
            .collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.descendants()
            .into_iter()
            .find(|el| selector.matches(*el))
    }
}

fn collect_text(doc: &Document, id: NodeId, out: &mut String) {
    for child in &doc.nodes[id.0].children {
        match &doc.nodes[child.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => collect_text(doc, *child, out),
            NodeData::Root => {}
        }
    }
}

fn build_tree(source: &str) -> Result<Vec<Node>> {
    let mut nodes = vec![Node {
        parent: None,
        children: Vec::new(),
        data: NodeData::Root,
    }];
    let mut open: Vec<NodeId> = vec![NodeId(0)];

    let prepared = escape::escape_bare_ampersands(source);
    let mut reader = Reader::from_str(&prepared.text);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        let before = prepared.source_offset(reader.buffer_position() as usize);
        let event = reader.read_event().map_err(|err| SiftError::Markup {
            position: prepared.source_offset(reader.error_position() as usize),
            message: err.to_string(),
        })?;
        let after = prepared.source_offset(reader.buffer_position() as usize);

        match event {
            Event::Start(tag) => {
                let element = element_from_tag(&tag, before, after);
                let is_void = VOID_ELEMENTS.contains(&element.name.as_str());
                let id = push_node(&mut nodes, &open, NodeData::Element(element));
                if !is_void {
                    open.push(id);
                }
            }
            Event::Empty(tag) => {
                let element = element_from_tag(&tag, before, after);
                push_node(&mut nodes, &open, NodeData::Element(element));
            }
            Event::End(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase();
                let depth = open.iter().rposition(|id| match &nodes[id.0].data {
                    NodeData::Element(element) => element.name == name,
                    _ => false,
                });
                match depth {
                    Some(depth) => {
                        // Anything still open above the match was implicitly closed here
                        while open.len() > depth + 1 {
                            if let Some(id) = open.pop() {
                                close_element(&mut nodes, id, before, before);
                            }
                        }
                        if let Some(id) = open.pop() {
                            close_element(&mut nodes, id, before, after);
                        }
                    }
                    None => trace!(tag = %name, position = before, "Ignoring stray end tag"),
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text);
                push_text(&mut nodes, &open, &escape::decode_entities(&raw));
            }
            Event::CData(data) => {
                push_text(&mut nodes, &open, &String::from_utf8_lossy(&data));
            }
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference).into_owned();
                match escape::resolve_entity(&name) {
                    Some(c) => push_text(&mut nodes, &open, c.encode_utf8(&mut [0u8; 4])),
                    None => push_text(&mut nodes, &open, &format!("&{name};")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let end = source.len();
    while open.len() > 1 {
        if let Some(id) = open.pop() {
            close_element(&mut nodes, id, end, end);
        }
    }

    Ok(nodes)
}

fn element_from_tag(tag: &BytesStart<'_>, before: usize, after: usize) -> Element {
    let name = String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase();
    let attrs = tag
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = escape::decode_entities(&String::from_utf8_lossy(&attr.value));
            (key, value)
        })
        .collect();

    Element {
        name,
        attrs,
        inner: after..after,
        outer: before..after,
    }
}

fn push_node(nodes: &mut Vec<Node>, open: &[NodeId], data: NodeData) -> NodeId {
    let parent = open.last().copied().unwrap_or(NodeId(0));
    let id = NodeId(nodes.len());
    nodes.push(Node {
        parent: Some(parent),
        children: Vec::new(),
        data,
    });
    nodes[parent.0].children.push(id);
    id
}

fn push_text(nodes: &mut Vec<Node>, open: &[NodeId], text: &str) {
    if text.is_empty() {
        return;
    }
    let parent = open.last().copied().unwrap_or(NodeId(0));
    if let Some(last) = nodes[parent.0].children.last().copied() {
        if let NodeData::Text(existing) = &mut nodes[last.0].data {
            existing.push_str(text);
            return;
        }
    }
    push_node(nodes, open, NodeData::Text(text.to_string()));
}

fn close_element(nodes: &mut [Node], id: NodeId, inner_end: usize, outer_end: usize) {
    if let NodeData::Element(element) = &mut nodes[id.0].data {
        element.inner.end = inner_end.max(element.inner.start);
        element.outer.end = outer_end.max(element.inner.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_inner_and_outer_html_are_verbatim() {
        let doc = Document::parse(r#"<ul><li class="plugin"><b>Acme</b> tools</li></ul>"#).unwrap();
        let li = doc.select_first(&sel("li.plugin")).unwrap();
        assert_eq!(li.inner_html(), "<b>Acme</b> tools");
        assert_eq!(li.outer_html(), r#"<li class="plugin"><b>Acme</b> tools</li>"#);
        assert_eq!(li.text(), "Acme tools");
    }

    #[test]
    fn test_void_and_unclosed_elements() {
        let doc = Document::parse(
            r#"<div class="a"><img src="x.png"><br><p>one<p>two</div><span>after</span>"#,
        )
        .unwrap();
        let div = doc.select_first(&sel("div.a")).unwrap();
        assert_eq!(div.children().count(), 3);
        let span = doc.select_first(&sel("span")).unwrap();
        assert_eq!(span.parent().map(|p| p.name()), None);
        assert_eq!(span.text(), "after");
    }

    #[test]
    fn test_entities_in_text_and_attributes() {
        let doc = Document::parse(r#"<a href="/x?a=1&amp;b=2">Tom &amp; Jerry</a>"#).unwrap();
        let a = doc.select_first(&sel("a")).unwrap();
        assert_eq!(a.attr("href"), Some("/x?a=1&b=2"));
        assert_eq!(a.text(), "Tom & Jerry");
    }

    #[test]
    fn test_bare_ampersand_is_text() {
        let doc = Document::parse(r#"<ul><li class="plugin"><p>Tom & Jerry</p><a href="/q?a=1&b=2">AT&T</a></li></ul>"#)
            .unwrap();
        let p = doc.select_first(&sel("p")).unwrap();
        assert_eq!(p.text(), "Tom & Jerry");
        assert_eq!(p.outer_html(), "<p>Tom & Jerry</p>");

        let a = doc.select_first(&sel("a")).unwrap();
        assert_eq!(a.attr("href"), Some("/q?a=1&b=2"));
        assert_eq!(a.text(), "AT&T");

        let li = doc.select_first(&sel("li.plugin")).unwrap();
        assert_eq!(
            li.inner_html(),
            r#"<p>Tom & Jerry</p><a href="/q?a=1&b=2">AT&T</a>"#
        );
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = Document::parse("<div><span>x</span></em></div>").unwrap();
        let div = doc.select_first(&sel("div")).unwrap();
        assert_eq!(div.text(), "x");
        assert_eq!(div.outer_html(), "<div><span>x</span></em></div>");
    }

    #[test]
    fn test_valueless_attribute() {
        let doc = Document::parse(r#"<option value="5" selected>5.x</option>"#).unwrap();
        let option = doc.select_first(&sel("option")).unwrap();
        assert_eq!(option.attr("value"), Some("5"));
        assert!(option.attr("selected").is_some());
    }
}
