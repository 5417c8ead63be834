//! Owned, mutable SVG tree
//!
//! `roxmltree` gives a read-only view, so documents are copied into plain
//! elements that the sketch pass can rewrite and serialize back out.

use crate::core::DiagramError;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Prolog written before every serialized document
pub const XML_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n";

/// Id of the group holding a rendered graph
pub const GRAPH_GROUP_ID: &str = "graph0";

#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
    Comment(String),
}

/// An element with its attributes in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    /// Qualified name, including a namespace prefix if the source used one
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: SvgElement) -> Self {
        self.children.push(SvgNode::Element(child));
        self
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Replace the local part of the name, keeping any prefix.
    pub fn rename(&mut self, local: &str) {
        self.name = match self.name.rsplit_once(':') {
            Some((prefix, _)) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        };
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(index).1)
    }

    /// Child elements, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|child| match child {
            SvgNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Depth-first search including `self`.
    pub fn find(&self, predicate: &dyn Fn(&SvgElement) -> bool) -> Option<&SvgElement> {
        if predicate(self) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find(predicate))
    }

    pub fn find_mut(
        &mut self,
        predicate: &dyn Fn(&SvgElement) -> bool,
    ) -> Option<&mut SvgElement> {
        if predicate(self) {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let SvgNode::Element(element) = child {
                if let Some(found) = element.find_mut(predicate) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// All descendant elements with the given local name.
    pub fn descendants_named<'a>(&'a self, local: &str, out: &mut Vec<&'a SvgElement>) {
        for child in self.elements() {
            if child.local_name() == local {
                out.push(child);
            }
            child.descendants_named(local, out);
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(element) => element.write_to(out),
                SvgNode::Text(text) => out.push_str(&escape_text(text)),
                SvgNode::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(XML_NS) => format!("xml:{}", local),
        Some(uri) => match node.lookup_prefix(uri) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
            _ => local.to_string(),
        },
        None => local.to_string(),
    }
}

fn build_element(node: roxmltree::Node<'_, '_>) -> SvgElement {
    let tag = node.tag_name();
    let mut element = SvgElement::new(qualified_name(node, tag.namespace(), tag.name()));

    // Declarations are re-emitted only where they first come into scope.
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        element.attrs.push((key, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        element.attrs.push((
            qualified_name(node, attr.namespace(), attr.name()),
            attr.value().to_string(),
        ));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(SvgNode::Element(build_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(SvgNode::Text(text.to_string()));
            }
        } else if child.is_comment() {
            if let Some(text) = child.text() {
                element.children.push(SvgNode::Comment(text.to_string()));
            }
        }
    }
    element
}

/// A parsed SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: SvgElement,
}

impl SvgDocument {
    /// Parse SVG text. Document type declarations are accepted and dropped.
    pub fn parse(svg: &str) -> Result<Self, DiagramError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(svg, options)?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(DiagramError::invalid_svg(format!(
                "expected <svg> root, found <{}>",
                root.tag_name().name()
            )));
        }
        Ok(Self {
            root: build_element(root),
        })
    }

    /// Remove the page background: polygons directly inside the graph group.
    ///
    /// Returns how many polygons were removed; documents without a graph
    /// group are left untouched.
    pub fn strip_background(&mut self) -> usize {
        let is_graph = |element: &SvgElement| {
            element.local_name() == "g" && element.attr("id") == Some(GRAPH_GROUP_ID)
        };
        let Some(group) = self.root.find_mut(&is_graph) else {
            return 0;
        };
        let before = group.children.len();
        group.children.retain(|child| {
            !matches!(child, SvgNode::Element(element) if element.local_name() == "polygon")
        });
        before - group.children.len()
    }

    /// Serialize with the standalone XML prolog and a trailing newline.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::from(XML_PROLOG);
        self.root.write_to(&mut out);
        out.push('\n');
        out
    }
}

impl std::str::FromStr for SvgDocument {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
