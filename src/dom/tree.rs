//! In-memory document tree
//!
//! Arena of element nodes rooted at `html > body`. Layout (rects, styles,
//! scroll) is supplied by the builder rather than computed.

use std::collections::BTreeMap;

use super::{Element, Rect, ScrollOffset};

/// Index of a node within its [`DocumentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Child {
    Element(usize),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    class_name: Option<String>,
    input_type: Option<String>,
    parent: Option<usize>,
    children: Vec<Child>,
    rect: Rect,
    styles: BTreeMap<String, String>,
}

impl Node {
    fn new(tag: &str, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            class_name: None,
            input_type: None,
            parent,
            children: Vec::new(),
            rect: Rect::default(),
            styles: BTreeMap::new(),
        }
    }
}

/// A synthetic document
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    body: usize,
    scroll: ScrollOffset,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Create a document containing only `html > body`
    pub fn new() -> Self {
        let mut html = Node::new("html", None);
        html.children.push(Child::Element(1));
        let body = Node::new("body", Some(0));

        Self {
            nodes: vec![html, body],
            body: 1,
            scroll: ScrollOffset::default(),
        }
    }

    /// The document root (`html`)
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The body boundary
    pub fn body(&self) -> NodeId {
        NodeId(self.body)
    }

    /// Append a child element to `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(Node::new(tag, Some(parent.0)));
        self.nodes[parent.0].children.push(Child::Element(index));
        NodeId(index)
    }

    /// Create an element that is not attached to the document
    pub fn create_detached(&mut self, tag: &str) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(Node::new(tag, None));
        NodeId(index)
    }

    /// Append a text run to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        self.nodes[parent.0]
            .children
            .push(Child::Text(text.to_string()));
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> &mut Self {
        self.nodes[node.0].id = Some(id.to_string());
        self
    }

    pub fn set_class(&mut self, node: NodeId, class_name: &str) -> &mut Self {
        self.nodes[node.0].class_name = Some(class_name.to_string());
        self
    }

    pub fn set_input_type(&mut self, node: NodeId, input_type: &str) -> &mut Self {
        self.nodes[node.0].input_type = Some(input_type.to_string());
        self
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> &mut Self {
        self.nodes[node.0].rect = rect;
        self
    }

    /// Set a resolved style property
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> &mut Self {
        self.nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
        self
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) -> &mut Self {
        self.scroll = ScrollOffset { x, y };
        self
    }

    /// Borrow a node as an [`Element`]
    pub fn element(&self, node: NodeId) -> ElementHandle<'_> {
        ElementHandle { tree: self, node }
    }

    /// First element in document order whose `id` matches
    pub fn find_by_id(&self, id: &str) -> Option<ElementHandle<'_>> {
        self.descendants(self.root())
            .into_iter()
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
            .map(|n| self.element(n))
    }

    /// Elements with tag `tag` in document order
    pub fn find_by_tag(&self, tag: &str) -> Vec<ElementHandle<'_>> {
        self.descendants(self.root())
            .into_iter()
            .filter(|n| self.nodes[n.0].tag.eq_ignore_ascii_case(tag))
            .map(|n| self.element(n))
            .collect()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        for child in &self.nodes[node.0].children {
            if let Child::Element(index) = child {
                out.extend(self.descendants(NodeId(*index)));
            }
        }
        out
    }

    fn text_of(&self, index: usize, out: &mut String) {
        for child in &self.nodes[index].children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(child) => self.text_of(*child, out),
            }
        }
    }
}

/// Borrowed element of a [`DocumentTree`]
#[derive(Debug, Clone, Copy)]
pub struct ElementHandle<'a> {
    tree: &'a DocumentTree,
    node: NodeId,
}

impl ElementHandle<'_> {
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    fn node(&self) -> &Node {
        &self.tree.nodes[self.node.0]
    }
}

impl PartialEq for ElementHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<'a> Element for ElementHandle<'a> {
    fn tag_name(&self) -> String {
        self.node().tag.clone()
    }

    fn id(&self) -> Option<String> {
        self.node().id.clone().filter(|id| !id.is_empty())
    }

    fn class_name(&self) -> Option<String> {
        self.node().class_name.clone()
    }

    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|index| self.tree.element(NodeId(index)))
    }

    fn children(&self) -> Vec<Self> {
        self.node()
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(index) => Some(self.tree.element(NodeId(*index))),
                Child::Text(_) => None,
            })
            .collect()
    }

    fn is_boundary(&self) -> bool {
        self.node.0 == self.tree.body
    }

    fn client_rect(&self) -> Rect {
        self.node().rect
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.tree.scroll
    }

    fn computed_style(&self, property: &str) -> Option<String> {
        self.node().styles.get(property).cloned()
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        self.tree.text_of(self.node.0, &mut out);
        out
    }

    fn input_type(&self) -> Option<String> {
        self.node().input_type.clone()
    }
}
