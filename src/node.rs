//! Node model.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. A node owns its children list; `parent` is a plain back-link
//! for upward lookup. Nodes removed from the tree stay in the arena but are
//! unreachable from the root.

use std::fmt::Write as _;

use crate::Range;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Soft,
    Hard,
}

/// Node variants.
///
/// The first four are containers owned by the block layer; the rest are
/// produced by inline construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    TableCell,
    Text(String),
    Emphasis,
    Strong,
    Strike,
    InlineCode(String),
    Link { url: String, title: Option<String> },
    Image { url: String, alt: String, title: Option<String> },
    Html(String),
    LineBreak(BreakKind),
    FormulaInline(String),
    /// Raw character reference such as `&copy;`; decoding is left to the renderer.
    CharRef(String),
}

impl NodeKind {
    /// Short variant name used by [`Tree::outline`].
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::TableCell => "TableCell",
            NodeKind::Text(_) => "Text",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::Strong => "Strong",
            NodeKind::Strike => "Strike",
            NodeKind::InlineCode(_) => "InlineCode",
            NodeKind::Link { .. } => "Link",
            NodeKind::Image { .. } => "Image",
            NodeKind::Html(_) => "Html",
            NodeKind::LineBreak(BreakKind::Soft) => "SoftBreak",
            NodeKind::LineBreak(BreakKind::Hard) => "HardBreak",
            NodeKind::FormulaInline(_) => "FormulaInline",
            NodeKind::CharRef(_) => "CharRef",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Source bytes the node was built from.
    pub range: Range,
}

/// Arena of nodes with a `Document` root at index 0.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                range: Range::default(),
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id in allocation order, detached ones included.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Create a detached node.
    pub fn alloc(&mut self, kind: NodeKind, range: Range) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            range,
        });
        id
    }

    /// Create a node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, range: Range) -> NodeId {
        let id = self.alloc(kind, range);
        self.attach(parent, id);
        id
    }

    /// Make a detached node the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(child).parent.is_none());
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    /// Remove `id` from its parent's children.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.get_mut(id).parent.take() {
            self.get_mut(parent).children.retain(|&c| c != id);
        }
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.get_mut(id).children);
        for child in children {
            self.get_mut(child).parent = None;
        }
    }

    /// Position of `child` among its parent's children.
    pub fn position(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Move the children of `parent` in `from..to` into a new node of `kind`,
    /// which takes their place.
    pub fn wrap_children(&mut self, parent: NodeId, from: usize, to: usize, kind: NodeKind, range: Range) -> NodeId {
        let wrapper = self.alloc(kind, range);
        let moved: Vec<NodeId> = self.get_mut(parent).children.splice(from..to, [wrapper]).collect();
        for &child in &moved {
            self.get_mut(child).parent = Some(wrapper);
        }
        let data = self.get_mut(wrapper);
        data.parent = Some(parent);
        data.children = moved;
        wrapper
    }

    /// Merge adjacent `Text` children throughout the subtree and drop empty ones.
    pub fn merge_text(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.get_mut(id).children);
        let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let NodeKind::Text(text) = &self.get(child).kind else {
                self.merge_text(child);
                merged.push(child);
                continue;
            };
            if text.is_empty() {
                self.get_mut(child).parent = None;
                continue;
            }
            let prev = merged.last().copied().filter(|&p| matches!(self.get(p).kind, NodeKind::Text(_)));
            let Some(prev) = prev else {
                merged.push(child);
                continue;
            };
            let text = text.clone();
            let range = self.get(child).range;
            self.get_mut(child).parent = None;
            let prev_data = self.get_mut(prev);
            if let NodeKind::Text(existing) = &mut prev_data.kind {
                existing.push_str(&text);
            }
            prev_data.range = prev_data.range.cover(range);
        }
        self.get_mut(id).children = merged;
    }

    /// Preorder walk of the subtree under `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Plain text of the subtree, as used for image `alt` text.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.get(id).kind {
            NodeKind::Text(s) | NodeKind::InlineCode(s) | NodeKind::CharRef(s) | NodeKind::FormulaInline(s) => {
                out.push_str(s)
            }
            NodeKind::Image { alt, .. } => out.push_str(alt),
            NodeKind::LineBreak(_) => out.push(' '),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Compact dump of a node's children, e.g.
    /// `Strong[Text("bold "), Emphasis[Text("and italic")]]`.
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        for (i, &child) in self.children(id).iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.outline_node(child, &mut out);
        }
        out
    }

    fn outline_node(&self, id: NodeId, out: &mut String) {
        let data = self.get(id);
        out.push_str(data.kind.name());
        // Writing into a String cannot fail.
        let _ = match &data.kind {
            NodeKind::Text(s)
            | NodeKind::InlineCode(s)
            | NodeKind::Html(s)
            | NodeKind::FormulaInline(s)
            | NodeKind::CharRef(s) => write!(out, "({s:?})"),
            NodeKind::Heading { level } => write!(out, "({level})"),
            NodeKind::Link { url, title: Some(title) } => write!(out, "({url:?}, {title:?})"),
            NodeKind::Link { url, title: None } => write!(out, "({url:?})"),
            NodeKind::Image { url, alt, .. } => write!(out, "({url:?}, {alt:?})"),
            _ => Ok(()),
        };
        let is_container = matches!(
            data.kind,
            NodeKind::Document
                | NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::TableCell
                | NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Strike
                | NodeKind::Link { .. }
        );
        if is_container {
            out.push('[');
            out.push_str(&self.outline(id));
            out.push(']');
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
