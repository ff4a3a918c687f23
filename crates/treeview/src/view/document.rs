// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Arena that owns every node of a view tree.
//!
//! Nodes live in a `Vec` owned by the [`Document`] and refer to each other
//! through [`NodeId`]s: a parent holds the ordered list of its children's
//! ids and each child keeps a back reference to its parent. A node without
//! a parent is the root of its own tree, so one document may hold several
//! trees at once (for example a freshly created element that has not been
//! inserted yet).
//!
//! Ids are never reused. Once a node is freed (for instance because it was
//! merged into a similar sibling) every handle to it stays invalid.
//!
//! Every structural change advances the document [`Generation`]. Positions
//! and ranges remember the generation they were derived in, and the writer
//! refuses to use them once the document has moved on.

use std::fmt;

use crate::view::nodes::{
    AttributeElement, ContainerElement, NodeKind, NodeType, TextNode,
};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug, Default)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    generation: Generation,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a detached text node. Creating nodes does not change the
    /// structure of existing trees, so it does not advance the generation.
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.create(TextNode::new(data).into())
    }

    pub fn create_attribute(&mut self, element: AttributeElement) -> NodeId {
        self.create(element.into())
    }

    pub fn create_container(&mut self, element: ContainerElement) -> NodeId {
        self.create(element.into())
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Some(NodeData::new(kind)));
        NodeId(self.nodes.len() - 1)
    }

    /// Append a detached node as the last child of `parent`. This is the
    /// building block for assembling trees; editing existing content goes
    /// through [`crate::Writer`].
    pub fn append_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<()> {
        let parent_data = self.get(parent).ok_or(Error::UnknownNode(parent))?;
        if parent_data.kind.is_text() {
            return Err(Error::UnexpectedNodeType {
                node: parent,
                expected: NodeType::ContainerElement,
                found: NodeType::Text,
            });
        }
        self.check_insertable(parent, child)?;
        let index = self.child_count(parent);
        self.insert_children(parent, index, &[child]);
        Ok(())
    }

    /// Free a detached node together with its whole subtree.
    pub fn discard(&mut self, node: NodeId) -> Result<()> {
        let data = self.get(node).ok_or(Error::UnknownNode(node))?;
        if data.parent.is_some() {
            return Err(Error::NodeAlreadyAttached(node));
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes[id.0].take() {
                stack.extend(data.children);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.get(node).map(NodeData::kind)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.kind(node)?.as_text().map(TextNode::data)
    }

    pub fn attribute(&self, node: NodeId) -> Option<&AttributeElement> {
        self.kind(node)?.as_attribute()
    }

    pub fn container(&self, node: NodeId) -> Option<&ContainerElement> {
        self.kind(node)?.as_container()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(NodeData::children).unwrap_or(&[])
    }

    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    /// Number of children, or number of chars for text nodes.
    pub fn child_count(&self, node: NodeId) -> usize {
        match self.get(node) {
            Some(NodeData {
                kind: NodeKind::Text(text),
                ..
            }) => text.len(),
            Some(data) => data.children.len(),
            None => 0,
        }
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.parent_and_index(node).map(|(_, index)| index)
    }

    pub fn parent_and_index(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let index = self.children(parent).iter().position(|c| *c == node)?;
        Some((parent, index))
    }

    /// The node itself followed by all its ancestors up to the root.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.get(node).map(|_| node),
        }
    }

    pub fn root_of(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().unwrap_or(node)
    }

    /// Child indices leading from the root of the tree down to `node`.
    pub fn path(&self, node: NodeId) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .ancestors(node)
            .filter_map(|n| self.index_of(n))
            .collect();
        path.reverse();
        path
    }

    /// The closest container element, counting the node itself.
    pub fn nearest_container(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|n| self.kind(*n).is_some_and(NodeKind::is_container))
    }

    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// All text of the subtree, in document order.
    pub fn plain_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match self.kind(id) {
                Some(NodeKind::Text(text)) => out.push_str(text.data()),
                Some(_) => stack.extend(self.children(id).iter().rev()),
                None => {}
            }
        }
        out
    }

    pub(crate) fn check_insertable(
        &self,
        parent: NodeId,
        node: NodeId,
    ) -> Result<()> {
        let data = self.get(node).ok_or(Error::UnknownNode(node))?;
        if data.parent.is_some() {
            return Err(Error::NodeAlreadyAttached(node));
        }
        if self.is_ancestor_or_self(node, parent) {
            return Err(Error::InvalidInsertion(node));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Raw structural operations. Callers validate their arguments first: a
    // bad id here is a broken contract, not a recoverable error.
    // -----------------------------------------------------------------------

    pub(crate) fn data(&self, node: NodeId) -> &NodeData {
        match self.get(node) {
            Some(data) => data,
            None => panic!("Node {node} is not part of the document"),
        }
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        match self.nodes.get_mut(node.0).and_then(Option::as_mut) {
            Some(data) => data,
            None => panic!("Node {node} is not part of the document"),
        }
    }

    fn touch(&mut self) {
        self.generation = self.generation.next();
    }

    pub(crate) fn insert_children(
        &mut self,
        parent: NodeId,
        index: usize,
        nodes: &[NodeId],
    ) {
        if nodes.is_empty() {
            return;
        }
        for node in nodes {
            let data = self.data_mut(*node);
            assert!(data.parent.is_none(), "Node {node} already has a parent");
            data.parent = Some(parent);
        }
        let data = self.data_mut(parent);
        assert!(!data.kind.is_text(), "Inserting children into text!");
        data.children.splice(index..index, nodes.iter().copied());
        self.touch();
    }

    pub(crate) fn remove_children(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Vec<NodeId> {
        if count == 0 {
            return Vec::new();
        }
        let removed: Vec<NodeId> = self
            .data_mut(parent)
            .children
            .drain(index..index + count)
            .collect();
        for node in &removed {
            self.data_mut(*node).parent = None;
        }
        self.touch();
        removed
    }

    /// Detach a node from its parent and free it. Its children must have
    /// been moved elsewhere already.
    pub(crate) fn free(&mut self, node: NodeId) {
        if let Some((parent, index)) = self.parent_and_index(node) {
            self.remove_children(parent, index, 1);
        }
        let data = self.data(node);
        assert!(
            data.children.is_empty(),
            "Freeing node {node} that still has children"
        );
        self.nodes[node.0] = None;
        self.touch();
    }

    /// Shorten a text node to `offset` chars and return what was cut off.
    pub(crate) fn split_text(&mut self, node: NodeId, offset: usize) -> String {
        let tail = match &mut self.data_mut(node).kind {
            NodeKind::Text(text) => text.split_off(offset),
            _ => panic!("Splitting text of non-text node {node}"),
        };
        self.touch();
        tail
    }

    pub(crate) fn push_text(&mut self, node: NodeId, data: &str) {
        match &mut self.data_mut(node).kind {
            NodeKind::Text(text) => text.push_str(data),
            _ => panic!("Appending text to non-text node {node}"),
        }
        self.touch();
    }

    /// Detached copy of an element without its children.
    pub(crate) fn shallow_clone(&mut self, node: NodeId) -> NodeId {
        let kind = self.data(node).kind.clone();
        self.create(kind)
    }

    /// Iterate over every live node id.
    pub(crate) fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| NodeId(i))
    }
}

pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}
