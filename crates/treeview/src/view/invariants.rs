// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Structural checks and content comparison.

use std::collections::HashSet;

use crate::view::{Document, NodeId, NodeKind};

impl Document {
    /// Panic if parent and child links disagree anywhere in the arena.
    ///
    /// The writer runs this after every operation when the
    /// `assert-invariants` feature is enabled.
    pub fn explicitly_assert_invariants(&self) {
        let mut seen = HashSet::new();
        for node in self.node_ids() {
            let data = self.data(node);
            if data.kind().is_text() {
                assert!(
                    data.children().is_empty(),
                    "Text node {node} has children"
                );
            }
            if let Some(parent) = data.parent() {
                assert!(
                    self.children(parent).contains(&node),
                    "Node {node} is not among the children of its parent \
                     {parent}"
                );
            }
            for child in data.children() {
                assert!(
                    self.contains(*child),
                    "Node {node} has freed child {child}"
                );
                assert_eq!(
                    self.parent(*child),
                    Some(node),
                    "Child {child} of {node} points at another parent"
                );
                assert!(seen.insert(*child), "Node {child} has two owners");
            }
        }
    }

    /// A pair of adjacent sibling attribute elements below `root` that are
    /// similar and so should have been merged.
    pub fn find_mergeable_siblings(
        &self,
        root: NodeId,
    ) -> Option<(NodeId, NodeId)> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let children = self.children(node);
            for pair in children.windows(2) {
                let similar = match (self.kind(pair[0]), self.kind(pair[1])) {
                    (
                        Some(NodeKind::Attribute(a)),
                        Some(NodeKind::Attribute(b)),
                    ) => a.is_similar(b),
                    _ => false,
                };
                if similar {
                    return Some((pair[0], pair[1]));
                }
            }
            stack.extend(children);
        }
        None
    }

    /// Whether two subtrees carry the same content: same element names,
    /// attributes and priorities, and the same text. How text is split into
    /// adjacent text nodes does not matter, nor do node ids.
    pub fn is_content_equal(
        &self,
        root: NodeId,
        other: &Document,
        other_root: NodeId,
    ) -> bool {
        let mut stack = vec![(root, other_root)];
        while let Some((a, b)) = stack.pop() {
            match (self.kind(a), other.kind(b)) {
                (Some(NodeKind::Text(x)), Some(NodeKind::Text(y)))
                    if x == y => {}
                (Some(NodeKind::Attribute(x)), Some(NodeKind::Attribute(y)))
                    if x.is_similar(y) => {}
                (Some(NodeKind::Container(x)), Some(NodeKind::Container(y)))
                    if x == y => {}
                _ => return false,
            }
            let left = self.content_children(a);
            let right = other.content_children(b);
            if left.len() != right.len() {
                return false;
            }
            for (x, y) in left.into_iter().zip(right) {
                match (x, y) {
                    (Content::Text(x), Content::Text(y)) if x == y => {}
                    (Content::Node(x), Content::Node(y)) => {
                        stack.push((x, y))
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    /// Children with runs of adjacent text nodes joined and empty texts
    /// dropped.
    fn content_children(&self, node: NodeId) -> Vec<Content> {
        let mut out: Vec<Content> = Vec::new();
        for child in self.children(node) {
            match self.kind(*child) {
                Some(NodeKind::Text(text)) if text.is_empty() => {}
                Some(NodeKind::Text(text)) => match out.last_mut() {
                    Some(Content::Text(last)) => last.push_str(text.data()),
                    _ => out.push(Content::Text(text.data().to_owned())),
                },
                _ => out.push(Content::Node(*child)),
            }
        }
        out
    }
}

enum Content {
    Text(String),
    Node(NodeId),
}

#[cfg(test)]
mod test {
    use crate::view::{AttributeElement, ContainerElement, Document};

    #[test]
    fn freshly_built_tree_satisfies_invariants() {
        let mut doc = Document::new();
        let p = doc.create_container(ContainerElement::new("p"));
        let b = doc.create_attribute(AttributeElement::new("b"));
        let text = doc.create_text("foo");
        doc.append_child(p, b).unwrap();
        doc.append_child(b, text).unwrap();
        doc.explicitly_assert_invariants();
    }

    #[test]
    fn content_equality_ignores_text_splits() {
        let mut doc = Document::new();
        let p1 = doc.create_container(ContainerElement::new("p"));
        let foo = doc.create_text("foo");
        let bar = doc.create_text("bar");
        doc.append_child(p1, foo).unwrap();
        doc.append_child(p1, bar).unwrap();

        let mut other = Document::new();
        let p2 = other.create_container(ContainerElement::new("p"));
        let foobar = other.create_text("foobar");
        other.append_child(p2, foobar).unwrap();

        assert!(doc.is_content_equal(p1, &other, p2));
    }

    #[test]
    fn content_equality_checks_priority() {
        let mut doc = Document::new();
        let p = doc.create_container(ContainerElement::new("p"));
        let b1 =
            doc.create_attribute(AttributeElement::new("b").with_priority(1));
        doc.append_child(p, b1).unwrap();

        let mut other = Document::new();
        let q = other.create_container(ContainerElement::new("p"));
        let b2 =
            other.create_attribute(AttributeElement::new("b").with_priority(2));
        other.append_child(q, b2).unwrap();

        assert!(!doc.is_content_equal(p, &other, q));
    }

    #[test]
    fn finds_similar_siblings() {
        let mut doc = Document::new();
        let p = doc.create_container(ContainerElement::new("p"));
        let b1 = doc.create_attribute(AttributeElement::new("b"));
        let b2 = doc.create_attribute(AttributeElement::new("b"));
        doc.append_child(p, b1).unwrap();
        assert_eq!(doc.find_mergeable_siblings(p), None);
        doc.append_child(p, b2).unwrap();
        assert_eq!(doc.find_mergeable_siblings(p), Some((b1, b2)));
    }
}
