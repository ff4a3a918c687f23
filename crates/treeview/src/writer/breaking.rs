// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Splitting nodes at a position and merging them back together.
//!
//! Breaking keeps the original node as the left half and creates a new node
//! for the right half. Anything addressed before the split point therefore
//! stays valid, which the other writer operations rely on when they juggle
//! several anchors at once.

use log::{debug, trace};

use crate::view::position::Anchor;
use crate::view::{Document, NodeId, NodeKind, NodeType, Position, Range};
use crate::writer::{after_mutation, validate_position, validate_range, Writer};
use crate::Result;

impl Writer {
    /// Split attribute elements and text up to the nearest container, so
    /// that the returned position sits directly in that container. Nothing
    /// is split when the position already lies at the edge of its ancestors.
    ///
    /// Breaking at `<p><b>{fo|o}</b></p>` gives
    /// `<p><b>{fo}</b>|<b>{o}</b></p>`.
    pub fn break_at(
        &self,
        document: &mut Document,
        position: &Position,
    ) -> Result<Position> {
        debug!("break_at {position:?}");
        validate_position(document, position)?;
        let anchor = break_attributes(document, position.anchor());
        after_mutation(document);
        Ok(document.stamp(anchor))
    }

    /// Break at both ends of a range. The returned range has both ends in
    /// the shared container.
    pub fn break_range(
        &self,
        document: &mut Document,
        range: &Range,
    ) -> Result<Range> {
        debug!("break_range {range:?}");
        validate_range(document, range)?;
        let (start, end) = break_range_anchors(document, range.anchors());
        after_mutation(document);
        Ok(document.stamp_range(start, end))
    }

    /// Merge the nodes on both sides of a position if they are two texts or
    /// two similar attribute elements, and keep merging the children that
    /// meet as a result. Returns where the position ended up, which may be
    /// inside a text node.
    pub fn merge_attributes(
        &self,
        document: &mut Document,
        position: &Position,
    ) -> Result<Position> {
        debug!("merge_attributes {position:?}");
        document.validate_position(position)?;
        let anchor = merge_at(document, position.anchor());
        after_mutation(document);
        Ok(document.stamp(anchor))
    }
}

/// Break every attribute element and text between the anchor and its
/// nearest container. The anchor must have a container ancestor.
pub(crate) fn break_attributes(
    document: &mut Document,
    mut anchor: Anchor,
) -> Anchor {
    loop {
        anchor = match document.kind(anchor.parent).map(NodeKind::node_type) {
            Some(NodeType::ContainerElement) => return anchor,
            Some(NodeType::Text) => break_text(document, anchor),
            Some(NodeType::AttributeElement) => break_element(document, anchor),
            None => panic!("Breaking inside freed node {}", anchor.parent),
        };
    }
}

/// Break both ends of a range, end first so that splitting at the start
/// can only shift the end to the right.
pub(crate) fn break_range_anchors(
    document: &mut Document,
    (start, end): (Anchor, Anchor),
) -> (Anchor, Anchor) {
    if start == end {
        let anchor = break_attributes(document, start);
        return (anchor, anchor);
    }
    let end = break_attributes(document, end);
    let count = document.child_count(end.parent);
    let start = break_attributes(document, start);
    let shift = document.child_count(end.parent) - count;
    (start, Anchor::new(end.parent, end.offset + shift))
}

fn split_point(document: &Document, node: NodeId) -> (NodeId, usize) {
    match document.parent_and_index(node) {
        Some(found) => found,
        None => panic!("Node {node} has no container ancestor"),
    }
}

fn break_text(document: &mut Document, anchor: Anchor) -> Anchor {
    let (parent, index) = split_point(document, anchor.parent);
    if anchor.offset == 0 {
        return Anchor::new(parent, index);
    }
    if anchor.offset >= document.child_count(anchor.parent) {
        return Anchor::new(parent, index + 1);
    }
    let tail = document.split_text(anchor.parent, anchor.offset);
    let node = document.create_text(tail);
    document.insert_children(parent, index + 1, &[node]);
    trace!("split text {} at {} into {node}", anchor.parent, anchor.offset);
    Anchor::new(parent, index + 1)
}

fn break_element(document: &mut Document, anchor: Anchor) -> Anchor {
    let (parent, index) = split_point(document, anchor.parent);
    let count = document.child_count(anchor.parent);
    if anchor.offset == 0 {
        return Anchor::new(parent, index);
    }
    if anchor.offset >= count {
        return Anchor::new(parent, index + 1);
    }
    let clone = document.shallow_clone(anchor.parent);
    let tail = count - anchor.offset;
    let moved = document.remove_children(anchor.parent, anchor.offset, tail);
    document.insert_children(clone, 0, &moved);
    document.insert_children(parent, index + 1, &[clone]);
    trace!("split {} at {} into {clone}", anchor.parent, anchor.offset);
    Anchor::new(parent, index + 1)
}

enum Merge {
    Texts,
    Elements,
}

/// Merge around the anchor until the nodes on both sides of it can no
/// longer be merged. The left node always absorbs the right one.
pub(crate) fn merge_at(document: &mut Document, mut anchor: Anchor) -> Anchor {
    loop {
        if anchor.offset == 0
            || document.kind(anchor.parent).is_some_and(NodeKind::is_text)
        {
            return anchor;
        }
        let before = document.child(anchor.parent, anchor.offset - 1);
        let after = document.child(anchor.parent, anchor.offset);
        let (Some(before), Some(after)) = (before, after) else {
            return anchor;
        };
        let merge = match (document.kind(before), document.kind(after)) {
            (Some(NodeKind::Text(_)), Some(NodeKind::Text(_))) => Merge::Texts,
            (Some(NodeKind::Attribute(a)), Some(NodeKind::Attribute(b)))
                if a.is_similar(b) =>
            {
                Merge::Elements
            }
            _ => return anchor,
        };
        let count = document.child_count(before);
        match merge {
            Merge::Texts => {
                let data = document.text(after).unwrap_or_default().to_owned();
                document.free(after);
                document.push_text(before, &data);
                trace!("merged text {after} into {before}");
                return Anchor::new(before, count);
            }
            Merge::Elements => {
                let moved = document.remove_children(
                    after,
                    0,
                    document.child_count(after),
                );
                document.free(after);
                document.insert_children(before, count, &moved);
                trace!("merged {after} into {before}");
                anchor = Anchor::new(before, count);
            }
        }
    }
}

/// Merge at both ends of a range whose ends share a parent. A merge at the
/// start joins two children of that parent, moving the end one to the left.
pub(crate) fn merge_boundaries(
    document: &mut Document,
    start: Anchor,
    mut end: Anchor,
) -> (Anchor, Anchor) {
    let merged_start = merge_at(document, start);
    if start == end {
        return (merged_start, merged_start);
    }
    if merged_start != start
        && end.parent == start.parent
        && end.offset > start.offset
    {
        end.offset -= 1;
    }
    let merged_end = merge_at(document, end);
    (merged_start, merged_end)
}

#[cfg(test)]
mod test {
    use crate::notation::{parse, stringify};
    use crate::view::position::Anchor;
    use crate::writer::breaking::merge_boundaries;
    use crate::{AttributeElement, Document, Error, Range, Writer};

    fn break_at(notation: &str) -> String {
        let mut parsed = parse(notation).unwrap();
        let position = parsed.range.unwrap().start();
        let position = Writer::new()
            .break_at(&mut parsed.document, &position)
            .unwrap();
        let range = Range::collapsed(position);
        stringify(&parsed.document, parsed.root, Some(&range))
    }

    fn merge(notation: &str) -> String {
        let mut parsed = parse(notation).unwrap();
        let position = parsed.range.unwrap().start();
        let position = Writer::new()
            .merge_attributes(&mut parsed.document, &position)
            .unwrap();
        let range = Range::collapsed(position);
        stringify(&parsed.document, parsed.root, Some(&range))
    }

    #[test]
    fn break_in_container_changes_nothing() {
        assert_eq!(break_at("<p>{foo}[]{bar}</p>"), "<p>{foo}[]{bar}</p>");
    }

    #[test]
    fn break_splits_text() {
        assert_eq!(break_at("<p>{fo[]o}</p>"), "<p>{fo}[]{o}</p>");
    }

    #[test]
    fn break_splits_nested_attributes() {
        assert_eq!(
            break_at("<p><b:1><i:2>{fo[]o}</i></b></p>"),
            "<p><b:1><i:2>{fo}</i></b>[]<b:1><i:2>{o}</i></b></p>"
        );
    }

    #[test]
    fn break_keeps_element_attributes() {
        assert_eq!(
            break_at(r#"<p><a:5 href="x">{ab[]cd}</a></p>"#),
            r#"<p><a:5 href="x">{ab}</a>[]<a:5 href="x">{cd}</a></p>"#
        );
    }

    #[test]
    fn break_at_edges_only_moves_the_position() {
        assert_eq!(
            break_at("<p><b:1>{[]foo}</b></p>"),
            "<p>[]<b:1>{foo}</b></p>"
        );
        assert_eq!(
            break_at("<p><b:1>{foo[]}</b></p>"),
            "<p><b:1>{foo}</b>[]</p>"
        );
    }

    #[test]
    fn break_without_container_fails() {
        let mut document = Document::new();
        let b = document.create_attribute(AttributeElement::new("b"));
        let position = document.position(b, 0).unwrap();
        assert_eq!(
            Writer::new().break_at(&mut document, &position),
            Err(Error::InvalidPositionContainer)
        );
    }

    #[test]
    fn break_range_breaks_both_ends() {
        let mut parsed = parse("<p><b:1>{f[oo}</b>{ba]r}</p>").unwrap();
        let range = parsed.range.unwrap();
        let range = Writer::new()
            .break_range(&mut parsed.document, &range)
            .unwrap();
        assert_eq!(
            stringify(&parsed.document, parsed.root, Some(&range)),
            "<p><b:1>{f}</b>[<b:1>{oo}</b>{ba}]{r}</p>"
        );
    }

    #[test]
    fn break_collapsed_range() {
        let mut parsed = parse("<p><b:1>{f[]oo}</b></p>").unwrap();
        let range = parsed.range.unwrap();
        let range = Writer::new()
            .break_range(&mut parsed.document, &range)
            .unwrap();
        assert!(range.is_collapsed());
        assert_eq!(
            stringify(&parsed.document, parsed.root, Some(&range)),
            "<p><b:1>{f}</b>[]<b:1>{oo}</b></p>"
        );
    }

    #[test]
    fn merge_texts() {
        assert_eq!(merge("<p>{foo}[]{bar}</p>"), "<p>{foo[]bar}</p>");
    }

    #[test]
    fn merge_similar_elements_recursively() {
        assert_eq!(
            merge("<p><b:1><i:2>{foo}</i></b>[]<b:1><i:2>{bar}</i></b></p>"),
            "<p><b:1><i:2>{foo[]bar}</i></b></p>"
        );
    }

    #[test]
    fn do_not_merge_different_priorities() {
        assert_eq!(
            merge("<p><b:1>{foo}</b>[]<b:2>{bar}</b></p>"),
            "<p><b:1>{foo}</b>[]<b:2>{bar}</b></p>"
        );
    }

    #[test]
    fn do_not_merge_different_attributes() {
        assert_eq!(
            merge(r#"<p><a:1 href="x">{foo}</a>[]<a:1 href="y">{bar}</a></p>"#),
            r#"<p><a:1 href="x">{foo}</a>[]<a:1 href="y">{bar}</a></p>"#
        );
    }

    #[test]
    fn merge_at_edge_changes_nothing() {
        assert_eq!(merge("<p>[]{foo}</p>"), "<p>[]{foo}</p>");
        assert_eq!(merge("<p>{foo}[]</p>"), "<p>{foo}[]</p>");
        assert_eq!(merge("<p>{f[]oo}</p>"), "<p>{f[]oo}</p>");
    }

    #[test]
    fn merge_keeps_the_left_node() {
        let mut parsed =
            parse("<p><b:1>{foo}</b>[]<b:1>{bar}</b></p>").unwrap();
        let left = parsed.document.children(parsed.root)[0];
        let position = parsed.range.unwrap().start();
        Writer::new()
            .merge_attributes(&mut parsed.document, &position)
            .unwrap();
        assert_eq!(parsed.document.children(parsed.root), &[left]);
    }

    #[test]
    fn merging_start_shifts_end() {
        let mut parsed = parse("<p>{foo}[{bar}]{baz}</p>").unwrap();
        let (start, end) = parsed.range.unwrap().anchors();
        let (start, end) = merge_boundaries(&mut parsed.document, start, end);
        let text = parsed.document.children(parsed.root)[0];
        assert_eq!(start, Anchor::new(text, 3));
        assert_eq!(end, Anchor::new(text, 6));
        assert_eq!(parsed.document.text(text), Some("foobarbaz"));
    }
}
