// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashSet;

use log::debug;

use crate::view::position::Anchor;
use crate::view::{Document, NodeId, Position, PositionRelation, Range};
use crate::writer::breaking::{
    break_attributes, break_range_anchors, merge_at, merge_boundaries,
};
use crate::writer::{
    after_mutation, validate_position, validate_range, Removal, Writer,
};
use crate::{Error, Result};

impl Writer {
    /// Insert detached nodes at `position`, breaking attribute elements so
    /// that the nodes land directly in the nearest container. Returns the
    /// range covering the inserted nodes, after merging them with similar
    /// neighbours.
    ///
    /// Inserting no nodes still breaks and re-merges, and returns a
    /// collapsed range.
    pub fn insert(
        &self,
        document: &mut Document,
        position: &Position,
        nodes: &[NodeId],
    ) -> Result<Range> {
        debug!("insert {nodes:?} at {position:?}");
        validate_position(document, position)?;
        let mut seen = HashSet::new();
        for node in nodes {
            document.check_insertable(position.parent(), *node)?;
            if !seen.insert(*node) {
                return Err(Error::InvalidInsertion(*node));
            }
        }

        let at = break_attributes(document, position.anchor());
        let (start, end) = insert_at(document, at, nodes);
        after_mutation(document);
        Ok(document.stamp_range(start, end))
    }

    /// Take the content of `range` out of the tree, breaking attribute
    /// elements at its ends. The removed nodes are detached but still live.
    pub fn remove(
        &self,
        document: &mut Document,
        range: &Range,
    ) -> Result<Removal> {
        debug!("remove {range:?}");
        validate_range(document, range)?;
        if range.is_collapsed() {
            return Ok(Removal {
                nodes: Vec::new(),
                position: range.start(),
            });
        }

        let (start, end) = break_range_anchors(document, range.anchors());
        let nodes = document.remove_children(
            start.parent,
            start.offset,
            end.offset - start.offset,
        );
        let position = merge_at(document, start);
        after_mutation(document);
        Ok(Removal {
            nodes,
            position: document.stamp(position),
        })
    }

    /// Move the content of `source` to `target` and return the range it
    /// covers there. The target may lie in another container, even in
    /// another tree, but not strictly inside the source range.
    pub fn move_range(
        &self,
        document: &mut Document,
        source: &Range,
        target: &Position,
    ) -> Result<Range> {
        debug!("move {source:?} to {target:?}");
        let container = validate_range(document, source)?;
        validate_position(document, target)?;
        if source.contains_position(document, target)? {
            return Err(Error::InvalidMoveTarget);
        }
        if source.is_collapsed() {
            return Ok(Range::collapsed(*target));
        }

        let source_anchors = source.anchors();
        let target_anchor = target.anchor();
        let (start, end) = match target.compare_with(document, &source.end())? {
            PositionRelation::After | PositionRelation::Equal => {
                move_to_following(
                    document,
                    container,
                    source_anchors,
                    target_anchor,
                )
            }
            PositionRelation::Before | PositionRelation::Different => {
                move_to_preceding(document, source_anchors, target_anchor)
            }
        };
        after_mutation(document);
        Ok(document.stamp_range(start, end))
    }
}

/// Insert nodes at an anchor in a container and merge at both ends.
fn insert_at(
    document: &mut Document,
    at: Anchor,
    nodes: &[NodeId],
) -> (Anchor, Anchor) {
    document.insert_children(at.parent, at.offset, nodes);
    let end = Anchor::new(at.parent, at.offset + nodes.len());
    merge_boundaries(document, at, end)
}

/// Move content to a target at or after its end. The target is broken
/// first: splits keep the left half in place, so the source anchors are not
/// affected.
fn move_to_following(
    document: &mut Document,
    container: NodeId,
    source: (Anchor, Anchor),
    target: Anchor,
) -> (Anchor, Anchor) {
    let mut target = break_attributes(document, target);
    let count = document.child_count(container);
    let (start, end) = break_range_anchors(document, source);
    let same_parent = target.parent == start.parent;
    if same_parent {
        target.offset += document.child_count(start.parent) - count;
        if target.offset == end.offset {
            return merge_boundaries(document, start, end);
        }
    }

    let moved = end.offset - start.offset;
    let nodes = document.remove_children(start.parent, start.offset, moved);
    let merged = merge_at(document, start);
    if same_parent {
        target.offset -= moved;
        if merged != start {
            target.offset -= 1;
        }
    }
    insert_at(document, target, &nodes)
}

/// Move content to a target before its start, or in another tree. The
/// source is broken first, for the same reason as in [`move_to_following`].
fn move_to_preceding(
    document: &mut Document,
    source: (Anchor, Anchor),
    target: Anchor,
) -> (Anchor, Anchor) {
    let (mut start, mut end) = break_range_anchors(document, source);
    let count = document.child_count(start.parent);
    let target = break_attributes(document, target);
    if target.parent == start.parent {
        let shift = document.child_count(start.parent) - count;
        start.offset += shift;
        end.offset += shift;
        if target.offset == start.offset {
            return merge_boundaries(document, start, end);
        }
    }

    let moved = end.offset - start.offset;
    let nodes = document.remove_children(start.parent, start.offset, moved);
    merge_at(document, start);
    insert_at(document, target, &nodes)
}
