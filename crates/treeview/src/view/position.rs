// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cmp::Ordering;

use crate::view::{Document, Generation, NodeId};
use crate::{Error, Result};

/// A place in the tree: between two children of an element, or between two
/// chars of a text node.
///
/// A position is only meaningful for the document generation it was created
/// in. Obtain positions from [`Document::position`] and friends, and from the
/// return values of writer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    parent: NodeId,
    offset: usize,
    generation: Generation,
}

/// How one position relates to another in document order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum PositionRelation {
    Equal,
    Before,
    After,
    /// The positions are in different trees.
    Different,
}

impl Position {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Same place in the tree, regardless of the generation stamp.
    pub fn is_equal(&self, other: &Position) -> bool {
        self.anchor() == other.anchor()
    }

    /// Child indices from the root down to the parent, followed by the
    /// offset.
    pub fn path(&self, document: &Document) -> Result<Vec<usize>> {
        document.validate_position(self)?;
        let mut path = document.path(self.parent);
        path.push(self.offset);
        Ok(path)
    }

    pub fn compare_with(
        &self,
        document: &Document,
        other: &Position,
    ) -> Result<PositionRelation> {
        let path = self.path(document)?;
        let other_path = other.path(document)?;
        if document.root_of(self.parent) != document.root_of(other.parent) {
            return Ok(PositionRelation::Different);
        }
        // A path that is a prefix of another one points at the node that
        // contains the other position, so it comes first.
        Ok(match path.cmp(&other_path) {
            Ordering::Less => PositionRelation::Before,
            Ordering::Equal => PositionRelation::Equal,
            Ordering::Greater => PositionRelation::After,
        })
    }

    pub fn is_before(
        &self,
        document: &Document,
        other: &Position,
    ) -> Result<bool> {
        Ok(self.compare_with(document, other)? == PositionRelation::Before)
    }

    pub fn is_after(
        &self,
        document: &Document,
        other: &Position,
    ) -> Result<bool> {
        Ok(self.compare_with(document, other)? == PositionRelation::After)
    }

    /// The child right after this position, `None` at the end or in text.
    pub fn node_after(&self, document: &Document) -> Option<NodeId> {
        if document.kind(self.parent)?.is_text() {
            return None;
        }
        document.child(self.parent, self.offset)
    }

    pub fn node_before(&self, document: &Document) -> Option<NodeId> {
        if document.kind(self.parent)?.is_text() || self.offset == 0 {
            return None;
        }
        document.child(self.parent, self.offset - 1)
    }

    pub(crate) fn anchor(&self) -> Anchor {
        Anchor::new(self.parent, self.offset)
    }
}

/// A position without a generation stamp, used while a writer operation is
/// rearranging the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub(crate) parent: NodeId,
    pub(crate) offset: usize,
}

impl Anchor {
    pub(crate) fn new(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }
}

impl Document {
    /// A position at `offset` inside `parent`, stamped with the current
    /// generation.
    pub fn position(&self, parent: NodeId, offset: usize) -> Result<Position> {
        if !self.contains(parent) || offset > self.child_count(parent) {
            return Err(Error::InvalidPosition {
                node: parent,
                offset,
            });
        }
        Ok(self.stamp(Anchor::new(parent, offset)))
    }

    pub fn position_before(&self, node: NodeId) -> Result<Position> {
        match self.parent_and_index(node) {
            Some((parent, index)) => self.position(parent, index),
            None => Err(Error::InvalidPosition { node, offset: 0 }),
        }
    }

    pub fn position_after(&self, node: NodeId) -> Result<Position> {
        match self.parent_and_index(node) {
            Some((parent, index)) => self.position(parent, index + 1),
            None => Err(Error::InvalidPosition { node, offset: 0 }),
        }
    }

    /// Check that a position belongs to the current generation and still
    /// points inside a live node.
    pub fn validate_position(&self, position: &Position) -> Result<()> {
        if position.generation != self.generation() {
            return Err(Error::StalePosition {
                expected: self.generation(),
                found: position.generation,
            });
        }
        if !self.contains(position.parent)
            || position.offset > self.child_count(position.parent)
        {
            return Err(Error::InvalidPosition {
                node: position.parent,
                offset: position.offset,
            });
        }
        Ok(())
    }

    pub(crate) fn stamp(&self, anchor: Anchor) -> Position {
        Position {
            parent: anchor.parent,
            offset: anchor.offset,
            generation: self.generation(),
        }
    }
}
