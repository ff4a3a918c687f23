// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::view::position::Anchor;
use crate::view::{
    Document, NodeId, NodeKind, Position, PositionRelation, TreeWalker,
    WalkerItem,
};
use crate::Result;

/// A span between two positions, `start` never after `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start.is_equal(&self.end)
    }

    /// Same boundaries, regardless of the generation stamp.
    pub fn is_equal(&self, other: &Range) -> bool {
        self.start.is_equal(&other.start) && self.end.is_equal(&other.end)
    }

    /// Whether the position lies strictly between the boundaries.
    pub fn contains_position(
        &self,
        document: &Document,
        position: &Position,
    ) -> Result<bool> {
        Ok(position.is_after(document, &self.start)?
            && position.is_before(document, &self.end)?)
    }

    /// The deepest node that contains both boundaries.
    pub fn common_ancestor(&self, document: &Document) -> Option<NodeId> {
        let start_ancestors: Vec<NodeId> =
            document.ancestors(self.start.parent()).collect();
        document
            .ancestors(self.end.parent())
            .find(|node| start_ancestors.contains(node))
    }

    pub fn walker<'a>(&self, document: &'a Document) -> Result<TreeWalker<'a>> {
        TreeWalker::new(document, self)
    }

    /// The text covered by the range.
    pub fn text(&self, document: &Document) -> Result<String> {
        let mut out = String::new();
        for value in self.walker(document)? {
            if let WalkerItem::Text { node, start, end } = value.item {
                let text = document.kind(node).and_then(NodeKind::as_text);
                if let Some(text) = text {
                    out.push_str(text.slice(start, end));
                }
            }
        }
        Ok(out)
    }

    pub(crate) fn anchors(&self) -> (Anchor, Anchor) {
        (self.start.anchor(), self.end.anchor())
    }
}

impl Document {
    /// A range between two positions. The boundaries are swapped if `start`
    /// comes after `end`; positions in different trees are kept as given
    /// and rejected later by the writer.
    pub fn range(&self, start: Position, end: Position) -> Result<Range> {
        let (start, end) = match start.compare_with(self, &end)? {
            PositionRelation::After => (end, start),
            _ => (start, end),
        };
        Ok(Range { start, end })
    }

    /// A range spanning all children of `node`.
    pub fn range_in(&self, node: NodeId) -> Result<Range> {
        let start = self.position(node, 0)?;
        let end = self.position(node, self.child_count(node))?;
        Ok(Range { start, end })
    }

    pub(crate) fn stamp_range(&self, start: Anchor, end: Anchor) -> Range {
        Range {
            start: self.stamp(start),
            end: self.stamp(end),
        }
    }
}
