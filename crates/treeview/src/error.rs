// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::view::{Generation, NodeId, NodeType};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when handing the writer a position, a range
/// or nodes that do not fit the tree.
///
/// All of these are detected before the tree is touched, so a caller that
/// receives an `Err` can rely on the document being exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The two ends of a range resolve to different container elements, or
    /// one of them is not inside a container at all.
    #[error("range boundaries must be placed inside the same container")]
    InvalidRangeContainer,

    /// A position that has to be broken or inserted at has no container
    /// element among its ancestors.
    #[error("position must be placed inside a container")]
    InvalidPositionContainer,

    /// The parent node no longer exists or the offset is out of bounds.
    #[error("invalid position: offset {offset} in node {node}")]
    InvalidPosition { node: NodeId, offset: usize },

    /// The position was derived before the last structural change.
    #[error(
        "stale position: derived in generation {found}, \
         document is at generation {expected}"
    )]
    StalePosition {
        expected: Generation,
        found: Generation,
    },

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} already has a parent")]
    NodeAlreadyAttached(NodeId),

    /// The node would end up inside its own subtree, or is listed twice.
    #[error("node {0} cannot be inserted at this position")]
    InvalidInsertion(NodeId),

    #[error("move target must not be placed inside the moved range")]
    InvalidMoveTarget,

    #[error("node {node} is a {found}, expected a {expected}")]
    UnexpectedNodeType {
        node: NodeId,
        expected: NodeType,
        found: NodeType,
    },
}
