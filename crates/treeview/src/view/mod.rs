// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The view tree: an arena of text, attribute and container nodes, and the
//! positions and ranges that address places inside it.

pub mod document;
pub mod invariants;
pub mod nodes;
pub mod position;
pub mod range;
pub mod to_tree;
pub mod tree_walker;

pub use document::{Ancestors, Document, Generation, NodeData, NodeId};
pub use nodes::{
    AttributeElement, Attributes, ContainerElement, NodeKind, NodeType,
    TextNode, DEFAULT_PRIORITY,
};
pub use position::{Position, PositionRelation};
pub use range::Range;
pub use tree_walker::{TreeWalker, WalkerItem, WalkerValue};
