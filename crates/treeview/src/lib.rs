// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Writer for a range-aware view tree.
//!
//! A [`Document`] owns trees made of [`ContainerElement`]s (blocks),
//! [`AttributeElement`]s (inline formatting with a priority) and text. The
//! [`Writer`] edits those trees: it wraps and unwraps ranges in attribute
//! elements, inserts, removes and moves content, always splitting and
//! merging nodes so that the result stays normalized.
//!
//! ```
//! use treeview::notation::{parse, stringify};
//! use treeview::{AttributeElement, Writer};
//!
//! let mut parsed = parse("<p>[{foo]bar}</p>").unwrap();
//! let range = parsed.range.unwrap();
//! let bold = AttributeElement::new("b");
//! let range = Writer::new()
//!     .wrap(&mut parsed.document, &range, &bold, Some(2))
//!     .unwrap();
//! assert_eq!(
//!     stringify(&parsed.document, parsed.root, Some(&range)),
//!     "<p>[<b:2>{foo}</b>]{bar}</p>"
//! );
//! ```

pub mod error;
pub mod notation;
pub mod view;
pub mod writer;

pub use crate::error::{Error, Result};
pub use crate::view::{
    AttributeElement, ContainerElement, Document, Generation, NodeId,
    NodeKind, NodeType, Position, PositionRelation, Range, TreeWalker,
    WalkerItem, WalkerValue, DEFAULT_PRIORITY,
};
pub use crate::writer::{Removal, Writer, WriterConfig};
