// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Structural editing of view trees.
//!
//! The [`Writer`] holds no tree of its own: every operation takes the
//! [`Document`] to work on together with positions or ranges derived from
//! it, and hands back freshly derived positions or ranges. Arguments are
//! validated before anything is changed, so an `Err` always leaves the
//! document untouched.
//!
//! Inline editing never crosses a [`crate::ContainerElement`]: both ends of
//! a range must have the same nearest container, and operations split
//! attribute elements and texts up to that container ("breaking"), work on
//! the container's children, and finally merge similar neighbours back
//! together.

mod breaking;
mod insertion;
mod wrapping;

use crate::view::{AttributeElement, Document, NodeId, Position, Range};
use crate::view::DEFAULT_PRIORITY;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Priority of attribute elements created through
    /// [`Writer::attribute_element`].
    pub default_priority: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
        }
    }
}

/// Nodes taken out of a tree by [`Writer::remove`]. The nodes are detached
/// and owned by the caller, who may insert them elsewhere or
/// [`Document::discard`] them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    pub nodes: Vec<NodeId>,
    /// Where the removed content used to be.
    pub position: Position,
}

#[derive(Clone, Debug, Default)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// An attribute element carrying the configured default priority.
    pub fn attribute_element(&self, name: &str) -> AttributeElement {
        AttributeElement::new(name).with_priority(self.config.default_priority)
    }
}

/// Check both ends of a range and return the container they share.
fn validate_range(document: &Document, range: &Range) -> Result<NodeId> {
    document.validate_position(&range.start())?;
    document.validate_position(&range.end())?;
    let start = document.nearest_container(range.start().parent());
    let end = document.nearest_container(range.end().parent());
    match (start, end) {
        (Some(start), Some(end)) if start == end => Ok(start),
        _ => Err(Error::InvalidRangeContainer),
    }
}

fn validate_position(
    document: &Document,
    position: &Position,
) -> Result<NodeId> {
    document.validate_position(position)?;
    document
        .nearest_container(position.parent())
        .ok_or(Error::InvalidPositionContainer)
}

fn after_mutation(document: &Document) {
    cfg_if::cfg_if! {
        if #[cfg(feature = "assert-invariants")] {
            document.explicitly_assert_invariants();
        } else {
            let _ = document;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notation::parse;
    use crate::view::ContainerElement;

    #[test]
    fn attribute_element_uses_configured_priority() {
        let writer = Writer::with_config(WriterConfig {
            default_priority: 4,
        });
        assert_eq!(writer.attribute_element("b").priority(), 4);
        assert_eq!(
            Writer::new().attribute_element("b").priority(),
            DEFAULT_PRIORITY
        );
    }

    #[test]
    fn range_in_one_container_is_valid() {
        let parsed = parse("<p>{f[oo}<b>{ba]r}</b></p>").unwrap();
        let range = parsed.range.unwrap();
        assert_eq!(validate_range(&parsed.document, &range), Ok(parsed.root));
    }

    #[test]
    fn range_across_containers_is_rejected() {
        let parsed =
            parse("<div><p>{f[oo}</p><p>{ba]r}</p></div>").unwrap();
        let range = parsed.range.unwrap();
        assert_eq!(
            validate_range(&parsed.document, &range),
            Err(Error::InvalidRangeContainer)
        );
    }

    #[test]
    fn position_without_container_is_rejected() {
        let mut document = Document::new();
        let text = document.create_text("foo");
        let position = document.position(text, 1).unwrap();
        assert_eq!(
            validate_position(&document, &position),
            Err(Error::InvalidPositionContainer)
        );

        let p = document.create_container(ContainerElement::new("p"));
        let position = document.position(p, 0).unwrap();
        assert_eq!(validate_position(&document, &position), Ok(p));
    }
}
