// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Forward iteration over everything between two positions.
//!
//! The walker yields one [`WalkerValue`] per step: entering an element,
//! leaving it, or passing over (a slice of) a text node. Texts cut by a
//! boundary only yield the part inside the range. Walking is lazy and the
//! walker can be restarted or cloned to walk the same range again.

use crate::view::position::Anchor;
use crate::view::{Document, NodeId, NodeKind, Position, Range};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkerItem {
    ElementStart(NodeId),
    ElementEnd(NodeId),
    /// Chars `start..end` of a text node.
    Text {
        node: NodeId,
        start: usize,
        end: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkerValue {
    pub item: WalkerItem,
    pub previous_position: Position,
    pub next_position: Position,
}

#[derive(Clone, Debug)]
pub struct TreeWalker<'a> {
    document: &'a Document,
    start: Anchor,
    end: Anchor,
    current: Anchor,
    done: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(document: &'a Document, range: &Range) -> Result<Self> {
        document.validate_position(&range.start())?;
        document.validate_position(&range.end())?;
        let (start, end) = range.anchors();
        Ok(Self {
            document,
            start,
            end,
            current: start,
            done: false,
        })
    }

    /// Where the next step starts from.
    pub fn position(&self) -> Position {
        self.document.stamp(self.current)
    }

    /// Rewind to the start of the range.
    pub fn restart(&mut self) {
        self.current = self.start;
        self.done = false;
    }

    fn value(&self, item: WalkerItem, previous: Anchor) -> WalkerValue {
        WalkerValue {
            item,
            previous_position: self.document.stamp(previous),
            next_position: self.document.stamp(self.current),
        }
    }

    /// Slice of a text node from `from` up to either the range end (when it
    /// lies in the same text) or the end of the text.
    fn text_step(&mut self, node: NodeId, from: usize) -> Option<WalkerItem> {
        let until = if self.end.parent == node {
            self.end.offset
        } else {
            self.document.child_count(node)
        };
        if self.end.parent == node {
            self.current = self.end;
        } else {
            self.current = match self.document.parent_and_index(node) {
                Some((parent, index)) => Anchor::new(parent, index + 1),
                None => {
                    self.done = true;
                    self.current
                }
            };
        }
        (until > from).then_some(WalkerItem::Text {
            node,
            start: from,
            end: until,
        })
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = WalkerValue;

    fn next(&mut self) -> Option<WalkerValue> {
        loop {
            if self.done || self.current == self.end {
                self.done = true;
                return None;
            }
            let previous = self.current;
            let parent = self.current.parent;
            let item = match self.document.kind(parent) {
                None => {
                    self.done = true;
                    return None;
                }
                Some(NodeKind::Text(_)) => {
                    self.text_step(parent, self.current.offset)
                }
                Some(_) => match self.document.child(parent, previous.offset) {
                    None => {
                        match self.document.parent_and_index(parent) {
                            Some((grand, index)) => {
                                self.current = Anchor::new(grand, index + 1);
                            }
                            // Left the root without meeting the end.
                            None => self.done = true,
                        }
                        Some(WalkerItem::ElementEnd(parent))
                    }
                    Some(child) => {
                        if self.document.data(child).kind().is_text() {
                            self.text_step(child, 0)
                        } else {
                            self.current = Anchor::new(child, 0);
                            Some(WalkerItem::ElementStart(child))
                        }
                    }
                },
            };
            if let Some(item) = item {
                return Some(self.value(item, previous));
            }
        }
    }
}
