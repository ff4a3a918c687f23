// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// A run of text. Offsets into it count `char`s, not bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextNode {
    data: String,
}

impl TextNode {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The text between two char offsets (clamped to the text length).
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let from = byte_offset(&self.data, start);
        let to = byte_offset(&self.data, end.max(start));
        &self.data[from..to]
    }

    /// Keep the first `offset` chars and return the rest.
    pub(crate) fn split_off(&mut self, offset: usize) -> String {
        let at = byte_offset(&self.data, offset);
        self.data.split_off(at)
    }

    pub(crate) fn push_str(&mut self, data: &str) {
        self.data.push_str(data);
    }
}

fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
