// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

use super::Attributes;

/// Priority given to attribute elements that were not assigned one.
pub const DEFAULT_PRIORITY: u32 = 10;

/// An inline formatting element such as `<b>` or `<a href="...">`.
///
/// The priority decides nesting when formats overlap: an element with a
/// higher priority always ends up closer to the text than one with a lower
/// priority.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeElement {
    name: String,
    attributes: Attributes,
    priority: u32,
}

impl AttributeElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Similar elements can be merged into one when they are siblings.
    pub fn is_similar(&self, other: &AttributeElement) -> bool {
        self.name == other.name
            && self.priority == other.priority
            && self.attributes == other.attributes
    }
}

impl fmt::Display for AttributeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.priority)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}=\"{value}\"")?;
        }
        Ok(())
    }
}
