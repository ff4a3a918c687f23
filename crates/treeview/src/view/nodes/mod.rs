// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod attribute_element;
pub mod container_element;
pub mod text_node;

use std::collections::BTreeMap;

pub use attribute_element::{AttributeElement, DEFAULT_PRIORITY};
pub use container_element::ContainerElement;
pub use text_node::TextNode;

/// Element attributes, kept sorted so that equality does not depend on the
/// order they were set in.
pub type Attributes = BTreeMap<String, String>;

/// The payload of a node in the tree. The set of variants is closed: every
/// algorithm in the writer matches on it exhaustively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Text(TextNode),
    Attribute(AttributeElement),
    Container(ContainerElement),
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    Text,
    AttributeElement,
    ContainerElement,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Text(_) => NodeType::Text,
            Self::Attribute(_) => NodeType::AttributeElement,
            Self::Container(_) => NodeType::ContainerElement,
        }
    }

    /// Element name, or `None` for text.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Attribute(a) => Some(a.name()),
            Self::Container(c) => Some(c.name()),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        if let Self::Text(t) = self {
            Some(t)
        } else {
            None
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeElement> {
        if let Self::Attribute(a) = self {
            Some(a)
        } else {
            None
        }
    }

    pub fn as_container(&self) -> Option<&ContainerElement> {
        if let Self::Container(c) = self {
            Some(c)
        } else {
            None
        }
    }

    /// Two nodes are similar when merging them loses no information: texts
    /// always are, attribute elements when name, attributes and priority
    /// match. Containers never are.
    pub fn is_similar(&self, other: &NodeKind) -> bool {
        match (self, other) {
            (Self::Text(_), Self::Text(_)) => true,
            (Self::Attribute(a), Self::Attribute(b)) => a.is_similar(b),
            _ => false,
        }
    }
}

impl From<TextNode> for NodeKind {
    fn from(text: TextNode) -> Self {
        Self::Text(text)
    }
}

impl From<AttributeElement> for NodeKind {
    fn from(element: AttributeElement) -> Self {
        Self::Attribute(element)
    }
}

impl From<ContainerElement> for NodeKind {
    fn from(element: ContainerElement) -> Self {
        Self::Container(element)
    }
}
