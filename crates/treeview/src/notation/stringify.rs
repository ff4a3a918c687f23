// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::notation::ElementType;
use crate::view::{Attributes, Document, NodeId, NodeKind, Range};

/// Write the subtree under `root` in notation, marking `range` if given.
///
/// Boundaries are written by their parent and offset alone, so stale ranges
/// are marked too. Boundaries outside of `root` are left out.
pub fn stringify(
    document: &Document,
    root: NodeId,
    range: Option<&Range>,
) -> String {
    let markers = Markers::new(range);
    let mut out = String::new();
    write_node(document, root, &markers, &mut out);
    out
}

struct Markers {
    start: Option<(NodeId, usize)>,
    end: Option<(NodeId, usize)>,
}

impl Markers {
    fn new(range: Option<&Range>) -> Self {
        Self {
            start: range.map(|r| (r.start().parent(), r.start().offset())),
            end: range.map(|r| (r.end().parent(), r.end().offset())),
        }
    }

    fn write(&self, parent: NodeId, offset: usize, out: &mut String) {
        if self.start == Some((parent, offset)) {
            out.push('[');
        }
        if self.end == Some((parent, offset)) {
            out.push(']');
        }
    }
}

fn write_node(
    document: &Document,
    node: NodeId,
    markers: &Markers,
    out: &mut String,
) {
    let Some(kind) = document.kind(node) else {
        return;
    };
    match kind {
        NodeKind::Text(text) => {
            out.push('{');
            for (offset, c) in text.data().chars().enumerate() {
                markers.write(node, offset, out);
                if matches!(c, '{' | '}' | '[' | ']' | '<' | '\\') {
                    out.push('\\');
                }
                out.push(c);
            }
            markers.write(node, text.len(), out);
            out.push('}');
        }
        NodeKind::Attribute(element) => {
            write_name(element.name(), ElementType::Attribute, out);
            out.push_str(&format!(":{}", element.priority()));
            write_attributes(element.attributes(), out);
            out.push('>');
            write_children(document, node, markers, out);
            out.push_str(&format!("</{}>", element.name()));
        }
        NodeKind::Container(element) => {
            write_name(element.name(), ElementType::Container, out);
            write_attributes(element.attributes(), out);
            out.push('>');
            write_children(document, node, markers, out);
            out.push_str(&format!("</{}>", element.name()));
        }
    }
}

/// Open a tag, prefixing the element type when the name alone would
/// suggest the other one.
fn write_name(name: &str, element_type: ElementType, out: &mut String) {
    out.push('<');
    if ElementType::for_name(name) != element_type {
        out.push_str(element_type.as_ref());
        out.push(':');
    }
    out.push_str(name);
}

fn write_children(
    document: &Document,
    node: NodeId,
    markers: &Markers,
    out: &mut String,
) {
    let children = document.children(node);
    for (offset, child) in children.iter().enumerate() {
        markers.write(node, offset, out);
        write_node(document, *child, markers, out);
    }
    markers.write(node, children.len(), out);
}

fn write_attributes(attributes: &Attributes, out: &mut String) {
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
}
