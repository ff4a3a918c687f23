// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::view::{Document, NodeId, NodeKind};

impl Document {
    /// Human-readable dump of a subtree, one node per line:
    ///
    /// ```text
    /// p
    /// ├>b:1
    /// │ └>"foo"
    /// └>"bar"
    /// ```
    pub fn to_tree(&self, root: NodeId) -> String {
        let mut out = self.tree_label(root);
        out.push('\n');
        self.write_tree_children(root, "", &mut out);
        out
    }

    fn write_tree_children(
        &self,
        node: NodeId,
        prefix: &str,
        out: &mut String,
    ) {
        let children = self.children(node);
        for (i, child) in children.iter().enumerate() {
            let is_last = i + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if is_last { "└>" } else { "├>" });
            out.push_str(&self.tree_label(*child));
            out.push('\n');
            let child_prefix =
                format!("{prefix}{}", if is_last { "  " } else { "│ " });
            self.write_tree_children(*child, &child_prefix, out);
        }
    }

    fn tree_label(&self, node: NodeId) -> String {
        match self.kind(node) {
            Some(NodeKind::Text(text)) => format!("\"{}\"", text.data()),
            Some(NodeKind::Attribute(element)) => element.to_string(),
            Some(NodeKind::Container(element)) => element.to_string(),
            None => format!("<freed {node}>"),
        }
    }
}
