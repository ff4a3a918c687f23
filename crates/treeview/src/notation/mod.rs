// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A compact text notation for view trees and ranges.
//!
//! ```text
//! <p>{foo}<b:1 class="x">{b[ar}</b>]</p>
//! ```
//!
//! - `{...}` is a text node. Inside it `\` escapes the next char.
//! - `<name attr="value">...</name>` is an element. Well-known block names
//!   (`p`, `div`, `li`, ...) are containers, anything else is an attribute
//!   element. `container:name` and `attribute:name` force either kind.
//! - `<name:3>` gives an attribute element priority 3. Without it the
//!   element gets [`crate::DEFAULT_PRIORITY`]. Closing tags may repeat the
//!   priority.
//! - `[` and `]` mark the range. Inside a text they mark a text offset,
//!   between nodes they mark an offset in the enclosing element.
//! - Whitespace between nodes is ignored.
//!
//! [`stringify`] always writes the priority of attribute elements, so it
//! reproduces exactly what [`parse`] reads.

mod parse;
mod stringify;

pub use parse::{parse, Parsed};
pub use stringify::stringify;

/// The two kinds of elements the notation can describe.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    Container,
    Attribute,
}

impl ElementType {
    /// The kind an element of this name gets when no prefix is given.
    pub fn for_name(name: &str) -> Self {
        if BLOCK_NAMES.contains(&name) {
            Self::Container
        } else {
            Self::Attribute
        }
    }
}

const BLOCK_NAMES: &[&str] = &[
    "article",
    "aside",
    "blockquote",
    "body",
    "div",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {position}")]
pub struct NotationError {
    /// Byte offset in the input where the problem was found.
    pub position: usize,
    pub message: String,
}

impl NotationError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use speculoos::{prelude::*, AssertionFailure, Spec};

    use super::*;

    #[test]
    fn block_names_are_containers() {
        assert_eq!(ElementType::for_name("p"), ElementType::Container);
        assert_eq!(ElementType::for_name("h3"), ElementType::Container);
        assert_eq!(ElementType::for_name("b"), ElementType::Attribute);
        assert_eq!(ElementType::for_name("span"), ElementType::Attribute);
    }

    #[test]
    fn element_type_names() {
        assert_eq!(ElementType::Container.to_string(), "container");
        assert_eq!(
            ElementType::from_str("attribute"),
            Ok(ElementType::Attribute)
        );
        assert!(ElementType::from_str("text").is_err());
    }

    #[test]
    fn error_mentions_position() {
        let error = NotationError::new(4, "Unexpected character 'x'");
        assert_eq!(error.to_string(), "Unexpected character 'x' at byte 4");
    }

    #[test]
    fn simple_trees_roundtrip() {
        assert_that!("<p></p>").roundtrips();
        assert_that!("<p>{foo}</p>").roundtrips();
        assert_that!("<p>{foo}<b:1>{bar}</b></p>").roundtrips();
        assert_that!("<div><p>{foo}</p><ul><li>{bar}</li></ul></div>")
            .roundtrips();
    }

    #[test]
    fn ranges_roundtrip() {
        assert_that!("<p>[{foo}]</p>").roundtrips();
        assert_that!("<p>{f[oo}<b:1>{ba]r}</b></p>").roundtrips();
        assert_that!("<p>{foo[]bar}</p>").roundtrips();
        assert_that!("<p><b:1>[]</b></p>").roundtrips();
        assert_that!("<p>{}[]</p>").roundtrips();
    }

    #[test]
    fn attributes_roundtrip() {
        assert_that!(r#"<p class="x"><a:5 href="a&amp;b">{x}</a></p>"#)
            .roundtrips();
        assert_that!(r#"<p><span:2 data-x="&quot;q&quot;">{x}</span></p>"#)
            .roundtrips();
    }

    #[test]
    fn prefixed_elements_roundtrip() {
        assert_that!("<container:x><attribute:p:1>{y}</p></x>").roundtrips();
    }

    #[test]
    fn escaped_text_roundtrips() {
        assert_that!(r"<p>{a\{b\}c\[d\]e\<f\\g}</p>").roundtrips();
    }

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let parsed = parse(subject).unwrap();

            parsed.document.explicitly_assert_invariants();

            let output = stringify(
                &parsed.document,
                parsed.root,
                parsed.range.as_ref(),
            );
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }
}
