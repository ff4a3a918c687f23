// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::notation::{ElementType, NotationError};
use crate::view::{
    AttributeElement, Attributes, ContainerElement, Document, NodeId, Range,
};

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^<(/)?",
        r"(?:(container|attribute):)?",
        r"([A-Za-z][A-Za-z0-9-]*)",
        r"(?::(\d+))?",
        r#"((?:\s+[A-Za-z_][\w-]*="[^"]*")*)"#,
        r"\s*>",
    ))
    .unwrap()
});

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][\w-]*)="([^"]*)""#).unwrap());

/// A tree read from notation, together with the range marked in it.
#[derive(Debug)]
pub struct Parsed {
    pub document: Document,
    pub root: NodeId,
    pub range: Option<Range>,
}

/// Build a tree in a fresh [`Document`] from its notation.
pub fn parse(input: &str) -> Result<Parsed, NotationError> {
    Parser::new(input).parse()
}

struct Parser<'a> {
    input: &'a str,
    /// Byte offset of the next char to read.
    offset: usize,
    document: Document,
    root: Option<NodeId>,
    open: Vec<(NodeId, String)>,
    start: Option<(NodeId, usize)>,
    end: Option<(NodeId, usize)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            document: Document::new(),
            root: None,
            open: Vec::new(),
            start: None,
            end: None,
        }
    }

    fn parse(mut self) -> Result<Parsed, NotationError> {
        while let Some(c) = self.peek() {
            match c {
                '<' => self.tag()?,
                '{' => self.text()?,
                '[' | ']' => {
                    let parent = self.current_parent()?;
                    let offset = self.document.child_count(parent);
                    self.marker(c, parent, offset)?;
                    self.offset += 1;
                }
                c if c.is_whitespace() => self.offset += c.len_utf8(),
                c => {
                    return Err(
                        self.error(format!("Unexpected character {c:?}"))
                    );
                }
            }
        }

        if let Some((_, name)) = self.open.last() {
            return Err(self.error(format!("Unclosed element <{name}>")));
        }
        let Some(root) = self.root else {
            return Err(self.error("No element found"));
        };
        let range = match (self.start, self.end) {
            (None, None) => None,
            (Some(start), Some(end)) => {
                let start = self.position(start)?;
                let end = self.position(end)?;
                Some(self.view_error(self.document.range(start, end))?)
            }
            _ => return Err(self.error("Range needs both '[' and ']'")),
        };
        Ok(Parsed {
            document: self.document,
            root,
            range,
        })
    }

    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn error(&self, message: impl Into<String>) -> NotationError {
        NotationError::new(self.offset, message)
    }

    fn view_error<T>(
        &self,
        result: crate::Result<T>,
    ) -> Result<T, NotationError> {
        result.map_err(|e| self.error(e.to_string()))
    }

    fn position(
        &self,
        (parent, offset): (NodeId, usize),
    ) -> Result<crate::Position, NotationError> {
        self.view_error(self.document.position(parent, offset))
    }

    fn current_parent(&self) -> Result<NodeId, NotationError> {
        match self.open.last() {
            Some((node, _)) => Ok(*node),
            None => Err(self.error("Content outside of the root element")),
        }
    }

    fn marker(
        &mut self,
        marker: char,
        parent: NodeId,
        offset: usize,
    ) -> Result<(), NotationError> {
        let slot = if marker == '[' {
            &mut self.start
        } else {
            &mut self.end
        };
        match slot {
            Some(_) => Err(NotationError::new(
                self.offset,
                format!("Duplicate range marker {marker:?}"),
            )),
            None => {
                *slot = Some((parent, offset));
                Ok(())
            }
        }
    }

    fn tag(&mut self) -> Result<(), NotationError> {
        let input = self.input;
        let rest = &input[self.offset..];
        let Some(captures) = TAG.captures(rest) else {
            return Err(self.error("Malformed tag"));
        };
        let length = captures[0].len();
        if captures.get(1).is_some() {
            self.close_tag(&captures)?;
        } else {
            self.open_tag(&captures)?;
        }
        self.offset += length;
        Ok(())
    }

    fn close_tag(&mut self, captures: &Captures) -> Result<(), NotationError> {
        let name = &captures[3];
        match self.open.pop() {
            Some((_, open)) if open == name => Ok(()),
            Some((_, open)) => Err(self.error(format!(
                "Closing </{name}> does not match <{open}>"
            ))),
            None => Err(self.error(format!("Unexpected </{name}>"))),
        }
    }

    fn open_tag(&mut self, captures: &Captures) -> Result<(), NotationError> {
        let name = &captures[3];
        let element_type = match captures.get(2) {
            Some(prefix) => ElementType::from_str(prefix.as_str())
                .map_err(|e| self.error(e.to_string()))?,
            None => ElementType::for_name(name),
        };
        let priority = match captures.get(4) {
            Some(digits) => Some(
                digits
                    .as_str()
                    .parse::<u32>()
                    .map_err(|e| self.error(e.to_string()))?,
            ),
            None => None,
        };
        let attributes = parse_attributes(&captures[5]);

        let node = match element_type {
            ElementType::Container => {
                if priority.is_some() {
                    return Err(self.error(format!(
                        "Container <{name}> cannot have a priority"
                    )));
                }
                let mut element = ContainerElement::new(name);
                for (key, value) in attributes {
                    element = element.with_attribute(key, value);
                }
                self.document.create_container(element)
            }
            ElementType::Attribute => {
                let mut element = AttributeElement::new(name);
                if let Some(priority) = priority {
                    element = element.with_priority(priority);
                }
                for (key, value) in attributes {
                    element = element.with_attribute(key, value);
                }
                self.document.create_attribute(element)
            }
        };

        match self.open.last() {
            Some((parent, _)) => {
                let parent = *parent;
                let result = self.document.append_child(parent, node);
                self.view_error(result)?;
            }
            None if self.root.is_some() => {
                return Err(self.error("Only one root element is allowed"));
            }
            None => self.root = Some(node),
        }
        self.open.push((node, name.to_owned()));
        Ok(())
    }

    fn text(&mut self) -> Result<(), NotationError> {
        let parent = self.current_parent()?;
        // Skip the opening brace.
        self.offset += 1;
        let mut data = String::new();
        let mut length = 0;
        let mut markers = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("Unclosed text"));
            };
            self.offset += c.len_utf8();
            match c {
                '}' => break,
                '[' | ']' => markers.push((c, length)),
                '\\' => {
                    let Some(escaped) = self.peek() else {
                        return Err(self.error("Unfinished escape"));
                    };
                    self.offset += escaped.len_utf8();
                    data.push(escaped);
                    length += 1;
                }
                c => {
                    data.push(c);
                    length += 1;
                }
            }
        }

        let node = self.document.create_text(data);
        let result = self.document.append_child(parent, node);
        self.view_error(result)?;
        for (marker, offset) in markers {
            self.marker(marker, node, offset)?;
        }
        Ok(())
    }
}

fn parse_attributes(source: &str) -> Attributes {
    ATTRIBUTE
        .captures_iter(source)
        .map(|c| {
            let value = html_escape::decode_html_entities(&c[2]).into_owned();
            (c[1].to_owned(), value)
        })
        .collect()
}
