// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Adding and removing attribute elements over a range.
//!
//! Both operations break the range up to its container, rewrite the
//! container's children in a work-list driven pass and merge similar
//! neighbours afterwards. The pass only descends into attribute elements,
//! never into nested containers.
//!
//! Priorities decide nesting: an element with a lower priority stays
//! outside, so wrapping a `<u:1>` with a `<b:2>` puts the `<b:2>` inside the
//! `<u:1>`, while wrapping it with `<b:1>` or `<b:3>` puts the new element
//! around it.

use log::debug;

use crate::view::position::Anchor;
use crate::view::{AttributeElement, Document, NodeId, NodeKind, Range};
use crate::writer::breaking::{break_range_anchors, merge_at, merge_boundaries};
use crate::writer::{after_mutation, validate_range, Writer};
use crate::Result;

impl Writer {
    /// Wrap everything in `range` with clones of `element`, using
    /// `priority` instead of the element's own priority when given.
    ///
    /// Elements similar to the wrapper are removed from the range first, so
    /// the result never nests an element in a similar one. Wrappers next to
    /// a similar element, inside or around the range, are merged into it.
    ///
    /// A collapsed range is returned unchanged.
    pub fn wrap(
        &self,
        document: &mut Document,
        range: &Range,
        element: &AttributeElement,
        priority: Option<u32>,
    ) -> Result<Range> {
        debug!("wrap {range:?} with {element} priority {priority:?}");
        validate_range(document, range)?;
        if range.is_collapsed() {
            return Ok(*range);
        }
        let mut wrapper = element.clone();
        if let Some(priority) = priority {
            wrapper.set_priority(priority);
        }

        let (start, end) = break_range_anchors(document, range.anchors());
        let Anchor { parent, offset } = start;
        let end =
            unwrap_children(document, parent, offset, end.offset, &wrapper);
        let end = wrap_children(document, parent, offset, end, &wrapper);
        let (start, end) = merge_boundaries(
            document,
            start,
            Anchor::new(start.parent, end),
        );
        after_mutation(document);
        Ok(document.stamp_range(start, end))
    }

    /// Remove every element similar to `element` from `range`, splitting
    /// the ones that stick out of it. Elements that are not similar are
    /// searched for similar descendants.
    ///
    /// A collapsed range is returned unchanged.
    pub fn unwrap(
        &self,
        document: &mut Document,
        range: &Range,
        element: &AttributeElement,
    ) -> Result<Range> {
        debug!("unwrap {range:?} from {element}");
        validate_range(document, range)?;
        if range.is_collapsed() {
            return Ok(*range);
        }

        let (start, end) = break_range_anchors(document, range.anchors());
        let Anchor { parent, offset } = start;
        let end =
            unwrap_children(document, parent, offset, end.offset, element);
        let (start, end) = merge_boundaries(
            document,
            start,
            Anchor::new(start.parent, end),
        );
        after_mutation(document);
        Ok(document.stamp_range(start, end))
    }
}

/// Children `start..end` of `parent` that a pass still has to visit.
struct Frame {
    parent: NodeId,
    start: usize,
    end: usize,
}

/// A frame once its children were rewritten, with the places where the new
/// neighbours may need merging.
struct Visited {
    frame: Frame,
    merge_at: Vec<usize>,
}

/// Merge at the recorded positions of every visited frame, innermost frames
/// first, and return the new end offset of the outermost one.
///
/// Merging joins two children into one, so positions after a successful
/// merge move one to the left. The frame edges are skipped: the outermost
/// edges are merged by the caller together with the range boundaries, and
/// inner frames span all children of their parent.
fn merge_visited(document: &mut Document, visited: Vec<Visited>) -> usize {
    let mut outer_end = 0;
    for Visited { frame, merge_at: offsets } in visited.into_iter().rev() {
        let mut end = frame.end;
        let mut merged = 0;
        let mut last = None;
        for raw in offsets {
            if last == Some(raw) {
                continue;
            }
            last = Some(raw);
            let offset = raw - merged;
            if offset == frame.start || offset >= end {
                continue;
            }
            let anchor = Anchor::new(frame.parent, offset);
            if merge_at(document, anchor) != anchor {
                merged += 1;
                end -= 1;
            }
        }
        outer_end = end;
    }
    outer_end
}

/// Wrap children `start..end` of `parent`, returning the new end offset.
fn wrap_children(
    document: &mut Document,
    parent: NodeId,
    start: usize,
    end: usize,
    wrapper: &AttributeElement,
) -> usize {
    let mut pending = vec![Frame { parent, start, end }];
    let mut visited = Vec::new();
    while let Some(frame) = pending.pop() {
        let mut wrapped = Vec::new();
        for index in frame.start..frame.end {
            let child = document.children(frame.parent)[index];
            let kind = document.kind(child);
            if kind.is_some_and(NodeKind::is_container) {
                continue;
            }
            let lower = kind
                .and_then(NodeKind::as_attribute)
                .is_some_and(|e| e.priority() < wrapper.priority());
            if lower {
                pending.push(Frame {
                    parent: child,
                    start: 0,
                    end: document.child_count(child),
                });
                continue;
            }
            let node = document.create_attribute(wrapper.clone());
            document.remove_children(frame.parent, index, 1);
            document.insert_children(node, 0, &[child]);
            document.insert_children(frame.parent, index, &[node]);
            wrapped.push(index);
        }
        visited.push(Visited {
            frame,
            merge_at: wrapped,
        });
    }
    merge_visited(document, visited)
}

/// Unwrap elements similar to `element` among children `start..end` of
/// `parent`, returning the new end offset.
fn unwrap_children(
    document: &mut Document,
    parent: NodeId,
    start: usize,
    end: usize,
    element: &AttributeElement,
) -> usize {
    let mut pending = vec![Frame { parent, start, end }];
    let mut visited = Vec::new();
    while let Some(mut frame) = pending.pop() {
        let mut unwrapped = Vec::new();
        let mut index = frame.start;
        while index < frame.end {
            let child = document.children(frame.parent)[index];
            let Some(existing) = document.attribute(child) else {
                index += 1;
                continue;
            };
            let similar = existing.is_similar(element);
            let count = document.child_count(child);
            if !similar {
                pending.push(Frame {
                    parent: child,
                    start: 0,
                    end: count,
                });
                index += 1;
                continue;
            }
            let children = document.remove_children(child, 0, count);
            document.free(child);
            document.insert_children(frame.parent, index, &children);
            unwrapped.push(index);
            unwrapped.push(index + count);
            index += count;
            frame.end = frame.end + count - 1;
        }
        visited.push(Visited {
            frame,
            merge_at: unwrapped,
        });
    }
    merge_visited(document, visited)
}

#[cfg(test)]
mod test {
    use crate::notation::{parse, stringify};
    use crate::{AttributeElement, Error, Writer};

    fn wrap(notation: &str, name: &str, priority: u32) -> String {
        let mut parsed = parse(notation).unwrap();
        let range = parsed.range.unwrap();
        let element = AttributeElement::new(name);
        let range = Writer::new()
            .wrap(&mut parsed.document, &range, &element, Some(priority))
            .unwrap();
        stringify(&parsed.document, parsed.root, Some(&range))
    }

    fn unwrap(notation: &str, name: &str, priority: u32) -> String {
        let mut parsed = parse(notation).unwrap();
        let range = parsed.range.unwrap();
        let element = AttributeElement::new(name).with_priority(priority);
        let range = Writer::new()
            .unwrap(&mut parsed.document, &range, &element)
            .unwrap();
        stringify(&parsed.document, parsed.root, Some(&range))
    }

    #[test]
    fn wrap_collapsed_range_does_nothing() {
        let mut parsed = parse("<p>{foo[]bar}</p>").unwrap();
        let range = parsed.range.unwrap();
        let generation = parsed.document.generation();
        let bold = AttributeElement::new("b");
        let result = Writer::new()
            .wrap(&mut parsed.document, &range, &bold, None)
            .unwrap();
        assert_eq!(result, range);
        assert_eq!(parsed.document.generation(), generation);
    }

    #[test]
    fn wrap_single_text() {
        assert_eq!(
            wrap("<p>[{foobar}]</p>", "b", 1),
            "<p>[<b:1>{foobar}</b>]</p>"
        );
    }

    #[test]
    fn wrap_uses_element_priority_by_default() {
        let mut parsed = parse("<p>[{foobar}]</p>").unwrap();
        let range = parsed.range.unwrap();
        let element = AttributeElement::new("b").with_priority(3);
        let range = Writer::new()
            .wrap(&mut parsed.document, &range, &element, None)
            .unwrap();
        assert_eq!(
            stringify(&parsed.document, parsed.root, Some(&range)),
            "<p>[<b:3>{foobar}</b>]</p>"
        );
    }

    #[test]
    fn wrap_across_containers_fails() {
        let mut parsed =
            parse("<div><p>{f[oo}</p><p>{ba]r}</p></div>").unwrap();
        let range = parsed.range.unwrap();
        let before = stringify(&parsed.document, parsed.root, None);
        let bold = AttributeElement::new("b");
        assert_eq!(
            Writer::new().wrap(&mut parsed.document, &range, &bold, None),
            Err(Error::InvalidRangeContainer)
        );
        assert_eq!(stringify(&parsed.document, parsed.root, None), before);
    }

    #[test]
    fn wrap_start_of_text() {
        assert_eq!(
            wrap("<p>[{foo]bar}</p>", "b", 2),
            "<p>[<b:2>{foo}</b>]{bar}</p>"
        );
        assert_eq!(
            wrap("<p>{[foo]bar}</p>", "b", 2),
            "<p>[<b:2>{foo}</b>]{bar}</p>"
        );
    }

    #[test]
    fn wrap_end_of_text() {
        assert_eq!(
            wrap("<p>{foo[bar]}</p>", "b", 2),
            "<p>{foo}[<b:2>{bar}</b>]</p>"
        );
    }

    #[test]
    fn wrap_middle_of_text() {
        assert_eq!(
            wrap("<p>{f[oob]ar}</p>", "b", 2),
            "<p>{f}[<b:2>{oob}</b>]{ar}</p>"
        );
    }

    #[test]
    fn wrap_skips_nested_containers() {
        assert_eq!(
            wrap("<div>[{foobar}<p>{baz}</p>]</div>", "b", 1),
            "<div>[<b:1>{foobar}</b><p>{baz}</p>]</div>"
        );
    }

    #[test]
    fn wrap_nests_inside_lower_priority() {
        assert_eq!(
            wrap("<p>[<u:1>{foobar}</u>]</p>", "b", 2),
            "<p>[<u:1><b:2>{foobar}</b></u>]</p>"
        );
    }

    #[test]
    fn wrap_goes_around_higher_or_equal_priority() {
        assert_eq!(
            wrap("<p>[<u:3>{foobar}</u>]</p>", "b", 2),
            "<p>[<b:2><u:3>{foobar}</u></b>]</p>"
        );
        assert_eq!(
            wrap("<p>[<u:2>{foobar}</u>]</p>", "b", 2),
            "<p>[<b:2><u:2>{foobar}</u></b>]</p>"
        );
    }

    #[test]
    fn wrap_partly_inside_lower_priority() {
        assert_eq!(
            wrap("<p><u:1>{fo[ob}</u>{ar]}</p>", "b", 2),
            "<p><u:1>{fo}[<b:2>{ob}</b></u><b:2>{ar}</b>]</p>"
        );
    }

    #[test]
    fn wrap_merges_three_ways() {
        assert_eq!(
            wrap("<p>[<b:1>{foo}</b>{bar}<b:1>{baz}</b>]</p>", "b", 1),
            "<p>[<b:1>{foobarbaz}</b>]</p>"
        );
    }

    #[test]
    fn wrap_merges_with_preceding_element() {
        assert_eq!(
            wrap("<p><b:1>{foo}</b>[{bar]baz}</p>", "b", 1),
            "<p><b:1>{foo[bar}</b>]{baz}</p>"
        );
        assert_eq!(
            wrap("<p><b:1>{foobar}</b>[{baz}]</p>", "b", 1),
            "<p><b:1>{foobar[baz}</b>]</p>"
        );
    }

    #[test]
    fn wrap_merges_with_following_element() {
        assert_eq!(
            wrap("<p>[{foo}]<b:1>{bar}</b></p>", "b", 1),
            "<p>[<b:1>{foo]bar}</b></p>"
        );
    }

    #[test]
    fn wrap_merges_pieces_around_equal_priority() {
        assert_eq!(
            wrap("<p>[{foo}<i:1>{bar}</i>]{baz}</p>", "b", 1),
            "<p>[<b:1>{foo}<i:1>{bar}</i></b>]{baz}</p>"
        );
    }

    #[test]
    fn wrap_interleaves_with_lower_priority() {
        assert_eq!(
            wrap("<p>[{foo}<i:1>{bar}</i>{baz}]</p>", "b", 2),
            "<p>[<b:2>{foo}</b><i:1><b:2>{bar}</b></i><b:2>{baz}</b>]</p>"
        );
    }

    #[test]
    fn wrap_removes_similar_descendants() {
        assert_eq!(
            wrap("<p>[<i:1>{a}<b:2>{b}</b>{c}</i>]</p>", "b", 2),
            "<p>[<i:1><b:2>{abc}</b></i>]</p>"
        );
    }

    #[test]
    fn wrap_within_attribute_element() {
        assert_eq!(
            wrap("<p><i:1>{f[oo]}</i></p>", "b", 2),
            "<p><i:1>{f}[<b:2>{oo}</b></i>]</p>"
        );
    }

    #[test]
    fn wrap_deeply_nested_lower_priorities() {
        let mut notation = String::from("<p>[");
        for level in 1..=50 {
            notation.push_str(&format!("<a{level}:{level}>"));
        }
        notation.push_str("{x}");
        for level in (1..=50).rev() {
            notation.push_str(&format!("</a{level}>"));
        }
        notation.push_str("]</p>");
        let result = wrap(&notation, "b", 100);
        assert!(result.contains("<a50:50><b:100>{x}</b></a50>"));
    }

    #[test]
    fn unwrap_collapsed_range_does_nothing() {
        assert_eq!(
            unwrap("<p><b:1>{foo[]bar}</b></p>", "b", 1),
            "<p><b:1>{foo[]bar}</b></p>"
        );
    }

    #[test]
    fn unwrap_whole_element() {
        assert_eq!(
            unwrap("<p>[<b:1>{foobar}</b>]</p>", "b", 1),
            "<p>[{foobar}]</p>"
        );
    }

    #[test]
    fn unwrap_part_of_element() {
        assert_eq!(
            unwrap("<p><b:1>{f[oob]ar}</b></p>", "b", 1),
            "<p><b:1>{f}</b>[{oob}]<b:1>{ar}</b></p>"
        );
    }

    #[test]
    fn unwrap_ignores_different_priority() {
        assert_eq!(
            unwrap("<p>[<b:2>{foobar}</b>]</p>", "b", 1),
            "<p>[<b:2>{foobar}</b>]</p>"
        );
    }

    #[test]
    fn unwrap_merges_texts() {
        assert_eq!(
            unwrap("<p>[{foo}<b:1>{bar}</b>{baz}]</p>", "b", 1),
            "<p>[{foobarbaz}]</p>"
        );
    }

    #[test]
    fn unwrap_merges_with_text_outside() {
        assert_eq!(
            unwrap("<p>{foo}[<b:1>{bar}</b>]{baz}</p>", "b", 1),
            "<p>{foo[bar]baz}</p>"
        );
    }

    #[test]
    fn unwrap_inside_other_elements() {
        assert_eq!(
            unwrap("<p>[<i:1><b:2>{foo}</b>{bar}</i>]</p>", "b", 2),
            "<p>[<i:1>{foobar}</i>]</p>"
        );
    }

    #[test]
    fn unwrap_merges_newly_adjacent_elements() {
        assert_eq!(
            unwrap("<p>[<i:1>{foo}</i><b:2><i:1>{bar}</i></b>]</p>", "b", 2),
            "<p>[<i:1>{foobar}</i>]</p>"
        );
    }

    #[test]
    fn unwrap_keeps_nested_containers() {
        let notation = "<div>[<b:1>{foo}</b><p><b:1>{bar}</b></p>]</div>";
        assert_eq!(
            unwrap(notation, "b", 1),
            "<div>[{foo}<p><b:1>{bar}</b></p>]</div>"
        );
    }
}
