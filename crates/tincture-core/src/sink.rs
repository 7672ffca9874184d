#![forbid(unsafe_code)]

//! Span emitter.
//!
//! Lexers record `[start, end) -> style` assignments in scan order. The sink
//! keeps the result a clean tiling: empty ranges are dropped, a range that
//! starts inside the previous one is clipped to its end (debug builds assert
//! it never happens), and adjacent ranges of the same style are merged.

use std::ops::Range;

use crate::style::{Span, Style};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSink {
    spans: Vec<Span>,
}

impl SpanSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style `range`.
    pub fn set(&mut self, range: Range<usize>, style: Style) {
        let mut start = range.start;
        let end = range.end;
        if start >= end {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            debug_assert!(
                start >= last.range.end,
                "span {start}..{end} overlaps previous {:?}",
                last.range
            );
            start = start.max(last.range.end);
            if start >= end {
                return;
            }
            if last.range.end == start && last.style == style {
                last.range.end = end;
                return;
            }
        }
        self.spans.push(Span::new(style, start..end));
    }

    /// Style the single code point at `pos`.
    pub fn set1(&mut self, pos: usize, style: Style) {
        self.set(pos..pos + 1, style);
    }

    /// Merge spans produced against a sub-view that starts at `range.start`.
    ///
    /// `spans` are relative to the sub-view; parts of `range` they leave
    /// uncovered are styled `fill`.
    pub fn splice(&mut self, range: Range<usize>, spans: &[Span], fill: Style) {
        let mut pos = range.start;
        for span in spans {
            let span = span.shifted(range.start);
            let end = span.range.end.min(range.end);
            if span.range.start > pos {
                self.set(pos..span.range.start.min(range.end), fill);
            }
            self.set(span.range.start.max(pos)..end, span.style);
            pos = pos.max(end);
        }
        self.set(pos..range.end, fill);
    }

    /// Style at `pos`; unvisited offsets read as [`Style::Default`].
    pub fn style_at(&self, pos: usize) -> Style {
        style_at(&self.spans, pos)
    }

    /// End of the last recorded span.
    pub fn end(&self) -> usize {
        self.spans.last().map_or(0, |s| s.range.end)
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }
}

/// Style at `pos` within an ordered, non-overlapping span list.
pub fn style_at(spans: &[Span], pos: usize) -> Style {
    let idx = spans.partition_point(|s| s.range.end <= pos);
    match spans.get(idx) {
        Some(span) if span.range.start <= pos => span.style,
        _ => Style::Default,
    }
}
