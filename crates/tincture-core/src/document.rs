#![forbid(unsafe_code)]

//! Cached colorization of a multi-line buffer.
//!
//! The colorizer itself keeps no memory between calls; this cache is the host
//! side of the contract. It stores every line's spans and end state so a
//! single-line edit only re-colorizes from the edited line until the output
//! converges again.

use std::ops::Range;

use crate::colorizer::{ColorizedLine, Colorizer, validate_spans};
use crate::flags::ModeFlags;
use crate::line::Line;
use crate::sink::SpanSink;
use crate::state::LineState;
use crate::style::Span;

/// Cached colorization for a multi-line text buffer.
#[derive(Debug, Clone, Default)]
pub struct ColorizedText {
    flags: ModeFlags,
    lines: Vec<ColorizedLine>,
}

fn colorize_one<C: Colorizer + ?Sized>(
    colorizer: &C,
    text: &str,
    state: LineState,
    flags: ModeFlags,
    buf: &mut Vec<char>,
) -> ColorizedLine {
    buf.clear();
    buf.extend(text.chars());
    let mut sink = SpanSink::new();
    let state_after = colorizer.colorize_line(Line::new(buf.as_slice()), state, flags, &mut sink);
    debug_assert!(validate_spans(buf.len(), sink.spans()));
    ColorizedLine {
        spans: sink.into_spans(),
        state_after,
    }
}

impl ColorizedText {
    /// Colorize an entire buffer from scratch (using `text.lines()`).
    pub fn from_text<C: Colorizer + ?Sized>(colorizer: &C, text: &str, flags: ModeFlags) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(colorizer, &lines, flags)
    }

    /// Colorize an explicit slice of lines (preserves empty lines).
    pub fn from_lines<C: Colorizer + ?Sized>(
        colorizer: &C,
        lines: &[&str],
        flags: ModeFlags,
    ) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "colorize_text",
            colorizer = colorizer.name(),
            lines = lines.len()
        )
        .entered();
        let mut state = LineState::default();
        let mut buf = Vec::new();
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            let colored = colorize_one(colorizer, line, state, flags, &mut buf);
            state = colored.state_after.clone();
            out.push(colored);
        }
        Self { flags, lines: out }
    }

    /// Access colorized lines.
    pub fn lines(&self) -> &[ColorizedLine] {
        &self.lines
    }

    /// Dialect flags the cache was built with.
    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    /// Return spans on a line that overlap the given code-point range.
    pub fn spans_in_range(&self, line_index: usize, range: Range<usize>) -> Vec<&Span> {
        let Some(line) = self.lines.get(line_index) else {
            return Vec::new();
        };
        line.spans
            .iter()
            .filter(|span| span.range.start < range.end && span.range.end > range.start)
            .collect()
    }

    /// Incrementally re-colorize starting at a single line edit.
    ///
    /// Re-colorizes the edited line and continues until a line's spans and
    /// `state_after` both match the previous cache (no further impact). If
    /// the line count changed, falls back to a full pass from the first line.
    /// Returns the number of lines re-colorized.
    pub fn update_line<C: Colorizer + ?Sized>(
        &mut self,
        colorizer: &C,
        lines: &[&str],
        line_index: usize,
    ) -> usize {
        if line_index >= lines.len() {
            return 0;
        }

        if self.lines.len() != lines.len() {
            *self = Self::from_lines(colorizer, lines, self.flags);
            return lines.len();
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "update_line",
            colorizer = colorizer.name(),
            line = line_index
        )
        .entered();

        let mut state = match line_index {
            0 => LineState::default(),
            _ => self.lines[line_index - 1].state_after.clone(),
        };
        let mut buf = Vec::new();
        let mut touched = 0;

        for (idx, text) in lines.iter().enumerate().skip(line_index) {
            let colored = colorize_one(colorizer, text, state, self.flags, &mut buf);
            touched += 1;
            let unchanged = self.lines[idx] == colored;
            state = colored.state_after.clone();
            self.lines[idx] = colored;
            if unchanged {
                break;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(touched, "re-colorized");
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    /// `{` opens a block comment that `}` closes, possibly lines later.
    struct Braces;

    const IN_BLOCK: u32 = 1;

    impl Colorizer for Braces {
        fn name(&self) -> &'static str {
            "Braces"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[]
        }

        fn colorize_line(
            &self,
            line: Line<'_>,
            state: LineState,
            _flags: ModeFlags,
            out: &mut SpanSink,
        ) -> LineState {
            let mut inside = state.bits() & IN_BLOCK != 0;
            let mut start = 0;
            for i in 0..line.len() {
                match line.at(i) {
                    '{' if !inside => {
                        inside = true;
                        start = i;
                    }
                    '}' if inside => {
                        out.set(start..i + 1, Style::Comment);
                        inside = false;
                    }
                    _ => {}
                }
            }
            if inside {
                out.set(start..line.len(), Style::Comment);
            }
            LineState::from_bits(u32::from(inside))
        }
    }

    #[test]
    fn from_lines_threads_state() {
        let cache = ColorizedText::from_lines(&Braces, &["a {", "b", "} c"], ModeFlags::empty());
        assert_eq!(cache.lines().len(), 3);
        assert_eq!(cache.lines()[0].state_after.bits(), IN_BLOCK);
        assert_eq!(cache.lines()[1].spans, vec![Span::new(Style::Comment, 0..1)]);
        assert_eq!(cache.lines()[2].state_after.bits(), 0);
    }

    #[test]
    fn spans_in_range_filters() {
        let cache = ColorizedText::from_text(&Braces, "x {y} z", ModeFlags::empty());
        assert_eq!(cache.spans_in_range(0, 0..2).len(), 0);
        assert_eq!(cache.spans_in_range(0, 3..4).len(), 1);
        assert!(cache.spans_in_range(7, 0..1).is_empty());
    }

    #[test]
    fn update_line_propagates_until_converged() {
        let before = ["a", "b", "c", "d"];
        let mut cache = ColorizedText::from_lines(&Braces, &before, ModeFlags::empty());

        let after = ["a {", "b", "c", "d"];
        let touched = cache.update_line(&Braces, &after, 0);
        assert_eq!(touched, 4);
        assert!(cache.lines().iter().all(|l| l.state_after.bits() == IN_BLOCK));

        let closed = ["a {", "b }", "c", "d"];
        let touched = cache.update_line(&Braces, &closed, 1);
        assert_eq!(touched, 3);
        assert_eq!(cache.lines()[3].state_after.bits(), 0);

        let same = ["a {", "b }", "c", "d"];
        assert_eq!(cache.update_line(&Braces, &same, 2), 1);
    }

    #[test]
    fn update_line_out_of_range_is_noop() {
        let mut cache = ColorizedText::from_lines(&Braces, &["a"], ModeFlags::empty());
        assert_eq!(cache.update_line(&Braces, &["a"], 3), 0);
    }

    #[test]
    fn update_line_line_count_change_rebuilds() {
        let mut cache = ColorizedText::from_lines(&Braces, &["{"], ModeFlags::empty());
        let touched = cache.update_line(&Braces, &["x", "{"], 0);
        assert_eq!(touched, 2);
        assert_eq!(cache.lines()[0].state_after.bits(), 0);
        assert_eq!(cache.lines()[1].state_after.bits(), IN_BLOCK);
    }
}
