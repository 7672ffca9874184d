#![forbid(unsafe_code)]

//! The colorizer contract.

use crate::flags::ModeFlags;
use crate::line::Line;
use crate::sink::SpanSink;
use crate::state::LineState;
use crate::style::Span;

/// Result of colorizing one line: its spans and the state for the next line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorizedLine {
    pub spans: Vec<Span>,
    pub state_after: LineState,
}

/// A line-at-a-time lexical colorizer.
///
/// Implementors see one line per call plus the state the previous call
/// returned, write spans for the line into `out`, and return the state for the
/// following line. Calls for one buffer must happen in document order.
/// Implementations never fail: malformed input is absorbed into the returned
/// state or classified as best they can.
pub trait Colorizer: Send + Sync {
    /// Human-readable name (e.g., "HTML", "Perl").
    fn name(&self) -> &'static str;

    /// File extensions this colorizer handles (without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Score for an extension match, used by the registry.
    fn extension_score(&self) -> u8 {
        80
    }

    /// Content-sniffing score for the first bytes of a buffer; 0 means no match.
    fn probe(&self, _head: &str) -> u8 {
        0
    }

    /// Colorize one line.
    ///
    /// Span offsets written to `out` are code-point offsets into `line`.
    fn colorize_line(
        &self,
        line: Line<'_>,
        state: LineState,
        flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState;

    /// Colorize a whole text, threading state from line to line.
    ///
    /// Splits on `str::lines`; spans stay relative to their own line.
    fn colorize(&self, text: &str, flags: ModeFlags) -> Vec<ColorizedLine> {
        let mut state = LineState::default();
        let mut buf: Vec<char> = Vec::new();
        let mut out = Vec::new();
        for line in text.lines() {
            buf.clear();
            buf.extend(line.chars());
            let mut sink = SpanSink::new();
            state = self.colorize_line(Line::new(&buf), state, flags, &mut sink);
            out.push(ColorizedLine {
                spans: sink.into_spans(),
                state_after: state.clone(),
            });
        }
        out
    }
}

/// Validate that all span ranges are in-bounds, ordered and non-overlapping.
pub fn validate_spans(len: usize, spans: &[Span]) -> bool {
    let mut prev_end = 0;
    for span in spans {
        if span.range.start >= span.range.end {
            return false;
        }
        if span.range.end > len {
            return false;
        }
        if span.range.start < prev_end {
            return false;
        }
        prev_end = span.range.end;
    }
    true
}
