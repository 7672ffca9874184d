#![forbid(unsafe_code)]

//! Style tags and spans.

use std::ops::Range;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Semantic style assigned to a run of a line.
///
/// The set is closed on purpose: lexers classify, hosts decide how each class
/// is displayed. Regex bodies are reported as [`Style::String`]; their
/// delimiters and trailing modifier letters as [`Style::RegexDelimiter`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Style {
    /// Plain text. Never emitted as a span; unvisited offsets read as this.
    #[default]
    Default,
    Comment,
    String,
    RegexDelimiter,
    Keyword,
    Variable,
    Number,
    Tag,
    Entity,
    Preprocessor,
    /// Embedded script region inside a markup document.
    Script,
}

impl Style {
    /// Whether this style marks comment or documentation text.
    pub fn is_comment(self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Whether this style marks string-like content (strings and regex bodies).
    pub fn is_string(self) -> bool {
        matches!(self, Self::String)
    }

    /// Lowercase name, stable across releases.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Comment => "comment",
            Self::String => "string",
            Self::RegexDelimiter => "regex-delimiter",
            Self::Keyword => "keyword",
            Self::Variable => "variable",
            Self::Number => "number",
            Self::Tag => "tag",
            Self::Entity => "entity",
            Self::Preprocessor => "preprocessor",
            Self::Script => "script",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A styled run of a line.
///
/// Ranges are code-point offsets into the line the span was produced for.
/// Spans satisfy `range.start < range.end` and never overlap their neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub style: Style,
    pub range: Range<usize>,
}

impl Span {
    /// Create a span. Panics in debug builds if the range is inverted.
    pub fn new(style: Style, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "span range must be ordered");
        Self { style, range }
    }

    /// Span length in code points.
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Whether the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }

    /// Whether `pos` falls inside the span.
    pub fn contains(&self, pos: usize) -> bool {
        self.range.contains(&pos)
    }

    /// Collect the span's text out of the line it was produced for.
    pub fn text(&self, line: &[char]) -> String {
        let end = self.range.end.min(line.len());
        let start = self.range.start.min(end);
        line[start..end].iter().collect()
    }

    /// Same span moved `offset` code points to the right.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            style: self.style,
            range: self.range.start + offset..self.range.end + offset,
        }
    }
}
