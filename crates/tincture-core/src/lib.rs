#![forbid(unsafe_code)]

//! Line-at-a-time colorization engine.
//!
//! A colorizer is handed one line plus the [`LineState`] the previous line
//! left behind, writes non-overlapping [`Span`]s into a [`SpanSink`], and
//! returns the state for the next line. Every multi-line construct (block
//! comments, strings, here-documents, embedded languages) lives in that state;
//! the engine has no other memory.
//!
//! - [`Style`], [`Span`] - classification of a run of a line
//! - [`SpanSink`] - span emitter that keeps spans ordered and merged
//! - [`Line`] - sentinel-terminated view over a line's code points
//! - [`LineState`], [`Terminator`] - carried state and heredoc store
//! - [`ModeFlags`] - dialect selectors
//! - [`Colorizer`] - the per-line contract
//! - [`ColorizerRegistry`], [`ColorizedText`] - host-side selection and caching
//!
//! # Example
//! ```
//! use tincture_core::{Colorizer, Line, LineState, ModeFlags, SpanSink, Style};
//!
//! struct Hashes;
//!
//! impl Colorizer for Hashes {
//!     fn name(&self) -> &'static str { "Hashes" }
//!     fn extensions(&self) -> &'static [&'static str] { &[] }
//!     fn colorize_line(
//!         &self,
//!         line: Line<'_>,
//!         state: LineState,
//!         _flags: ModeFlags,
//!         out: &mut SpanSink,
//!     ) -> LineState {
//!         if let Some(pos) = (0..line.len()).find(|&i| line.at(i) == '#') {
//!             out.set(pos..line.len(), Style::Comment);
//!         }
//!         state
//!     }
//! }
//!
//! let lines = Hashes.colorize("x = 1 # one", ModeFlags::empty());
//! assert_eq!(lines[0].spans[0].range, 6..11);
//! ```

pub mod colorizer;
pub mod document;
pub mod flags;
pub mod line;
pub mod registry;
pub mod sink;
pub mod state;
pub mod style;

pub use colorizer::{ColorizedLine, Colorizer, validate_spans};
pub use document::ColorizedText;
pub use flags::{ModeFlags, ParseModeFlagsError};
pub use line::Line;
pub use registry::ColorizerRegistry;
pub use sink::{SpanSink, style_at};
pub use state::{LineState, TERMINATOR_CAPACITY, Terminator};
pub use style::{Span, Style};
