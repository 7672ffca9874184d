#![forbid(unsafe_code)]

//! HTML-like markup colorizer.
//!
//! Recognizes tags, quoted attribute values, `<!-- -->` comments, `<! >`
//! declarations, character entities, and `<script>` elements whose bodies are
//! handed to a pluggable script [`Colorizer`]. All eight contexts are carried
//! across lines in [`MarkupFlags`]; the script colorizer's own state travels in
//! the embedded slot of [`LineState`].

use std::ops::Range;
use std::sync::Arc;

use tincture_core::{Colorizer, Line, LineState, ModeFlags, SpanSink, Style};

use crate::entity::entity_len;
use crate::script::ScriptColorizer;

bitflags::bitflags! {
    /// Carried state of [`MarkupColorizer`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MarkupFlags: u32 {
        /// `<!-- ... -->`
        const COMMENT    = 0x01;
        /// `<! ... >`
        const DECL       = 0x02;
        /// `"..."` attribute value
        const STRING     = 0x04;
        /// `'...'` attribute value
        const STRING_ALT = 0x08;
        /// `<tag ... >`
        const TAG        = 0x10;
        /// `&name;` / `&#123;`
        const ENTITY     = 0x20;
        /// Inside the `<script ...>` open tag.
        const SCRIPT_TAG = 0x40;
        /// Between `<script ...>` and `</script>`.
        const SCRIPT     = 0x80;
    }
}

const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";

const PROBE_PREFIXES: &[&str] = &["<HTML", "<SCRIPT", "<?XML", "<!DOCTYPE"];

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`MarkupColorizer`].
#[derive(Clone)]
pub struct MarkupConfig {
    script: Arc<dyn Colorizer>,
    script_flags: ModeFlags,
    preprocessor_lines: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            script: Arc::new(ScriptColorizer::default()),
            script_flags: ModeFlags::REGEX,
            preprocessor_lines: true,
        }
    }
}

impl std::fmt::Debug for MarkupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupConfig")
            .field("script", &self.script.name())
            .field("script_flags", &self.script_flags)
            .field("preprocessor_lines", &self.preprocessor_lines)
            .finish()
    }
}

impl MarkupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colorizer for `<script>` bodies.
    #[must_use]
    pub fn script(mut self, colorizer: Arc<dyn Colorizer>) -> Self {
        self.script = colorizer;
        self
    }

    /// Flags always passed to the script colorizer, on top of the caller's.
    #[must_use]
    pub fn script_flags(mut self, flags: ModeFlags) -> Self {
        self.script_flags = flags;
        self
    }

    /// Style lines starting with `#` as preprocessor output.
    #[must_use]
    pub fn preprocessor_lines(mut self, enabled: bool) -> Self {
        self.preprocessor_lines = enabled;
        self
    }

    pub fn script_colorizer(&self) -> &dyn Colorizer {
        self.script.as_ref()
    }
}

// ---------------------------------------------------------------------------
// MarkupColorizer
// ---------------------------------------------------------------------------

/// Line colorizer for HTML-like markup.
#[derive(Debug, Clone, Default)]
pub struct MarkupColorizer {
    config: MarkupConfig,
}

fn starts_markup(line: Line<'_>, i: usize) -> bool {
    let c1 = line.at(i + 1);
    line.at(i) == '<' && (c1.is_ascii_alphabetic() || matches!(c1, '!' | '/' | '?'))
}

impl MarkupColorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MarkupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// Colorize `range` of `line` with the script colorizer.
    fn delegate(
        &self,
        line: Line<'_>,
        range: Range<usize>,
        sub: LineState,
        flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState {
        let mut sub_out = SpanSink::new();
        let next = self.config.script.colorize_line(
            line.slice(range.clone()),
            sub,
            flags | self.config.script_flags,
            &mut sub_out,
        );
        #[cfg(feature = "tracing")]
        tracing::trace!(
            delegate = self.config.script.name(),
            start = range.start,
            end = range.end,
            sub_state = next.bits(),
            "script body delegated"
        );
        out.splice(range, sub_out.spans(), Style::Script);
        next
    }
}

impl Colorizer for MarkupColorizer {
    fn name(&self) -> &'static str {
        "HTML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["html", "htm", "asp", "shtml", "hta", "htp", "phtml"]
    }

    fn extension_score(&self) -> u8 {
        90
    }

    fn probe(&self, head: &str) -> u8 {
        if head.len() < 5 {
            return 0;
        }
        let hit = PROBE_PREFIXES.iter().any(|prefix| {
            head.get(..prefix.len())
                .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
        });
        if hit { 90 } else { 0 }
    }

    fn colorize_line(
        &self,
        line: Line<'_>,
        state: LineState,
        flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState {
        let n = line.len();

        if self.config.preprocessor_lines && line.at(0) == '#' {
            out.set(0..n, Style::Preprocessor);
            return state;
        }

        let mut bits = MarkupFlags::from_bits_retain(state.bits());
        let mut sub = state.embedded();
        let mut i = 0;

        while i < n {
            let start = i;

            if bits.contains(MarkupFlags::SCRIPT_TAG) {
                while i < n {
                    let c = line.at(i);
                    i += 1;
                    if c == '>' {
                        bits = MarkupFlags::SCRIPT;
                        sub = LineState::default();
                        break;
                    }
                }
                out.set(start..i, Style::Script);
                continue;
            }

            if bits.contains(MarkupFlags::SCRIPT) {
                let end = line.find_ignore_ascii_case(i, SCRIPT_CLOSE).unwrap_or(n);
                if end > start {
                    sub = self.delegate(line, start..end, sub, flags, out);
                }
                i = end;
                if i < n {
                    i += SCRIPT_CLOSE.len();
                    bits = MarkupFlags::empty();
                    sub = LineState::default();
                    out.set(end..i, Style::Script);
                }
                continue;
            }

            if bits.contains(MarkupFlags::COMMENT) {
                while i < n {
                    if line.at(i) == '-' && line.at(i + 1) == '-' && line.at(i + 2) == '>' {
                        i += 3;
                        bits.remove(MarkupFlags::COMMENT | MarkupFlags::DECL);
                        break;
                    }
                    i += 1;
                }
                out.set(start..i, Style::Comment);
                continue;
            }

            if bits.contains(MarkupFlags::DECL) {
                while i < n {
                    if line.at(i) == '>' {
                        i += 1;
                        bits.remove(MarkupFlags::DECL);
                        break;
                    }
                    i += 1;
                }
                out.set(start..i, Style::Comment);
                continue;
            }

            if bits.contains(MarkupFlags::ENTITY) {
                i += entity_len(line, i).max(1);
                // Only the entity bit drops: a Tag or String context that was
                // active when the entity started resumes after it.
                bits.remove(MarkupFlags::ENTITY);
                out.set(start..i, Style::Entity);
                continue;
            }

            if bits.intersects(MarkupFlags::STRING | MarkupFlags::STRING_ALT) {
                let delim = if bits.contains(MarkupFlags::STRING_ALT) {
                    '\''
                } else {
                    '"'
                };
                while i < n {
                    let c = line.at(i);
                    if c == '&' && entity_len(line, i) > 0 {
                        bits.insert(MarkupFlags::ENTITY);
                        break;
                    }
                    if c == delim {
                        i += 1;
                        bits.remove(MarkupFlags::STRING | MarkupFlags::STRING_ALT);
                        break;
                    }
                    // Premature end of string: leave the `>` to the tag.
                    if c == '>' {
                        bits.remove(MarkupFlags::STRING | MarkupFlags::STRING_ALT);
                        break;
                    }
                    i += 1;
                }
                out.set(start..i, Style::String);
                continue;
            }

            if bits.contains(MarkupFlags::TAG) {
                while i < n {
                    match line.at(i) {
                        '&' if entity_len(line, i) > 0 => {
                            bits.insert(MarkupFlags::ENTITY);
                            break;
                        }
                        '"' => {
                            bits.insert(MarkupFlags::STRING);
                            break;
                        }
                        '\'' => {
                            bits.insert(MarkupFlags::STRING_ALT);
                            break;
                        }
                        '>' => {
                            i += 1;
                            bits.remove(MarkupFlags::TAG);
                            break;
                        }
                        _ => i += 1,
                    }
                }
                out.set(start..i, Style::Tag);
                if bits.intersects(MarkupFlags::STRING | MarkupFlags::STRING_ALT) {
                    out.set1(i, Style::String);
                    i += 1;
                }
                continue;
            }

            // Plain text
            while i < n {
                if starts_markup(line, i) {
                    if line.starts_with_ignore_ascii_case_at(i, SCRIPT_OPEN) {
                        bits.insert(MarkupFlags::SCRIPT_TAG);
                        break;
                    }
                    if line.at(i + 1) == '!' {
                        let open = i;
                        bits.insert(MarkupFlags::DECL);
                        i += 2;
                        if line.at(i) == '-' && line.at(i + 1) == '-' {
                            i += 2;
                            bits.remove(MarkupFlags::DECL);
                            bits.insert(MarkupFlags::COMMENT);
                        }
                        out.set(open..i, Style::Comment);
                    } else {
                        bits.insert(MarkupFlags::TAG);
                    }
                    break;
                }
                if line.at(i) == '&' && entity_len(line, i) > 0 {
                    bits.insert(MarkupFlags::ENTITY);
                    break;
                }
                i += 1;
            }
        }

        let mut next = state;
        next.set_bits(bits.bits());
        if bits.contains(MarkupFlags::SCRIPT) {
            next.set_embedded(sub);
        } else {
            next.clear_embedded();
        }
        next
    }
}
