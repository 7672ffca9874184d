#![forbid(unsafe_code)]

//! C-family script colorizer, used by default for `<script>` bodies.
//!
//! Handles the lexical patterns a display colorizer needs from a
//! JavaScript-like language:
//! - `//` line comments and `/* */` block comments (carried across lines)
//! - `'`, `"` and back-quoted strings with backslash escapes (carried across
//!   lines when unterminated)
//! - decimal, hex and float numbers
//! - a configurable keyword set
//! - `/.../flags` regex literals when [`ModeFlags::REGEX`] is set

use tincture_core::{Colorizer, Line, LineState, ModeFlags, SpanSink, Style};

bitflags::bitflags! {
    /// Carried state of [`ScriptColorizer`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScriptFlags: u32 {
        /// Inside `/* ... */`.
        const COMMENT    = 0x01;
        /// Inside `"..."`.
        const STRING     = 0x02;
        /// Inside `'...'`.
        const STRING_ALT = 0x04;
        /// Inside a back-quoted template string.
        const TEMPLATE   = 0x08;
    }
}

impl ScriptFlags {
    const ANY_STRING: Self = Self::STRING.union(Self::STRING_ALT).union(Self::TEMPLATE);

    fn string_delim(self) -> Option<char> {
        if self.contains(Self::STRING) {
            Some('"')
        } else if self.contains(Self::STRING_ALT) {
            Some('\'')
        } else if self.contains(Self::TEMPLATE) {
            Some('`')
        } else {
            None
        }
    }

    fn for_delim(delim: char) -> Self {
        match delim {
            '"' => Self::STRING,
            '\'' => Self::STRING_ALT,
            _ => Self::TEMPLATE,
        }
    }
}

/// Configuration for a [`ScriptColorizer`].
#[derive(Debug, Clone, Copy)]
pub struct ScriptConfig {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub keywords: &'static [&'static str],
    /// Keywords that evaluate to a value, after which `/` divides.
    pub value_keywords: &'static [&'static str],
}

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined", "var",
    "void", "while", "with", "yield",
];

impl ScriptConfig {
    /// JavaScript keywords and extensions.
    pub const fn javascript() -> Self {
        Self {
            name: "JavaScript",
            extensions: &["js", "mjs", "cjs"],
            keywords: JS_KEYWORDS,
            value_keywords: &["false", "null", "super", "this", "true", "undefined"],
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self::javascript()
    }
}

/// Line colorizer for C-family script languages.
#[derive(Debug, Clone, Default)]
pub struct ScriptColorizer {
    config: ScriptConfig,
}

fn word_eq(word: &[char], kw: &str) -> bool {
    word.iter().copied().eq(kw.chars())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// First position of `*/` at or after `from`.
fn find_comment_end(line: Line<'_>, from: usize) -> Option<usize> {
    (from..line.len()).find(|&i| line.at(i) == '*' && line.at(i + 1) == '/')
}

/// Scan string content from `pos` to the closing `quote`.
/// Returns the end offset and whether the string was closed.
fn scan_string(line: Line<'_>, pos: usize, quote: char) -> (usize, bool) {
    let n = line.len();
    let mut end = pos;
    while end < n {
        match line.at(end) {
            '\\' => end = (end + 2).min(n),
            c if c == quote => return (end + 1, true),
            _ => end += 1,
        }
    }
    (n, false)
}

/// Offset of the `/` closing a regex literal whose body starts at `pos`.
fn scan_regex(line: Line<'_>, pos: usize) -> Option<usize> {
    let mut j = pos;
    let mut in_class = false;
    while j < line.len() {
        match line.at(j) {
            '\\' => j += 1,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(j),
            _ => {}
        }
        j += 1;
    }
    None
}

fn scan_number(line: Line<'_>, pos: usize) -> usize {
    let mut end = pos;
    if line.at(end) == '0' && matches!(line.at(end + 1), 'x' | 'X') {
        end += 2;
        while line.at(end).is_ascii_hexdigit() {
            end += 1;
        }
        return end;
    }
    while line.at(end).is_ascii_digit() {
        end += 1;
    }
    if line.at(end) == '.' && line.at(end + 1).is_ascii_digit() {
        end += 1;
        while line.at(end).is_ascii_digit() {
            end += 1;
        }
    }
    if matches!(line.at(end), 'e' | 'E') {
        let mut exp = end + 1;
        if matches!(line.at(exp), '+' | '-') {
            exp += 1;
        }
        if line.at(exp).is_ascii_digit() {
            end = exp;
            while line.at(end).is_ascii_digit() {
                end += 1;
            }
        }
    }
    // BigInt suffix and friends
    while line.at(end).is_ascii_alphabetic() {
        end += 1;
    }
    end
}

impl ScriptColorizer {
    /// Create a colorizer with the given configuration.
    pub const fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    fn keyword_at(&self, word: &[char]) -> Option<&'static str> {
        self.config
            .keywords
            .iter()
            .copied()
            .find(|kw| word_eq(word, kw))
    }
}

impl Colorizer for ScriptColorizer {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.config.extensions
    }

    fn colorize_line(
        &self,
        line: Line<'_>,
        state: LineState,
        flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState {
        let n = line.len();
        let mut bits = ScriptFlags::from_bits_retain(state.bits());
        let mut i = 0;

        if bits.contains(ScriptFlags::COMMENT) {
            i = match find_comment_end(line, 0) {
                Some(pos) => {
                    bits.remove(ScriptFlags::COMMENT);
                    pos + 2
                }
                None => n,
            };
            out.set(0..i, Style::Comment);
        } else if let Some(quote) = bits.string_delim() {
            let (end, closed) = scan_string(line, 0, quote);
            if closed {
                bits.remove(ScriptFlags::ANY_STRING);
            }
            i = end;
            out.set(0..i, Style::String);
        }

        // Whether a `/` here would start a regex rather than divide.
        let mut regex_ok = true;

        while i < n {
            let c = line.at(i);
            let c1 = line.at(i + 1);

            if c.is_whitespace() {
                i += 1;
                continue;
            }

            if c == '/' && c1 == '/' {
                out.set(i..n, Style::Comment);
                i = n;
                continue;
            }

            if c == '/' && c1 == '*' {
                let start = i;
                i = match find_comment_end(line, i + 2) {
                    Some(pos) => pos + 2,
                    None => {
                        bits.insert(ScriptFlags::COMMENT);
                        n
                    }
                };
                out.set(start..i, Style::Comment);
                continue;
            }

            if matches!(c, '"' | '\'' | '`') {
                let (end, closed) = scan_string(line, i + 1, c);
                out.set(i..end, Style::String);
                if !closed {
                    bits.insert(ScriptFlags::for_delim(c));
                }
                i = end;
                regex_ok = false;
                continue;
            }

            if c == '/' && regex_ok && flags.contains(ModeFlags::REGEX) {
                if let Some(close) = scan_regex(line, i + 1) {
                    let mut end = close + 1;
                    while line.at(end).is_ascii_alphabetic() {
                        end += 1;
                    }
                    out.set1(i, Style::RegexDelimiter);
                    out.set(i + 1..close, Style::String);
                    out.set(close..end, Style::RegexDelimiter);
                    i = end;
                    regex_ok = false;
                    continue;
                }
            }

            if c.is_ascii_digit() || (c == '.' && c1.is_ascii_digit()) {
                let end = scan_number(line, i);
                out.set(i..end, Style::Number);
                i = end;
                regex_ok = false;
                continue;
            }

            if is_ident_start(c) {
                let start = i;
                while is_ident(line.at(i)) {
                    i += 1;
                }
                let word = &line.as_chars()[start..i];
                match self.keyword_at(word) {
                    Some(kw) => {
                        out.set(start..i, Style::Keyword);
                        regex_ok = !self.config.value_keywords.contains(&kw);
                    }
                    None => regex_ok = false,
                }
                continue;
            }

            regex_ok = !matches!(c, ')' | ']' | '}');
            i += 1;
        }

        LineState::from_bits(bits.bits())
    }
}
