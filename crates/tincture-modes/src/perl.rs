#![forbid(unsafe_code)]

//! Perl-like scripting-language colorizer.
//!
//! Handles sigil variables, numbers, quoted strings, regex literals, the
//! quote-like operators (`m q qq qx s tr`), here-documents, `format` blocks and
//! POD documentation. String continuations, format blocks, heredocs and POD
//! carry across lines in [`PerlFlags`]; the heredoc terminator lives in the
//! buffer's [`LineState`].

use tincture_core::{Colorizer, Line, LineState, ModeFlags, SpanSink, Style};

bitflags::bitflags! {
    /// Carried state of [`PerlColorizer`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PerlFlags: u32 {
        /// Unterminated `'...'`.
        const STRING_SINGLE = 0x01;
        /// Unterminated `"..."`.
        const STRING_DOUBLE = 0x02;
        /// Inside a `format` block, closed by a line holding only `.`.
        const FORMAT        = 0x04;
        /// Inside a here-document body.
        const HEREDOC       = 0x08;
        /// Inside POD, closed by `=cut`.
        const POD           = 0x10;
    }
}

impl PerlFlags {
    pub const ANY_STRING: Self = Self::STRING_SINGLE.union(Self::STRING_DOUBLE);
}

/// Punctuation that forms a complete variable after `$`.
const SPECIAL_VARS: &str = "|%=-~^123456789&`'+_./\\,\"#$?*0[];!@";

// ---------------------------------------------------------------------------
// Scanning helpers
// ---------------------------------------------------------------------------

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// End of the identifier starting at `j`; a `'` package separator is allowed
/// before a word-start character. A leading digit matches nothing.
fn scan_var(line: Line<'_>, mut j: usize) -> usize {
    if line.at(j).is_ascii_digit() {
        return j;
    }
    let n = line.len();
    while j < n {
        let c = line.at(j);
        if is_word(c) {
            j += 1;
        } else if c == '\'' && is_word_start(line.at(j + 1)) {
            j += 2;
        } else {
            break;
        }
    }
    j
}

fn scan_number(line: Line<'_>, mut j: usize) -> usize {
    if line.at(j) == '0' {
        j += 1;
        if matches!(line.at(j), 'x' | 'X') {
            j += 1;
            while line.at(j).is_ascii_hexdigit() {
                j += 1;
            }
            return j;
        }
        if ('0'..='7').contains(&line.at(j)) {
            while ('0'..='7').contains(&line.at(j)) {
                j += 1;
            }
            return j;
        }
    }
    while line.at(j).is_ascii_digit() {
        j += 1;
    }
    if line.at(j) == '.' {
        j += 1;
        while line.at(j).is_ascii_digit() {
            j += 1;
        }
    }
    if matches!(line.at(j), 'e' | 'E') {
        j += 1;
        if matches!(line.at(j), '+' | '-') {
            j += 1;
        }
        while line.at(j).is_ascii_digit() {
            j += 1;
        }
    }
    j
}

/// Offset of the next unescaped `delim` at or after `j`, or `line.len()`.
fn find_delim(line: Line<'_>, delim: char, mut j: usize) -> usize {
    let n = line.len();
    while j < n {
        match line.at(j) {
            '\\' => j += 2,
            c if c == delim => return j,
            _ => j += 1,
        }
    }
    n
}

fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        _ => None,
    }
}

/// Offset of the delimiter closing a quote-like body opened by `open` just
/// before `j`, or `line.len()`. Bracket pairs nest.
fn scan_delimited(line: Line<'_>, open: char, mut j: usize) -> usize {
    let Some(close) = closing_bracket(open) else {
        return find_delim(line, open, j);
    };
    let n = line.len();
    let mut depth = 0usize;
    while j < n {
        let c = line.at(j);
        if c == '\\' {
            j += 2;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return j;
            }
            depth -= 1;
        }
        j += 1;
    }
    n
}

/// End of the alphabetic modifier run starting at `j`.
fn modifiers(line: Line<'_>, mut j: usize) -> usize {
    while line.at(j).is_ascii_alphabetic() {
        j += 1;
    }
    j
}

/// Whether `c` can open the body of a quote-like operator.
fn is_quote_delim(c: char) -> bool {
    !(c == Line::SENTINEL
        || c.is_whitespace()
        || is_word(c)
        || matches!(c, '=' | ',' | ';' | ':' | ')' | ']' | '}' | '>'))
}

// ---------------------------------------------------------------------------
// PerlColorizer
// ---------------------------------------------------------------------------

/// Line colorizer for Perl-like scripting languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerlColorizer;

impl PerlColorizer {
    pub fn new() -> Self {
        Self
    }

    /// `m q qq qx` (one body) and `s tr` (two bodies) starting at `i`, with
    /// the operator word ending at `j`. Returns the end of the construct, or
    /// `None` when it is not terminated on this line.
    fn quote_like(
        &self,
        line: Line<'_>,
        i: usize,
        j: usize,
        parts: usize,
        out: &mut SpanSink,
    ) -> Option<usize> {
        let n = line.len();
        let open = line.at(j);
        let s1 = scan_delimited(line, open, j + 1);
        if s1 >= n {
            return None;
        }
        if parts == 1 {
            let end = modifiers(line, s1 + 1);
            out.set(i..j + 1, Style::RegexDelimiter);
            out.set(j + 1..s1, Style::String);
            out.set(s1..end, Style::RegexDelimiter);
            return Some(end);
        }

        // The replacement part of a bracketed form opens with its own
        // delimiter, optionally after whitespace.
        let (open2, k) = if closing_bracket(open).is_some() {
            let mut k = s1 + 1;
            while line.at(k).is_whitespace() {
                k += 1;
            }
            if !is_quote_delim(line.at(k)) {
                return None;
            }
            (line.at(k), k)
        } else {
            (open, s1)
        };
        let s2 = scan_delimited(line, open2, k + 1);
        if s2 >= n {
            return None;
        }
        let end = modifiers(line, s2 + 1);
        out.set(i..j + 1, Style::RegexDelimiter);
        out.set(j + 1..s1, Style::String);
        out.set(s1..k + 1, Style::RegexDelimiter);
        out.set(k + 1..s2, Style::String);
        out.set(s2..end, Style::RegexDelimiter);
        Some(end)
    }
}

impl Colorizer for PerlColorizer {
    fn name(&self) -> &'static str {
        "Perl"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pl", "perl", "pm"]
    }

    fn probe(&self, head: &str) -> u8 {
        let first = head.lines().next().unwrap_or("");
        if first.starts_with("#!") && first.contains("bin/perl") {
            80
        } else {
            0
        }
    }

    fn colorize_line(
        &self,
        line: Line<'_>,
        state: LineState,
        _flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState {
        let n = line.len();
        let mut next = state;
        let mut bits = PerlFlags::from_bits_retain(next.bits());
        let mut i = 0;

        // A single-quoted continuation wins over a conflicting double one.
        if bits.contains(PerlFlags::ANY_STRING) {
            bits.remove(PerlFlags::STRING_DOUBLE);
        }

        // Continuations carried from the previous line.
        if bits.intersects(PerlFlags::ANY_STRING) {
            let delim = if bits.contains(PerlFlags::STRING_SINGLE) {
                '\''
            } else {
                '"'
            };
            i = find_delim(line, delim, 0);
            if i < n {
                i += 1;
                bits.remove(PerlFlags::ANY_STRING);
            }
            out.set(0..i, Style::String);
        } else if bits.contains(PerlFlags::FORMAT) {
            i = n;
            if line.eq_chars(&['.']) {
                bits.remove(PerlFlags::FORMAT);
            }
            out.set(0..n, Style::String);
        }

        if bits.contains(PerlFlags::HEREDOC) {
            let start = i;
            i = n;
            if next.terminator().matches(line) {
                bits.remove(PerlFlags::HEREDOC);
                #[cfg(feature = "tracing")]
                tracing::debug!(terminator = %next.terminator(), "heredoc closed");
                out.set(start..n, Style::Keyword);
            } else {
                out.set(start..n, Style::String);
            }
        }

        if i == 0 && line.at(0) == '=' && line.at(1).is_ascii_alphabetic() {
            #[cfg(feature = "tracing")]
            if !bits.contains(PerlFlags::POD) {
                tracing::trace!("pod block opened");
            }
            bits.insert(PerlFlags::POD);
        }
        if bits.contains(PerlFlags::POD) {
            let start = i;
            i = n;
            if line.starts_with_at(start, "=cut") {
                bits.remove(PerlFlags::POD);
            }
            let style = if line.at(start) == '=' && line.at(start + 1).is_ascii_alphabetic() {
                Style::Keyword
            } else {
                Style::Comment
            };
            out.set(start..n, style);
        }

        while i < n {
            let c = line.at(i);
            let c1 = line.at(i + 1);
            let mut j = i + 1;

            match c {
                '$' | '*' | '@' | '%' | '&' => {
                    if c == '$' {
                        if c1 == '^' && line.at(i + 2).is_ascii_alphabetic() {
                            out.set(i..i + 3, Style::Variable);
                            i += 3;
                            continue;
                        }
                        if c1 == '#' && is_word_start(line.at(i + 2)) {
                            j += 1;
                        } else if c1 != Line::SENTINEL && SPECIAL_VARS.contains(c1) {
                            out.set(i..i + 2, Style::Variable);
                            i += 2;
                            continue;
                        }
                    }
                    if j < n {
                        let end = scan_var(line, j);
                        if end > j {
                            out.set(i..end, Style::Variable);
                            i = end;
                            continue;
                        }
                    }
                }
                '-' => {
                    if c1 == '-' {
                        i += 2;
                        continue;
                    }
                    // File test operator such as `-e` or `-d`.
                    if c1.is_ascii_alphabetic() && !line.at(i + 2).is_ascii_alphanumeric() {
                        out.set(i..i + 2, Style::Keyword);
                        i += 2;
                        continue;
                    }
                }
                '#' => {
                    out.set(i..n, Style::Comment);
                    i = n;
                    continue;
                }
                '<' if c1 == '<' => {
                    let mut s1 = i + 2;
                    while line.at(s1).is_whitespace() {
                        s1 += 1;
                    }
                    let quote = line.at(s1);
                    let s2 = if matches!(quote, '"' | '\'' | '`') {
                        s1 += 1;
                        find_delim(line, quote, s1)
                    } else {
                        scan_var(line, s1)
                    };
                    if s2 > s1 {
                        next.terminator_mut().capture(&line.as_chars()[s1..s2]);
                        bits.insert(PerlFlags::HEREDOC);
                        #[cfg(feature = "tracing")]
                        tracing::debug!(terminator = %next.terminator(), "heredoc opened");
                    }
                    i += 2;
                    continue;
                }
                '<' => {
                    let s1 = find_delim(line, '>', j);
                    if s1 < n {
                        out.set(i..s1 + 1, Style::String);
                        i = s1 + 1;
                        continue;
                    }
                }
                '/' | '?' => {
                    let s1 = find_delim(line, c, j);
                    if s1 < n {
                        let end = modifiers(line, s1 + 1);
                        out.set1(i, Style::RegexDelimiter);
                        out.set(i + 1..s1, Style::String);
                        out.set(s1..end, Style::RegexDelimiter);
                        i = end;
                        continue;
                    }
                }
                '\'' | '"' | '`' => {
                    let s1 = find_delim(line, c, j);
                    if s1 < n {
                        out.set(i..s1 + 1, Style::String);
                        i = s1 + 1;
                        continue;
                    }
                    // A back-quoted command never spans lines.
                    if c != '`' {
                        out.set(i..n, Style::String);
                        bits.insert(if c == '\'' {
                            PerlFlags::STRING_SINGLE
                        } else {
                            PerlFlags::STRING_DOUBLE
                        });
                        i = n;
                        continue;
                    }
                }
                '.' if c1.is_ascii_digit() => {
                    let end = scan_number(line, i);
                    out.set(i..end, Style::Number);
                    i = end;
                    continue;
                }
                c if c.is_ascii_digit() => {
                    let end = scan_number(line, i);
                    out.set(i..end, Style::Number);
                    i = end;
                    continue;
                }
                c if is_word_start(c) => {
                    j = scan_var(line, i);
                    if j < n && is_quote_delim(line.at(j)) {
                        let parts = match &line.as_chars()[i..j] {
                            ['m'] | ['q'] | ['q', 'q'] | ['q', 'x'] => 1,
                            ['s'] | ['t', 'r'] => 2,
                            _ => 0,
                        };
                        if parts > 0 {
                            if let Some(end) = self.quote_like(line, i, j, parts, out) {
                                i = end;
                                continue;
                            }
                        }
                    }
                    if j - i == 6
                        && line.starts_with_ignore_ascii_case_at(i, "format")
                        && line.is_blank_before(i)
                    {
                        bits.insert(PerlFlags::FORMAT);
                        #[cfg(feature = "tracing")]
                        tracing::trace!("format block opened");
                    }
                    out.set(i..j, Style::Keyword);
                    i = j;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        debug_assert!(
            !bits.contains(PerlFlags::ANY_STRING),
            "both string continuations set"
        );
        next.set_bits(bits.bits());
        next
    }
}
