#![forbid(unsafe_code)]

//! Sentinel-terminated, read-only view over one line of code points.
//!
//! Every read at or past the end of the view yields [`Line::SENTINEL`], so
//! scanners can look ahead one or two code points without bounds checks of
//! their own. A sub-view made with [`Line::slice`] ends where the slice ends:
//! reads past it yield the sentinel even if the parent line continues. This is
//! how an embedded colorizer is handed a prefix of the line without the parent
//! buffer ever being modified.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    chars: &'a [char],
}

impl<'a> Line<'a> {
    /// Value returned for any position at or past the end.
    pub const SENTINEL: char = '\0';

    pub const fn new(chars: &'a [char]) -> Self {
        Self { chars }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Code point at `pos`, or the sentinel past the end.
    #[inline]
    pub fn at(&self, pos: usize) -> char {
        match self.chars.get(pos) {
            Some(&c) => c,
            None => Self::SENTINEL,
        }
    }

    pub fn as_chars(&self) -> &'a [char] {
        self.chars
    }

    /// Bounded sub-view. The range is clamped to the line.
    pub fn slice(&self, range: Range<usize>) -> Line<'a> {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        Line::new(&self.chars[start..end])
    }

    /// Whether the line holds exactly `pat`, length included.
    pub fn eq_chars(&self, pat: &[char]) -> bool {
        self.chars == pat
    }

    /// Whether `pat` occurs at `pos`.
    pub fn starts_with_at(&self, pos: usize, pat: &str) -> bool {
        let mut i = pos;
        for c in pat.chars() {
            if i >= self.chars.len() || self.chars[i] != c {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Whether `pat` occurs at `pos`, ignoring ASCII case.
    pub fn starts_with_ignore_ascii_case_at(&self, pos: usize, pat: &str) -> bool {
        let mut i = pos;
        for c in pat.chars() {
            if i >= self.chars.len() || !self.chars[i].eq_ignore_ascii_case(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// First position at or after `from` where `pat` occurs, ignoring ASCII
    /// case. `pat` must not be empty.
    pub fn find_ignore_ascii_case(&self, from: usize, pat: &str) -> Option<usize> {
        let first = pat.chars().next()?;
        (from..self.chars.len()).find(|&i| {
            self.chars[i].eq_ignore_ascii_case(&first)
                && self.starts_with_ignore_ascii_case_at(i, pat)
        })
    }

    /// Whether everything before `pos` is whitespace.
    pub fn is_blank_before(&self, pos: usize) -> bool {
        self.chars[..pos.min(self.chars.len())]
            .iter()
            .all(|c| c.is_whitespace())
    }
}
