#![forbid(unsafe_code)]

//! Carried line state.
//!
//! [`LineState`] is everything a colorizer remembers between two consecutive
//! lines of one buffer. The host owns one value per buffer, passes the state
//! returned for line `n` into the call for line `n + 1`, and starts every
//! buffer from [`LineState::default`]. Nothing here is process-wide, so any
//! number of buffers can be colorized interleaved or on different threads.

use smallvec::SmallVec;

use crate::line::Line;

/// Maximum number of code points kept for a heredoc terminator.
pub const TERMINATOR_CAPACITY: usize = 99;

// ---------------------------------------------------------------------------
// Terminator
// ---------------------------------------------------------------------------

/// Literal text that closes a here-document.
///
/// Captured once when the introducer is scanned and compared against every
/// following line until one matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terminator {
    text: SmallVec<[char; 16]>,
}

impl Terminator {
    /// Replace the stored text, truncating to [`TERMINATOR_CAPACITY`].
    pub fn capture(&mut self, text: &[char]) {
        let len = text.len().min(TERMINATOR_CAPACITY);
        self.text.clear();
        self.text.extend_from_slice(&text[..len]);
    }

    /// Whether `line` equals the stored text, length included.
    pub fn matches(&self, line: Line<'_>) -> bool {
        line.eq_chars(&self.text)
    }

    pub fn as_chars(&self) -> &[char] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.text.iter().try_for_each(|c| std::fmt::Write::write_char(f, *c))
    }
}

// ---------------------------------------------------------------------------
// LineState
// ---------------------------------------------------------------------------

/// State carried from one line to the next.
///
/// `bits` is a flag word whose meaning belongs to the colorizer that produced
/// it; each lexer wraps it in its own `bitflags` type. `terminator` is the
/// buffer's heredoc store. `embedded` is the private slot of a delegated
/// sub-colorizer (for example the script language inside a markup document).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineState {
    bits: u32,
    terminator: Terminator,
    embedded: Option<Box<LineState>>,
}

impl LineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding only a flag word.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            ..Self::default()
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn set_bits(&mut self, bits: u32) {
        self.bits = bits;
    }

    pub fn terminator(&self) -> &Terminator {
        &self.terminator
    }

    pub fn terminator_mut(&mut self) -> &mut Terminator {
        &mut self.terminator
    }

    /// State of the embedded sub-colorizer (initial if none was stored).
    pub fn embedded(&self) -> LineState {
        self.embedded.as_deref().cloned().unwrap_or_default()
    }

    /// Store the sub-colorizer state; an initial state clears the slot.
    pub fn set_embedded(&mut self, state: LineState) {
        self.embedded = if state.is_initial() {
            None
        } else {
            Some(Box::new(state))
        };
    }

    pub fn clear_embedded(&mut self) {
        self.embedded = None;
    }

    /// Whether this is the state of the first line of a fresh buffer.
    ///
    /// A stale terminator without any flag bit does not count: it is only
    /// consulted while a heredoc flag is set.
    pub fn is_initial(&self) -> bool {
        self.bits == 0 && self.embedded.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn terminator_exact_match() {
        let mut t = Terminator::default();
        t.capture(&chars("EOF"));
        assert!(t.matches(Line::new(&chars("EOF"))));
        assert!(!t.matches(Line::new(&chars("EOFX"))));
        assert!(!t.matches(Line::new(&chars("EO"))));
        assert!(!t.matches(Line::new(&chars(" EOF"))));
        assert_eq!(t.to_string(), "EOF");
    }

    #[test]
    fn terminator_truncates_to_capacity() {
        let long: Vec<char> = std::iter::repeat_n('x', 150).collect();
        let mut t = Terminator::default();
        t.capture(&long);
        assert_eq!(t.len(), TERMINATOR_CAPACITY);
    }

    #[test]
    fn terminator_recapture_replaces() {
        let mut t = Terminator::default();
        t.capture(&chars("FIRST"));
        t.capture(&chars("END"));
        assert_eq!(t.as_chars(), chars("END").as_slice());
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn embedded_slot_round_trip() {
        let mut state = LineState::from_bits(0x80);
        assert!(state.embedded().is_initial());
        state.set_embedded(LineState::from_bits(1));
        assert_eq!(state.embedded().bits(), 1);
        state.set_embedded(LineState::default());
        assert!(state.embedded().is_initial());
        state.set_embedded(LineState::from_bits(2));
        state.clear_embedded();
        assert_eq!(state, LineState::from_bits(0x80));
    }

    #[test]
    fn initial_state() {
        assert!(LineState::default().is_initial());
        assert!(!LineState::from_bits(4).is_initial());
    }

    #[test]
    fn states_are_independent_per_buffer() {
        let mut a = LineState::default();
        let mut b = LineState::default();
        a.terminator_mut().capture(&chars("A_END"));
        b.terminator_mut().capture(&chars("B_END"));
        assert_eq!(a.terminator().to_string(), "A_END");
        assert_eq!(b.terminator().to_string(), "B_END");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let mut state = LineState::from_bits(0x08);
        state.terminator_mut().capture(&chars("EOF"));
        state.set_embedded(LineState::from_bits(3));
        let json = serde_json::to_string(&state).expect("serialize");
        let back: LineState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}
