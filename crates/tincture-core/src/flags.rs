#![forbid(unsafe_code)]

//! Dialect selectors passed alongside each line.

use std::str::FromStr;

bitflags::bitflags! {
    /// Input-only dialect flags. Colorizers read them and never change them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModeFlags: u32 {
        /// Recognize `/.../` regex literals in script dialects.
        const REGEX = 0b0000_0001;
    }
}

/// Error returned when a mode-flag list names an unknown flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseModeFlagsError {
    UnknownFlag { name: String },
}

impl std::fmt::Display for ParseModeFlagsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFlag { name } => write!(f, "unknown mode flag: {name:?}"),
        }
    }
}

impl std::error::Error for ParseModeFlagsError {}

impl FromStr for ModeFlags {
    type Err = ParseModeFlagsError;

    /// Parse a `|`- or `,`-separated list of flag names, ignoring case.
    /// An empty string or `none` yields no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = ModeFlags::empty();
        for part in s.split(['|', ',']) {
            let name = part.trim();
            if name.is_empty() || name.eq_ignore_ascii_case("none") {
                continue;
            }
            let flag = ModeFlags::from_name(&name.to_ascii_uppercase()).ok_or_else(|| {
                ParseModeFlagsError::UnknownFlag {
                    name: name.to_string(),
                }
            })?;
            flags |= flag;
        }
        Ok(flags)
    }
}
