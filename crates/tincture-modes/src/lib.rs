#![forbid(unsafe_code)]

//! Colorizers built on `tincture-core`.
//!
//! # Role in tincture
//! `tincture-core` defines the per-line contract and the host-side helpers;
//! this crate provides the concrete lexers.
//!
//! | Module | Colorizer | Extensions |
//! |--------|-----------|------------|
//! | [`markup`] | [`MarkupColorizer`] | `html htm asp shtml hta htp phtml` |
//! | [`perl`] | [`PerlColorizer`] | `pl perl pm` |
//! | [`script`] | [`ScriptColorizer`] | `js` (also the default `<script>` delegate) |
//!
//! [`entity`] holds the character-entity scanner the markup lexer uses for
//! lookahead.
//!
//! # Example
//! ```
//! use tincture_core::{ColorizedText, ModeFlags, Style};
//! use tincture_modes::default_registry;
//!
//! let registry = default_registry();
//! let html = registry.select(Some("index.html"), "").unwrap();
//! let text = ColorizedText::from_text(html.as_ref(), "<p class=\"a\">", ModeFlags::empty());
//! assert_eq!(text.lines()[0].spans[0].style, Style::Tag);
//! ```

use std::sync::Arc;

use tincture_core::ColorizerRegistry;

pub mod entity;
pub mod markup;
pub mod perl;
pub mod script;

pub use entity::entity_len;
pub use markup::{MarkupColorizer, MarkupConfig, MarkupFlags};
pub use perl::{PerlColorizer, PerlFlags};
pub use script::{ScriptColorizer, ScriptConfig, ScriptFlags};

/// Registry holding every colorizer in this crate with default configuration.
pub fn default_registry() -> ColorizerRegistry {
    let mut registry = ColorizerRegistry::new();
    registry.register(Arc::new(ScriptColorizer::default()));
    registry.register(Arc::new(PerlColorizer::new()));
    registry.register(Arc::new(MarkupColorizer::new()));
    registry
}
