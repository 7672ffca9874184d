#![forbid(unsafe_code)]

//! Host-side colorizer lookup by name, file extension, or buffer content.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::colorizer::Colorizer;

/// Lookup key for an extension: leading dots dropped, ASCII lowercase.
fn extension_key(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Registry for looking up colorizers by file extension or name.
#[derive(Default)]
pub struct ColorizerRegistry {
    colorizers: Vec<Arc<dyn Colorizer>>,
    by_extension: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ColorizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a colorizer. Later registrations for the same extension or
    /// name override earlier ones.
    pub fn register(&mut self, colorizer: Arc<dyn Colorizer>) {
        let index = self.colorizers.len();
        self.by_name
            .insert(colorizer.name().to_ascii_lowercase(), index);
        for ext in colorizer.extensions() {
            let key = extension_key(ext);
            if !key.is_empty() {
                self.by_extension.insert(key, index);
            }
        }
        self.colorizers.push(colorizer);
    }

    /// Look up a colorizer by file extension (case-insensitive, dot optional).
    pub fn for_extension(&self, ext: &str) -> Option<Arc<dyn Colorizer>> {
        let index = self.by_extension.get(&extension_key(ext))?;
        self.colorizers.get(*index).cloned()
    }

    /// Look up a colorizer by the extension of `path`.
    pub fn for_path(&self, path: impl AsRef<Path>) -> Option<Arc<dyn Colorizer>> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.for_extension(ext)
    }

    /// Look up a colorizer by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Colorizer>> {
        let index = self.by_name.get(&name.to_ascii_lowercase())?;
        self.colorizers.get(*index).cloned()
    }

    /// Pick the best colorizer for a buffer.
    ///
    /// A file-extension match scores the colorizer's
    /// [`extension_score`](Colorizer::extension_score); otherwise its
    /// [`probe`](Colorizer::probe) of `head` is used. The highest non-zero
    /// score wins and ties go to the later registration.
    pub fn select(&self, filename: Option<&str>, head: &str) -> Option<Arc<dyn Colorizer>> {
        let ext = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(extension_key);
        let mut best: Option<(u8, usize)> = None;
        for (index, colorizer) in self.colorizers.iter().enumerate() {
            let ext_hit = ext.as_deref().is_some_and(|ext| {
                colorizer
                    .extensions()
                    .iter()
                    .any(|e| extension_key(e) == ext)
            });
            let score = if ext_hit {
                colorizer.extension_score()
            } else {
                colorizer.probe(head)
            };
            if score > 0 && best.is_none_or(|(top, _)| score >= top) {
                best = Some((score, index));
            }
        }
        let (score, index) = best?;
        let colorizer = self.colorizers.get(index)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            colorizer = colorizer.name(),
            score,
            filename = filename.unwrap_or(""),
            "selected colorizer"
        );
        Some(Arc::clone(colorizer))
    }

    /// Number of registered colorizers.
    pub fn len(&self) -> usize {
        self.colorizers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.colorizers.is_empty()
    }

    /// Get all registered colorizer names.
    pub fn names(&self) -> Vec<&str> {
        self.colorizers.iter().map(|c| c.name()).collect()
    }
}
