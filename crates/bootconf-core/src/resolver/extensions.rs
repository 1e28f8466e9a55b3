//! Loader capability table.
//!
//! Maps file extensions to the way a file with that extension is loaded.
//! The table order is also the probe order used when resolving a path
//! that was given without an extension.

use std::path::Path;

/// Extensions that never win the "prefer a script sibling" check.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".json", ".node"];

/// How files with a given extension are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    /// Static JSON data.
    Json,
    /// Static YAML data.
    Yaml,
    /// Source code evaluated by the host application.
    Script {
        /// Whether the loader is a real evaluator (as opposed to a
        /// placeholder registration that only makes the extension resolvable).
        exports_function: bool,
    },
    /// Native binary addon. Resolvable, never loaded as configuration.
    Native,
}

/// Ordered extension -> loader table supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    entries: Vec<(String, Loader)>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
            .with(".js", Loader::Script {
                exports_function: true,
            })
            .with(".json", Loader::Json)
            .with(".node", Loader::Native)
            .with(".yaml", Loader::Yaml)
            .with(".yml", Loader::Yaml)
    }
}

impl ExtensionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register (or re-register) an extension. The leading dot is optional.
    ///
    /// Re-registering keeps the original probe position.
    #[must_use]
    pub fn with(mut self, ext: &str, loader: Loader) -> Self {
        let ext = normalize_ext(ext);
        if let Some(entry) = self.entries.iter_mut().find(|(e, _)| *e == ext) {
            entry.1 = loader;
        } else {
            self.entries.push((ext, loader));
        }
        self
    }

    /// Registered extensions in probe order, each with a leading dot.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(e, _)| e.as_str())
    }

    /// Look up the loader for an extension (with or without leading dot).
    #[must_use]
    pub fn get(&self, ext: &str) -> Option<Loader> {
        let ext = normalize_ext(ext);
        self.entries
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, loader)| *loader)
    }

    /// Look up the loader for a file path by its extension.
    #[must_use]
    pub fn loader_for(&self, path: &Path) -> Option<Loader> {
        extension_of(path).and_then(|ext| self.get(&ext))
    }

    #[must_use]
    pub fn is_registered(&self, ext: &str) -> bool {
        self.get(ext).is_some()
    }

    /// True when `path` has a registered extension outside [`EXCLUDED_EXTENSIONS`].
    #[must_use]
    pub fn is_preferred(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.is_registered(&ext) && !is_excluded(&ext))
    }

    /// True when the extension is registered as an evaluating script loader.
    #[must_use]
    pub fn exports_function(&self, ext: &str) -> bool {
        matches!(
            self.get(ext),
            Some(Loader::Script {
                exports_function: true
            })
        )
    }
}

/// Whether an extension (leading dot optional) is in [`EXCLUDED_EXTENSIONS`].
#[must_use]
pub fn is_excluded(ext: &str) -> bool {
    let ext = normalize_ext(ext);
    EXCLUDED_EXTENSIONS.contains(&ext.as_str())
}

/// The extension of a path's file name, with a leading dot.
///
/// Dotfiles like `.env` have no extension.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
