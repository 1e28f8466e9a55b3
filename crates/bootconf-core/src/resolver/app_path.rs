//! Application path resolution.
//!
//! Resolves a user-supplied path expression against an application root:
//! - Absolute paths are used verbatim
//! - `./` and `..` expressions are resolved against the root
//! - Bare specifiers (`loopback/common/models`) are looked up in the
//!   package directories of the root and its ancestors, then in the
//!   global search roots
//!
//! In lenient mode (`strict: false`) a bare specifier is first tried as a
//! path relative to the root.

use super::error::ResolveError;
use super::extensions::{extension_of, is_excluded, ExtensionTable};
use super::module::resolve_module;
use super::search_paths::SearchPaths;
use bootconf_util::fs;
use bootconf_util::path::resolve as join_normalized;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Classification of a path expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathExpr {
    /// Starts at a filesystem root.
    Absolute,
    /// Starts with `./` or `..`.
    ExplicitRelative,
    /// Anything else; resolved through the package search path.
    Bare,
}

impl PathExpr {
    /// Classify an expression. Forms are tested in declaration order.
    #[must_use]
    pub fn classify(expr: &str) -> Self {
        if is_absolute_path(expr) {
            Self::Absolute
        } else if expr.starts_with("./") || expr.starts_with("..") {
            Self::ExplicitRelative
        } else {
            Self::Bare
        }
    }
}

/// Check if an expression is an absolute path.
fn is_absolute_path(expr: &str) -> bool {
    // Unix absolute
    if expr.starts_with('/') {
        return true;
    }

    // Windows absolute: C:\, D:\, etc.
    let bytes = expr.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        return true;
    }

    // UNC path: \\server\share
    expr.starts_with("\\\\")
}

/// Options controlling a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Never try bare specifiers as root-relative paths.
    pub strict: bool,
    /// When false, a package-directory match is returned as the joined
    /// path (e.g. the package directory) instead of its loadable entry file.
    pub full_resolve: bool,
    /// Return `None` instead of an error when nothing is found.
    pub optional: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            strict: true,
            full_resolve: true,
            optional: false,
        }
    }
}

impl ResolveOptions {
    /// Options with `strict: false`.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_full_resolve(mut self, full_resolve: bool) -> Self {
        self.full_resolve = full_resolve;
        self
    }

    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute path.
    pub path: PathBuf,
    /// True when the path was produced by loadable-module resolution
    /// (extension or index probing), false when an existing path was
    /// returned as given.
    pub was_fully_resolved: bool,
}

impl ResolvedPath {
    fn verbatim(path: PathBuf) -> Self {
        Self {
            path,
            was_fully_resolved: false,
        }
    }

    fn loadable(path: PathBuf) -> Self {
        Self {
            path,
            was_fully_resolved: true,
        }
    }
}

/// Resolves application path expressions.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    /// Loadable extensions, in probe order.
    pub extensions: ExtensionTable,
    /// Global search roots for bare specifiers.
    pub search_paths: SearchPaths,
}

impl PathResolver {
    #[must_use]
    pub fn new(extensions: ExtensionTable, search_paths: SearchPaths) -> Self {
        Self {
            extensions,
            search_paths,
        }
    }

    /// Default extension table with global roots taken from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ExtensionTable::default(), SearchPaths::from_env())
    }

    /// Resolve `expr` against `root`.
    ///
    /// Returns `Ok(None)` only when `opts.optional` is set.
    ///
    /// # Errors
    /// [`ResolveError::PathNotFound`] when nothing matches and the lookup is
    /// not optional; [`ResolveError::Io`] when a probe fails for a reason
    /// other than "not found".
    pub fn resolve(
        &self,
        root: &Path,
        expr: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<ResolvedPath>, ResolveError> {
        let mut tried = Vec::new();
        match self.lookup(root, expr, opts, &mut tried) {
            Ok(Some(found)) => Ok(Some(found)),
            Ok(None) if opts.optional => Ok(None),
            Ok(None) => Err(ResolveError::PathNotFound {
                expression: expr.to_string(),
                tried,
            }),
            Err(source) => Err(ResolveError::Io {
                expression: expr.to_string(),
                source,
            }),
        }
    }

    /// Resolve `expr`, returning `Ok(None)` when nothing matches regardless
    /// of `opts.optional`.
    ///
    /// # Errors
    /// [`ResolveError::Io`] when a probe fails for a reason other than "not found".
    pub fn try_resolve(
        &self,
        root: &Path,
        expr: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<ResolvedPath>, ResolveError> {
        let mut tried = Vec::new();
        self.lookup(root, expr, opts, &mut tried)
            .map_err(|source| ResolveError::Io {
                expression: expr.to_string(),
                source,
            })
    }

    fn lookup(
        &self,
        root: &Path,
        expr: &str,
        opts: &ResolveOptions,
        tried: &mut Vec<PathBuf>,
    ) -> io::Result<Option<ResolvedPath>> {
        let kind = PathExpr::classify(expr);
        let relative_attempt = kind == PathExpr::Bare && !opts.strict;

        let full_path = match kind {
            PathExpr::Absolute => Some(PathBuf::from(expr)),
            PathExpr::ExplicitRelative => Some(join_normalized(root, expr)),
            PathExpr::Bare if relative_attempt => Some(join_normalized(root, expr)),
            PathExpr::Bare => None,
        };

        if let Some(full_path) = full_path {
            // Existing files and directories win over extension probing
            if fs::exists(&full_path)? {
                return Ok(Some(ResolvedPath::verbatim(full_path)));
            }

            if let Some(found) = resolve_module(&full_path, &self.extensions, tried)? {
                return Ok(Some(ResolvedPath::loadable(found)));
            }

            if !relative_attempt {
                debug!(path = %full_path.display(), "skipping path - not loadable");
                return Ok(None);
            }
        }

        self.lookup_in_packages(root, expr, opts, tried)
    }

    /// Hierarchical lookup of `expr` in the package search path.
    fn lookup_in_packages(
        &self,
        root: &Path,
        expr: &str,
        opts: &ResolveOptions,
        tried: &mut Vec<PathBuf>,
    ) -> io::Result<Option<ResolvedPath>> {
        for dir in self.search_paths.candidates(root) {
            let joined = join_normalized(&dir, expr);

            if let Some(resolved) = resolve_module(&joined, &self.extensions, tried)? {
                if !opts.full_resolve && fs::exists(&joined)? {
                    return Ok(Some(ResolvedPath::verbatim(joined)));
                }
                return Ok(Some(ResolvedPath::loadable(resolved)));
            }

            if fs::exists(&joined)? {
                return Ok(Some(ResolvedPath::verbatim(joined)));
            }
        }

        debug!(expr, "skipping path - module not found");
        Ok(None)
    }

    /// Resolve `expr`, then prefer a script sibling over a `.json` match.
    ///
    /// `config` resolving to `config.json` becomes `config.js` when that
    /// file exists next to it.
    ///
    /// # Errors
    /// Same as [`PathResolver::resolve`].
    pub fn resolve_script_path(
        &self,
        root: &Path,
        expr: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let Some(resolved) = self.resolve(root, expr, opts)? else {
            return Ok(None);
        };

        let io_err = |source| ResolveError::Io {
            expression: expr.to_string(),
            source,
        };

        let source_dir = resolved.path.parent().unwrap_or(Path::new(""));
        let files = fs::try_read_dir(source_dir).map_err(io_err)?;
        let fixed = self
            .fix_file_extension(&resolved.path, &files, false)
            .map_err(io_err)?;

        Ok(Some(fixed.unwrap_or(resolved.path)))
    }

    /// Find a sibling of `path` with the same base name and a preferred
    /// extension.
    ///
    /// `path` itself is returned when it already has a preferred extension.
    /// Otherwise `files` (entry names in `path`'s directory) are scanned in
    /// order for a regular file named `<base><ext>`, where `<base>` is the
    /// file name of `path` without a trailing `.json`. With
    /// `only_scripts_exporting_function`, only evaluating script loaders
    /// qualify.
    ///
    /// # Errors
    /// Propagates I/O errors other than "not found" from stat calls.
    pub fn fix_file_extension(
        &self,
        path: &Path,
        files: &[OsString],
        only_scripts_exporting_function: bool,
    ) -> io::Result<Option<PathBuf>> {
        if self.extensions.is_preferred(path) {
            return Ok(Some(path.to_path_buf()));
        }

        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return Ok(None);
        };
        let basename = file_name.strip_suffix(".json").unwrap_or(&file_name);
        let source_dir = path.parent().unwrap_or(Path::new(""));

        for name in files {
            let name_str = name.to_string_lossy();
            let Some(ext) = extension_of(Path::new(name)) else {
                continue;
            };
            if is_excluded(&ext) || !self.extensions.is_registered(&ext) {
                continue;
            }
            if name_str.strip_suffix(ext.as_str()) != Some(basename) {
                continue;
            }
            if only_scripts_exporting_function && !self.extensions.exports_function(&ext) {
                continue;
            }

            let other = source_dir.join(name);
            if fs::is_file(&other)? {
                return Ok(Some(other));
            }
        }

        Ok(None)
    }

    /// Resolve a list of expressions leniently.
    ///
    /// Entries that cannot be resolved are kept as given.
    ///
    /// # Errors
    /// [`ResolveError::Io`] when a probe fails for a reason other than "not found".
    pub fn resolve_relative_paths(
        &self,
        exprs: &[String],
        root: &Path,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let opts = ResolveOptions::lenient();
        exprs
            .iter()
            .map(|expr| {
                Ok(match self.try_resolve(root, expr, &opts)? {
                    Some(resolved) => resolved.path,
                    None => {
                        debug!(expr = %expr, "skipping boot script - unknown file");
                        PathBuf::from(expr)
                    }
                })
            })
            .collect()
    }
}
