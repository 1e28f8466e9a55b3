//! Application path resolver.
//!
//! Resolves absolute, relative, and bare path expressions against an
//! application root, with extension probing, directory entry points, and
//! hierarchical `node_modules` lookup.

mod app_path;
mod error;
pub mod extensions;
mod module;
pub mod search_paths;

pub use app_path::{PathExpr, PathResolver, ResolveOptions, ResolvedPath};
pub use error::{codes, ResolveError};
pub use extensions::{ExtensionTable, Loader, EXCLUDED_EXTENSIONS};
pub use module::resolve_module;
pub use search_paths::{SearchPaths, PACKAGE_DIR_NAME};
