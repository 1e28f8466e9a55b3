#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Configuration loading for pluggable application bootstrap.
//!
//! - [`resolver`]: resolve absolute, relative, and bare path expressions
//! - [`merge`]: shape-preserving structural merge of configuration values
//! - [`loader`]: load `<name>.json`, `<name>.local.*`, `<name>.<env>.*` and fold them

pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod resolver;
pub mod version;

pub use config::Config;
pub use error::Error;
pub use loader::{try_read_json_config, ConfigError, ConfigLoader, ScriptEvaluator};
pub use merge::{merge, MergeError};
pub use resolver::{
    ExtensionTable, Loader, PathExpr, PathResolver, ResolveError, ResolveOptions, ResolvedPath,
    SearchPaths,
};
pub use version::VERSION;
