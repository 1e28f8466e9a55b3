//! `bootconf resolve` command implementation.
//!
//! Resolve a path expression the way configuration entries are resolved at
//! boot time.

use bootconf_core::version::OUTPUT_SCHEMA_VERSION;
use bootconf_core::{PathResolver, ResolveOptions};
use miette::Result;
use std::path::PathBuf;

/// Arguments for a single resolution.
#[derive(Debug)]
pub struct ResolveAction {
    pub root: PathBuf,
    pub expression: String,
    pub options: ResolveOptions,
    /// Prefer a script sibling over a `.json` match.
    pub script: bool,
}

pub fn run(action: ResolveAction, json: bool) -> Result<()> {
    let resolver = PathResolver::from_env();
    tracing::debug!(root = %action.root.display(), expr = %action.expression, "resolving");

    // (path, was_fully_resolved); script mode does not track the latter
    let outcome = if action.script {
        resolver
            .resolve_script_path(&action.root, &action.expression, &action.options)
            .map(|found| found.map(|path| (path, None)))
    } else {
        resolver
            .resolve(&action.root, &action.expression, &action.options)
            .map(|found| found.map(|r| (r.path, Some(r.was_fully_resolved))))
    };

    let resolved = match outcome {
        Ok(resolved) => resolved,
        Err(e) => super::fail(&e.into(), json),
    };

    if json {
        let (path, full) = match &resolved {
            Some((path, full)) => (Some(path.to_string_lossy()), *full),
            None => (None, None),
        };
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "expression": action.expression,
                "root": action.root.to_string_lossy(),
                "resolved": path,
                "was_fully_resolved": full
            })
        );
    } else {
        match resolved {
            Some((path, _)) => println!("{}", path.display()),
            None => eprintln!("No match for \"{}\"", action.expression),
        }
    }

    Ok(())
}
