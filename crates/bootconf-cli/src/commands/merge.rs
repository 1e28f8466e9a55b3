//! `bootconf merge` command implementation.

use bootconf_core::version::OUTPUT_SCHEMA_VERSION;
use bootconf_core::ConfigLoader;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

/// Merge `files` in order and print the result.
pub fn run(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let config = match ConfigLoader::default().merge_files(&files) {
        Ok(config) => config,
        Err(e) => super::fail(&e.into(), json),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "config": config
            })
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
    }

    Ok(())
}
