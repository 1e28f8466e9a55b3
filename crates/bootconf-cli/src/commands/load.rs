//! `bootconf load` command implementation.
//!
//! Find `<name>.json`, `<name>.local.*` and `<name>.<env>.*` in a directory
//! and print the merged result.

use bootconf_core::version::OUTPUT_SCHEMA_VERSION;
use bootconf_core::ConfigLoader;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

/// Arguments for loading a named configuration.
#[derive(Debug)]
pub struct LoadAction {
    pub dir: PathBuf,
    pub env: String,
    pub name: String,
}

pub fn run(action: LoadAction, json: bool) -> Result<()> {
    let loader = ConfigLoader::default();

    let files = match loader.find_config_files(&action.dir, &action.env, &action.name) {
        Ok(files) => files,
        Err(e) => super::fail(&e.into(), json),
    };
    tracing::debug!(count = files.len(), env = %action.env, "found config files");

    let config = match loader.merge_files(&files) {
        Ok(config) => config,
        Err(e) => super::fail(&e.into(), json),
    };

    if json {
        let file_list: Vec<_> = files.iter().map(|f| f.to_string_lossy()).collect();
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "name": action.name,
                "env": action.env,
                "dir": action.dir.to_string_lossy(),
                "files": file_list,
                "config": config
            })
        );
    } else {
        if files.is_empty() {
            eprintln!(
                "No \"{}.json\" in {}",
                action.name,
                action.dir.display()
            );
        }
        for file in &files {
            eprintln!("  + {}", file.display());
        }
        println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
    }

    Ok(())
}
