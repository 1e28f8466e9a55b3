//! Loadable module resolution.
//!
//! Given an absolute candidate path, finds the concrete file a module
//! loader would pick: the path itself, the path with a registered
//! extension appended, or a directory entry point (`package.json` main,
//! then `index.*`).

use super::extensions::ExtensionTable;
use bootconf_util::fs;
use serde_json::Value;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of tried paths to record.
pub(crate) const MAX_TRIED_PATHS: usize = 20;

/// Record a probed path (capped).
pub(crate) fn add_tried(tried: &mut Vec<PathBuf>, path: &Path) {
    if tried.len() < MAX_TRIED_PATHS {
        tried.push(path.to_path_buf());
    }
}

/// Resolve `base` to a loadable file.
///
/// Returns `Ok(None)` when nothing loadable exists there.
///
/// # Errors
/// Propagates I/O errors other than "not found".
pub fn resolve_module(
    base: &Path,
    table: &ExtensionTable,
    tried: &mut Vec<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    add_tried(tried, base);

    if fs::is_file(base)? {
        return Ok(Some(base.to_path_buf()));
    }

    if let Some(found) = probe_extensions(base, table, tried)? {
        return Ok(Some(found));
    }

    if fs::is_dir(base)? {
        return resolve_directory(base, table, tried);
    }

    Ok(None)
}

/// Try `base` + each registered extension, in table order.
fn probe_extensions(
    base: &Path,
    table: &ExtensionTable,
    tried: &mut Vec<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    for ext in table.extensions() {
        let with_ext = append_extension(base, ext);
        add_tried(tried, &with_ext);

        if fs::is_file(&with_ext)? {
            return Ok(Some(with_ext));
        }
    }
    Ok(None)
}

/// Resolve a directory (package.json main > index.*).
fn resolve_directory(
    dir: &Path,
    table: &ExtensionTable,
    tried: &mut Vec<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    let pkg_json_path = dir.join("package.json");

    if let Some(main) = read_main_field(&pkg_json_path)? {
        add_tried(tried, &pkg_json_path);
        let main_path = bootconf_util::path::resolve(dir, main);

        if fs::is_file(&main_path)? {
            return Ok(Some(main_path));
        }

        if let Some(found) = probe_extensions(&main_path, table, tried)? {
            return Ok(Some(found));
        }

        if fs::is_dir(&main_path)? {
            if let Some(found) = probe_index(&main_path, table, tried)? {
                return Ok(Some(found));
            }
        }
    }

    probe_index(dir, table, tried)
}

fn probe_index(
    dir: &Path,
    table: &ExtensionTable,
    tried: &mut Vec<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    for ext in table.extensions() {
        let index = dir.join(format!("index{ext}"));
        add_tried(tried, &index);

        if fs::is_file(&index)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Read the `main` field of a package.json. A missing or malformed
/// manifest yields `None`.
fn read_main_field(pkg_json_path: &Path) -> io::Result<Option<String>> {
    if !fs::is_file(pkg_json_path)? {
        return Ok(None);
    }

    let content = fs::read_to_string_lossy(pkg_json_path)?;
    let Ok(value) = serde_json::from_str::<Value>(&content) else {
        tracing::debug!(path = %pkg_json_path.display(), "ignoring malformed package.json");
        return Ok(None);
    };

    Ok(value
        .get("main")
        .and_then(Value::as_str)
        .filter(|main| !main.is_empty())
        .map(str::to_string))
}

/// Append an extension to the full file name (`foo.config` + `.js` -> `foo.config.js`).
fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(ext);
    PathBuf::from(name)
}
