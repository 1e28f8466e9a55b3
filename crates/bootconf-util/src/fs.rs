use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Returns true for errors that mean "nothing lives at this path".
///
/// `NotADirectory` covers probes like `file.json/extra` where a parent
/// component is a regular file.
fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Stat a path, following symlinks.
///
/// Returns `Ok(None)` when the path does not exist. Any other failure
/// (permission denied, I/O error) is returned unchanged.
///
/// # Errors
/// Returns an error if the metadata lookup fails for a reason other than
/// the path being missing.
pub fn probe(path: &Path) -> io::Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Check whether a file or directory exists at `path`.
///
/// # Errors
/// See [`probe`].
pub fn exists(path: &Path) -> io::Result<bool> {
    Ok(probe(path)?.is_some())
}

/// Check whether `path` is a regular file.
///
/// # Errors
/// See [`probe`].
pub fn is_file(path: &Path) -> io::Result<bool> {
    Ok(probe(path)?.is_some_and(|m| m.is_file()))
}

/// Check whether `path` is a directory.
///
/// # Errors
/// See [`probe`].
pub fn is_dir(path: &Path) -> io::Result<bool> {
    Ok(probe(path)?.is_some_and(|m| m.is_dir()))
}

/// List the entry names of a directory, sorted.
///
/// A missing directory yields an empty listing instead of an error.
///
/// # Errors
/// Returns an error if the directory exists but cannot be read.
pub fn try_read_dir(dir: &Path) -> io::Result<Vec<OsString>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if is_missing(&e) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = entries
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
