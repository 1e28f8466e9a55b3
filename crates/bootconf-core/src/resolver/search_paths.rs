//! Search-path enumeration for bare specifiers.
//!
//! The candidate list is the package directory of the root and of every
//! ancestor (closest first), followed by the explicitly configured global
//! roots.

use std::path::{Path, PathBuf};

/// Name of the per-directory package folder probed during hierarchical search.
pub const PACKAGE_DIR_NAME: &str = "node_modules";

/// Environment variable listing extra global search roots.
pub const NODE_PATH_ENV: &str = "NODE_PATH";

/// Ordered search roots for hierarchical lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// Global roots appended after the ancestor package directories.
    pub global: Vec<PathBuf>,
}

impl SearchPaths {
    /// Search paths with the given global roots.
    #[must_use]
    pub fn new(global: Vec<PathBuf>) -> Self {
        Self { global }
    }

    /// Global roots from the environment: each entry of `NODE_PATH`, then
    /// `$HOME/.node_modules` and `$HOME/.node_libraries`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut global: Vec<PathBuf> = std::env::var_os(NODE_PATH_ENV)
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(home) = dirs_next::home_dir() {
            global.push(home.join(".node_modules"));
            global.push(home.join(".node_libraries"));
        }

        Self { global }
    }

    /// All candidate directories for `root`, in search order.
    #[must_use]
    pub fn candidates(&self, root: &Path) -> Vec<PathBuf> {
        let mut dirs = package_dirs(root);
        dirs.extend(self.global.iter().cloned());
        dirs
    }
}

/// `<dir>/node_modules` for `root` and each of its ancestors, closest first.
///
/// Directories that are themselves named `node_modules` are skipped so a
/// lookup never produces `node_modules/node_modules`.
#[must_use]
pub fn package_dirs(root: &Path) -> Vec<PathBuf> {
    root.ancestors()
        .filter(|dir| !dir.as_os_str().is_empty())
        .filter(|dir| dir.file_name().is_none_or(|name| name != PACKAGE_DIR_NAME))
        .map(|dir| dir.join(PACKAGE_DIR_NAME))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[cfg(unix)]
    #[test]
    fn test_package_dirs_walk_up() {
        let dirs = package_dirs(Path::new("/srv/app/server"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/srv/app/server/node_modules"),
                PathBuf::from("/srv/app/node_modules"),
                PathBuf::from("/srv/node_modules"),
                PathBuf::from("/node_modules"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_package_dirs_skip_node_modules_dirs() {
        let dirs = package_dirs(Path::new("/app/node_modules/foo"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/app/node_modules/foo/node_modules"),
                PathBuf::from("/app/node_modules"),
                PathBuf::from("/node_modules"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_candidates_append_globals_last() {
        let paths = SearchPaths::new(vec![PathBuf::from("/opt/shared")]);
        let candidates = paths.candidates(Path::new("/app"));
        assert_eq!(candidates.first(), Some(&PathBuf::from("/app/node_modules")));
        assert_eq!(candidates.last(), Some(&PathBuf::from("/opt/shared")));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_from_env_reads_node_path() {
        std::env::set_var(NODE_PATH_ENV, "/opt/a:/opt/b");
        let paths = SearchPaths::from_env();
        std::env::remove_var(NODE_PATH_ENV);

        assert_eq!(paths.global[0], PathBuf::from("/opt/a"));
        assert_eq!(paths.global[1], PathBuf::from("/opt/b"));
    }
}
