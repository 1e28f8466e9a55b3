use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. Does not touch the filesystem or follow symlinks.
///
/// `..` at the root stays at the root; leading `..` segments of a relative
/// path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }

    out
}

/// Join `target` onto `base` and normalize the result.
///
/// An absolute `target` replaces `base` entirely.
#[must_use]
pub fn resolve(base: &Path, target: impl AsRef<Path>) -> PathBuf {
    normalize(&base.join(target))
}
