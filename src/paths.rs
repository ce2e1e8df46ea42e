//! Path resolution helpers.
//!
//! `absolute_normalized` and `realpath` never require the path to exist, so a
//! missing file can still be reported under its resolved name.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Drop `.` components and fold `..` into the preceding component.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Absolute form of `path` with `.` and `..` collapsed. Symlinks are left alone.
pub fn absolute_normalized(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize_lexically(&std::path::absolute(path)?))
}

/// Symlink-free absolute form of `path`.
///
/// The longest existing ancestor is canonicalized and the rest of the path
/// is appended with `.` and `..` collapsed.
pub fn realpath(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    for ancestor in absolute.ancestors() {
        let Ok(base) = std::fs::canonicalize(ancestor) else {
            continue;
        };
        let Ok(rest) = absolute.strip_prefix(ancestor) else {
            continue;
        };
        return Ok(normalize_lexically(&base.join(rest)));
    }
    Ok(normalize_lexically(&absolute))
}

/// Directory portion of `path`, trailing separators removed unless it is the root.
///
/// `"sd"` has none (`""`), `"bin/"` gives `"bin"`, `"/sd"` gives `"/"`.
pub fn dirname(path: &str) -> &str {
    let Some(sep) = path.rfind(std::path::is_separator) else {
        return "";
    };
    let head = &path[..=sep];
    let trimmed = head.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() {
        head
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_normalization() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_lexically(Path::new("/a/b/../..")), PathBuf::from("/"));
    }

    #[test]
    fn absolute_collapses_parent_components() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_normalized(Path::new("a/../sd")).unwrap(), cwd.join("sd"));
        assert_eq!(absolute_normalized(Path::new("./sd")).unwrap(), cwd.join("sd"));
        assert_eq!(
            absolute_normalized(Path::new("/opt/x/../sd")).unwrap(),
            PathBuf::from("/opt/sd")
        );
    }

    #[test]
    fn realpath_of_missing_file_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();

        let through_sub = dir.path().join("sub").join("..").join("nope.bin");
        assert_eq!(realpath(&through_sub).unwrap(), root.join("nope.bin"));

        let under_missing = dir.path().join("gone").join("..").join("nope.bin");
        assert_eq!(realpath(&under_missing).unwrap(), root.join("nope.bin"));
    }

    #[test]
    fn realpath_of_existing_file_matches_canonicalize() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("m.bin");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(realpath(&file).unwrap(), std::fs::canonicalize(&file).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn realpath_follows_symlinked_parent() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let resolved = realpath(&link.join("missing.bin")).unwrap();
        assert_eq!(
            resolved,
            std::fs::canonicalize(&real).unwrap().join("missing.bin")
        );
    }

    #[test]
    fn dirname_cases() {
        assert_eq!(dirname("sd"), "");
        assert_eq!(dirname("bin/sd"), "bin");
        assert_eq!(dirname("bin/"), "bin");
        assert_eq!(dirname("bin//sd"), "bin");
        assert_eq!(dirname("/sd"), "/");
        assert_eq!(dirname("/opt/sd/sd"), "/opt/sd");
    }
}
