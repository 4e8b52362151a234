//! Path utilities

use std::path::{Component, Path, PathBuf};

/// Normalize path separators to forward slashes (for PAK files)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Lexically resolve `.` and `..` segments without touching the filesystem
///
/// `..` at the root stays at the root. Symlinks are not resolved.
pub fn clean_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    cleaned.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if at_root {
                    if cleaned.as_os_str().is_empty() {
                        cleaned.push(component);
                    }
                } else if matches!(cleaned.components().next_back(), Some(Component::ParentDir)) {
                    cleaned.push(component);
                } else {
                    cleaned.pop();
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_path(r"Mods\Sample\meta.lsx"), "Mods/Sample/meta.lsx");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a/b/../c/./d"), PathBuf::from("/a/c/d"));
        assert_eq!(clean_path("/a/MyMod/.."), PathBuf::from("/a"));
        assert_eq!(clean_path("/.."), PathBuf::from("/"));
        assert_eq!(clean_path("../x"), PathBuf::from("../x"));
        assert_eq!(clean_path("../../x"), PathBuf::from("../../x"));
    }
}
