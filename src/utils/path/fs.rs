//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `relative_path` - lexical relative path between two absolute paths
//! - `root_prefix` - `./` or `../../`-style prefix used in page templates

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Lexical relative path from `from` to `to`.
///
/// Both paths should be absolute (or both relative to the same base).
/// Returns an empty path when they are equal.
///
/// # Example
/// ```ignore
/// relative_path(Path::new("/site/blog/hello"), Path::new("/site")) // "../.."
/// relative_path(Path::new("/site"), Path::new("/site/public"))     // "public"
/// ```
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component.as_os_str());
    }
    rel
}

/// Prefix that leads from a page's output directory back to the site root.
///
/// Always uses `/` separators and ends with `/`, so it can be concatenated
/// with root-relative asset paths inside HTML templates.
///
/// # Example
/// ```ignore
/// root_prefix(Path::new("/site/blog/hello"), Path::new("/site")) // "../../"
/// root_prefix(Path::new("/site"), Path::new("/site"))             // "./"
/// ```
pub fn root_prefix(out_dir: &Path, root: &Path) -> String {
    let rel = relative_path(out_dir, root);
    if rel.as_os_str().is_empty() {
        return "./".to_string();
    }

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{joined}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_relative_path_up() {
        assert_eq!(
            relative_path(Path::new("/site/blog/hello"), Path::new("/site")),
            PathBuf::from("../..")
        );
    }

    #[test]
    fn test_relative_path_down() {
        assert_eq!(
            relative_path(Path::new("/site"), Path::new("/site/public")),
            PathBuf::from("public")
        );
    }

    #[test]
    fn test_relative_path_sibling() {
        assert_eq!(
            relative_path(Path::new("/site/out/blog"), Path::new("/site/assets")),
            PathBuf::from("../../assets")
        );
    }

    #[test]
    fn test_root_prefix_nested() {
        assert_eq!(
            root_prefix(Path::new("/site/blog/hello"), Path::new("/site")),
            "../../"
        );
    }

    #[test]
    fn test_root_prefix_same_dir() {
        assert_eq!(root_prefix(Path::new("/site"), Path::new("/site")), "./");
        assert_eq!(root_prefix(Path::new("/site/."), Path::new("/site")), "./");
    }
}
