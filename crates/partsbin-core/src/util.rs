//! Path helpers for stored relative paths

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors related to path validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path traversal attempt detected: {0}")]
    TraversalAttempt(String),

    #[error("Path escapes data directory: {0}")]
    EscapesRoot(String),

    #[error("Invalid path component: {0}")]
    InvalidComponent(String),
}

/// Join a stored relative path onto the data root
///
/// Rejects absolute paths and `..` components that would leave `root`.
///
/// # Errors
/// Returns an error if the path would escape the root directory
pub fn safe_join(root: &Path, untrusted_path: &str) -> Result<PathBuf, PathError> {
    let normalized = normalize_path(Path::new(untrusted_path))?;
    if normalized.as_os_str().is_empty() {
        return Err(PathError::InvalidComponent(format!(
            "Path has no file component: {untrusted_path}"
        )));
    }

    let joined = root.join(&normalized);
    verify_under_root(root, &joined)?;
    Ok(joined)
}

/// Render a relative path with `/` separators for storage
#[must_use]
pub fn to_stored_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_path(path: &Path) -> Result<PathBuf, PathError> {
    let mut normalized = PathBuf::new();
    let mut depth: usize = 0;

    for component in path.components() {
        match component {
            Component::Normal(c) => {
                if c.to_string_lossy().contains('\0') {
                    return Err(PathError::InvalidComponent(
                        "Null byte in path".to_string(),
                    ));
                }
                normalized.push(c);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(PathError::TraversalAttempt(path.display().to_string()));
                }
                normalized.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::InvalidComponent(
                    "Absolute path not allowed".to_string(),
                ));
            }
        }
    }

    Ok(normalized)
}

/// Check `path` is under `root`, following symlinks when both exist
fn verify_under_root(root: &Path, path: &Path) -> Result<(), PathError> {
    if root.exists() && path.exists() {
        let canonical_root = root
            .canonicalize()
            .map_err(|_| PathError::EscapesRoot(path.display().to_string()))?;
        let canonical_path = path
            .canonicalize()
            .map_err(|_| PathError::EscapesRoot(path.display().to_string()))?;

        if !canonical_path.starts_with(&canonical_root) {
            return Err(PathError::EscapesRoot(path.display().to_string()));
        }
    } else if !path.starts_with(root) {
        return Err(PathError::EscapesRoot(path.display().to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_join_normal() {
        let root = PathBuf::from("/tmp/partsbin");
        let result = safe_join(&root, "images/b1.png").unwrap();
        assert_eq!(result, PathBuf::from("/tmp/partsbin/images/b1.png"));
    }

    #[test]
    fn test_safe_join_collapses_inner_parent() {
        let root = PathBuf::from("/tmp/partsbin");
        let result = safe_join(&root, "images/../images/./b1.png").unwrap();
        assert_eq!(result, PathBuf::from("/tmp/partsbin/images/b1.png"));
    }

    #[test]
    fn test_safe_join_rejects_traversal() {
        let root = PathBuf::from("/tmp/partsbin");
        assert!(matches!(
            safe_join(&root, "../etc/passwd"),
            Err(PathError::TraversalAttempt(_))
        ));
    }

    #[test]
    fn test_safe_join_rejects_absolute() {
        let root = PathBuf::from("/tmp/partsbin");
        assert!(safe_join(&root, "/etc/passwd").is_err());
    }

    #[test]
    fn test_safe_join_rejects_empty() {
        let root = PathBuf::from("/tmp/partsbin");
        assert!(safe_join(&root, "images/..").is_err());
    }

    #[test]
    fn test_to_stored_path_uses_forward_slashes() {
        let relative = Path::new("images").join("b1.png");
        assert_eq!(to_stored_path(&relative), "images/b1.png");
    }
}
