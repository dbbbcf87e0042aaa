use crate::utils::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn matches_extension(name: &str, extension: &str) -> bool {
    let (name, ext) = (name.as_bytes(), extension.as_bytes());
    name.len() > ext.len()
        && name[name.len() - ext.len() - 1] == b'.'
        && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

/// Recursively collects files under `root` whose name ends in
/// `.<extension>`, compared case-insensitively.
///
/// Paths come back in traversal order. Entries that cannot be read below
/// the root are skipped with a warning; an unreadable root is an error.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConvertError::InvalidConfigValueError {
            field: "input".to_string(),
            value: root.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!("⚠️ Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if matches_extension(&name, extension) && entry.path().is_file() {
            tracing::debug!("Found {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

/// File name of `path` with the trailing `.<extension>` removed.
pub fn stem_of(path: &Path, extension: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if matches_extension(&name, extension) {
        // matched case-insensitively, so cut by length
        let cut = name.len() - extension.len() - 1;
        return name[..cut].to_string();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_recurses_and_ignores_case() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.pub"), b"").unwrap();
        fs::write(root.join("sub/B.PUB"), b"").unwrap();
        fs::write(root.join("sub/deeper/c.Pub"), b"").unwrap();
        fs::write(root.join("sub/notes.txt"), b"").unwrap();
        fs::write(root.join("publish.doc"), b"").unwrap();

        let found: HashSet<PathBuf> = discover(root, "pub").unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> = [
            root.join("a.pub"),
            root.join("sub/B.PUB"),
            root.join("sub/deeper/c.Pub"),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_discover_skips_directories_named_like_documents() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("archive.pub")).unwrap();
        assert!(discover(dir.path(), "pub").unwrap().is_empty());
    }

    #[test]
    fn test_discover_empty_tree_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert_eq!(discover(dir.path(), "pub").unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_discover_missing_root_errors() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&dir.path().join("missing"), "pub").is_err());
    }

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of(Path::new("/x/Annual Report.pub"), "pub"), "Annual Report");
        assert_eq!(stem_of(Path::new("/x/menu.v2.PUB"), "pub"), "menu.v2");
        assert_eq!(stem_of(Path::new("/x/.pub"), "pub"), "");
    }
}
