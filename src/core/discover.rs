//! Content tree discovery.
//!
//! Resolves definition documents and enumerates activity files under the
//! conventional layout:
//!
//! ```text
//! <root>/u_*/                  unit directories
//!   u_*.yaml                   unit definition (inside, or sibling of, the dir)
//!   episodes/e_*/              episode directories
//!     e_*.yaml                 episode definition (inside the dir)
//!     activities/a_*.yaml      activity documents
//! ```
//!
//! Pure filesystem logic, no store access. Everything is returned in
//! lexicographic path order so traversal is reproducible.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Episode container directory name inside a unit.
pub const EPISODES_DIR: &str = "episodes";

/// Activity container directory name inside an episode.
pub const ACTIVITIES_DIR: &str = "activities";

const UNIT_PREFIX: &str = "u_";
const EPISODE_PREFIX: &str = "e_";
const ACTIVITY_PREFIX: &str = "a_";
const DOC_EXT: &str = ".yaml";

/// Errors from tree discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The content root directory does not exist.
    #[error("content root not found: {0}")]
    RootNotFound(PathBuf),

    /// No unit definition inside or beside the unit directory.
    #[error("unit definition not found for {0}")]
    UnitDocumentNotFound(PathBuf),

    /// No episode definition inside the episode directory.
    #[error("episode definition not found: {0}")]
    EpisodeDocumentNotFound(PathBuf),

    /// A directory listing failed.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The last path component as a string.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn subdirs_with_prefix(parent: &Path, prefix: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = std::fs::read_dir(parent).map_err(|source| DiscoveryError::ReadDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: parent.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() && dir_name(&path).starts_with(prefix) {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Unit directories under the content root, sorted.
///
/// A missing root is a fatal configuration problem, not an empty tree.
pub fn unit_dirs(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }
    subdirs_with_prefix(root, UNIT_PREFIX)
}

/// Episode directories under a unit's `episodes/` container, sorted.
///
/// An absent container yields an empty list; the caller decides whether
/// that warrants a warning.
pub fn episode_dirs(episodes_root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !episodes_root.exists() {
        return Ok(Vec::new());
    }
    subdirs_with_prefix(episodes_root, EPISODE_PREFIX)
}

/// Locate the unit definition document.
///
/// Checks `<dir>/<name>.yaml` inside the directory first, then the sibling
/// `<name>.yaml` beside it.
pub fn find_unit_document(unit_dir: &Path) -> Result<PathBuf, DiscoveryError> {
    let doc_name = format!("{}{}", dir_name(unit_dir), DOC_EXT);

    let inside = unit_dir.join(&doc_name);
    if inside.is_file() {
        return Ok(inside);
    }

    if let Some(parent) = unit_dir.parent() {
        let sibling = parent.join(&doc_name);
        if sibling.is_file() {
            return Ok(sibling);
        }
    }

    Err(DiscoveryError::UnitDocumentNotFound(unit_dir.to_path_buf()))
}

/// Locate the episode definition document; it must live inside the
/// episode directory.
pub fn find_episode_document(episode_dir: &Path) -> Result<PathBuf, DiscoveryError> {
    let doc = episode_dir.join(format!("{}{}", dir_name(episode_dir), DOC_EXT));
    if doc.is_file() {
        return Ok(doc);
    }
    Err(DiscoveryError::EpisodeDocumentNotFound(doc))
}

/// Activity documents under an episode's `activities/` container, sorted
/// lexicographically by path.
///
/// An absent container is an episode with no activities, not an error.
pub fn activity_documents(episode_dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let activities_dir = episode_dir.join(ACTIVITIES_DIR);
    if !activities_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&activities_dir).map_err(|source| DiscoveryError::ReadDir {
        path: activities_dir.clone(),
        source,
    })?;

    let mut docs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: activities_dir.clone(),
            source,
        })?;
        let path = entry.path();
        let name = dir_name(&path);
        if path.is_file() && name.starts_with(ACTIVITY_PREFIX) && name.ends_with(DOC_EXT) {
            docs.push(path);
        }
    }

    docs.sort();
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "id: x\n").unwrap();
    }

    #[test]
    fn test_unit_document_inside_directory() {
        let temp = TempDir::new().unwrap();
        let unit_dir = temp.path().join("u_1");
        touch(&unit_dir.join("u_1.yaml"));

        let found = find_unit_document(&unit_dir).unwrap();
        assert_eq!(found, unit_dir.join("u_1.yaml"));
    }

    #[test]
    fn test_unit_document_sibling_fallback() {
        let temp = TempDir::new().unwrap();
        let unit_dir = temp.path().join("u_1");
        std::fs::create_dir_all(&unit_dir).unwrap();
        touch(&temp.path().join("u_1.yaml"));

        let found = find_unit_document(&unit_dir).unwrap();
        assert_eq!(found, temp.path().join("u_1.yaml"));
    }

    #[test]
    fn test_unit_document_missing() {
        let temp = TempDir::new().unwrap();
        let unit_dir = temp.path().join("u_1");
        std::fs::create_dir_all(&unit_dir).unwrap();

        assert!(matches!(
            find_unit_document(&unit_dir),
            Err(DiscoveryError::UnitDocumentNotFound(_))
        ));
    }

    #[test]
    fn test_episode_document_requires_in_dir_file() {
        let temp = TempDir::new().unwrap();
        let episode_dir = temp.path().join("e_1");
        std::fs::create_dir_all(&episode_dir).unwrap();

        assert!(matches!(
            find_episode_document(&episode_dir),
            Err(DiscoveryError::EpisodeDocumentNotFound(_))
        ));

        touch(&episode_dir.join("e_1.yaml"));
        assert!(find_episode_document(&episode_dir).is_ok());
    }

    #[test]
    fn test_activity_documents_sorted() {
        let temp = TempDir::new().unwrap();
        let episode_dir = temp.path().join("e_1");
        touch(&episode_dir.join("activities/a_2.yaml"));
        touch(&episode_dir.join("activities/a_10.yaml"));
        touch(&episode_dir.join("activities/a_1.yaml"));
        // Ignored: wrong prefix and non-file
        touch(&episode_dir.join("activities/notes.yaml"));
        std::fs::create_dir_all(episode_dir.join("activities/a_nested")).unwrap();

        let docs = activity_documents(&episode_dir).unwrap();
        let stems: Vec<String> = docs.iter().map(|p| file_stem(p)).collect();
        // Lexicographic, not numeric: a_10 sorts before a_2
        assert_eq!(stems, vec!["a_1", "a_10", "a_2"]);
    }

    #[test]
    fn test_missing_activities_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let episode_dir = temp.path().join("e_1");
        std::fs::create_dir_all(&episode_dir).unwrap();

        assert!(activity_documents(&episode_dir).unwrap().is_empty());
    }

    #[test]
    fn test_unit_dirs_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        for name in ["u_2", "u_1", "other", "u_3"] {
            std::fs::create_dir_all(temp.path().join(name)).unwrap();
        }
        touch(&temp.path().join("u_stray.yaml"));

        let dirs = unit_dirs(temp.path()).unwrap();
        let names: Vec<String> = dirs.iter().map(|p| dir_name(p)).collect();
        assert_eq!(names, vec!["u_1", "u_2", "u_3"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            unit_dirs(&temp.path().join("nope")),
            Err(DiscoveryError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_missing_episodes_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(episode_dirs(&temp.path().join("episodes")).unwrap().is_empty());
    }
}
