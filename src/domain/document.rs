//! Definition document schemas and loading.
//!
//! Units, episodes and activities are defined in YAML files. The raw schemas
//! declare every optional field explicitly; defaults are substituted once,
//! at parse time, producing the resolved types the rest of the pipeline
//! works with.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors from reading or parsing a definition document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

fn load_yaml<T>(path: &Path) -> Result<T, DocumentError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;

    // An empty document is an empty mapping, not a parse error
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|source| DocumentError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Raw unit definition (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitDoc {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Raw episode definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeDoc {
    pub id: Option<String>,
    pub title: Option<String>,
}

/// Raw activity definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityDoc {
    pub id: Option<String>,
    pub title: Option<String>,
    pub version: Option<u32>,
    pub locale: Option<String>,
    /// Question payloads are opaque; they are carried through to the
    /// manifest verbatim and never interpreted.
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

/// A unit with all defaults applied
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Unit {
    /// Load a unit document and resolve defaults.
    ///
    /// `fallback_id` is the directory name; it is used when the document
    /// does not declare its own id. Title defaults to the id.
    pub fn load(path: &Path, fallback_id: &str) -> Result<Self, DocumentError> {
        let doc: UnitDoc = load_yaml(path)?;
        let id = doc.id.unwrap_or_else(|| fallback_id.to_string());
        let title = doc.title.unwrap_or_else(|| id.clone());
        Ok(Self {
            id,
            title,
            content: doc.content.unwrap_or_default(),
        })
    }
}

/// An episode with all defaults applied
#[derive(Debug, Clone)]
pub struct Episode {
    pub id: String,
    pub title: String,
}

impl Episode {
    /// Load an episode document and resolve defaults.
    pub fn load(path: &Path, fallback_id: &str) -> Result<Self, DocumentError> {
        let doc: EpisodeDoc = load_yaml(path)?;
        let id = doc.id.unwrap_or_else(|| fallback_id.to_string());
        let title = doc.title.unwrap_or_else(|| id.clone());
        Ok(Self { id, title })
    }
}

/// An activity with all defaults applied
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub version: u32,
    pub locale: String,
    pub questions: Vec<serde_json::Value>,
}

impl Activity {
    /// Load an activity document and resolve defaults.
    ///
    /// `fallback_id` is the file stem (e.g. `a_1` for `a_1.yaml`).
    pub fn load(path: &Path, fallback_id: &str) -> Result<Self, DocumentError> {
        let doc: ActivityDoc = load_yaml(path)?;
        Ok(Self::from_doc(doc, fallback_id))
    }

    /// Resolve defaults on an already-parsed document.
    pub fn from_doc(doc: ActivityDoc, fallback_id: &str) -> Self {
        let id = doc.id.unwrap_or_else(|| fallback_id.to_string());
        let title = doc.title.unwrap_or_else(|| id.clone());
        Self {
            id,
            title,
            version: doc.version.unwrap_or(1),
            locale: doc.locale.unwrap_or_else(|| "en-US".to_string()),
            questions: doc.questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_activity_defaults() {
        let doc = ActivityDoc::default();
        let activity = Activity::from_doc(doc, "a_2");

        assert_eq!(activity.id, "a_2");
        assert_eq!(activity.title, "a_2");
        assert_eq!(activity.version, 1);
        assert_eq!(activity.locale, "en-US");
        assert!(activity.questions.is_empty());
    }

    #[test]
    fn test_activity_declared_fields_win() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "a_1.yaml",
            r#"
id: custom
title: Counting
version: 3
locale: fil-PH
questions:
  - prompt: "2 + 2?"
    answer: 4
  - prompt: "3 + 3?"
    answer: 6
"#,
        );

        let activity = Activity::load(&path, "a_1").unwrap();
        assert_eq!(activity.id, "custom");
        assert_eq!(activity.title, "Counting");
        assert_eq!(activity.version, 3);
        assert_eq!(activity.locale, "fil-PH");
        assert_eq!(activity.questions.len(), 2);
        assert_eq!(activity.questions[0]["answer"], 4);
    }

    #[test]
    fn test_unit_title_defaults_to_id() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "u_1.yaml", "content: Welcome\n");

        let unit = Unit::load(&path, "u_1").unwrap();
        assert_eq!(unit.id, "u_1");
        assert_eq!(unit.title, "u_1");
        assert_eq!(unit.content, "Welcome");
    }

    #[test]
    fn test_episode_load() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "e_1.yaml", "title: Basics\n");

        let episode = Episode::load(&path, "e_1").unwrap();
        assert_eq!(episode.id, "e_1");
        assert_eq!(episode.title, "Basics");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "a_1.yaml", "version: [not, an, integer]\n");

        assert!(matches!(
            Activity::load(&path, "a_1"),
            Err(DocumentError::Parse { .. })
        ));
    }
}
