//! Immutable activity manifests and content hashing.
//!
//! A manifest is a versioned snapshot of an activity's content. Its identity
//! is (unitId, episodeId, activityId, version, questions); the content hash
//! over its canonical serialization makes two structurally identical
//! manifests hash the same regardless of how they were assembled.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::Activity;
use super::ids::{self, IdError};

/// Immutable snapshot of an activity, stored as a JSON object blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub unit_id: String,
    pub episode_id: String,
    /// Local activity id
    pub activity_id: String,
    /// Fully-qualified activity id (`unit#episode#activity`)
    pub activity_fq_id: String,
    pub title: String,
    pub version: u32,
    pub locale: String,
    /// Question count
    pub total: usize,
    pub questions: Vec<serde_json::Value>,
}

impl Manifest {
    /// Build a manifest from a resolved activity.
    pub fn build(unit_id: &str, episode_id: &str, activity: &Activity) -> Result<Self, IdError> {
        let activity_fq_id = ids::fqid(&[unit_id, episode_id, &activity.id])?;

        Ok(Self {
            unit_id: unit_id.to_string(),
            episode_id: episode_id.to_string(),
            activity_id: activity.id.clone(),
            activity_fq_id,
            title: activity.title.clone(),
            version: activity.version,
            locale: activity.locale.clone(),
            total: activity.questions.len(),
            questions: activity.questions.clone(),
        })
    }

    /// Content hash: SHA-256 over the canonical serialization, truncated to
    /// 16 hex characters.
    ///
    /// Canonical form is sorted-key, whitespace-minimal JSON; serializing
    /// through `serde_json::Value` orders every map by key, so insertion
    /// order never leaks into the hash. The hash is only used for key
    /// uniqueness and cache-busting, not as an integrity guarantee.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_string(&serde_json::to_value(self)?)?;

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let digest = hasher.finalize();

        Ok(hex::encode(&digest[..8]))
    }

    /// The manifest as a JSON value for storage.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_activity(version: u32) -> Activity {
        Activity {
            id: "a_1".to_string(),
            title: "Counting".to_string(),
            version,
            locale: "en-US".to_string(),
            questions: vec![
                json!({"prompt": "2 + 2?", "answer": 4}),
                json!({"prompt": "3 + 3?", "answer": 6}),
            ],
        }
    }

    #[test]
    fn test_manifest_fields() {
        let manifest = Manifest::build("u_1", "e_1", &sample_activity(1)).unwrap();

        assert_eq!(manifest.activity_fq_id, "u_1#e_1#a_1");
        assert_eq!(manifest.total, 2);
        assert_eq!(manifest.version, 1);
    }

    #[test]
    fn test_hash_is_16_hex_chars() {
        let manifest = Manifest::build("u_1", "e_1", &sample_activity(1)).unwrap();
        let hash = manifest.content_hash().unwrap();

        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_field_insertion_order() {
        let mut a = sample_activity(1);
        // Same question content, keys inserted in the opposite order
        a.questions = vec![
            json!({"answer": 4, "prompt": "2 + 2?"}),
            json!({"answer": 6, "prompt": "3 + 3?"}),
        ];
        let b = sample_activity(1);

        let hash_a = Manifest::build("u_1", "e_1", &a).unwrap().content_hash().unwrap();
        let hash_b = Manifest::build("u_1", "e_1", &b).unwrap().content_hash().unwrap();

        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn test_hash_changes_with_version() {
        let v1 = Manifest::build("u_1", "e_1", &sample_activity(1)).unwrap();
        let v2 = Manifest::build("u_1", "e_1", &sample_activity(2)).unwrap();

        assert_ne!(v1.content_hash().unwrap(), v2.content_hash().unwrap());
    }

    #[test]
    fn test_hash_changes_with_question_order() {
        let a = sample_activity(1);
        let mut b = sample_activity(1);
        b.questions.reverse();

        // Question sequence is ordered content, not a set
        assert_ne!(
            Manifest::build("u_1", "e_1", &a).unwrap().content_hash().unwrap(),
            Manifest::build("u_1", "e_1", &b).unwrap().content_hash().unwrap()
        );
    }

    #[test]
    fn test_build_rejects_separator_in_component() {
        let mut activity = sample_activity(1);
        activity.id = "a#1".to_string();

        assert!(Manifest::build("u_1", "e_1", &activity).is_err());
    }

    #[test]
    fn test_manifest_json_uses_camel_case() {
        let manifest = Manifest::build("u_1", "e_1", &sample_activity(3)).unwrap();
        let value = manifest.to_json().unwrap();

        assert_eq!(value["unitId"], "u_1");
        assert_eq!(value["activityFqId"], "u_1#e_1#a_1");
        assert_eq!(value["total"], 2);
        assert_eq!(value["version"], 3);
    }
}
