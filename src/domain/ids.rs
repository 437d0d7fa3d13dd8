//! Identifier composition and storage key derivation.
//!
//! Fully-qualified identifiers chain the local ids of a record's ancestors
//! with a reserved separator. The same separator appears in the live-registry
//! partition keys, so no local id may contain it.

use thiserror::Error;

/// Reserved separator used in FQIDs and registry partition keys.
pub const SEP: char = '#';

/// Fixed sort key for every live record.
pub const LIVE_SK: &str = "LIVE";

/// Errors from identifier composition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// A local id contains the reserved separator.
    #[error("id component '{0}' contains reserved separator '{SEP}'")]
    ReservedSeparator(String),

    /// A local id is empty.
    #[error("id component is empty")]
    Empty,
}

/// Join local id components into a fully-qualified id.
///
/// Rejects components that are empty or contain the separator; a component
/// with an embedded `#` would make the resulting key ambiguous.
pub fn fqid(parts: &[&str]) -> Result<String, IdError> {
    for part in parts {
        if part.is_empty() {
            return Err(IdError::Empty);
        }
        if part.contains(SEP) {
            return Err(IdError::ReservedSeparator(part.to_string()));
        }
    }
    Ok(parts.join(&SEP.to_string()))
}

/// Partition key for a unit live record: `UNIT#<unitId>`
pub fn unit_pk(unit_id: &str) -> Result<String, IdError> {
    Ok(format!("UNIT{}{}", SEP, fqid(&[unit_id])?))
}

/// Partition key for an episode live record: `EPISODE#<unitId>#<episodeId>`
pub fn episode_pk(unit_id: &str, episode_id: &str) -> Result<String, IdError> {
    Ok(format!("EPISODE{}{}", SEP, fqid(&[unit_id, episode_id])?))
}

/// Partition key for an activity live record:
/// `ACTIVITY#<unitId>#<episodeId>#<activityId>`
pub fn activity_pk(unit_id: &str, episode_id: &str, activity_id: &str) -> Result<String, IdError> {
    Ok(format!(
        "ACTIVITY{}{}",
        SEP,
        fqid(&[unit_id, episode_id, activity_id])?
    ))
}

/// Object key for an immutable manifest:
/// `<prefix>/<unitId>/<episodeId>/<activityId>/v<version>/manifest-<hash>.json`
pub fn manifest_key(
    prefix: &str,
    unit_id: &str,
    episode_id: &str,
    activity_id: &str,
    version: u32,
    hash: &str,
) -> String {
    format!(
        "{}/{}/{}/{}/v{}/manifest-{}.json",
        prefix, unit_id, episode_id, activity_id, version, hash
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqid_composition() {
        assert_eq!(fqid(&["u_1", "e_1", "a_1"]).unwrap(), "u_1#e_1#a_1");
        assert_eq!(fqid(&["u_1"]).unwrap(), "u_1");
    }

    #[test]
    fn test_fqid_rejects_separator() {
        let err = fqid(&["u_1", "e#1"]).unwrap_err();
        assert_eq!(err, IdError::ReservedSeparator("e#1".to_string()));
    }

    #[test]
    fn test_fqid_rejects_empty_component() {
        assert_eq!(fqid(&["u_1", ""]).unwrap_err(), IdError::Empty);
    }

    #[test]
    fn test_live_partition_keys() {
        assert_eq!(unit_pk("u_1").unwrap(), "UNIT#u_1");
        assert_eq!(episode_pk("u_1", "e_1").unwrap(), "EPISODE#u_1#e_1");
        assert_eq!(
            activity_pk("u_1", "e_1", "a_2").unwrap(),
            "ACTIVITY#u_1#e_1#a_2"
        );
    }

    #[test]
    fn test_manifest_key_format() {
        let key = manifest_key("activities", "u_1", "e_1", "a_1", 3, "deadbeefdeadbeef");
        assert_eq!(
            key,
            "activities/u_1/e_1/a_1/v3/manifest-deadbeefdeadbeef.json"
        );
    }
}
