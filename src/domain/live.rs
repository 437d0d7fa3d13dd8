//! Live records: mutable pointers to the currently published state.
//!
//! Every entity gets one live record at a hierarchical composite key. Unit
//! and episode records are always overwritten (latest structural listing
//! wins); activity records carry a version used by the registry's
//! conditional-put guard so a published version never regresses.

use serde::{Deserialize, Serialize};

use super::ids::{self, IdError, LIVE_SK};

/// A live pointer record, one of three kinds.
///
/// Serializes with an `entityType` tag and camelCase attributes, which is
/// the shape written to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entityType")]
pub enum LiveRecord {
    #[serde(rename = "UNIT_LIVE")]
    Unit(UnitLive),

    #[serde(rename = "EPISODE_LIVE")]
    Episode(EpisodeLive),

    #[serde(rename = "ACTIVITY_LIVE")]
    Activity(ActivityLive),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitLive {
    pub unit_id: String,
    pub title: String,
    pub content: String,
    /// Local episode ids under this unit, in publish order
    pub episode_ids: Vec<String>,
    /// Fully-qualified episode ids
    pub episode_fq_ids: Vec<String>,
    /// Epoch seconds
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeLive {
    pub unit_id: String,
    pub episode_id: String,
    pub title: String,
    pub activity_ids: Vec<String>,
    pub activity_fq_ids: Vec<String>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLive {
    pub unit_id: String,
    pub episode_id: String,
    /// Local activity id
    pub activity_id: String,
    pub activity_fq_id: String,
    pub title: String,
    pub locale: String,
    /// URI of the immutable manifest backing this pointer
    pub manifest_key: String,
    pub total_questions: usize,
    pub version: u32,
    pub updated_at: i64,
}

impl LiveRecord {
    /// Partition key for this record's composite key.
    pub fn pk(&self) -> Result<String, IdError> {
        match self {
            LiveRecord::Unit(u) => ids::unit_pk(&u.unit_id),
            LiveRecord::Episode(e) => ids::episode_pk(&e.unit_id, &e.episode_id),
            LiveRecord::Activity(a) => {
                ids::activity_pk(&a.unit_id, &a.episode_id, &a.activity_id)
            }
        }
    }

    /// Sort key; the same fixed literal for every live record.
    pub fn sk(&self) -> &'static str {
        LIVE_SK
    }

    /// Version attribute, present only on the activity kind.
    pub fn version(&self) -> Option<u32> {
        match self {
            LiveRecord::Activity(a) => Some(a.version),
            _ => None,
        }
    }

    /// Kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            LiveRecord::Unit(_) => "unit",
            LiveRecord::Episode(_) => "episode",
            LiveRecord::Activity(_) => "activity",
        }
    }
}
