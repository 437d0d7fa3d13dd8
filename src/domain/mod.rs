//! Domain types for the coursecast publisher.
//!
//! This module contains the core data structures:
//! - Documents: YAML definition schemas and their resolved forms
//! - Manifest: Immutable, content-addressed activity snapshots
//! - LiveRecord: Mutable pointers to the currently published state
//! - Ids: FQID composition and storage key derivation

pub mod document;
pub mod ids;
pub mod live;
pub mod manifest;

// Re-export commonly used types
pub use document::{Activity, ActivityDoc, DocumentError, Episode, EpisodeDoc, Unit, UnitDoc};
pub use ids::{IdError, LIVE_SK, SEP};
pub use live::{ActivityLive, EpisodeLive, LiveRecord, UnitLive};
pub use manifest::Manifest;
