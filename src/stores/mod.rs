//! Store interfaces for the two durable backends.
//!
//! The orchestrator only sees two capabilities: an object store for
//! immutable manifest blobs and a live registry for mutable pointer records.
//! Real implementations talk to S3 and DynamoDB; the in-memory versions
//! implement the same contracts for tests and embedding.

pub mod dynamo;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::LiveRecord;

// Re-export the concrete clients
pub use dynamo::DynamoLiveRegistry;
pub use memory::{InMemoryLiveRegistry, InMemoryObjectStore};
pub use s3::S3ObjectStore;

/// Outcome of a store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write went through.
    Written,

    /// The version guard rejected the write: an equal or newer version is
    /// already live. Expected under stale inputs or concurrent publishes,
    /// never an error.
    Skipped,

    /// Dry-run mode; the write was logged instead of performed.
    DryRun,
}

/// Errors from object-store or live-registry writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object store rejected or failed the blob write.
    #[error("object write failed at {key}: {message}")]
    ObjectWrite { key: String, message: String },

    /// The live registry failed for a reason other than the version guard.
    #[error("live write failed at {pk}: {message}")]
    LiveWrite { pk: String, message: String },

    /// A record could not be serialized for storage.
    #[error("record serialization failed: {0}")]
    Serialization(String),

    /// A record key could not be composed.
    #[error(transparent)]
    InvalidKey(#[from] crate::domain::IdError),
}

/// Immutable JSON blob storage.
///
/// Each key names write-once content: the payload for a given key never
/// changes, so repeated writes to the same key are safe no-ops at the data
/// level even though every call issues the write unconditionally.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a JSON blob under `key`.
    async fn put_immutable(
        &self,
        key: &str,
        body: &serde_json::Value,
    ) -> Result<PutOutcome, StoreError>;
}

/// Mutable live-pointer registry with an optional version guard.
#[async_trait]
pub trait LiveRegistry: Send + Sync {
    /// Write a live record at its composite key.
    ///
    /// With `guard_version` set and a versioned record, the write succeeds
    /// only when no record exists at the key or the existing record's
    /// version is less than or equal to the new one; a rejection returns
    /// [`PutOutcome::Skipped`]. Without the guard the record is
    /// unconditionally overwritten.
    async fn put_live(
        &self,
        record: &LiveRecord,
        guard_version: bool,
    ) -> Result<PutOutcome, StoreError>;
}
