//! coursecast - hierarchical course-content publisher
//!
//! Publishes a tree of units, episodes and activities defined in local YAML
//! documents into two durable stores: an object store holding immutable,
//! content-addressed activity manifests, and a live registry holding the
//! mutable pointers clients read to discover the current published state.
//!
//! # Architecture
//!
//! The pipeline is a sequential walk with two write targets:
//! - Unit and episode live records are overwritten unconditionally (latest
//!   structural listing wins)
//! - Activity manifests are content-addressed and write-once
//! - Activity live pointers go through a version-guarded conditional put,
//!   so a published version never regresses under repeated or concurrent
//!   publish runs
//!
//! # Modules
//!
//! - `domain`: Data structures (documents, Manifest, LiveRecord, ids)
//! - `core`: Tree discovery and the publish orchestrator
//! - `stores`: Store capability traits, S3/DynamoDB clients, in-memory fakes
//! - `config`: Resolved run configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Preview what a publish would write
//! coursecast publish --root content/units --bucket my-content --dry-run
//!
//! # Publish for real
//! coursecast publish --root content/units --bucket my-content
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod stores;

// Re-export main types at crate root for convenience
pub use crate::core::{DiscoveryError, PublishError, PublishReport, Publisher};
pub use config::{ConfigError, PublishConfig};
pub use domain::{Activity, Episode, LiveRecord, Manifest, Unit};
pub use stores::{
    DynamoLiveRegistry, InMemoryLiveRegistry, InMemoryObjectStore, LiveRegistry, ObjectStore,
    PutOutcome, S3ObjectStore, StoreError,
};
