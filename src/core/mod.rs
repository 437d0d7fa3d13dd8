//! Core publish pipeline.
//!
//! This module contains:
//! - Discover: Content tree traversal and document resolution
//! - Publisher: The orchestrator driving the two store clients

pub mod discover;
pub mod publisher;

// Re-export commonly used types
pub use discover::{DiscoveryError, ACTIVITIES_DIR, EPISODES_DIR};
pub use publisher::{PublishError, PublishReport, Publisher};
