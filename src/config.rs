//! Configuration for a publish run.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags
//! 2. Environment variables (AWS_REGION, CONTENT_TABLE, CONTENT_BUCKET, AWS_PROFILE)
//! 3. Defaults
//!
//! The resolved value is passed explicitly into client construction and the
//! orchestrator; nothing reads process-wide state after resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration resolution. All are fatal before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no manifest bucket configured (use --bucket or CONTENT_BUCKET)")]
    MissingBucket,

    #[error("no registry table configured (use --table or CONTENT_TABLE)")]
    MissingTable,

    #[error("no store region configured (use --region or AWS_REGION)")]
    MissingRegion,
}

/// Resolved configuration for one publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Content root containing unit directories
    pub root: PathBuf,
    /// Manifest key prefix, without surrounding slashes
    pub prefix: String,
    /// Store region
    pub region: String,
    /// Live registry table name
    pub table: String,
    /// Manifest bucket name
    pub bucket: String,
    /// Credential profile, if not the default chain
    pub profile: Option<String>,
    /// Log intended writes without performing them
    pub dry_run: bool,
}

impl PublishConfig {
    /// Validate raw values and normalize the prefix.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        root: PathBuf,
        prefix: &str,
        region: String,
        table: String,
        bucket: Option<String>,
        profile: Option<String>,
        dry_run: bool,
    ) -> Result<Self, ConfigError> {
        let bucket = bucket
            .filter(|b| !b.is_empty())
            .ok_or(ConfigError::MissingBucket)?;

        if region.is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if table.is_empty() {
            return Err(ConfigError::MissingTable);
        }

        Ok(Self {
            root,
            prefix: prefix.trim_matches('/').to_string(),
            region,
            table,
            bucket,
            profile,
            dry_run,
        })
    }
}
