//! Publish orchestrator.
//!
//! Walks the content tree and drives the two store clients in order: unit
//! and episode live records are overwritten unconditionally, activity
//! manifests are stored as immutable objects, and activity live pointers go
//! through the version-guarded conditional put. No step rolls back a
//! previous one; every write is independently idempotent, so re-running the
//! pipeline converges to the same terminal state.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::document::{Activity, Episode, Unit};
use crate::domain::{ids, ActivityLive, DocumentError, EpisodeLive, IdError, LiveRecord, Manifest, UnitLive};
use crate::stores::{LiveRegistry, ObjectStore, PutOutcome, StoreError};

use super::discover::{self, DiscoveryError, EPISODES_DIR};

/// Errors that abort a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    InvalidId(#[from] IdError),

    /// Store failures abort the whole run; partial state is safe to leave
    /// behind because a re-run converges.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Counters and warnings accumulated over one publish run.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub units: usize,
    pub episodes: usize,
    pub activities_published: usize,
    pub activities_skipped: usize,
    /// Non-fatal problems, e.g. a unit without an episode container.
    pub warnings: Vec<String>,
}

/// Drives the publish pipeline against an object store and a live registry.
pub struct Publisher {
    objects: Arc<dyn ObjectStore>,
    registry: Arc<dyn LiveRegistry>,
    /// Object key prefix for manifests, without surrounding slashes.
    prefix: String,
    /// Bucket name used to compose the manifest URI on activity records.
    bucket: String,
}

impl Publisher {
    /// Create a publisher over the given store clients.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        registry: Arc<dyn LiveRegistry>,
        prefix: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            objects,
            registry,
            prefix: prefix.into(),
            bucket: bucket.into(),
        }
    }

    /// Publish the whole tree under `root`.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub async fn publish(&self, root: &Path) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        for unit_dir in discover::unit_dirs(root)? {
            self.publish_unit(&unit_dir, &mut report).await?;
        }

        info!(
            units = report.units,
            episodes = report.episodes,
            published = report.activities_published,
            skipped = report.activities_skipped,
            "publish complete"
        );
        Ok(report)
    }

    async fn publish_unit(
        &self,
        unit_dir: &Path,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        let fallback_id = discover::dir_name(unit_dir);
        let unit = Unit::load(&discover::find_unit_document(unit_dir)?, &fallback_id)?;

        let episodes_root = unit_dir.join(EPISODES_DIR);
        let episode_dirs = discover::episode_dirs(&episodes_root)?;

        // The unit's episode listing comes from the directory names; the
        // episode documents themselves are only consulted per episode.
        let episode_ids: Vec<String> =
            episode_dirs.iter().map(|d| discover::dir_name(d)).collect();
        let episode_fq_ids = episode_ids
            .iter()
            .map(|e| ids::fqid(&[&unit.id, e]))
            .collect::<Result<Vec<_>, _>>()?;

        let record = LiveRecord::Unit(UnitLive {
            unit_id: unit.id.clone(),
            title: unit.title.clone(),
            content: unit.content.clone(),
            episode_ids,
            episode_fq_ids,
            updated_at: Utc::now().timestamp(),
        });
        self.registry.put_live(&record, false).await?;
        report.units += 1;

        if !episodes_root.exists() {
            let message = format!("unit {} has no {} directory", unit.id, EPISODES_DIR);
            warn!(unit = %unit.id, "{}", message);
            report.warnings.push(message);
            return Ok(());
        }

        for episode_dir in &episode_dirs {
            self.publish_episode(&unit, episode_dir, report).await?;
        }

        Ok(())
    }

    async fn publish_episode(
        &self,
        unit: &Unit,
        episode_dir: &Path,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        let fallback_id = discover::dir_name(episode_dir);
        let episode = Episode::load(&discover::find_episode_document(episode_dir)?, &fallback_id)?;

        let activity_paths = discover::activity_documents(episode_dir)?;
        let activity_ids: Vec<String> =
            activity_paths.iter().map(|p| discover::file_stem(p)).collect();
        let activity_fq_ids = activity_ids
            .iter()
            .map(|a| ids::fqid(&[&unit.id, &episode.id, a]))
            .collect::<Result<Vec<_>, _>>()?;

        let record = LiveRecord::Episode(EpisodeLive {
            unit_id: unit.id.clone(),
            episode_id: episode.id.clone(),
            title: episode.title.clone(),
            activity_ids,
            activity_fq_ids,
            updated_at: Utc::now().timestamp(),
        });
        self.registry.put_live(&record, false).await?;
        report.episodes += 1;

        for path in &activity_paths {
            let activity = Activity::load(path, &discover::file_stem(path))?;
            self.publish_activity(&unit.id, &episode.id, &activity, report)
                .await?;
        }

        Ok(())
    }

    async fn publish_activity(
        &self,
        unit_id: &str,
        episode_id: &str,
        activity: &Activity,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        let manifest = Manifest::build(unit_id, episode_id, activity)?;
        let hash = manifest.content_hash()?;
        let key = ids::manifest_key(
            &self.prefix,
            unit_id,
            episode_id,
            &activity.id,
            activity.version,
            &hash,
        );

        self.objects.put_immutable(&key, &manifest.to_json()?).await?;

        let record = LiveRecord::Activity(ActivityLive {
            unit_id: unit_id.to_string(),
            episode_id: episode_id.to_string(),
            activity_id: activity.id.clone(),
            activity_fq_id: manifest.activity_fq_id.clone(),
            title: activity.title.clone(),
            locale: activity.locale.clone(),
            manifest_key: format!("s3://{}/{}", self.bucket, key),
            total_questions: manifest.total,
            version: activity.version,
            updated_at: Utc::now().timestamp(),
        });

        match self.registry.put_live(&record, true).await? {
            PutOutcome::Skipped => {
                info!(
                    activity = %manifest.activity_fq_id,
                    version = activity.version,
                    "skipped: newer or equal version already live"
                );
                report.activities_skipped += 1;
            }
            _ => report.activities_published += 1,
        }

        Ok(())
    }
}
