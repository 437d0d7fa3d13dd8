//! Command-line interface for coursecast.
//!
//! Provides commands for publishing the content tree and inspecting the
//! resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use clap::{Args, Parser, Subcommand};

use crate::config::PublishConfig;
use crate::core::Publisher;
use crate::stores::{DynamoLiveRegistry, S3ObjectStore};

/// coursecast - course content publisher
#[derive(Parser, Debug)]
#[command(name = "coursecast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the content tree to the manifest store and live registry
    Publish {
        #[command(flatten)]
        options: PublishOptions,
    },

    /// Show the resolved configuration (debug)
    Config {
        #[command(flatten)]
        options: PublishOptions,
    },
}

/// Flags shared by the publish and config commands.
#[derive(Args, Debug)]
pub struct PublishOptions {
    /// Content root containing unit directories
    #[arg(long, default_value = "content/units")]
    pub root: PathBuf,

    /// Manifest key prefix
    #[arg(long, default_value = "activities")]
    pub prefix: String,

    /// Store region
    #[arg(long, env = "AWS_REGION", default_value = "us-west-1")]
    pub region: String,

    /// Live registry table name
    #[arg(long, env = "CONTENT_TABLE", default_value = "ContentTable")]
    pub table: String,

    /// Manifest bucket name
    #[arg(long, env = "CONTENT_BUCKET")]
    pub bucket: Option<String>,

    /// Credential profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Log intended writes without performing them
    #[arg(long)]
    pub dry_run: bool,
}

impl PublishOptions {
    fn into_config(self) -> Result<PublishConfig> {
        PublishConfig::resolve(
            self.root,
            &self.prefix,
            self.region,
            self.table,
            self.bucket,
            self.profile,
            self.dry_run,
        )
        .map_err(Into::into)
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Publish { options } => publish(options.into_config()?).await,
            Commands::Config { options } => show_config(options.into_config()?),
        }
    }
}

/// Build the store clients from the resolved configuration.
async fn aws_clients(
    config: &PublishConfig,
) -> (aws_sdk_s3::Client, aws_sdk_dynamodb::Client) {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let Some(ref profile) = config.profile {
        loader = loader.profile_name(profile);
    }

    let shared = loader.load().await;
    (
        aws_sdk_s3::Client::new(&shared),
        aws_sdk_dynamodb::Client::new(&shared),
    )
}

/// Run the publish pipeline
async fn publish(config: PublishConfig) -> Result<()> {
    let (s3, dynamo) = aws_clients(&config).await;

    let objects = Arc::new(S3ObjectStore::new(s3, &config.bucket, config.dry_run));
    let registry = Arc::new(DynamoLiveRegistry::new(dynamo, &config.table, config.dry_run));
    let publisher = Publisher::new(objects, registry, &config.prefix, &config.bucket);

    let report = publisher.publish(&config.root).await?;

    for warning in &report.warnings {
        eprintln!("[WARN] {}", warning);
    }
    println!(
        "Published {} unit(s), {} episode(s), {} activit(ies); {} skipped (newer version live)",
        report.units, report.episodes, report.activities_published, report.activities_skipped
    );

    Ok(())
}

/// Show the resolved configuration
fn show_config(config: PublishConfig) -> Result<()> {
    println!("root:    {}", config.root.display());
    println!("prefix:  {}", config.prefix);
    println!("region:  {}", config.region);
    println!("table:   {}", config.table);
    println!("bucket:  {}", config.bucket);
    println!(
        "profile: {}",
        config.profile.as_deref().unwrap_or("(default chain)")
    );
    println!("dry-run: {}", config.dry_run);
    Ok(())
}
