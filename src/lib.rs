//! oss-publish: upload a build's emitted artifacts to an Aliyun OSS bucket,
//! optionally purging the remote prefix first and evicting uploaded assets
//! from the in-memory build output.

pub mod compilation;
pub mod config;
pub mod load_config;
pub mod oss;
pub mod publish;
pub mod select;
pub mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use compilation::Compilation;
use config::Config;
use load_config::load_options;
use oss::OssStore;
use publish::OssPublisher;

/// CLI for oss-publish: push emitted build output to an OSS bucket.
#[derive(Parser)]
#[clap(
    name = "oss-publish",
    version,
    about = "Publish emitted build artifacts to an Aliyun OSS bucket"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload an emitted output directory using the given options file
    Publish {
        /// Path to the YAML options file
        #[clap(long)]
        config: PathBuf,
        /// Directory holding the build's emitted artifacts
        #[clap(long)]
        dist: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Publish { config, dist } => {
            let options = load_options(config)?;
            let config = Config::from_options(options)?;
            config.trace_loaded();

            let compilation = Compilation::from_dir(&dist)
                .with_context(|| format!("Failed to read emitted output from {dist:?}"))?;
            let emitted = compilation.asset_names().len();
            tracing::info!(assets = emitted, dist = ?dist, "Collected emitted artifacts");

            let store = OssStore::new(&config.auth)?;
            let prefix = config.prefix.clone();
            let publisher = OssPublisher::new(config, store);

            println!("Publishing {emitted} artifacts under {prefix}...");
            publisher.after_emit(&compilation).await;

            let errors = compilation.errors();
            match errors.first() {
                None => {
                    println!("Publish complete.");
                    Ok(())
                }
                Some(e) => {
                    eprintln!("[ERROR] Publish failed: {e}");
                    Err(anyhow::Error::new(e.clone()))
                }
            }
        }
    }
}
