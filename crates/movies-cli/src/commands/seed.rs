use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use movies_dal::seed::{seed, SeedFile};
use movies_types::config::BackendConfig;
use tokio::fs;
use tracing::debug;

use crate::commands::{open_pool, Executor};

#[derive(Parser, Debug)]
pub struct SeedCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(
        required = true,
        help = "Seed files or directories with seed files (*.json), all are loaded in one transaction"
    )]
    paths: Vec<PathBuf>,
}

async fn seed_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !fs::metadata(path).await?.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

impl Executor for SeedCmd {
    async fn run(self) -> anyhow::Result<()> {
        let mut files = Vec::new();
        for path in &self.paths {
            for file in seed_files(path).await? {
                debug!("Reading seed file {}", file.display());
                let content = fs::read_to_string(&file).await?;
                let seed_file = content
                    .parse::<SeedFile>()
                    .with_context(|| format!("Invalid seed file {}", file.display()))?;
                files.push(seed_file);
            }
        }

        let pool = open_pool(&self.backend).await?;
        let inserted = seed(&pool, files).await?;
        println!("Database seeded with {inserted} records");

        Ok(())
    }
}
