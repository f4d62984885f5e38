use clap::{Parser, Subcommand};

use crate::commands::{create_genre::CreateGenreCmd, seed::SeedCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for movie gallery - administrative tasks on gallery database."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Loads JSON seed files into database
    Seed(SeedCmd),
    /// Adds new genre
    CreateGenre(CreateGenreCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Seed(cmd) => cmd.run().await,
            Command::CreateGenre(cmd) => cmd.run().await,
        }
    }
}
