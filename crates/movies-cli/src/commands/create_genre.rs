use clap::Parser;
use movies_dal::genre::{CreateGenre, GenreRepository};
use movies_types::config::BackendConfig;

use crate::commands::{open_pool, Executor};

#[derive(Parser, Debug)]
pub struct CreateGenreCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(help = "Genre name, must be unique")]
    name: String,
}

impl Executor for CreateGenreCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_pool(&self.backend).await?;
        let repository = GenreRepository::new(pool);
        let genre = repository.create(CreateGenre { name: self.name }).await?;
        println!("Created genre {} with id {}", genre.name, genre.id);

        Ok(())
    }
}
