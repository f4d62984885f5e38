use movies_dal::Pool;
use movies_types::config::BackendConfig;
use tracing::debug;

pub mod create_genre;
pub mod seed;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

async fn open_pool(backend: &BackendConfig) -> anyhow::Result<Pool> {
    let data_dir = backend.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
    }
    let db_url = backend.database_url();
    debug!("Opening database {db_url}");
    let pool = movies_dal::new_pool(&db_url).await?;
    movies_dal::migrate(&pool).await?;
    Ok(pool)
}
