use crate::{ChosenDB, Error, error::Result};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateGenre {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

pub type GenreRepository = GenreRepositoryImpl<Pool<ChosenDB>>;

pub struct GenreRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GenreRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateGenre) -> Result<Genre> {
        payload.validate()?;
        let result = sqlx::query("INSERT INTO genre (name) VALUES (?)")
            .bind(&payload.name)
            .execute(&self.executor)
            .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genre WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Genre".to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<Genre>> {
        list_all(&self.executor).await
    }
}

pub(crate) async fn list_all<'c, E>(executor: E) -> Result<Vec<Genre>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let records = sqlx::query_as::<_, Genre>("SELECT id, name FROM genre ORDER BY id")
        .fetch_all(executor)
        .await?;
    Ok(records)
}

pub(crate) async fn list_for_movie<'c, E>(movie_id: i64, executor: E) -> Result<Vec<Genre>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let records = sqlx::query_as::<_, Genre>(
        "SELECT g.id, g.name FROM genre g
        JOIN movie_genres mg ON g.id = mg.genre_id
        WHERE mg.movie_id = ? ORDER BY mg.id",
    )
    .bind(movie_id)
    .fetch_all(executor)
    .await?;
    Ok(records)
}
