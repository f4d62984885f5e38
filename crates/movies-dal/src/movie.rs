use std::collections::HashMap;

use crate::{
    ChosenDB, Error,
    error::Result,
    genre::{self, Genre},
    like_pattern,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, QueryBuilder};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateMovie {
    #[garde(length(min = 1, max = 255))]
    pub title: String,
    #[garde(length(max = 1000))]
    pub description: Option<String>,
    #[garde(length(min = 1, max = 200))]
    pub author: String,
    #[garde(skip)]
    pub year: i64,
    #[garde(length(min = 1))]
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Ids of genres, the movie is linked to
    #[garde(skip)]
    #[serde(default)]
    pub genres: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub year: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MovieGenre {
    pub id: i64,
    pub movie_id: i64,
    pub genre_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MovieWithGenres {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
}

/// Gallery filters, all are optional and combined with AND
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    /// Case insensitive substring of title
    pub search: Option<String>,
    pub year: Option<i64>,
    pub genre_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Catalog {
    pub genres: Vec<Genre>,
    pub movies: Vec<MovieWithGenres>,
    pub filters: CatalogFilter,
}

pub type MovieRepository = MovieRepositoryImpl<Pool<ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Full genre list and movies matching the filter, each with all its genres.
    /// Movies without any genre are never listed.
    pub async fn catalog(&self, filter: CatalogFilter) -> Result<Catalog> {
        let genres = genre::list_all(&self.executor).await?;
        let movies = self.list(&filter).await?;
        let links = self.list_genre_links(&filter).await?;
        let movies = assemble(movies, &genres, links);
        Ok(Catalog {
            genres,
            movies,
            filters: filter,
        })
    }

    /// Distinct movies having at least one genre, matching the filter
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Movie>> {
        let mut query = QueryBuilder::<ChosenDB>::new(
            "SELECT id, title, description, author, image_url, year FROM movie WHERE id IN (",
        );
        push_matching_ids(&mut query, filter);
        query.push(") ORDER BY id");
        debug!("Listing movies with filter {filter:?}");

        let records = query
            .build_query_as::<Movie>()
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    /// All genre links of movies matching the filter
    pub async fn list_genre_links(&self, filter: &CatalogFilter) -> Result<Vec<MovieGenre>> {
        let mut query = QueryBuilder::<ChosenDB>::new(
            "SELECT id, movie_id, genre_id FROM movie_genres WHERE movie_id IN (",
        );
        push_matching_ids(&mut query, filter);
        query.push(") ORDER BY id");

        let records = query
            .build_query_as::<MovieGenre>()
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    /// Creates movie and its genre links in one transaction, returns id of new movie
    pub async fn create(&self, payload: CreateMovie) -> Result<i64> {
        payload.validate()?;
        let description = payload.description.filter(|d| !d.is_empty());

        let mut transaction = self.executor.begin().await?;
        let result = sqlx::query(
            "INSERT INTO movie (title, title_search, description, author, image_url, year)
            VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(payload.title.to_lowercase())
        .bind(&description)
        .bind(&payload.author)
        .bind(&payload.image_url)
        .bind(payload.year)
        .execute(&mut *transaction)
        .await?;
        let id = result.last_insert_rowid();

        if !payload.genres.is_empty() {
            let mut query =
                QueryBuilder::<ChosenDB>::new("INSERT INTO movie_genres (movie_id, genre_id) ");
            query.push_values(payload.genres.iter().copied(), |mut row, genre_id| {
                row.push_bind(id).push_bind(genre_id);
            });
            query
                .build()
                .execute(&mut *transaction)
                .await
                .map_err(|e| Error::from_constraint(e, "genre"))?;
        }

        transaction.commit().await?;
        debug!(
            "Created movie {id} with {} genre(s)",
            payload.genres.len()
        );
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<MovieWithGenres> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, author, image_url, year FROM movie WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))?;
        let genres = genre::list_for_movie(id, &self.executor).await?;
        Ok(MovieWithGenres { movie, genres })
    }
}

/// Subquery of ids of movies with at least one genre, matching the filter.
/// Only filter values are bound, so it works for any number of matching movies.
fn push_matching_ids(query: &mut QueryBuilder<'_, ChosenDB>, filter: &CatalogFilter) {
    query.push(
        "SELECT DISTINCT m.id FROM movie m
        JOIN movie_genres mg ON m.id = mg.movie_id
        WHERE 1 = 1",
    );
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query
            .push(" AND m.title_search LIKE ")
            .push_bind(like_pattern(&search.to_lowercase()))
            .push(" ESCAPE '\\'");
    }
    if let Some(genre_id) = filter.genre_id {
        query.push(" AND mg.genre_id = ").push_bind(genre_id);
    }
    if let Some(year) = filter.year {
        query.push(" AND m.year = ").push_bind(year);
    }
}

fn assemble(movies: Vec<Movie>, genres: &[Genre], links: Vec<MovieGenre>) -> Vec<MovieWithGenres> {
    let genres_by_id: HashMap<i64, &Genre> = genres.iter().map(|g| (g.id, g)).collect();
    let mut grouped: HashMap<i64, Vec<Genre>> = HashMap::with_capacity(movies.len());
    for link in links {
        match genres_by_id.get(&link.genre_id) {
            Some(genre) => grouped
                .entry(link.movie_id)
                .or_default()
                .push((*genre).clone()),
            None => warn!(
                "Genre {} linked to movie {} is not known",
                link.genre_id, link.movie_id
            ),
        }
    }

    movies
        .into_iter()
        .map(|movie| {
            let genres = grouped.remove(&movie.id).unwrap_or_default();
            MovieWithGenres { movie, genres }
        })
        .collect()
}
