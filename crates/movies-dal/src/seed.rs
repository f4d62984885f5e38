//! Bulk load of fixed data (genres, sample movies) from JSON seed files.
//!
//! Seed file looks like `{"table": "genre", "data": [{"id": 1, "name": "Drama"}]}`.
//! Ids are inserted explicitly, so files can reference each other.
//! Column names can be either snake_case (as in database) or camelCase (`imageURL`, `movieId`).
//! Searchable form of movie title is derived from `title`.

use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::QueryBuilder;
use tracing::{debug, info};

use crate::{ChosenDB, Error, Pool, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedTable {
    // order of variants is order of loading
    Genre,
    Movie,
    MovieGenres,
}

impl SeedTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            SeedTable::Genre => "genre",
            SeedTable::Movie => "movie",
            SeedTable::MovieGenres => "movie_genres",
        }
    }

    fn column(&self, key: &str) -> Option<&'static str> {
        let column = match (self, key) {
            (_, "id") => "id",
            (SeedTable::Genre, "name") => "name",
            (SeedTable::Movie, "title") => "title",
            (SeedTable::Movie, "description") => "description",
            (SeedTable::Movie, "author") => "author",
            (SeedTable::Movie, "year") => "year",
            (SeedTable::Movie, "imageURL" | "image_url") => "image_url",
            (SeedTable::MovieGenres, "movieId" | "movie_id") => "movie_id",
            (SeedTable::MovieGenres, "genreId" | "genre_id") => "genre_id",
            _ => return None,
        };
        Some(column)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub table: SeedTable,
    pub data: Vec<Map<String, Value>>,
}

impl std::str::FromStr for SeedFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::InvalidSeed(e.to_string()))
    }
}

/// Loads all seed files in one transaction, returns number of inserted rows
pub async fn seed(pool: &Pool, mut files: Vec<SeedFile>) -> Result<u64> {
    files.sort_by_key(|f| f.table);
    let mut transaction = pool.begin().await?;
    let mut inserted = 0;

    for file in files {
        let table = file.table;
        for record in file.data {
            if record.is_empty() {
                return Err(Error::InvalidSeed(format!(
                    "Empty record for table {}",
                    table.table_name()
                )));
            }
            let mut columns = Vec::with_capacity(record.len());
            for key in record.keys() {
                let column = table.column(key).ok_or_else(|| {
                    Error::InvalidSeed(format!(
                        "Unknown column {key} for table {}",
                        table.table_name()
                    ))
                })?;
                columns.push(column);
            }
            let title_search = match table {
                SeedTable::Movie => record
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_lowercase),
                _ => None,
            };
            if title_search.is_some() {
                columns.push("title_search");
            }

            let mut query = QueryBuilder::<ChosenDB>::new(format!(
                "INSERT INTO {} ({}) VALUES (",
                table.table_name(),
                columns.join(", ")
            ));
            let mut values = query.separated(", ");
            for value in record.into_values() {
                match value {
                    Value::Null => values.push_bind(None::<String>),
                    Value::Bool(b) => values.push_bind(b),
                    Value::String(s) => values.push_bind(s),
                    Value::Number(n) => match n.as_i64() {
                        Some(i) => values.push_bind(i),
                        None => values.push_bind(n.as_f64()),
                    },
                    other => {
                        return Err(Error::InvalidSeed(format!(
                            "Unsupported value {other} for table {}",
                            table.table_name()
                        )));
                    }
                };
            }
            if let Some(title_search) = title_search {
                values.push_bind(title_search);
            }
            values.push_unseparated(")");

            query
                .build()
                .execute(&mut *transaction)
                .await
                .map_err(|e| Error::from_constraint(e, table.table_name()))?;
            inserted += 1;
        }
        debug!("Seeded table {}", table.table_name());
    }

    transaction.commit().await?;
    info!("Seeded {inserted} records");
    Ok(inserted)
}
