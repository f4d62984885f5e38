use futures::TryStreamExt as _;
use movies_dal::{
    Error,
    movie::{CatalogFilter, CreateMovie, MovieRepositoryImpl},
};
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO genre (id, name) VALUES (1, 'crime');
INSERT INTO genre (id, name) VALUES (2, 'sci-fi');
INSERT INTO genre (id, name) VALUES (3, 'fantasy');

INSERT INTO movie (id, title, title_search, description, author, image_url, year)
VALUES (1, 'Alpha', 'alpha', NULL, 'Jean-Luc Godard', 'http://localhost/alpha.jpg', 2000);
INSERT INTO movie (id, title, title_search, description, author, image_url, year)
VALUES (2, 'Beta', 'beta', 'Second one', 'Someone Else', 'http://localhost/beta.jpg', 2001);
INSERT INTO movie (id, title, title_search, description, author, image_url, year)
VALUES (3, 'Inception', 'inception', NULL, 'Christopher Nolan', 'http://localhost/inception.jpg', 2010);
INSERT INTO movie (id, title, title_search, description, author, image_url, year)
VALUES (4, 'Orphan', 'orphan', 'No genres at all', 'Nobody', 'http://localhost/orphan.jpg', 2000);

INSERT INTO movie_genres (movie_id, genre_id) VALUES (1, 1);
INSERT INTO movie_genres (movie_id, genre_id) VALUES (2, 2);
INSERT INTO movie_genres (movie_id, genre_id) VALUES (3, 2);
INSERT INTO movie_genres (movie_id, genre_id) VALUES (3, 3);
INSERT INTO movie_genres (movie_id, genre_id) VALUES (3, 1);
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    movies_dal::migrate(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

fn new_movie(title: &str, genres: Vec<i64>) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        description: None,
        author: "Y".to_string(),
        year: 1999,
        image_url: "u".to_string(),
        genres,
    }
}

fn titles(catalog: &movies_dal::movie::Catalog) -> Vec<&str> {
    catalog
        .movies
        .iter()
        .map(|m| m.movie.title.as_str())
        .collect()
}

#[tokio::test]
async fn test_catalog_dedup() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let catalog = repo.catalog(CatalogFilter::default()).await.unwrap();
    assert_eq!(catalog.genres.len(), 3);
    assert_eq!(titles(&catalog), vec!["Alpha", "Beta", "Inception"]);

    let inception = &catalog.movies[2];
    assert_eq!(inception.genres.len(), 3);
    let genre_ids = inception.genres.iter().map(|g| g.id).collect::<Vec<_>>();
    assert_eq!(genre_ids, vec![2, 3, 1]);
    assert!(catalog.movies.iter().all(|m| !m.genres.is_empty()));
}

#[tokio::test]
async fn test_catalog_excludes_movies_without_genres() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    for filter in [
        CatalogFilter::default(),
        CatalogFilter {
            search: Some("orphan".into()),
            ..Default::default()
        },
        CatalogFilter {
            year: Some(2000),
            ..Default::default()
        },
    ] {
        let catalog = repo.catalog(filter).await.unwrap();
        assert!(!titles(&catalog).contains(&"Orphan"));
    }

    // still reachable directly
    let orphan = repo.get(4).await.unwrap();
    assert_eq!(orphan.movie.title, "Orphan");
    assert!(orphan.genres.is_empty());
}

#[tokio::test]
async fn test_catalog_filters_conjunction() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let catalog = repo
        .catalog(CatalogFilter {
            search: Some("Alpha".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&catalog), vec!["Alpha"]);
    assert_eq!(catalog.filters.search.as_deref(), Some("Alpha"));

    let catalog = repo
        .catalog(CatalogFilter {
            year: Some(2001),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&catalog), vec!["Beta"]);

    let catalog = repo
        .catalog(CatalogFilter {
            search: Some("Alpha".into()),
            year: Some(2001),
            genre_id: None,
        })
        .await
        .unwrap();
    assert!(catalog.movies.is_empty());
    // genres are always complete
    assert_eq!(catalog.genres.len(), 3);
}

#[tokio::test]
async fn test_catalog_genre_filter_keeps_all_genres() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let catalog = repo
        .catalog(CatalogFilter {
            genre_id: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&catalog), vec!["Alpha", "Inception"]);
    assert_eq!(catalog.movies[1].genres.len(), 3);

    let catalog = repo
        .catalog(CatalogFilter {
            genre_id: Some(3),
            year: Some(2000),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(catalog.movies.is_empty());
}

#[tokio::test]
async fn test_search_case_insensitive() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    for term in ["incep", "INCEP", "Ince"] {
        let catalog = repo
            .catalog(CatalogFilter {
                search: Some(term.into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&catalog), vec!["Inception"], "search term {term}");
    }

    let id = repo
        .create(new_movie("Amélie Poulain", vec![1]))
        .await
        .unwrap();
    for term in ["amélie", "AMÉLIE", "ÉLIE", "Élie pOULAIN"] {
        let catalog = repo
            .catalog(CatalogFilter {
                search: Some(term.into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(catalog.movies.len(), 1, "search term {term}");
        assert_eq!(catalog.movies[0].movie.id, id);
    }

    let catalog = repo
        .catalog(CatalogFilter {
            search: Some("%".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(catalog.movies.is_empty());
}

#[tokio::test]
async fn test_create_rolls_back_on_unknown_genre() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn.clone());

    let res = repo.create(new_movie("X", vec![1, 999999])).await;
    assert!(matches!(res, Err(Error::InvalidReference(_))), "{res:?}");

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM movie WHERE title = 'X'")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(0, count);
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM movie_genres")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(5, count);
}

#[tokio::test]
async fn test_create_round_trip() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let id = repo.create(new_movie("X", vec![1, 3])).await.unwrap();
    assert!(id > 4);

    let catalog = repo.catalog(CatalogFilter::default()).await.unwrap();
    let created = catalog
        .movies
        .iter()
        .find(|m| m.movie.title == "X")
        .unwrap();
    assert_eq!(created.movie.id, id);
    assert_eq!(created.movie.author, "Y");
    assert_eq!(created.movie.year, 1999);
    assert_eq!(created.movie.image_url, "u");
    let mut genre_ids = created.genres.iter().map(|g| g.id).collect::<Vec<_>>();
    genre_ids.sort();
    assert_eq!(genre_ids, vec![1, 3]);
}

#[tokio::test]
async fn test_create_without_genres_is_hidden() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let mut payload = new_movie("Lonely", vec![]);
    payload.description = Some(String::new());
    let id = repo.create(payload).await.unwrap();

    let catalog = repo.catalog(CatalogFilter::default()).await.unwrap();
    assert!(!titles(&catalog).contains(&"Lonely"));

    let movie = repo.get(id).await.unwrap();
    assert_eq!(movie.movie.description, None);
    assert!(movie.genres.is_empty());
}

#[tokio::test]
async fn test_create_validation() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn.clone());

    let res = repo.create(new_movie("", vec![1])).await;
    assert!(matches!(res, Err(Error::ValidationError(_))));

    let mut payload = new_movie("Too long", vec![1]);
    payload.description = Some("x".repeat(1001));
    let res = repo.create(payload).await;
    assert!(matches!(res, Err(Error::ValidationError(_))));

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM movie")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(4, count);
}

#[tokio::test]
async fn test_get_missing_movie() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let res = repo.get(1000).await;
    assert!(matches!(res, Err(Error::RecordNotFound(_))));
}

#[tokio::test]
async fn test_catalog_with_many_movies() {
    const COUNT: i64 = 33_000;
    let conn = init_db().await;
    sqlx::query(
        "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?)
        INSERT INTO movie (title, title_search, author, image_url, year)
        SELECT 'Bulk ' || i, 'bulk ' || i, 'Someone', 'http://localhost/bulk.jpg', 1980 FROM n",
    )
    .bind(COUNT)
    .execute(&conn)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO movie_genres (movie_id, genre_id)
        SELECT id, 1 FROM movie WHERE title_search LIKE 'bulk %'",
    )
    .execute(&conn)
    .await
    .unwrap();
    let repo = MovieRepositoryImpl::new(conn);

    let catalog = repo.catalog(CatalogFilter::default()).await.unwrap();
    assert_eq!(catalog.movies.len() as i64, COUNT + 3);
    assert!(catalog.movies.iter().all(|m| !m.genres.is_empty()));

    let catalog = repo
        .catalog(CatalogFilter {
            year: Some(1980),
            genre_id: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(catalog.movies.len() as i64, COUNT);
    assert_eq!(catalog.movies[0].genres[0].name, "crime");
}
