use movies_e2e_tests::{
    prepare_env,
    rest::{create_genres, get_gallery, post_movie_form},
    spawn_server,
};
use reqwest::StatusCode;
use tracing::info;
use tracing_test::traced_test;

fn titles(catalog: &serde_json::Value) -> Vec<&str> {
    catalog["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
#[traced_test]
async fn test_gallery() {
    let (args, _config_guard) = prepare_env("test_gallery").await.unwrap();
    let base_url = args.base_url.clone();
    let state = spawn_server(args).await.unwrap();

    let genres = create_genres(&state, &["Drama", "Thriller", "Comedy"])
        .await
        .unwrap();
    let (drama, thriller, comedy) = (genres[0].id, genres[1].id, genres[2].id);

    let client = reqwest::Client::new();

    let (status, id) = post_movie_form(
        &client,
        &base_url,
        &[
            ("title", "Parasite"),
            ("description", "Greed and class discrimination"),
            ("author", "Bong Joon-ho"),
            ("year", "2019"),
            ("imageURL", "http://localhost/parasite.jpg"),
        ],
        &[thriller, drama, comedy],
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(id.as_i64().unwrap() > 0);

    let (status, _) = post_movie_form(
        &client,
        &base_url,
        &[
            ("title", "Amelie"),
            ("author", "Jean-Pierre Jeunet"),
            ("year", "2001"),
            ("imageURL", "http://localhost/amelie.jpg"),
        ],
        &[comedy],
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let catalog = get_gallery(&client, &base_url, "").await.unwrap();
    info!("Catalog: {catalog:#}");
    assert_eq!(catalog["genres"].as_array().unwrap().len(), 3);
    assert_eq!(titles(&catalog), vec!["Parasite", "Amelie"]);
    let parasite_genres = catalog["movies"][0]["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(parasite_genres, vec!["Thriller", "Drama", "Comedy"]);

    let query = format!("genre={comedy}&year=2001");
    let catalog = get_gallery(&client, &base_url, &query).await.unwrap();
    assert_eq!(titles(&catalog), vec!["Amelie"]);

    let catalog = get_gallery(&client, &base_url, "q=PARA").await.unwrap();
    assert_eq!(titles(&catalog), vec!["Parasite"]);

    let catalog = get_gallery(&client, &base_url, "year=abc&genre=0&q=")
        .await
        .unwrap();
    assert_eq!(titles(&catalog).len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_create_with_unknown_genre() {
    let (args, _config_guard) = prepare_env("test_unknown_genre").await.unwrap();
    let base_url = args.base_url.clone();
    let state = spawn_server(args).await.unwrap();
    let genres = create_genres(&state, &["Drama"]).await.unwrap();

    let client = reqwest::Client::new();
    let (status, _) = post_movie_form(
        &client,
        &base_url,
        &[
            ("title", "Ghost"),
            ("author", "Nobody"),
            ("year", "1990"),
            ("imageURL", "http://localhost/ghost.jpg"),
        ],
        &[genres[0].id, 999],
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM movie")
        .fetch_one(state.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);

    let (status, report) = post_movie_form(
        &client,
        &base_url,
        &[
            ("title", ""),
            ("author", "Nobody"),
            ("year", "1990"),
            ("imageURL", "http://localhost/ghost.jpg"),
        ],
        &[genres[0].id],
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    info!("Validation report: {report:#}");
}
