use anyhow::Result;
use movies_dal::genre::{CreateGenre, Genre, GenreRepository};
use reqwest::{StatusCode, Url};
use tracing::info;

pub async fn create_genres(state: &movies_app::state::AppState, names: &[&str]) -> Result<Vec<Genre>> {
    let repository = GenreRepository::new(state.pool().clone());
    let mut genres = Vec::with_capacity(names.len());
    for name in names {
        let genre = repository
            .create(CreateGenre {
                name: name.to_string(),
            })
            .await?;
        genres.push(genre);
    }
    Ok(genres)
}

/// Posts gallery form, genres are sent as repeated `genres` fields
pub async fn post_movie_form(
    client: &reqwest::Client,
    base_url: &Url,
    fields: &[(&str, &str)],
    genres: &[i64],
) -> Result<(StatusCode, serde_json::Value)> {
    let api_url = base_url.join("api/gallery")?;
    let genres = genres.iter().map(|g| g.to_string()).collect::<Vec<_>>();
    let mut form: Vec<(&str, &str)> = fields.to_vec();
    form.extend(genres.iter().map(|g| ("genres", g.as_str())));

    let response = client.post(api_url).form(&form).send().await?;
    info!("Response: {:#?}", response);
    let status = response.status();
    let body = response.text().await?;
    let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    Ok((status, value))
}

pub async fn get_gallery(
    client: &reqwest::Client,
    base_url: &Url,
    query: &str,
) -> Result<serde_json::Value> {
    let mut api_url = base_url.join("api/gallery")?;
    if !query.is_empty() {
        api_url.set_query(Some(query));
    }
    let response = client.get(api_url).send().await?;
    assert!(response.status().is_success());
    Ok(response.json().await?)
}
