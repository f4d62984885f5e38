use axum::{response::IntoResponse, routing::get, Json};
use http::StatusCode;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use movies_dal::genre::{Genre, GenreRepository};

use crate::{error::ApiResult, state::AppState};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_genres))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Genre", operation_id = "listGenres",
    responses((status = StatusCode::OK, description = "All genres", body = Vec<Genre>))))]
pub async fn list_genres(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
    let genres = repository.list_all().await?;
    Ok((StatusCode::OK, Json(genres)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list_genres))
}
