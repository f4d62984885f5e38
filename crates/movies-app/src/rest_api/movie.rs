use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Json,
};
use http::StatusCode;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use movies_dal::movie::{CreateMovie, MovieRepository, MovieWithGenres};
use tracing::info;

use crate::{error::ApiResult, state::AppState, validate::Garde};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(create_movie, get_movie))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Movie", operation_id = "createMovie",
    request_body = CreateMovie,
    responses((status = StatusCode::CREATED, description = "Id of created Movie", body = i64))))]
pub async fn create_movie(
    repository: MovieRepository,
    Garde(Json(payload)): Garde<Json<CreateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let id = repository.create(payload).await?;
    info!("Created movie {id}");
    Ok((StatusCode::CREATED, Json(id)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Movie", operation_id = "getMovie",
    responses((status = StatusCode::OK, description = "Movie with its genres", body = MovieWithGenres))))]
pub async fn get_movie(
    Path(id): Path<i64>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository.get(id).await?;
    Ok((StatusCode::OK, Json(record)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(create_movie))
        .route("/{id}", get(get_movie))
}
