use axum::{extract::Query, response::IntoResponse, routing::get, Json};
use axum_extra::extract::Form;
use http::StatusCode;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use movies_dal::movie::{Catalog, CatalogFilter, CreateMovie, MovieRepository};
use tracing::{debug, info};

use crate::{error::ApiResult, state::AppState, validate::Garde};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_gallery, create_from_form))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

/// Gallery query parameters, as they come from the search box.
///
/// Numeric values are parsed leniently - value which is not a number is the same as no value.
/// Also `0` means no filter, as it is the "All" choice in the genre selector.
/// This applies to `year` too, so `year=0` is ignored as well.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct GalleryQuery {
    /// Part of title
    q: Option<String>,
    /// Release year
    year: Option<String>,
    /// Genre id
    genre: Option<String>,
}

impl GalleryQuery {
    pub fn into_filter(self) -> CatalogFilter {
        CatalogFilter {
            search: self.q.filter(|q| !q.is_empty()),
            year: lenient_number("year", self.year),
            genre_id: lenient_number("genre", self.genre),
        }
    }
}

// Invalid values are ignored rather than rejected, the search box can send anything.
fn lenient_number(name: &str, value: Option<String>) -> Option<i64> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<i64>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) => {
            debug!("Ignoring {name} filter {value:?}: {e}");
            None
        }
    }
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Gallery", operation_id = "listGallery",
    params(GalleryQuery),
    responses((status = StatusCode::OK, description = "Genres and filtered movies with their genres", body = Catalog))))]
pub async fn list_gallery(
    repository: MovieRepository,
    Query(query): Query<GalleryQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter();
    debug!("Gallery filter: {:?}", filter);
    let catalog = repository.catalog(filter).await?;
    Ok((StatusCode::OK, Json(catalog)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Gallery", operation_id = "createMovieFromForm",
    request_body(content = CreateMovie, content_type = "application/x-www-form-urlencoded"),
    responses((status = StatusCode::CREATED, description = "Id of created Movie", body = i64))))]
pub async fn create_from_form(
    repository: MovieRepository,
    Garde(Form(payload)): Garde<Form<CreateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let id = repository.create(payload).await?;
    info!("Created movie {id} from form");
    Ok((StatusCode::CREATED, Json(id)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list_gallery).post(create_from_form))
}
