use movies_dal::{genre::GenreRepository, movie::MovieRepository};

use crate::state::AppState;

pub mod gallery;
pub mod genre;
pub mod movie;

crate::repository_from_request!(MovieRepository);
crate::repository_from_request!(GenreRepository);

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/gallery", gallery::router())
        .nest("/movie", movie::router())
        .nest("/genre", genre::router())
}

