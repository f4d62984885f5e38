use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use movies_dal::Error as DalError;
use tracing::error;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::DatabaseError(err) => match err {
                DalError::RecordNotFound(what) => {
                    (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
                }
                DalError::DatabaseError(movies_dal::SqlxError::RowNotFound) => {
                    (StatusCode::NOT_FOUND, "Record not found").into_response()
                }
                DalError::ValidationError(report) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response()
                }
                DalError::InvalidReference(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
                }
                other => {
                    error!("Database error: {other}");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
                }
            },
        }
    }
}
