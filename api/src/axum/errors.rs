use anyhow::anyhow;
use axum::http::StatusCode;
use axum_derive_error::ErrorResponse;
use thiserror::Error;

use argus::SearchError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, ErrorResponse)]
pub enum ApiError {
    #[error("Cannot reach the search engine.")]
    #[status(StatusCode::BAD_GATEWAY)]
    EngineUnreachable,

    #[error("Index not found: {0}.")]
    #[status(StatusCode::NOT_FOUND)]
    IndexNotFound(String),

    #[error("{0}")]
    #[status(StatusCode::BAD_REQUEST)]
    ClientError(String),

    #[error(transparent)]
    ServerError(#[from] anyhow::Error),
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::Connection(_) => Self::EngineUnreachable,
            SearchError::BadRequest { .. } => Self::ClientError(error.to_string()),
            SearchError::NotFound(index) => Self::IndexNotFound(index),
            SearchError::Unknown(message) => Self::ServerError(anyhow!(message)),
        }
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string() && self.status_code() == other.status_code()
    }
}
