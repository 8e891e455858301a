use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint or a status-guarded update did not hold.
    #[error("conflicting update: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors returned by every service operation.
///
/// Everything except `Store` is an expected business outcome and is sent to
/// the caller verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidState(String),

    /// A batch operation whose eligible selection came out empty.
    #[error("No {0} found")]
    PartialSelection(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl AppError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::PartialSelection(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Store(e) => {
                log::error!("storage failure: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_keep_their_message() {
        assert_eq!(AppError::NotFound("Linen item").to_string(), "Linen item not found");
        assert_eq!(
            AppError::PartialSelection("collected laundry").to_string(),
            "No collected laundry found"
        );
        assert_eq!(AppError::NotFound("Checklist").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::invalid_state("Item is not damaged").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn store_conflicts_become_business_conflicts() {
        let err: AppError = StoreError::Conflict("room already has a checklist".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
