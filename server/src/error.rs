use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("title is required")]
    TitleRequired,

    #[error("title too long")]
    TitleTooLong,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TitleRequired | AppError::TitleTooLong => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store(err) => {
                error!(%err, "request failed on store");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        assert_eq!(AppError::TitleRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::TitleTooLong.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_are_internal() {
        let err = AppError::from(StoreError::Sqlx(sqlx::Error::PoolClosed));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
