use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::RoomType;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Validation(String),

    #[error("check-in date cannot be in the past")]
    PastDate,

    #[error("check-out date must be after check-in date")]
    InvalidRange,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("room not found")]
    RoomNotFound,

    #[error("no available {0} rooms found")]
    NoRoomOfType(RoomType),

    #[error("room is not available")]
    RoomUnlisted,

    #[error("room is already booked for these dates")]
    RoomConflict,

    #[error("cannot delete room with existing bookings")]
    RoomInUse,

    #[error("{0}")]
    Duplicate(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("access denied, admin privileges required")]
    Forbidden,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::PastDate
            | AppError::InvalidRange
            | AppError::RoomUnlisted => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RoomNotFound | AppError::NoRoomOfType(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::RoomConflict | AppError::RoomInUse | AppError::Duplicate(_) => {
                StatusCode::CONFLICT
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

// Malformed input is reported like any other validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
