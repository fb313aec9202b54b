use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("start time must be earlier than end time")]
    InvalidTimeRange,
    #[error("booking start time must be in the future")]
    BookingInPast,
    #[error("booking duration exceeds the maximum of {0} hours")]
    DurationExceeded(i64),
    #[error("workspace ({0}) is not accepting bookings")]
    WorkspaceInactive(String),
    #[error("workspace ({0}) already has a booking in the requested time range")]
    SlotConflict(String),
    #[error("booking status cannot change from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("concurrent booking attempts kept conflicting, please retry")]
    TransactionConflict,
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("failed to convert a stored record: {0}")]
    ConversionEntityError(String),
    #[error("failed to run a database query")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to run a transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("failed to operate on the key value store")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error(transparent)]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("authentication is required")]
    UnauthenticatedError,
    #[error("the operation is not permitted for this user")]
    ForbiddenOperation,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SlotConflict(_)
            | AppError::InvalidTransition { .. }
            | AppError::TransactionConflict => StatusCode::CONFLICT,
            AppError::InvalidTimeRange
            | AppError::BookingInPast
            | AppError::DurationExceeded(_)
            | AppError::WorkspaceInactive(_)
            | AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConversionEntityError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_errors_map_to_409() {
        let res = AppError::SlotConflict("w".into()).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = AppError::InvalidTransition {
            from: "cancelled".into(),
            to: "confirmed".into(),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn rule_violations_map_to_422() {
        for err in [
            AppError::InvalidTimeRange,
            AppError::BookingInPast,
            AppError::DurationExceeded(8),
            AppError::WorkspaceInactive("w".into()),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }
    }
}
