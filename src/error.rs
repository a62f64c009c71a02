//! Game error types with HTTP status code mapping.
//!
//! [`GameError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "insufficient funds: balance 3.00, required 5.00"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Game rules      | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Player with the given ID was not found.
    #[error("player not found: {0}")]
    PlayerNotFound(uuid::Uuid),

    /// Username is already registered.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A currency amount was malformed or not positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Balance is below the amount the operation needs. Nothing was changed.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds {
        /// Balance at the time of the request.
        balance: Decimal,
        /// Amount the operation needed.
        required: Decimal,
    },

    /// The operation could not be committed and was rolled back.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAmount(_) => 1002,
            Self::PlayerNotFound(_) => 2001,
            Self::UsernameTaken(_) => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceFailure(_) => 3001,
            Self::InsufficientFunds { .. } => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            Self::UsernameTaken(_) => StatusCode::CONFLICT,
            Self::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for GameError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceFailure(err.to_string())
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn insufficient_funds_maps_to_422() {
        let err = GameError::InsufficientFunds {
            balance: dec!(3.00),
            required: dec!(5.00),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), 4001);
        assert_eq!(
            err.to_string(),
            "insufficient funds: balance 3.00, required 5.00"
        );
    }

    #[test]
    fn persistence_failure_is_a_server_error() {
        let err = GameError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn into_response_sets_status() {
        let response = GameError::PlayerNotFound(uuid::Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
