use actix_web::{http::StatusCode, HttpResponse};
use std::fmt;

/// Service-level failure taxonomy, mapped onto HTTP statuses at the API layer.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400)
    Validation(String),
    /// Missing, invalid, expired or revoked token (401)
    Authentication(String),
    /// Valid token, wrong role (403)
    Authorization(String),
    /// Entity referenced by id does not exist (404)
    NotFound(String),
    /// Duplicate unique field (400)
    Conflict(String),
    /// Database failure (500)
    Database(String),
    /// Filesystem or other unexpected failure (500)
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON `{ "message": ... }` response. Internal causes are logged and
    /// replaced with a generic message.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            AppError::Database(msg) | AppError::Internal(msg) => {
                log::error!("❌ {}", msg);
                HttpResponse::build(self.status())
                    .json(serde_json::json!({ "message": "Internal server error" }))
            }
            other => HttpResponse::build(other.status())
                .json(serde_json::json!({ "message": other.to_string() })),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Authentication("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_is_bare_message() {
        assert_eq!(
            AppError::Conflict("Email already registered".into()).to_string(),
            "Email already registered"
        );
    }
}
