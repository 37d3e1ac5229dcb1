use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::repo::StoreError;
use crate::checkout::gateway::PaymentError;

/// Errors surfaced to HTTP clients. Each variant maps to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    MissingCredential,
    #[error("Invalid token")]
    InvalidCredential,
    #[error("User not found")]
    IdentityNotFound,
    #[error("Invalid Username")]
    InvalidUsername,
    #[error("Invalid Password")]
    InvalidPassword,
    #[error("User already exists")]
    DuplicateRegistration,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error processing checkout")]
    PaymentProvider(String),
    #[error("Service unavailable")]
    StoreUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential => StatusCode::FORBIDDEN,
            ApiError::IdentityNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidUsername | ApiError::InvalidPassword => StatusCode::UNAUTHORIZED,
            ApiError::DuplicateRegistration => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            ApiError::StoreUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => ApiError::DuplicateRegistration,
            StoreError::Unavailable(msg) => ApiError::StoreUnavailable(msg),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        ApiError::PaymentProvider(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Collaborator detail stays in the logs; the client only sees the display text.
        match &self {
            ApiError::StoreUnavailable(detail) | ApiError::PaymentProvider(detail) => {
                tracing::error!(%status, detail = %detail, "request failed");
            }
            ApiError::Internal(detail) => {
                tracing::error!(%status, detail = %detail, "internal error");
            }
            _ => {}
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
