use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::api::models::ErrorResponse;
use crate::auth::TokenError;
use crate::client::BackendError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("invalid session token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("demo accounts are read-only")]
    DemoReadOnly,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::DemoReadOnly => StatusCode::FORBIDDEN,
            ApiError::Backend(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Backend(e) => e
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
