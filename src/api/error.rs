use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::{ErrorBody, ErrorDetail};
use crate::clients::aviationstack::AviationError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    Aviation(AviationError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Aviation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorDetail::message(msg)),
            ApiError::Aviation(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                let message = err.public_message();
                let detail = match err {
                    AviationError::Upstream {
                        code,
                        kind,
                        details,
                        ..
                    } => ErrorDetail {
                        message,
                        code,
                        kind,
                        details,
                    },
                    AviationError::UpstreamStatus { status, .. } => ErrorDetail {
                        code: Some(i64::from(status)),
                        ..ErrorDetail::message(message)
                    },
                    AviationError::Unavailable(_) | AviationError::MalformedResponse(_) => {
                        ErrorDetail::message(message)
                    }
                };
                (status, detail)
            }
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}

impl From<AviationError> for ApiError {
    fn from(err: AviationError) -> Self {
        ApiError::Aviation(err)
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} '{}' not found", resource, id))
    }
}
