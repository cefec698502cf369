use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use bankers_infra::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    NotFound,
    BadRequest,
    Internal,
}

impl ApiErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ApiErrorKind::NotFound => "not_found",
            ApiErrorKind::BadRequest => "bad_request",
            ApiErrorKind::Internal => "internal",
        }
    }
}

/// Error returned across the boundary. Messages are stable and never carry
/// internal failure detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .kind.code())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json_error(self.code(), &self.message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::new(ApiErrorKind::NotFound, "not found"),
            ServiceError::BadRequest(problem) => {
                ApiError::new(ApiErrorKind::BadRequest, problem.to_string())
            }
            ServiceError::Failed(cause) => {
                error!(error = %cause, "request failed");
                ApiError::new(ApiErrorKind::Internal, "internal error")
            }
        }
    }
}

pub fn json_error(code: &'static str, message: impl Into<String>) -> serde_json::Value {
    json!({
        "error": code,
        "message": message.into(),
    })
}
