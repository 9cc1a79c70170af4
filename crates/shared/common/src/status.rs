//! Status-code policy for HTTP failures.
//!
//! `Legacy` keeps the established contract of the user API: read failures
//! answer 500, every write failure answers 417 Expectation Failed, and the
//! body is empty. `Precise` reports each error with its own status and the
//! JSON error body.

use std::fmt;
use std::str::FromStr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How failures are reported to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusMode {
    #[default]
    Legacy,
    Precise,
}

impl FromStr for StatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(StatusMode::Legacy),
            "precise" => Ok(StatusMode::Precise),
            other => Err(format!("Unknown status mode '{}'", other)),
        }
    }
}

impl fmt::Display for StatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMode::Legacy => write!(f, "legacy"),
            StatusMode::Precise => write!(f, "precise"),
        }
    }
}

/// Whether the failing operation read or wrote data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Maps application errors to HTTP errors according to a [`StatusMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPolicy {
    mode: StatusMode,
}

impl StatusPolicy {
    pub fn new(mode: StatusMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> StatusMode {
        self.mode
    }

    /// Failure of a query (list, get)
    pub fn read(&self, error: AppError) -> ApiError {
        self.resolve(error, Access::Read)
    }

    /// Failure of a command (create, update, delete)
    pub fn write(&self, error: AppError) -> ApiError {
        self.resolve(error, Access::Write)
    }

    /// Pick the status for `error` raised during `access`.
    pub fn status_for(&self, error: &AppError, access: Access) -> StatusCode {
        match self.mode {
            StatusMode::Precise => error.status(),
            StatusMode::Legacy => match (error, access) {
                (AppError::Validation(_), _) => StatusCode::BAD_REQUEST,
                (AppError::NotFound, _) => StatusCode::NOT_FOUND,
                (_, Access::Write) => StatusCode::EXPECTATION_FAILED,
                (_, Access::Read) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn resolve(&self, error: AppError, access: Access) -> ApiError {
        ApiError {
            status: self.status_for(&error, access),
            detailed: self.mode == StatusMode::Precise,
            error,
        }
    }
}

/// An application error bound to the HTTP status it will be reported with.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    status: StatusCode,
    detailed: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &AppError {
        &self.error
    }
}

/// Result type for handlers whose failures went through a [`StatusPolicy`]
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised before any policy applies (request validation) keep their
/// own status and body.
impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            status: error.status(),
            detailed: true,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.error {
            AppError::NotFound | AppError::Validation(_) => {}
            AppError::Conflict(msg) => {
                tracing::warn!(status = %self.status, "Constraint violation: {}", msg)
            }
            other => tracing::error!(status = %self.status, "Request failed: {}", other),
        }

        if self.detailed {
            (self.status, Json(self.error.body())).into_response()
        } else {
            self.status.into_response()
        }
    }
}
