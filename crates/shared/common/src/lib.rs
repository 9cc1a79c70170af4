//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - The status-code policy for failed requests
//! - Configuration structures

pub mod config;
pub mod error;
pub mod status;

pub use config::*;
pub use error::{AppError, AppResult, ErrorResponse};
pub use status::{Access, ApiError, ApiResult, StatusMode, StatusPolicy};
