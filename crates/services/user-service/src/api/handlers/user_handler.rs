//! User handlers.

use std::borrow::Cow;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use common::{ApiResult, AppError};
use domain::{validate_username, DomainError, User, UserId, UserInput};

use crate::api::extractors::{ValidatedJson, ValidatedPath};
use crate::api::state::AppState;

/// User body accepted by create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserPayload {
    /// Ignored; ids are assigned by the store and taken from the path on update
    #[schema(example = 1)]
    pub id: Option<UserId>,
    /// Unique, non-blank login name
    #[validate(custom(function = "username_rule"))]
    #[schema(example = "test")]
    pub username: String,
}

impl From<UserPayload> for UserInput {
    fn from(payload: UserPayload) -> Self {
        UserInput::new(payload.username)
    }
}

fn username_rule(username: &str) -> Result<(), ValidationError> {
    validate_username(username).map_err(|DomainError::Validation(msg)| {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Owned(msg));
        error
    })
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/username/:username", get(get_user_by_username))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "Users",
    responses(
        (status = 200, description = "All users ordered by id", body = Vec<User>),
        (status = 204, description = "No users exist"),
        (status = 500, description = "Unexpected error")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Response> {
    let users = state
        .user_service
        .find_all()
        .await
        .map_err(|e| state.policy.read(e))?;

    if users.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(users).into_response())
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Unexpected error")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> ApiResult<Json<User>> {
    state
        .user_service
        .find_by_id(id)
        .await
        .map_err(|e| state.policy.read(e))?
        .map(Json)
        .ok_or_else(|| state.policy.read(AppError::NotFound))
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    tag = "Users",
    params(
        ("username" = String, Path, description = "Exact username")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Blank username"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Unexpected error")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    ValidatedPath(username): ValidatedPath<String>,
) -> ApiResult<Json<User>> {
    validate_username(&username).map_err(AppError::from)?;

    state
        .user_service
        .find_by_username(&username)
        .await
        .map_err(|e| state.policy.read(e))?
        .map(Json)
        .ok_or_else(|| state.policy.read(AppError::NotFound))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username taken (precise mode)"),
        (status = 417, description = "Write failed, including a taken username")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .user_service
        .create(payload.into())
        .await
        .map_err(|e| state.policy.write(e))?;

    tracing::info!(user_id = user.id, username = %user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Rename an existing user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username taken (precise mode)"),
        (status = 417, description = "Write failed, including a taken username")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> ApiResult<Json<User>> {
    state
        .user_service
        .update(id, payload.into())
        .await
        .map_err(|e| state.policy.write(e))?
        .map(Json)
        .ok_or_else(|| state.policy.write(AppError::NotFound))
}

/// Delete a user; a missing user is not an error
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted or did not exist"),
        (status = 400, description = "Malformed id"),
        (status = 417, description = "Delete failed")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_by_id(id)
        .await
        .map_err(|e| state.policy.write(e))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_rejects_blank_username() {
        let payload: UserPayload = serde_json::from_str(r#"{"username":"  "}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        let message = errors.field_errors()["username"][0].message.clone();
        assert_eq!(message.as_deref(), Some("Username must not be blank"));
    }

    #[test]
    fn test_payload_id_is_optional_and_dropped() {
        let payload: UserPayload = serde_json::from_str(r#"{"id":42,"username":"test"}"#).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(UserInput::from(payload), UserInput::new("test"));

        let payload: UserPayload = serde_json::from_str(r#"{"username":"test"}"#).unwrap();
        assert!(payload.id.is_none());
    }
}
