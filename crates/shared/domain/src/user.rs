//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_USERNAME_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Store-assigned user identifier
pub type UserId = i32;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier, assigned on insert
    pub id: UserId,
    /// Unique login name
    pub username: String,
}

impl User {
    /// Create a user from persisted values
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    /// Apply client-supplied fields. Only the username is mutable.
    pub fn apply(&mut self, input: UserInput) {
        self.username = input.username;
    }
}

/// Client-supplied user fields. The id is never taken from clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInput {
    pub username: String,
}

impl UserInput {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Check the input against the username rule
    pub fn validate(&self) -> DomainResult<()> {
        validate_username(&self.username)
    }
}

/// A username must contain at least one non-whitespace character.
pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.trim().chars().count() < MIN_USERNAME_LENGTH {
        return Err(DomainError::validation("Username must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_accepts_plain_name() {
        assert!(validate_username("test").is_ok());
        assert!(validate_username(" padded ").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_blank() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("\t\n").is_err());
    }

    #[test]
    fn test_apply_only_changes_username() {
        let mut user = User::new(7, "before");
        user.apply(UserInput::new("after"));

        assert_eq!(user.id, 7);
        assert_eq!(user.username, "after");
    }

    #[test]
    fn test_user_json_shape() {
        let json = serde_json::to_value(User::new(1, "test")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 1, "username": "test" }));
    }

    #[test]
    fn test_input_validate_uses_username_rule() {
        assert!(UserInput::new("ok").validate().is_ok());
        assert_eq!(
            UserInput::new(" ").validate(),
            Err(DomainError::validation("Username must not be blank"))
        );
    }
}
