//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;
use domain::{User, UserId, UserInput};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// A missing user is `Ok(None)`; errors are reserved for failures.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users (empty when there are none)
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Get user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new user; fails with `Conflict` if the username is taken
    async fn create(&self, input: UserInput) -> AppResult<User>;

    /// Rename an existing user, `None` if there is no user with `id`
    async fn update(&self, id: UserId, input: UserInput) -> AppResult<Option<User>>;

    /// Delete a user; deleting a missing user succeeds
    async fn delete_by_id(&self, id: UserId) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.repo.find_all().await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn create(&self, input: UserInput) -> AppResult<User> {
        self.repo.insert(input).await
    }

    async fn update(&self, id: UserId, input: UserInput) -> AppResult<Option<User>> {
        let Some(mut user) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };

        user.apply(input);
        self.repo.update(user).await
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<()> {
        if !self.repo.delete_by_id(id).await? {
            tracing::debug!(user_id = id, "No user to delete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::AppError;
    use mockall::predicate::eq;

    use crate::repository::MockUserRepository;

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(User::new(id, "test"))));

        let user = service(repo).find_by_id(1).await.unwrap();
        assert_eq!(user, Some(User::new(1, "test")));
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_not_an_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo).find_by_id(-1).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_find_by_username_passes_exact_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|name| name == "test")
            .returning(|name| Ok(Some(User::new(3, name))));

        let user = service(repo).find_by_username("test").await.unwrap();
        assert_eq!(user.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_find_all_returns_every_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![User::new(1, "a"), User::new(2, "b")]));

        let users = service(repo).find_all().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_create_inserts_input() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .with(eq(UserInput::new("test")))
            .times(1)
            .returning(|input| Ok(User::new(1, input.username)));

        let user = service(repo).create(UserInput::new("test")).await.unwrap();
        assert_eq!(user, User::new(1, "test"));
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .returning(|_| Err(AppError::conflict("Username")));

        let result = service(repo).create(UserInput::new("test")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none_without_writing() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = service(repo).update(-1, UserInput::new("changed")).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_update_only_changes_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(User::new(id, "old"))));
        repo.expect_update()
            .with(eq(User::new(5, "new")))
            .times(1)
            .returning(|user| Ok(Some(user)));

        let user = service(repo).update(5, UserInput::new("new")).await.unwrap();
        assert_eq!(user, Some(User::new(5, "new")));
    }

    #[tokio::test]
    async fn test_update_collision_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(User::new(id, "old"))));
        repo.expect_update()
            .returning(|_| Err(AppError::conflict("Username")));

        let result = service(repo).update(5, UserInput::new("taken")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_succeeds() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_id()
            .with(eq(-1))
            .times(1)
            .returning(|_| Ok(false));

        assert!(service(repo).delete_by_id(-1).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_propagates_store_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(AppError::internal("connection reset")));

        let result = service(repo).delete_by_id(1).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
