//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

use super::entities::{
    user::{self, ActiveModel},
    UserEntity,
};
use common::{AppError, AppResult};
use domain::{User, UserId, UserInput, USERNAME_FIELD};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Absence is reported as `None`, never as an error. Writes that break the
/// username uniqueness rule fail with `AppError::Conflict`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user ordered by id
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user; the id is assigned by the database
    async fn insert(&self, input: UserInput) -> AppResult<User>;

    /// Persist the fields of an existing user, `None` if the row is gone
    async fn update(&self, user: User) -> AppResult<Option<User>>;

    /// Delete user by ID, returns whether a row was removed
    async fn delete_by_id(&self, id: UserId) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, input: UserInput) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            username: Set(input.username),
        };

        let model = active_model.insert(&self.db).await.map_err(write_error)?;
        Ok(User::from(model))
    }

    async fn update(&self, user: User) -> AppResult<Option<User>> {
        let active_model = ActiveModel {
            id: Unchanged(user.id),
            username: Set(user.username),
        };

        match active_model.update(&self.db).await {
            Ok(model) => Ok(Some(User::from(model))),
            // Deleted between the caller's read and this write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(write_error(err)),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

/// Map a failed write, turning unique-index violations into conflicts.
fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(USERNAME_FIELD),
        _ => AppError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::DatabaseConfig;

    use crate::infra::Database;

    async fn store() -> UserStore {
        let db = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        UserStore::new(db.get_connection())
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = store().await;

        let first = store.insert(UserInput::new("first")).await.unwrap();
        let second = store.insert(UserInput::new("second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.find_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = store().await;
        store.insert(UserInput::new("test")).await.unwrap();

        let result = store.insert(UserInput::new("test")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_username_is_exact() {
        let store = store().await;
        let user = store.insert(UserInput::new("test")).await.unwrap();

        assert_eq!(store.find_by_username("test").await.unwrap(), Some(user));
        assert_eq!(store.find_by_username("tes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_renames_and_rejects_taken_name() {
        let store = store().await;
        let alice = store.insert(UserInput::new("alice")).await.unwrap();
        store.insert(UserInput::new("bob")).await.unwrap();

        let renamed = store
            .update(User::new(alice.id, "carol"))
            .await
            .unwrap();
        assert_eq!(renamed, Some(User::new(alice.id, "carol")));

        let result = store.update(User::new(alice.id, "bob")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Re-saving the current name is not a collision
        let same = store.update(User::new(alice.id, "carol")).await.unwrap();
        assert_eq!(same, Some(User::new(alice.id, "carol")));
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let store = store().await;

        let result = store.update(User::new(99, "ghost")).await.unwrap();
        assert_eq!(result, None);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let store = store().await;
        let user = store.insert(UserInput::new("test")).await.unwrap();

        assert!(store.delete_by_id(user.id).await.unwrap());
        assert!(!store.delete_by_id(user.id).await.unwrap());
        assert_eq!(store.find_by_id(user.id).await.unwrap(), None);
    }
}
