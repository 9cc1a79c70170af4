//! Application state - Dependency injection container.

use std::sync::Arc;

use common::StatusPolicy;

use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
    /// Maps failures to HTTP statuses
    pub policy: StatusPolicy,
}

impl AppState {
    /// Create application state with a manually injected service.
    pub fn new(
        user_service: Arc<dyn UserService>,
        database: Arc<Database>,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            user_service,
            database,
            policy,
        }
    }

    /// Wire the SeaORM-backed store and service onto `database`.
    pub fn from_database(database: Arc<Database>, policy: StatusPolicy) -> Self {
        let repo = Arc::new(UserStore::new(database.get_connection()));
        let user_service = Arc::new(UserManager::new(repo));
        Self::new(user_service, database, policy)
    }
}
