//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::user_handler::UserPayload;
use domain::User;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::get_user,
        crate::api::handlers::user_handler::get_user_by_username,
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::update_user,
        crate::api::handlers::user_handler::delete_user,
        crate::api::handlers::health_handler::health_check,
    ),
    components(schemas(User, UserPayload)),
    tags(
        (name = "Users", description = "User CRUD endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/users/"));
        assert!(paths.iter().any(|p| *p == "/api/users/{id}"));
        assert!(paths.iter().any(|p| *p == "/api/users/username/{username}"));
        assert!(paths.iter().any(|p| *p == "/health"));
    }
}
