use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::response::Redirect;
use axum::routing::any;

use crate::task::api::{TaskState, create_task_router};

/// Creates the API routes for JSON API endpoints, including the legacy
/// `/api/todos` prefix redirects.
pub fn create_api_router(task_state: Arc<TaskState>) -> Router {
    let legacy_routes = Router::new()
        .route("/todos", any(legacy_todos_root_handler))
        .route("/todos/{*rest}", any(legacy_todos_handler));

    Router::new().nest("/api", create_task_router(task_state).merge(legacy_routes))
}

/// Permanent redirect for the legacy `/api/todos` prefix, preserving the
/// remainder of the path.
#[tracing::instrument]
async fn legacy_todos_handler(Path(rest): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/api/tasks/{}", rest))
}

#[tracing::instrument]
async fn legacy_todos_root_handler() -> Redirect {
    Redirect::permanent("/api/tasks")
}
