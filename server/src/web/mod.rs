use axum::Router;
use axum::extract::Path;
use axum::response::Redirect;
use axum::routing::{any, get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config;
use crate::task::InMemoryTaskRepository;
use crate::task::api::TaskState;

pub mod api;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::list_tasks_handler,
        crate::task::api::get_task_handler,
        crate::task::api::create_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
    ),
    components(schemas(
        crate::task::api::TaskJson,
        crate::task::api::TaskPayload,
        crate::task::api::ErrorResponse,
        crate::task::api::FieldError,
        crate::task::api::ValidationErrorResponse,
    )),
    tags((name = "Tasks", description = "Task management endpoints"))
)]
struct ApiDoc;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    // One repository per process, shared by reference with every handler.
    let task_state = Arc::new(TaskState {
        repository: Arc::new(InMemoryTaskRepository::new()),
    });
    let app = create_app(task_state);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full application router: JSON API, health probe, Swagger UI
/// and the legacy redirect routes.
pub fn create_app(task_state: Arc<TaskState>) -> Router {
    Router::new()
        .merge(api::create_api_router(task_state))
        .route("/health", get(health_check_handler))
        .route("/todos", any(legacy_todos_root_handler))
        .route("/todos/{*rest}", any(legacy_todos_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Permanent redirect for the legacy `/todos` prefix, preserving the
/// remainder of the path.
#[tracing::instrument]
async fn legacy_todos_handler(Path(rest): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/tasks/{}", rest))
}

#[tracing::instrument]
async fn legacy_todos_root_handler() -> Redirect {
    Redirect::permanent("/tasks")
}
