use std::sync::Arc;

use axum::Router;
use taskhub_server::task::InMemoryTaskRepository;
use taskhub_server::task::api::TaskState;
use taskhub_server::web::create_app;

/// Builds a fresh application backed by its own empty repository.
pub fn setup_app() -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();

    let task_state = Arc::new(TaskState {
        repository: Arc::new(InMemoryTaskRepository::new()),
    });
    create_app(task_state)
}
