use crate::task::{Task, TaskRepository};
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared state handed to the task handlers. Holds the repository behind
/// its trait so tests can substitute a double.
#[derive(Clone)]
pub struct TaskState {
    pub repository: Arc<dyn TaskRepository>,
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier for the task
    id: u64,
    /// Short human-readable title
    title: String,
    /// Free-form description
    description: String,
    /// When the task is due
    due_date: DateTime<Utc>,
    /// Whether the task has been completed
    is_completed: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            due_date: task.due_date(),
            is_completed: task.is_completed(),
        }
    }
}

/// Request payload for creating or replacing a task.
///
/// The `id` field is accepted but never trusted: create allocates its own
/// and update takes the ID from the path.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Ignored on create, overridden by the path on update
    #[serde(default)]
    id: u64,
    /// Short human-readable title
    title: String,
    /// Free-form description
    description: String,
    /// When the task is due
    due_date: DateTime<Utc>,
    /// Whether the task has been completed
    #[serde(default)]
    is_completed: bool,
}

impl From<TaskPayload> for Task {
    fn from(payload: TaskPayload) -> Self {
        Task::new(
            payload.id,
            payload.title,
            payload.description,
            payload.due_date,
            payload.is_completed,
        )
    }
}

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// A single violated business rule, reported by field name.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// JSON response for create requests that fail validation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub errors: Vec<FieldError>,
}

/// Custom error type for task handler operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    /// No task with the requested ID exists.
    #[error("Task with ID {0} not found")]
    NotFound(u64),
    /// The create candidate violated one or more business rules.
    #[error("Task validation failed")]
    Validation(Vec<FieldError>),
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        match self {
            TaskApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "NOT_FOUND".to_string(),
                    message: format!("Task with ID {} not found", id),
                }),
            )
                .into_response(),
            TaskApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: "VALIDATION_FAILED".to_string(),
                    errors,
                }),
            )
                .into_response(),
        }
    }
}

/// Checks the business rules a new task must satisfy before it reaches the
/// repository: the due date lies in the future and the task is not already
/// completed.
fn validate_new_task(payload: &TaskPayload) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if payload.due_date < Utc::now() {
        errors.push(FieldError {
            field: "dueDate".to_string(),
            message: "Due date must be in the future".to_string(),
        });
    }
    if payload.is_completed {
        errors.push(FieldError {
            field: "isCompleted".to_string(),
            message: "A new task cannot already be completed".to_string(),
        });
    }

    errors
}

/// Handler for GET /api/tasks/ - Returns all tasks in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson])
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(State(state): State<Arc<TaskState>>) -> Json<Vec<TaskJson>> {
    let tasks = state
        .repository
        .list_tasks()
        .into_iter()
        .map(TaskJson::from)
        .collect();
    Json(tasks)
}

/// Handler for GET /api/tasks/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(
        ("id" = u64, Path, description = "ID of the task to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved task", body = TaskJson),
        (status = 404, description = "No task with the given ID", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskJson>, TaskApiError> {
    state
        .repository
        .get_task(id)
        .map(TaskJson::from)
        .map(Json)
        .ok_or(TaskApiError::NotFound(id))
}

/// Handler for POST /api/tasks/ - Validates the candidate and creates a
/// task. The repository is not called when validation fails.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/tasks/",
    request_body = TaskPayload,
    responses(
        (status = 201, description = "Task created", body = TaskJson, headers(
            ("Location" = String, description = "URL of the created task")
        )),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Json(payload): Json<TaskPayload>,
) -> Result<impl IntoResponse, TaskApiError> {
    let errors = validate_new_task(&payload);
    if !errors.is_empty() {
        return Err(TaskApiError::Validation(errors));
    }

    let created = state.repository.create_task(Task::from(payload));
    let location = format!("/api/tasks/{}", created.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TaskJson::from(created)),
    ))
}

/// Handler for PUT /api/tasks/{id} - Replaces a task wholesale. The path ID
/// wins over whatever ID the body carries.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(
        ("id" = u64, Path, description = "ID of the task to replace")
    ),
    request_body = TaskPayload,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 404, description = "No task with the given ID", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskJson>, TaskApiError> {
    state
        .repository
        .update_task(id, Task::from(payload).with_id(id))
        .map(TaskJson::from)
        .map(Json)
        .ok_or(TaskApiError::NotFound(id))
}

/// Handler for DELETE /api/tasks/{id} - Removes a task and returns its last
/// known value.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = u64, Path, description = "ID of the task to remove")
    ),
    responses(
        (status = 200, description = "Task deleted", body = TaskJson),
        (status = 404, description = "No task with the given ID", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskJson>, TaskApiError> {
    state
        .repository
        .delete_task(id)
        .map(TaskJson::from)
        .map(Json)
        .ok_or(TaskApiError::NotFound(id))
}

/// Creates and returns the tasks API router.
///
/// Collection routes answer with and without the trailing slash.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    let collection = get(list_tasks_handler).post(create_task_handler);
    Router::new()
        .route("/tasks", collection.clone())
        .route("/tasks/", collection)
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
