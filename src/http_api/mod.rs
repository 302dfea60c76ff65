use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    PlanOptions, PlanResult, PlannerConfig, StudyTask, TaskRegistry, TaskValidationError,
    generate_study_plan, validate_task_collection,
};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<RwLock<TaskRegistry>>,
    config: Arc<PlannerConfig>,
}

impl AppState {
    pub fn new(registry: TaskRegistry, config: PlannerConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            config: Arc::new(config),
        }
    }

    fn registry(&self) -> Arc<RwLock<TaskRegistry>> {
        self.registry.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<TaskValidationError> for ApiError {
    fn from(value: TaskValidationError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanQuery {
    weekly_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PlanRequest {
    tasks: Vec<StudyTask>,
    options: PlanOptions,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/plan", get(plan_registry).post(plan_request))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, registry: TaskRegistry, config: PlannerConfig) -> std::io::Result<()> {
    let state = AppState::new(registry, config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<StudyTask>> {
    let registry = state.registry();
    let tasks = registry.read().tasks().to_vec();
    Json(tasks)
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<StudyTask>, ApiError> {
    let registry = state.registry();
    let found = registry.read().find_task(&task_id).cloned();
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<StudyTask>,
) -> Result<(StatusCode, Json<StudyTask>), ApiError> {
    let registry = state.registry();
    {
        let mut guard = registry.write();
        if guard.find_task(&task.id).is_some() {
            return Err(ApiError::Conflict(format!("task {} already exists", task.id)));
        }
        guard.upsert_task(task.clone())?;
    }
    info!(task = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(task): Json<StudyTask>,
) -> Result<Json<StudyTask>, ApiError> {
    if task.id != task_id {
        return Err(ApiError::invalid(
            "task id in payload does not match path parameter",
        ));
    }
    let registry = state.registry();
    {
        let mut guard = registry.write();
        if guard.find_task(&task_id).is_none() {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard.upsert_task(task.clone())?;
    }
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let registry = state.registry();
    let removed = registry.write().delete_task(&task_id);
    if !removed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    info!(task = %task_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn plan_registry(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanResult>, ApiError> {
    let weekly_hours = query.weekly_hours.unwrap_or(state.config.weekly_hours);
    if !weekly_hours.is_finite() {
        return Err(ApiError::invalid("weeklyHours must be a finite number"));
    }
    let options = PlanOptions::new(weekly_hours);
    let tasks = state.registry().read().tasks().to_vec();
    run_planner(tasks, options).await.map(Json)
}

async fn plan_request(Json(request): Json<PlanRequest>) -> Result<Json<PlanResult>, ApiError> {
    validate_task_collection(&request.tasks)?;
    run_planner(request.tasks, request.options).await.map(Json)
}

/// Runs the allocator on the blocking pool, off the async workers.
async fn run_planner(tasks: Vec<StudyTask>, options: PlanOptions) -> Result<PlanResult, ApiError> {
    tokio::task::spawn_blocking(move || generate_study_plan(&tasks, &options))
        .await
        .map_err(|e| {
            error!(error = %e, "planner task failed");
            ApiError::Internal("planner task failed".to_string())
        })
}
