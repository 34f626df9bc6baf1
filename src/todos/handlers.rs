use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::state::AppState;
use crate::todos::dto::{CreateTodoRequest, UpdateTodoRequest};
use crate::todos::repo_types::Todo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/todos", get(list_todos))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/:id", put(update_todo))
        .route("/todos/:id/toggle", patch(toggle_todo))
        .route("/todos/:id", delete(delete_todo))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    payload.validate()?;

    let todo = Todo::create(
        &state.db,
        user.id,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.completed,
    )
    .await?;

    info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_todos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = Todo::list_by_user(&state.db, user.id).await?;
    Ok(Json(todos))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    payload.validate()?;

    let todo = Todo::update(
        &state.db,
        user.id,
        id,
        payload.title.as_deref().map(str::trim),
        payload.description.as_deref(),
        payload.completed,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    Ok(Json(todo))
}

/// Read-modify-write flip of `completed`. Concurrent toggles from the same
/// user are not a supported scenario, so the two round trips are fine.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, AppError> {
    let todo = Todo::find_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    let updated = Todo::set_completed(&state.db, user.id, id, !todo.completed)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    Ok(Json(updated))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !Todo::delete_owned(&state.db, user.id, id).await? {
        return Err(AppError::NotFound("Todo not found".into()));
    }

    info!(todo_id = %id, "todo deleted");
    Ok(Json(json!({ "message": "Todo deleted" })))
}
