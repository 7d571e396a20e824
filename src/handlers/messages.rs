use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::extract::{AdminUser, AppJson, AppPath};
use crate::models::{Message, NewMessage};
use crate::services::messages;
use crate::state::AppState;

// POST /api/messages
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewMessage>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = {
        let conn = state.conn()?;
        messages::create_message(&conn, &body)?
    };
    Ok((StatusCode::CREATED, Json(message)))
}

// GET /api/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Message>>, AppError> {
    let list = {
        let conn = state.conn()?;
        messages::list_messages(&conn)?
    };
    Ok(Json(list))
}

// GET /api/messages/:id
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Message>, AppError> {
    let message = {
        let conn = state.conn()?;
        messages::get_message(&conn, id)?
    };
    Ok(Json(message))
}

// PUT /api/messages/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Message>, AppError> {
    let message = {
        let conn = state.conn()?;
        messages::mark_read(&conn, id)?
    };
    Ok(Json(message))
}

// DELETE /api/messages/:id
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let conn = state.conn()?;
        messages::delete_message(&conn, id)?;
    }
    Ok(Json(serde_json::json!({"ok": true, "message": "message deleted"})))
}
