use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::extract::{AdminUser, AppJson, AppPath, AppQuery};
use crate::models::{NewRoom, Room, RoomPatch, RoomQuery};
use crate::services::rooms;
use crate::state::AppState;

// GET /api/rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<RoomQuery>,
) -> Result<Json<Vec<Room>>, AppError> {
    let filter = query.into_filter()?;
    let rooms = {
        let conn = state.conn()?;
        rooms::list_rooms(&conn, &filter)?
    };
    Ok(Json(rooms))
}

// GET /api/rooms/:id
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Room>, AppError> {
    let room = {
        let conn = state.conn()?;
        rooms::get_room(&conn, id)?
    };
    Ok(Json(room))
}

// POST /api/rooms
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppJson(body): AppJson<NewRoom>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let room = {
        let conn = state.conn()?;
        rooms::create_room(&conn, body)?
    };
    Ok((StatusCode::CREATED, Json(room)))
}

// PUT /api/rooms/:id
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<RoomPatch>,
) -> Result<Json<Room>, AppError> {
    let room = {
        let conn = state.conn()?;
        rooms::update_room(&conn, id, body)?
    };
    Ok(Json(room))
}

// DELETE /api/rooms/:id
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let mut conn = state.conn()?;
        rooms::delete_room(&mut conn, id)?;
    }
    Ok(Json(serde_json::json!({"ok": true, "message": "room deleted"})))
}
