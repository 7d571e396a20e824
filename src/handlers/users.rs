use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::{AppError, AppResult};
use crate::handlers::extract::{AppJson, AuthUser};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::services::users;
use crate::state::AppState;

/// Runs argon2 work on the blocking pool, away from the runtime workers and
/// without the connection lock.
async fn off_runtime<T, F>(work: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("spawn_blocking join error: {e}");
        AppError::Internal("password task failed".to_string())
    })?
}

// POST /api/users/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let account = off_runtime(move || users::prepare_registration(&body)).await?;

    let res = {
        let conn = state.conn()?;
        users::create_account(&conn, &state.jwt, &account)?
    };
    Ok((StatusCode::CREATED, Json(res)))
}

// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = users::credentials(&body)?;
    let account = {
        let conn = state.conn()?;
        users::find_account(&conn, &credentials)?
    };

    let user = off_runtime(move || users::authenticate(account, &credentials)).await?;
    Ok(Json(users::issue(&state.jwt, user)?))
}

// GET /api/users/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<User>, AppError> {
    let profile = {
        let conn = state.conn()?;
        users::get_profile(&conn, user.id)?
    };
    Ok(Json(profile))
}
