use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::auth::JwtService;
use crate::state::AppState;

/// `Json` whose rejection is an `AppError`, so bad bodies get the usual
/// `{"error": ..}` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Any caller with a valid bearer token whose account still exists.
pub struct AuthUser(pub User);

/// An authenticated caller whose account and token both carry the `admin` role.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .ok_or_else(|| AppError::Unauthorized("no token provided".to_string()))?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, uri = %parts.uri, "rejected bearer token");
            AppError::Unauthorized("token is not valid".to_string())
        })?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("token is not valid".to_string()))?;

        let user = {
            let conn = state.conn()?;
            queries::get_user_by_id(&conn, user_id)?
        };
        let mut user = user.ok_or_else(|| AppError::Unauthorized("user not found".to_string()))?;
        // Admin needs both the stored role and the token claim, so a demoted
        // admin loses access before the token expires.
        if claims.role != Role::Admin {
            user.role = Role::Customer;
        }

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::warn!(user_id = user.id, uri = %parts.uri, "admin route refused");
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
