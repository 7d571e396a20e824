use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
use crate::services::auth::{self, JwtService};

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn issue(jwt: &JwtService, user: User) -> AppResult<AuthResponse> {
    let token = jwt
        .generate_token(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(AuthResponse { token, user })
}

/// A validated registration with its password already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// Validates a registration and hashes its password. No database access,
/// so the slow argon2 work runs before the connection is locked.
pub fn prepare_registration(request: &RegisterRequest) -> AppResult<NewAccount> {
    let (Some(username), Some(email), Some(password)) = (
        required(&request.username),
        required(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "username, email, and password are required".to_string(),
        ));
    };

    Ok(NewAccount {
        username: username.to_string(),
        email: email.to_lowercase(),
        password_hash: auth::hash_password(password)?,
        full_name: required(&request.full_name).unwrap_or(username).to_string(),
    })
}

/// Stores a customer account. Admin accounts only come from seeding.
pub fn create_account(
    conn: &Connection,
    jwt: &JwtService,
    account: &NewAccount,
) -> AppResult<AuthResponse> {
    if queries::user_exists(conn, &account.username, &account.email)? {
        return Err(AppError::Duplicate(
            "user already exists with this email or username".to_string(),
        ));
    }

    let id = queries::insert_user(
        conn,
        &account.username,
        &account.email,
        &account.password_hash,
        Role::Customer,
        &account.full_name,
    )?;

    let user = queries::get_user_by_id(conn, id)?
        .ok_or_else(|| AppError::Internal(format!("user {id} missing after insert")))?;
    tracing::info!(user_id = id, username = %account.username, "user registered");

    issue(jwt, user)
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn credentials(request: &LoginRequest) -> AppResult<Credentials> {
    let (Some(email), Some(password)) = (
        required(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("email and password are required".to_string()));
    };
    Ok(Credentials {
        email: email.to_lowercase(),
        password: password.to_string(),
    })
}

pub fn find_account(conn: &Connection, credentials: &Credentials) -> AppResult<Option<User>> {
    queries::get_user_by_email(conn, &credentials.email)
}

/// Checks the password against the stored hash. Unknown email and wrong
/// password fail the same way.
pub fn authenticate(account: Option<User>, credentials: &Credentials) -> AppResult<User> {
    match account {
        Some(user) if auth::verify_password(&credentials.password, &user.password_hash) => {
            tracing::info!(user_id = user.id, "login succeeded");
            Ok(user)
        }
        _ => {
            tracing::warn!(email = %credentials.email, "login failed");
            Err(AppError::Unauthorized("invalid credentials".to_string()))
        }
    }
}

pub fn get_profile(conn: &Connection, id: i64) -> AppResult<User> {
    queries::get_user_by_id(conn, id)?.ok_or_else(|| AppError::NotFound("user".to_string()))
}
