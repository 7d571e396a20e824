use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::services::auth::JwtService;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            jwt,
        }
    }

    pub fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }
}
