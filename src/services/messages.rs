use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Message, NewMessage};

fn not_found() -> AppError {
    AppError::NotFound("message".to_string())
}

pub fn create_message(conn: &Connection, input: &NewMessage) -> AppResult<Message> {
    let field = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    let (Some(name), Some(email), Some(subject), Some(body)) = (
        field(&input.name),
        field(&input.email),
        field(&input.subject),
        field(&input.message),
    ) else {
        return Err(AppError::Validation("all fields are required".to_string()));
    };

    let id = queries::insert_message(conn, &name, &email.to_lowercase(), &subject, &body)?;
    tracing::info!(message_id = id, "contact message received");
    get_message(conn, id)
}

pub fn list_messages(conn: &Connection) -> AppResult<Vec<Message>> {
    queries::list_messages(conn)
}

pub fn get_message(conn: &Connection, id: i64) -> AppResult<Message> {
    queries::get_message(conn, id)?.ok_or_else(not_found)
}

pub fn mark_read(conn: &Connection, id: i64) -> AppResult<Message> {
    if !queries::mark_message_read(conn, id)? {
        return Err(not_found());
    }
    get_message(conn, id)
}

pub fn delete_message(conn: &Connection, id: i64) -> AppResult<()> {
    if !queries::delete_message(conn, id)? {
        return Err(not_found());
    }
    tracing::info!(message_id = id, "message deleted");
    Ok(())
}
