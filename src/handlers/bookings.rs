use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;

use crate::errors::AppError;
use crate::handlers::extract::{AdminUser, AppJson, AppPath, AppQuery};
use crate::models::{
    parse_date, AvailabilityQuery, Booking, BookingRequest, BookingStatus, DateRange, Room,
    RoomType, StatusUpdate,
};
use crate::services::{availability, booking};
use crate::state::AppState;

// GET /api/bookings/available?checkIn=YYYY-MM-DD&checkOut=YYYY-MM-DD&roomType=
pub async fn available_rooms(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Vec<Room>>, AppError> {
    let (Some(check_in), Some(check_out)) = (query.check_in.as_deref(), query.check_out.as_deref())
    else {
        return Err(AppError::Validation(
            "check-in and check-out dates are required".to_string(),
        ));
    };
    let range = DateRange::new(
        parse_date("checkIn", check_in)?,
        parse_date("checkOut", check_out)?,
    )?;
    let room_type = RoomType::parse_filter(query.room_type.as_deref())?;

    let rooms = {
        let conn = state.conn()?;
        availability::find_available_rooms(&conn, &range, room_type)?
    };
    Ok(Json(rooms))
}

// POST /api/bookings, POST /api/book
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let today = Local::now().date_naive();
    let created = {
        let mut conn = state.conn()?;
        booking::create_booking(&mut conn, &body, today)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = {
        let conn = state.conn()?;
        booking::list_bookings(&conn)?
    };
    Ok(Json(bookings))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Booking>, AppError> {
    let found = {
        let conn = state.conn()?;
        booking::get_booking(&conn, id)?
    };
    Ok(Json(found))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<StatusUpdate>,
) -> Result<Json<Booking>, AppError> {
    let status = body
        .status
        .as_deref()
        .and_then(BookingStatus::parse)
        .ok_or_else(|| {
            AppError::Validation(
                "status must be one of Pending, Confirmed, Cancelled, Completed".to_string(),
            )
        })?;

    let updated = {
        let conn = state.conn()?;
        booking::update_status(&conn, id, status)?
    };
    Ok(Json(updated))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let conn = state.conn()?;
        booking::delete_booking(&conn, id)?;
    }
    Ok(Json(serde_json::json!({"ok": true, "message": "booking deleted"})))
}
