use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries::{self, BookingFields};
use crate::errors::{AppError, AppResult};
use crate::models::{parse_date, Booking, BookingRequest, BookingStatus, DateRange, RoomType};

/// Where the customer wants to stay: a specific room, or any room of a type.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RoomChoice {
    Id(i64),
    Type(RoomType),
}

#[derive(Debug)]
struct ValidRequest {
    choice: RoomChoice,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    special_requests: String,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_request(request: &BookingRequest) -> AppResult<ValidRequest> {
    let (Some(name), Some(email), Some(phone), Some(check_in), Some(check_out)) = (
        required(&request.customer_name),
        required(&request.customer_email),
        required(&request.customer_phone),
        required(&request.check_in),
        required(&request.check_out),
    ) else {
        return Err(AppError::Validation(
            "missing required fields: customerName, customerEmail, customerPhone, checkIn, checkOut are required"
                .to_string(),
        ));
    };

    let room_id = match &request.room {
        Some(room) => room.resolve()?,
        None => None,
    };
    let choice = match (room_id, required(&request.room_type)) {
        (Some(id), _) => RoomChoice::Id(id),
        (None, Some(room_type)) => RoomChoice::Type(RoomType::parse(room_type).ok_or_else(|| {
            AppError::Validation(format!("unknown room type: {room_type}"))
        })?),
        (None, None) => {
            return Err(AppError::Validation(
                "room or roomType is required".to_string(),
            ))
        }
    };

    Ok(ValidRequest {
        choice,
        customer_name: name.to_string(),
        customer_email: email.to_lowercase(),
        customer_phone: phone.to_string(),
        check_in: parse_date("checkIn", check_in)?,
        check_out: parse_date("checkOut", check_out)?,
        special_requests: request
            .special_requests
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string(),
    })
}

/// Validates and stores a new Pending booking.
///
/// Room resolution, the conflict check and the insert run inside one
/// `BEGIN IMMEDIATE` transaction, so two writers racing for the same room
/// and dates are serialized by the database write lock and the second one
/// sees the first one's booking.
pub fn create_booking(
    conn: &mut Connection,
    request: &BookingRequest,
    today: NaiveDate,
) -> AppResult<Booking> {
    let valid = validate_request(request)?;

    if valid.check_in < today {
        return Err(AppError::PastDate);
    }
    let range = DateRange::new(valid.check_in, valid.check_out)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let room = match valid.choice {
        RoomChoice::Type(room_type) => queries::pick_listed_room_of_type(&tx, room_type, &range)?
            .ok_or(AppError::NoRoomOfType(room_type))?,
        RoomChoice::Id(id) => {
            let room = queries::get_room(&tx, id)?.ok_or(AppError::RoomNotFound)?;
            if !room.is_available {
                return Err(AppError::RoomUnlisted);
            }
            room
        }
    };

    if queries::has_active_overlap(&tx, room.id, &range)? {
        tracing::info!(room_id = room.id, check_in = %range.check_in, check_out = %range.check_out, "booking rejected, room already taken");
        return Err(AppError::RoomConflict);
    }

    let nights = range.nights();
    let total_price = room.price * nights as f64;

    let id = queries::insert_booking(
        &tx,
        &BookingFields {
            room_id: room.id,
            customer_name: &valid.customer_name,
            customer_email: &valid.customer_email,
            customer_phone: &valid.customer_phone,
            range,
            total_price,
            status: BookingStatus::Pending,
            special_requests: &valid.special_requests,
        },
    )?;

    let booking = queries::get_booking(&tx, id)?
        .ok_or_else(|| AppError::Internal(format!("booking {id} missing after insert")))?;
    tx.commit()?;

    tracing::info!(
        booking_id = id,
        room_number = %room.room_number,
        nights,
        total_price,
        "booking created"
    );

    Ok(booking)
}

pub fn list_bookings(conn: &Connection) -> AppResult<Vec<Booking>> {
    queries::list_bookings(conn)
}

pub fn get_booking(conn: &Connection, id: i64) -> AppResult<Booking> {
    queries::get_booking(conn, id)?.ok_or_else(|| AppError::NotFound("booking".to_string()))
}

/// Overwrites the status. Every status is reachable from every other one.
pub fn update_status(conn: &Connection, id: i64, status: BookingStatus) -> AppResult<Booking> {
    if !queries::update_booking_status(conn, id, status)? {
        return Err(AppError::NotFound("booking".to_string()));
    }
    tracing::info!(booking_id = id, status = status.as_str(), "booking status updated");
    get_booking(conn, id)
}

pub fn delete_booking(conn: &Connection, id: i64) -> AppResult<()> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound("booking".to_string()));
    }
    tracing::info!(booking_id = id, "booking deleted");
    Ok(())
}
