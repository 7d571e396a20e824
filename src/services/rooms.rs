use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries::{self, RoomFields};
use crate::errors::{AppError, AppResult};
use crate::models::{NewRoom, Room, RoomFilter, RoomPatch, RoomType};

fn parse_room_type(value: &str) -> AppResult<RoomType> {
    RoomType::parse(value).ok_or_else(|| {
        AppError::Validation(format!(
            "roomType must be one of Single, Double, Suite (got {value})"
        ))
    })
}

fn check_ranges(price: f64, max_occupancy: i64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation("price must be a non-negative number".to_string()));
    }
    if max_occupancy < 1 {
        return Err(AppError::Validation("maxOccupancy must be at least 1".to_string()));
    }
    Ok(())
}

fn clean_amenities(amenities: Vec<String>) -> Vec<String> {
    amenities
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

pub fn list_rooms(conn: &Connection, filter: &RoomFilter) -> AppResult<Vec<Room>> {
    queries::list_rooms(conn, filter)
}

pub fn get_room(conn: &Connection, id: i64) -> AppResult<Room> {
    queries::get_room(conn, id)?.ok_or_else(|| AppError::NotFound("room".to_string()))
}

pub fn create_room(conn: &Connection, input: NewRoom) -> AppResult<Room> {
    let room_number = input.room_number.as_deref().map(str::trim).unwrap_or("");
    let (false, Some(room_type), Some(price), Some(max_occupancy)) = (
        room_number.is_empty(),
        input.room_type.as_deref(),
        input.price,
        input.max_occupancy,
    ) else {
        return Err(AppError::Validation(
            "missing required fields: roomNumber, roomType, price, maxOccupancy".to_string(),
        ));
    };
    let room_type = parse_room_type(room_type)?;
    check_ranges(price, max_occupancy)?;

    if queries::room_number_taken(conn, room_number, None)? {
        return Err(AppError::Duplicate("room number already exists".to_string()));
    }

    let amenities = clean_amenities(input.amenities.unwrap_or_default());
    let id = queries::insert_room(
        conn,
        &RoomFields {
            room_number,
            room_type,
            price,
            description: input.description.as_deref().unwrap_or("").trim(),
            amenities: &amenities,
            max_occupancy,
            is_available: input.is_available.unwrap_or(true),
            image_url: input.image_url.as_deref().unwrap_or("").trim(),
        },
    )?;

    tracing::info!(room_id = id, room_number, "room created");
    get_room(conn, id)
}

pub fn update_room(conn: &Connection, id: i64, patch: RoomPatch) -> AppResult<Room> {
    let existing = get_room(conn, id)?;
    if patch.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }

    let room_number = match patch.room_number.as_deref().map(str::trim) {
        Some("") => {
            return Err(AppError::Validation("roomNumber cannot be empty".to_string()));
        }
        Some(number) => {
            if queries::room_number_taken(conn, number, Some(id))? {
                return Err(AppError::Duplicate("room number already exists".to_string()));
            }
            number.to_string()
        }
        None => existing.room_number,
    };
    let room_type = match patch.room_type.as_deref() {
        Some(value) => parse_room_type(value)?,
        None => existing.room_type,
    };
    let price = patch.price.unwrap_or(existing.price);
    let max_occupancy = patch.max_occupancy.unwrap_or(existing.max_occupancy);
    check_ranges(price, max_occupancy)?;

    let description = patch
        .description
        .map(|d| d.trim().to_string())
        .unwrap_or(existing.description);
    let image_url = patch
        .image_url
        .map(|u| u.trim().to_string())
        .unwrap_or(existing.image_url);
    let amenities = patch.amenities.map(clean_amenities).unwrap_or(existing.amenities);

    queries::update_room(
        conn,
        id,
        &RoomFields {
            room_number: &room_number,
            room_type,
            price,
            description: &description,
            amenities: &amenities,
            max_occupancy,
            is_available: patch.is_available.unwrap_or(existing.is_available),
            image_url: &image_url,
        },
    )?;

    tracing::info!(room_id = id, "room updated");
    get_room(conn, id)
}

/// Rooms that have ever been booked, in any status, cannot be deleted.
pub fn delete_room(conn: &mut Connection, id: i64) -> AppResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if queries::count_bookings_for_room(&tx, id)? > 0 {
        return Err(AppError::RoomInUse);
    }
    if !queries::delete_room(&tx, id)? {
        return Err(AppError::NotFound("room".to_string()));
    }
    tx.commit()?;

    tracing::info!(room_id = id, "room deleted");
    Ok(())
}
