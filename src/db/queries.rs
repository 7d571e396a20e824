use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::AppResult;
use crate::models::{
    Booking, BookingStatus, DateRange, Message, Role, Room, RoomFilter, RoomSummary, RoomType,
    User,
};

impl ToSql for RoomType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RoomType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        RoomType::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown room type: {s}").into()))
    }
}

impl ToSql for BookingStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for BookingStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        BookingStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown booking status: {s}").into()))
    }
}

// ── Rooms ──

const ROOM_COLUMNS: &str = "id, room_number, room_type, price, description, max_occupancy, is_available, image_url, created_at, updated_at";

/// Validated room fields, shared by insert and full-row update.
pub struct RoomFields<'a> {
    pub room_number: &'a str,
    pub room_type: RoomType,
    pub price: f64,
    pub description: &'a str,
    pub amenities: &'a [String],
    pub max_occupancy: i64,
    pub is_available: bool,
    pub image_url: &'a str,
}

fn parse_room_row(row: &Row) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        room_number: row.get(1)?,
        room_type: row.get(2)?,
        price: row.get(3)?,
        description: row.get(4)?,
        amenities: vec![],
        max_occupancy: row.get(5)?,
        is_available: row.get(6)?,
        image_url: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn load_amenities(conn: &Connection, rooms: &mut [Room]) -> AppResult<()> {
    let mut stmt =
        conn.prepare_cached("SELECT name FROM room_amenities WHERE room_id = ?1 ORDER BY position ASC")?;
    for room in rooms.iter_mut() {
        let rows = stmt.query_map(params![room.id], |row| row.get::<_, String>(0))?;
        room.amenities = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    }
    Ok(())
}

fn query_rooms(
    conn: &Connection,
    sql: &str,
    params_vec: &[Box<dyn ToSql>],
) -> AppResult<Vec<Room>> {
    let mut stmt = conn.prepare(sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_room_row)?;

    let mut rooms = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    load_amenities(conn, &mut rooms)?;
    Ok(rooms)
}

pub fn list_rooms(conn: &Connection, filter: &RoomFilter) -> AppResult<Vec<Room>> {
    let mut sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE 1=1");
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if let Some(room_type) = filter.room_type {
        params_vec.push(Box::new(room_type));
        sql.push_str(&format!(" AND room_type = ?{}", params_vec.len()));
    }
    if let Some(listed) = filter.is_available {
        params_vec.push(Box::new(listed));
        sql.push_str(&format!(" AND is_available = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY room_number ASC");

    query_rooms(conn, &sql, &params_vec)
}

/// Listed rooms whose id is not in `excluded`, optionally of one type.
pub fn list_listed_rooms_excluding(
    conn: &Connection,
    excluded: &[i64],
    room_type: Option<RoomType>,
) -> AppResult<Vec<Room>> {
    let mut sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE is_available = 1");
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if !excluded.is_empty() {
        let placeholders: Vec<String> = excluded
            .iter()
            .map(|id| {
                params_vec.push(Box::new(*id));
                format!("?{}", params_vec.len())
            })
            .collect();
        sql.push_str(&format!(" AND id NOT IN ({})", placeholders.join(", ")));
    }
    if let Some(room_type) = room_type {
        params_vec.push(Box::new(room_type));
        sql.push_str(&format!(" AND room_type = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY room_number ASC");

    query_rooms(conn, &sql, &params_vec)
}

pub fn get_room(conn: &Connection, id: i64) -> AppResult<Option<Room>> {
    let room = conn
        .query_row(
            &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
            params![id],
            parse_room_row,
        )
        .optional()?;

    match room {
        Some(room) => {
            let mut rooms = [room];
            load_amenities(conn, &mut rooms)?;
            let [room] = rooms;
            Ok(Some(room))
        }
        None => Ok(None),
    }
}

/// Picks one listed room of `room_type`, preferring rooms with no active
/// booking overlapping `range`. Ties are broken by room number.
pub fn pick_listed_room_of_type(
    conn: &Connection,
    room_type: RoomType,
    range: &DateRange,
) -> AppResult<Option<Room>> {
    let id: Option<i64> = conn
        .query_row(
            &format!(
                "SELECT r.id FROM rooms r
                 WHERE r.room_type = ?1 AND r.is_available = 1
                 ORDER BY EXISTS (
                     SELECT 1 FROM bookings b
                     WHERE b.room_id = r.id
                       AND b.status IN ({})
                       AND b.check_in < ?3 AND b.check_out > ?2
                 ) ASC, r.room_number ASC
                 LIMIT 1",
                active_statuses()
            ),
            params![room_type, range.check_in, range.check_out],
            |row| row.get(0),
        )
        .optional()?;

    match id {
        Some(id) => get_room(conn, id),
        None => Ok(None),
    }
}

pub fn room_number_taken(
    conn: &Connection,
    room_number: &str,
    exclude_id: Option<i64>,
) -> AppResult<bool> {
    let taken: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM rooms WHERE room_number = ?1 AND id != ?2",
        params![room_number, exclude_id.unwrap_or(-1)],
        |row| row.get(0),
    )?;
    Ok(taken)
}

fn replace_amenities(conn: &Connection, room_id: i64, amenities: &[String]) -> AppResult<()> {
    conn.execute("DELETE FROM room_amenities WHERE room_id = ?1", params![room_id])?;
    let mut stmt = conn
        .prepare_cached("INSERT INTO room_amenities (room_id, position, name) VALUES (?1, ?2, ?3)")?;
    for (position, name) in amenities.iter().enumerate() {
        stmt.execute(params![room_id, position as i64, name])?;
    }
    Ok(())
}

pub fn insert_room(conn: &Connection, room: &RoomFields) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO rooms (room_number, room_type, price, description, max_occupancy, is_available, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            room.room_number,
            room.room_type,
            room.price,
            room.description,
            room.max_occupancy,
            room.is_available,
            room.image_url,
        ],
    )?;
    let id = conn.last_insert_rowid();
    replace_amenities(conn, id, room.amenities)?;
    Ok(id)
}

pub fn update_room(conn: &Connection, id: i64, room: &RoomFields) -> AppResult<bool> {
    let count = conn.execute(
        "UPDATE rooms SET
           room_number = ?1,
           room_type = ?2,
           price = ?3,
           description = ?4,
           max_occupancy = ?5,
           is_available = ?6,
           image_url = ?7,
           updated_at = datetime('now')
         WHERE id = ?8",
        params![
            room.room_number,
            room.room_type,
            room.price,
            room.description,
            room.max_occupancy,
            room.is_available,
            room.image_url,
            id,
        ],
    )?;
    if count > 0 {
        replace_amenities(conn, id, room.amenities)?;
    }
    Ok(count > 0)
}

pub fn delete_room(conn: &Connection, id: i64) -> AppResult<bool> {
    let count = conn.execute("DELETE FROM rooms WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_bookings_for_room(conn: &Connection, room_id: i64) -> AppResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE room_id = ?1",
        params![room_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Bookings ──

const BOOKING_SELECT: &str = "SELECT b.id, b.room_id, r.room_number, r.room_type, r.price,
        b.customer_name, b.customer_email, b.customer_phone, b.check_in, b.check_out,
        b.total_price, b.status, b.special_requests, b.created_at, b.updated_at
     FROM bookings b
     JOIN rooms r ON b.room_id = r.id";

pub struct BookingFields<'a> {
    pub room_id: i64,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub range: DateRange,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: &'a str,
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        room: RoomSummary {
            id: row.get(1)?,
            room_number: row.get(2)?,
            room_type: row.get(3)?,
            price: row.get(4)?,
        },
        customer_name: row.get(5)?,
        customer_email: row.get(6)?,
        customer_phone: row.get(7)?,
        check_in: row.get(8)?,
        check_out: row.get(9)?,
        total_price: row.get(10)?,
        status: row.get(11)?,
        special_requests: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Quoted SQL list of the statuses that hold a room for their dates.
fn active_statuses() -> String {
    BookingStatus::ACTIVE
        .iter()
        .map(|status| format!("'{}'", status.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Distinct ids of rooms holding an active booking that overlaps `range`.
pub fn booked_room_ids(conn: &Connection, range: &DateRange) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT room_id FROM bookings
         WHERE status IN ({})
           AND check_in < ?2 AND check_out > ?1
         ORDER BY room_id",
        active_statuses()
    ))?;
    let rows = stmt.query_map(params![range.check_in, range.check_out], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<i64>>>()?)
}

pub fn has_active_overlap(conn: &Connection, room_id: i64, range: &DateRange) -> AppResult<bool> {
    let conflict: bool = conn.query_row(
        &format!(
            "SELECT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE room_id = ?1
                   AND status IN ({})
                   AND check_in < ?3 AND check_out > ?2
             )",
            active_statuses()
        ),
        params![room_id, range.check_in, range.check_out],
        |row| row.get(0),
    )?;
    Ok(conflict)
}

pub fn insert_booking(conn: &Connection, booking: &BookingFields) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO bookings (room_id, customer_name, customer_email, customer_phone, check_in, check_out, total_price, status, special_requests)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.room_id,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.range.check_in,
            booking.range.check_out,
            booking.total_price,
            booking.status,
            booking.special_requests,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking(conn: &Connection, id: i64) -> AppResult<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("{BOOKING_SELECT} WHERE b.id = ?1"),
            params![id],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn list_bookings(conn: &Connection) -> AppResult<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "{BOOKING_SELECT} ORDER BY b.created_at DESC, b.id DESC"
    ))?;
    let rows = stmt.query_map([], parse_booking_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> AppResult<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![status, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> AppResult<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Messages ──

const MESSAGE_COLUMNS: &str = "id, name, email, subject, message, is_read, created_at, updated_at";

fn parse_message_row(row: &Row) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        is_read: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn insert_message(
    conn: &Connection,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO messages (name, email, subject, message) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, subject, message],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_message(conn: &Connection, id: i64) -> AppResult<Option<Message>> {
    let message = conn
        .query_row(
            &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
            params![id],
            parse_message_row,
        )
        .optional()?;
    Ok(message)
}

pub fn list_messages(conn: &Connection) -> AppResult<Vec<Message>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], parse_message_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn mark_message_read(conn: &Connection, id: i64) -> AppResult<bool> {
    let count = conn.execute(
        "UPDATE messages SET is_read = 1, updated_at = datetime('now') WHERE id = ?1",
        params![id],
    )?;
    Ok(count > 0)
}

pub fn delete_message(conn: &Connection, id: i64) -> AppResult<bool> {
    let count = conn.execute("DELETE FROM messages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Users ──

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, full_name, created_at, updated_at";

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::parse(&role),
        full_name: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    full_name: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, role, full_name) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![username, email, password_hash, role.as_str(), full_name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            parse_user_row,
        )
        .optional()?;
    Ok(user)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            parse_user_row,
        )
        .optional()?;
    Ok(user)
}

pub fn user_exists(conn: &Connection, username: &str, email: &str) -> AppResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE username = ?1 OR email = ?2",
        params![username, email],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Creates or re-elevates the admin account. Only trusted seeding calls this.
pub fn upsert_admin(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    full_name: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, role, full_name)
         VALUES (?1, ?2, ?3, 'admin', ?4)
         ON CONFLICT(email) DO UPDATE SET
           password_hash = excluded.password_hash,
           role = 'admin',
           full_name = excluded.full_name,
           updated_at = datetime('now')",
        params![username, email, password_hash, full_name],
    )?;
    Ok(())
}
