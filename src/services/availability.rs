use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::{DateRange, Room, RoomType};

/// Listed rooms with no Pending or Confirmed booking overlapping `range`,
/// ordered by room number.
///
/// The result is strictly conflict-free: when every listed room is taken the
/// list is empty. Callers that want to show listed rooms anyway must do so
/// themselves; `create_booking` re-checks conflicts either way.
pub fn find_available_rooms(
    conn: &Connection,
    range: &DateRange,
    room_type: Option<RoomType>,
) -> AppResult<Vec<Room>> {
    let booked_ids = queries::booked_room_ids(conn, range)?;
    let rooms = queries::list_listed_rooms_excluding(conn, &booked_ids, room_type)?;

    tracing::debug!(
        check_in = %range.check_in,
        check_out = %range.check_out,
        booked = booked_ids.len(),
        available = rooms.len(),
        "availability computed"
    );

    Ok(rooms)
}
