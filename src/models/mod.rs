pub mod booking;
pub mod message;
pub mod room;
pub mod user;

pub use booking::{
    parse_date, AvailabilityQuery, Booking, BookingRequest, BookingStatus, DateRange, RoomId,
    StatusUpdate,
};
pub use message::{Message, NewMessage};
pub use room::{NewRoom, Room, RoomFilter, RoomPatch, RoomQuery, RoomSummary, RoomType};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
