pub mod auth;
pub mod availability;
pub mod booking;
pub mod messages;
pub mod rooms;
pub mod users;
