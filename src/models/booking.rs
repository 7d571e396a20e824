use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::RoomSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub room: RoomSummary,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold a room for their dates.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Pending" => Some(BookingStatus::Pending),
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Cancelled" => Some(BookingStatus::Cancelled),
            "Completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// A stay, start inclusive and end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::InvalidRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// A room id as clients send it: a JSON number, or the numeric string a
/// browser reads back from a `data-room-id` attribute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RoomId {
    Number(i64),
    Text(String),
}

impl RoomId {
    /// `None` for a blank string, so the request can fall back to `roomType`.
    pub fn resolve(&self) -> AppResult<Option<i64>> {
        match self {
            RoomId::Number(id) => Ok(Some(*id)),
            RoomId::Text(text) if text.trim().is_empty() => Ok(None),
            RoomId::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("room must be a room id (got {text})"))),
        }
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        RoomId::Number(id)
    }
}

/// Customer-facing booking request. Every field is optional on the wire so
/// that missing input is reported as a validation error, not a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room: Option<RoomId>,
    pub room_type: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(a: &str, b: &str) -> DateRange {
        DateRange::new(d(a), d(b)).unwrap()
    }

    #[test]
    fn test_range_rejects_empty_and_inverted() {
        assert!(matches!(
            DateRange::new(d("2024-03-01"), d("2024-03-01")),
            Err(AppError::InvalidRange)
        ));
        assert!(matches!(
            DateRange::new(d("2024-03-04"), d("2024-03-01")),
            Err(AppError::InvalidRange)
        ));
    }

    #[test]
    fn test_nights() {
        assert_eq!(range("2024-03-01", "2024-03-04").nights(), 3);
        assert_eq!(range("2024-02-28", "2024-03-01").nights(), 2);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("Completed"), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse(" Pending "), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("completed"), None);
    }

    #[test]
    fn test_room_id_accepts_number_or_numeric_string() {
        let request: BookingRequest = serde_json::from_str(r#"{"room": 7}"#).unwrap();
        assert_eq!(request.room.unwrap().resolve().unwrap(), Some(7));

        let request: BookingRequest = serde_json::from_str(r#"{"room": " 7 "}"#).unwrap();
        assert_eq!(request.room.unwrap().resolve().unwrap(), Some(7));

        let request: BookingRequest = serde_json::from_str(r#"{"room": ""}"#).unwrap();
        assert_eq!(request.room.unwrap().resolve().unwrap(), None);

        let request: BookingRequest = serde_json::from_str(r#"{"room": "suite"}"#).unwrap();
        assert!(matches!(request.room.unwrap().resolve(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("checkIn", "2024-13-01").is_err());
        assert!(parse_date("checkIn", "03/01/2024").is_err());
        assert_eq!(parse_date("checkIn", "2024-03-01").unwrap(), d("2024-03-01"));
    }
}
