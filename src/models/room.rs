use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomType {
    Single,
    Double,
    Suite,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Suite => "Suite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Single" => Some(RoomType::Single),
            "Double" => Some(RoomType::Double),
            "Suite" => Some(RoomType::Suite),
            _ => None,
        }
    }

    /// Optional filter value from a query string. Blank means no filter.
    pub fn parse_filter(value: Option<&str>) -> AppResult<Option<Self>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value)
                .map(Some)
                .ok_or_else(|| AppError::Validation(format!("unknown room type: {value}"))),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub price: f64,
    pub description: String,
    pub amenities: Vec<String>,
    pub max_occupancy: i64,
    pub is_available: bool,
    pub image_url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The slice of a room embedded in booking responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub room_type: Option<RoomType>,
    pub is_available: Option<bool>,
}

/// Raw `?roomType=&isAvailable=` parameters, as sent by forms that leave
/// unused filters blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    pub room_type: Option<String>,
    pub is_available: Option<String>,
}

impl RoomQuery {
    pub fn into_filter(self) -> AppResult<RoomFilter> {
        let is_available = match self.is_available.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "isAvailable must be true or false (got {other})"
                )))
            }
        };
        Ok(RoomFilter {
            room_type: RoomType::parse_filter(self.room_type.as_deref())?,
            is_available,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub max_occupancy: Option<i64>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub max_occupancy: Option<i64>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.room_number.is_none()
            && self.room_type.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.amenities.is_none()
            && self.max_occupancy.is_none()
            && self.is_available.is_none()
            && self.image_url.is_none()
    }
}
