use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::NewRoom;
use crate::services::{auth, rooms};

struct SampleRoom {
    number: &'static str,
    room_type: &'static str,
    price: f64,
    description: &'static str,
    amenities: &'static [&'static str],
    max_occupancy: i64,
    image_url: &'static str,
}

const SINGLE_IMAGE: &str = "https://images.unsplash.com/photo-1631049307264-da0ec9d70304?w=800";
const DOUBLE_IMAGE: &str = "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=800";
const SUITE_IMAGE: &str = "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800";

const SAMPLE_ROOMS: &[SampleRoom] = &[
    SampleRoom {
        number: "101",
        room_type: "Single",
        price: 6500.0,
        description: "Comfortable single room with a queen bed, perfect for solo travelers.",
        amenities: &["WiFi", "TV", "AC", "Mini Bar"],
        max_occupancy: 1,
        image_url: SINGLE_IMAGE,
    },
    SampleRoom {
        number: "102",
        room_type: "Single",
        price: 6500.0,
        description: "Cozy single room with city view.",
        amenities: &["WiFi", "TV", "AC"],
        max_occupancy: 1,
        image_url: SINGLE_IMAGE,
    },
    SampleRoom {
        number: "201",
        room_type: "Double",
        price: 9800.0,
        description: "Spacious double room with two queen beds, ideal for couples or small families.",
        amenities: &["WiFi", "TV", "AC", "Mini Bar", "Balcony"],
        max_occupancy: 2,
        image_url: DOUBLE_IMAGE,
    },
    SampleRoom {
        number: "202",
        room_type: "Double",
        price: 9800.0,
        description: "Elegant double room with modern amenities.",
        amenities: &["WiFi", "TV", "AC", "Balcony"],
        max_occupancy: 2,
        image_url: DOUBLE_IMAGE,
    },
    SampleRoom {
        number: "203",
        room_type: "Double",
        price: 12300.0,
        description: "Deluxe double room with ocean view.",
        amenities: &["WiFi", "TV", "AC", "Mini Bar", "Balcony", "Ocean View"],
        max_occupancy: 2,
        image_url: DOUBLE_IMAGE,
    },
    SampleRoom {
        number: "301",
        room_type: "Suite",
        price: 20500.0,
        description: "Luxurious suite with separate living area, perfect for extended stays.",
        amenities: &["WiFi", "TV", "AC", "Mini Bar", "Balcony", "Jacuzzi", "Room Service"],
        max_occupancy: 4,
        image_url: SUITE_IMAGE,
    },
    SampleRoom {
        number: "302",
        room_type: "Suite",
        price: 22800.0,
        description: "Premium suite with panoramic city views and premium amenities.",
        amenities: &[
            "WiFi",
            "TV",
            "AC",
            "Mini Bar",
            "Balcony",
            "Jacuzzi",
            "Room Service",
            "City View",
        ],
        max_occupancy: 4,
        image_url: SUITE_IMAGE,
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub rooms_created: usize,
    pub rooms_skipped: usize,
}

/// Inserts the sample room inventory and (re)creates the admin account.
/// Rooms whose number already exists are left alone, so reseeding never
/// touches live bookings.
pub fn seed_demo_data(
    conn: &Connection,
    admin_email: &str,
    admin_password: &str,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for sample in SAMPLE_ROOMS {
        if queries::room_number_taken(conn, sample.number, None)? {
            report.rooms_skipped += 1;
            continue;
        }
        rooms::create_room(
            conn,
            NewRoom {
                room_number: Some(sample.number.to_string()),
                room_type: Some(sample.room_type.to_string()),
                price: Some(sample.price),
                description: Some(sample.description.to_string()),
                amenities: Some(sample.amenities.iter().map(|a| a.to_string()).collect()),
                max_occupancy: Some(sample.max_occupancy),
                is_available: Some(true),
                image_url: Some(sample.image_url.to_string()),
            },
        )?;
        report.rooms_created += 1;
    }

    let hash = auth::hash_password(admin_password)?;
    queries::upsert_admin(conn, "admin", admin_email, &hash, "Hotel Administrator")?;
    tracing::info!(
        created = report.rooms_created,
        skipped = report.rooms_skipped,
        admin = admin_email,
        "seed complete"
    );

    Ok(report)
}
