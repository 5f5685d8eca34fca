//! Core data models for Neowatch
//!
//! This module contains the data types used throughout the application for
//! representing asteroid close approaches and the featured picture of the day,
//! together with the feed parsing, window computation, and API client
//! submodules.

pub mod feed;
pub mod nasa;
pub mod window;

pub use feed::{parse_feed, FeedParseError};
pub use nasa::{NasaClient, NasaError};
pub use window::{yesterday, ObservationWindow};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A near-Earth object's close approach, flattened from the NeoWs feed
///
/// One record corresponds to one entry in one date bucket of the feed. The
/// `id` is the feed's identifier and acts as the primary key in the cache;
/// re-fetching a window replaces records sharing an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    /// Unique NeoWs identifier
    pub id: i64,
    /// Human-readable designation, e.g. "(2010 PK9)"
    pub codename: String,
    /// Date bucket under which the feed reported this approach
    pub close_approach_date: NaiveDate,
    /// Absolute magnitude (H)
    pub absolute_magnitude: f64,
    /// Maximum estimated diameter in kilometers
    pub estimated_diameter_km: f64,
    /// Relative velocity at closest approach in km/s
    pub relative_velocity_km_s: f64,
    /// Miss distance at closest approach in astronomical units
    pub distance_from_earth_au: f64,
    /// Whether NASA flags this object as potentially hazardous
    pub is_hazardous: bool,
}

/// NASA's featured astronomy picture of the day
///
/// Only the most recent fetch is retained; the cache keeps a single slot
/// that each successful image refresh overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureOfDay {
    /// URL of the media asset
    pub url: String,
    /// Whether the asset is an image or a video
    pub media_type: MediaType,
    /// Date the picture was featured, as reported by the API
    pub date: String,
    /// Title of the picture, if provided
    #[serde(default)]
    pub title: Option<String>,
}

/// Media type of the featured picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Which slice of the cached records a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    /// Records whose close approach falls on the current date
    Today,
    /// Records inside the current 7-day window
    Week,
    /// Everything in the cache, regardless of window
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asteroid() -> Asteroid {
        Asteroid {
            id: 3542519,
            codename: "(2010 PK9)".to_string(),
            close_approach_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            absolute_magnitude: 21.8,
            estimated_diameter_km: 0.3552,
            relative_velocity_km_s: 18.13,
            distance_from_earth_au: 0.0924,
            is_hazardous: true,
        }
    }

    #[test]
    fn test_asteroid_serialization_roundtrip() {
        let asteroid = sample_asteroid();

        let json = serde_json::to_string(&asteroid).expect("Failed to serialize Asteroid");
        let deserialized: Asteroid =
            serde_json::from_str(&json).expect("Failed to deserialize Asteroid");

        assert_eq!(deserialized, asteroid);
    }

    #[test]
    fn test_close_approach_date_serializes_as_iso_date() {
        let asteroid = sample_asteroid();
        let json = serde_json::to_string(&asteroid).expect("Failed to serialize Asteroid");
        assert!(json.contains("\"2024-07-15\""));
    }

    #[test]
    fn test_picture_of_day_roundtrip() {
        let picture = PictureOfDay {
            url: "https://apod.nasa.gov/apod/image/2407/example.jpg".to_string(),
            media_type: MediaType::Image,
            date: "2024-07-15".to_string(),
            title: Some("Example Nebula".to_string()),
        };

        let json = serde_json::to_string(&picture).expect("Failed to serialize PictureOfDay");
        let deserialized: PictureOfDay =
            serde_json::from_str(&json).expect("Failed to deserialize PictureOfDay");

        assert_eq!(deserialized, picture);
    }

    #[test]
    fn test_media_type_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&MediaType::Image).unwrap(),
            "\"image\""
        );
        assert_eq!(
            serde_json::from_str::<MediaType>("\"video\"").unwrap(),
            MediaType::Video
        );
    }

    #[test]
    fn test_picture_title_is_optional_on_deserialize() {
        let json =
            r#"{"url":"https://example.com/x.jpg","media_type":"image","date":"2024-07-15"}"#;
        let picture: PictureOfDay = serde_json::from_str(json).expect("Failed to deserialize");
        assert!(picture.title.is_none());
    }
}
