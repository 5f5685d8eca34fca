//! NeoWs feed document parsing
//!
//! The asteroid feed arrives as a JSON document whose `near_earth_objects`
//! member is keyed by date string. This module flattens those date buckets
//! into an ordered `Vec<Asteroid>`.
//!
//! Parsing is deliberately best-effort below the top level: a missing or
//! malformed date bucket skips that day, and a malformed entry skips that
//! entry, so one bad record in the upstream feed never discards a whole
//! fetch. Skips are logged at debug level and otherwise invisible.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::window::DATE_KEY_FORMAT;
use super::Asteroid;

/// Errors for a feed document that is unusable as a whole
///
/// Per-day and per-entry problems are absorbed by [`parse_feed`]; this error
/// only covers a document with no `near_earth_objects` object at all.
#[derive(Debug, Error)]
pub enum FeedParseError {
    /// The document has no usable `near_earth_objects` member
    #[error("feed document has no 'near_earth_objects' object")]
    MissingNearEarthObjects,
}

/// Parses a raw feed document into flat asteroid records
///
/// Days are visited in the order given; entries keep their feed order within
/// a day. No de-duplication happens here — replacing records that share an
/// id is the cache's job.
///
/// # Arguments
/// * `document` - The raw JSON feed document
/// * `days` - The date keys to extract, normally the current window's days
///
/// # Returns
/// * `Ok(Vec<Asteroid>)` - All entries that parsed cleanly, in day order
/// * `Err(FeedParseError)` - If the document lacks `near_earth_objects`
pub fn parse_feed(document: &Value, days: &[NaiveDate]) -> Result<Vec<Asteroid>, FeedParseError> {
    let buckets = document
        .get("near_earth_objects")
        .and_then(Value::as_object)
        .ok_or(FeedParseError::MissingNearEarthObjects)?;

    let mut asteroids = Vec::new();

    for day in days {
        let key = day.format(DATE_KEY_FORMAT).to_string();
        let Some(entries) = buckets.get(&key).and_then(Value::as_array) else {
            debug!(date = %key, "feed has no bucket for date, skipping day");
            continue;
        };

        for entry in entries {
            match parse_entry(entry, *day) {
                Some(asteroid) => asteroids.push(asteroid),
                None => {
                    debug!(date = %key, "skipping malformed feed entry");
                }
            }
        }
    }

    Ok(asteroids)
}

/// Parses a single feed entry, returning None if any field is missing or
/// malformed
fn parse_entry(entry: &Value, close_approach_date: NaiveDate) -> Option<Asteroid> {
    let raw: RawEntry = serde_json::from_value(entry.clone()).ok()?;

    // NeoWs encodes the id and the close-approach measurements as strings.
    let id = raw.id.parse::<i64>().ok()?;
    let approach = raw.close_approach_data.first()?;
    let relative_velocity_km_s = approach
        .relative_velocity
        .kilometers_per_second
        .parse::<f64>()
        .ok()?;
    let distance_from_earth_au = approach.miss_distance.astronomical.parse::<f64>().ok()?;

    Some(Asteroid {
        id,
        codename: raw.name,
        close_approach_date,
        absolute_magnitude: raw.absolute_magnitude_h,
        estimated_diameter_km: raw.estimated_diameter.kilometers.estimated_diameter_max,
        relative_velocity_km_s,
        distance_from_earth_au,
        is_hazardous: raw.is_potentially_hazardous_asteroid,
    })
}

/// One entry of a date bucket, as the feed encodes it
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    name: String,
    absolute_magnitude_h: f64,
    estimated_diameter: RawEstimatedDiameter,
    close_approach_data: Vec<RawCloseApproach>,
    is_potentially_hazardous_asteroid: bool,
}

#[derive(Debug, Deserialize)]
struct RawEstimatedDiameter {
    kilometers: RawDiameterRange,
}

#[derive(Debug, Deserialize)]
struct RawDiameterRange {
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawCloseApproach {
    relative_velocity: RawRelativeVelocity,
    miss_distance: RawMissDistance,
}

#[derive(Debug, Deserialize)]
struct RawRelativeVelocity {
    kilometers_per_second: String,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    astronomical: String,
}
