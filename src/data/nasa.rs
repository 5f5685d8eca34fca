//! NASA API client
//!
//! This module fetches the NeoWs asteroid feed and the astronomy picture of
//! the day from api.nasa.gov. It performs the HTTP calls and decodes the
//! bodies, nothing more: no retries and no caching live here.

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::window::DATE_KEY_FORMAT;
use super::PictureOfDay;

/// Base URL for the NASA open APIs
const NASA_BASE_URL: &str = "https://api.nasa.gov";

/// API key NASA hands out for unauthenticated experimentation
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Errors that can occur when talking to the NASA APIs
#[derive(Debug, Error)]
pub enum NasaError {
    /// Transport-level failure: connect, timeout, TLS
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("NASA API returned status {0}")]
    Api(StatusCode),

    /// The response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the NeoWs feed and APOD endpoints
#[derive(Debug, Clone)]
pub struct NasaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    /// Create a new NasaClient for the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: NASA_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the base URL, e.g. to point at a local stub in tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the raw asteroid feed document for an inclusive date range
    ///
    /// The document is returned undecoded beyond JSON itself; flattening the
    /// date buckets is [`parse_feed`](super::feed::parse_feed)'s job.
    ///
    /// # Arguments
    /// * `start` - First day of the range
    /// * `end` - Last day of the range
    ///
    /// # Returns
    /// * `Ok(Value)` - The raw feed document
    /// * `Err(NasaError)` - On transport failure, non-success status, or an
    ///   undecodable body
    pub async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, NasaError> {
        let url = format!(
            "{}/neo/rest/v1/feed?start_date={}&end_date={}&api_key={}",
            self.base_url,
            start.format(DATE_KEY_FORMAT),
            end.format(DATE_KEY_FORMAT),
            self.api_key
        );
        debug!(%start, %end, "fetching asteroid feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NasaError::Api(status));
        }

        let text = response.text().await?;
        let document: Value = serde_json::from_str(&text)?;
        Ok(document)
    }

    /// Fetch the current astronomy picture of the day
    ///
    /// # Returns
    /// * `Ok(PictureOfDay)` - The featured picture metadata
    /// * `Err(NasaError)` - On transport failure, non-success status, or an
    ///   undecodable body
    pub async fn fetch_picture_of_day(&self) -> Result<PictureOfDay, NasaError> {
        let url = format!("{}/planetary/apod?api_key={}", self.base_url, self.api_key);
        debug!("fetching picture of the day");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NasaError::Api(status));
        }

        let text = response.text().await?;
        let picture: PictureOfDay = serde_json::from_str(&text)?;
        Ok(picture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MediaType;

    #[test]
    fn test_client_uses_nasa_base_url_by_default() {
        let client = NasaClient::new("key");
        assert_eq!(client.base_url, NASA_BASE_URL);
        assert_eq!(client.api_key, "key");
    }

    #[test]
    fn test_with_base_url_overrides_default() {
        let client = NasaClient::new(DEMO_API_KEY).with_base_url("http://127.0.0.1:8080");
        assert_eq!(client.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_apod_response_decodes() {
        let body = r#"{
            "date": "2024-07-15",
            "explanation": "A fine nebula.",
            "hdurl": "https://apod.nasa.gov/apod/image/2407/example_big.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "Example Nebula",
            "url": "https://apod.nasa.gov/apod/image/2407/example.jpg"
        }"#;

        let picture: PictureOfDay = serde_json::from_str(body).expect("Failed to parse APOD body");

        assert_eq!(picture.media_type, MediaType::Image);
        assert_eq!(picture.date, "2024-07-15");
        assert_eq!(picture.title.as_deref(), Some("Example Nebula"));
        assert_eq!(
            picture.url,
            "https://apod.nasa.gov/apod/image/2407/example.jpg"
        );
    }

    #[test]
    fn test_apod_video_response_decodes() {
        let body = r#"{
            "date": "2024-07-16",
            "media_type": "video",
            "title": "A Flyby",
            "url": "https://www.youtube.com/embed/example"
        }"#;

        let picture: PictureOfDay = serde_json::from_str(body).expect("Failed to parse APOD body");
        assert_eq!(picture.media_type, MediaType::Video);
    }
}
