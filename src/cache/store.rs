//! On-disk store for asteroid records and the picture of the day
//!
//! Records live in a single JSON file keyed by asteroid id, alongside a
//! second file holding the singleton picture slot, both under an
//! XDG-compliant cache directory (`~/.cache/neowatch/` on Linux). Every
//! mutation rewrites the affected file through a temp-file rename, so a
//! batch of upserts becomes visible all at once and a crash mid-write never
//! leaves a half-written store behind.
//!
//! No other component touches these files directly.

use chrono::NaiveDate;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::data::{Asteroid, PictureOfDay};

/// File holding the id-keyed asteroid records
const ASTEROIDS_FILE: &str = "asteroids.json";
/// File holding the singleton picture slot
const PICTURE_FILE: &str = "picture.json";

/// Errors from the storage layer; always fatal to the calling operation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a cache file failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A cache file exists but does not hold valid JSON
    #[error("cache file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistent store of asteroid records plus the picture-of-the-day slot
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "neowatch")?;
        Some(Self {
            cache_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a new CacheStore with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Inserts the given records, replacing any existing record with the
    /// same id
    ///
    /// Idempotent: applying the same batch twice leaves the store unchanged.
    /// The whole batch lands in one file replace, so readers never observe a
    /// partially-applied batch.
    ///
    /// # Arguments
    /// * `records` - The records to insert or replace
    pub fn upsert_asteroids(&self, records: &[Asteroid]) -> Result<(), StoreError> {
        let mut by_id = self.load_asteroids()?;
        for record in records {
            by_id.insert(record.id, record.clone());
        }
        self.write_file(ASTEROIDS_FILE, &by_id)?;
        debug!(
            upserted = records.len(),
            total = by_id.len(),
            "upserted asteroid records"
        );
        Ok(())
    }

    /// Returns all records with a close approach inside `[start, end]`,
    /// sorted by date then id
    pub fn query_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Asteroid>, StoreError> {
        let mut records: Vec<Asteroid> = self
            .load_asteroids()?
            .into_values()
            .filter(|a| a.close_approach_date >= start && a.close_approach_date <= end)
            .collect();
        sort_records(&mut records);
        Ok(records)
    }

    /// Returns all records whose close approach falls on the given date,
    /// sorted by date then id
    pub fn query_day(&self, date: NaiveDate) -> Result<Vec<Asteroid>, StoreError> {
        self.query_range(date, date)
    }

    /// Returns every cached record, sorted by date then id
    pub fn query_all(&self) -> Result<Vec<Asteroid>, StoreError> {
        let mut records: Vec<Asteroid> = self.load_asteroids()?.into_values().collect();
        sort_records(&mut records);
        Ok(records)
    }

    /// Deletes all records with a close approach strictly before the given
    /// date
    ///
    /// Records dated exactly `date` survive.
    ///
    /// # Returns
    /// The number of records removed
    pub fn prune_before(&self, date: NaiveDate) -> Result<usize, StoreError> {
        let by_id = self.load_asteroids()?;
        let before = by_id.len();
        let kept: BTreeMap<i64, Asteroid> = by_id
            .into_iter()
            .filter(|(_, a)| a.close_approach_date >= date)
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.write_file(ASTEROIDS_FILE, &kept)?;
        }
        debug!(removed, cutoff = %date, "pruned stale asteroid records");
        Ok(removed)
    }

    /// Overwrites the singleton picture slot
    pub fn replace_picture(&self, picture: &PictureOfDay) -> Result<(), StoreError> {
        self.write_file(PICTURE_FILE, picture)
    }

    /// Returns the cached picture of the day, if one has been stored
    pub fn current_picture(&self) -> Result<Option<PictureOfDay>, StoreError> {
        let path = self.cache_dir.join(PICTURE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let picture: PictureOfDay = serde_json::from_str(&content)?;
        Ok(Some(picture))
    }

    /// Loads the id-keyed record map, treating a missing file as empty
    fn load_asteroids(&self) -> Result<BTreeMap<i64, Asteroid>, StoreError> {
        let path = self.cache_dir.join(ASTEROIDS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)?;
        let by_id: BTreeMap<i64, Asteroid> = serde_json::from_str(&content)?;
        Ok(by_id)
    }

    /// Serializes `data` and replaces the named cache file atomically
    fn write_file<T: serde::Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.cache_dir)?;
        let json = serde_json::to_string_pretty(data)?;

        let path = self.cache_dir.join(name);
        let tmp_path = self.cache_dir.join(format!("{name}.tmp"));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// Sorts records by close approach date ascending, ties broken by id
/// ascending
fn sort_records(records: &mut [Asteroid]) {
    records.sort_by_key(|a| (a.close_approach_date, a.id));
}
