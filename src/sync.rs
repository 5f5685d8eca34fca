//! Refresh orchestration and cache-backed queries
//!
//! [`SyncEngine`] owns the NASA client and the cache store and is the only
//! component that moves data between them. Each refresh kind (asteroids,
//! picture) runs its own `Idle -> Loading -> Done | Error` cycle on its own
//! status channel, so a picture failure can never mask a completed asteroid
//! fetch. Queries read straight from the cache and never touch the network.
//!
//! Refreshes of the same kind are serialized through a per-kind mutex: a
//! call issued while another is in flight queues behind it. The cache write
//! happens only after fetching and parsing complete in full, so a failed
//! refresh leaves the cache exactly as it was.

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::cache::{CacheStore, StoreError};
use crate::data::{
    parse_feed, yesterday, Asteroid, FeedParseError, NasaClient, NasaError, ObservationWindow,
    PictureOfDay, ViewFilter,
};

/// Lifecycle of the most recent refresh of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No refresh has run yet
    Idle,
    /// A refresh is in flight
    Loading,
    /// The last refresh completed and its data is in the cache
    Done,
    /// The last refresh failed; the cache was left untouched
    Error,
}

/// Errors from a refresh operation
#[derive(Debug, Error)]
pub enum SyncError {
    /// The NASA API call failed
    #[error(transparent)]
    Fetch(#[from] NasaError),

    /// The feed document was unusable as a whole
    #[error(transparent)]
    Feed(#[from] FeedParseError),

    /// The cache could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates fetch -> normalize -> cache and serves filtered reads
pub struct SyncEngine {
    client: NasaClient,
    store: CacheStore,
    asteroid_status: watch::Sender<SyncStatus>,
    picture_status: watch::Sender<SyncStatus>,
    /// Serializes asteroid refreshes; a second caller queues behind the first
    asteroid_guard: Mutex<()>,
    /// Serializes picture refreshes
    picture_guard: Mutex<()>,
    /// Navigation pass-through: the record the consumer has selected
    selected: std::sync::Mutex<Option<Asteroid>>,
}

impl SyncEngine {
    /// Creates a new engine around owned client and store handles
    ///
    /// The engine is constructed once at startup and shared by reference;
    /// there is no global instance.
    pub fn new(client: NasaClient, store: CacheStore) -> Self {
        Self {
            client,
            store,
            asteroid_status: watch::Sender::new(SyncStatus::Idle),
            picture_status: watch::Sender::new(SyncStatus::Idle),
            asteroid_guard: Mutex::new(()),
            picture_guard: Mutex::new(()),
            selected: std::sync::Mutex::new(None),
        }
    }

    /// Fetches the current window's feed and replaces matching cache records
    ///
    /// All-or-nothing: the upsert runs only after the whole document has been
    /// fetched and parsed, so any failure leaves the cache untouched. The
    /// window is recomputed on every call and therefore advances with the
    /// wall clock.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records written to the cache
    /// * `Err(SyncError)` - The failure that flipped status to Error
    pub async fn refresh_asteroids(&self) -> Result<usize, SyncError> {
        let _guard = self.asteroid_guard.lock().await;
        self.asteroid_status.send_replace(SyncStatus::Loading);

        match self.fetch_and_store_asteroids().await {
            Ok(count) => {
                // Status flips to Done only after the records are visible.
                self.asteroid_status.send_replace(SyncStatus::Done);
                info!(records = count, "asteroid refresh complete");
                Ok(count)
            }
            Err(e) => {
                self.asteroid_status.send_replace(SyncStatus::Error);
                warn!(error = %e, "asteroid refresh failed");
                Err(e)
            }
        }
    }

    async fn fetch_and_store_asteroids(&self) -> Result<usize, SyncError> {
        let window = ObservationWindow::current();
        let document = self.client.fetch_feed(window.start, window.end).await?;
        let records = parse_feed(&document, &window.days())?;
        self.store.upsert_asteroids(&records)?;
        Ok(records.len())
    }

    /// Fetches the picture of the day and replaces the cached slot
    ///
    /// Runs the same Loading/Done/Error cycle as the asteroid refresh but on
    /// an independent status channel.
    pub async fn refresh_picture(&self) -> Result<PictureOfDay, SyncError> {
        let _guard = self.picture_guard.lock().await;
        self.picture_status.send_replace(SyncStatus::Loading);

        match self.fetch_and_store_picture().await {
            Ok(picture) => {
                self.picture_status.send_replace(SyncStatus::Done);
                info!(date = %picture.date, "picture refresh complete");
                Ok(picture)
            }
            Err(e) => {
                self.picture_status.send_replace(SyncStatus::Error);
                warn!(error = %e, "picture refresh failed");
                Err(e)
            }
        }
    }

    async fn fetch_and_store_picture(&self) -> Result<PictureOfDay, SyncError> {
        let picture = self.client.fetch_picture_of_day().await?;
        self.store.replace_picture(&picture)?;
        Ok(picture)
    }

    /// Returns cached records for the given view, without any network call
    ///
    /// The window backing `Today` and `Week` is recomputed here, so the views
    /// track the current date even if no refresh has run today.
    pub fn query(&self, filter: ViewFilter) -> Result<Vec<Asteroid>, StoreError> {
        let window = ObservationWindow::current();
        match filter {
            ViewFilter::Today => self.store.query_day(window.start),
            ViewFilter::Week => self.store.query_range(window.start, window.end),
            ViewFilter::All => self.store.query_all(),
        }
    }

    /// Returns the cached picture of the day, if any
    pub fn current_picture(&self) -> Result<Option<PictureOfDay>, StoreError> {
        self.store.current_picture()
    }

    /// Deletes records whose close approach precedes yesterday's date
    ///
    /// Never invoked implicitly by a refresh.
    ///
    /// # Returns
    /// The number of records removed
    pub fn prune_stale(&self) -> Result<usize, StoreError> {
        self.store.prune_before(yesterday())
    }

    /// Snapshot of the asteroid refresh status
    pub fn asteroid_status(&self) -> SyncStatus {
        *self.asteroid_status.borrow()
    }

    /// Snapshot of the picture refresh status
    pub fn picture_status(&self) -> SyncStatus {
        *self.picture_status.borrow()
    }

    /// Subscribes to asteroid status transitions
    pub fn subscribe_asteroid_status(&self) -> watch::Receiver<SyncStatus> {
        self.asteroid_status.subscribe()
    }

    /// Subscribes to picture status transitions
    pub fn subscribe_picture_status(&self) -> watch::Receiver<SyncStatus> {
        self.picture_status.subscribe()
    }

    /// Records the consumer's selected asteroid for navigation
    pub fn select(&self, asteroid: Asteroid) {
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(asteroid);
    }

    /// Returns the currently selected asteroid, if any
    pub fn selected(&self) -> Option<Asteroid> {
        self.selected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Clears the navigation selection
    pub fn clear_selection(&self) {
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
