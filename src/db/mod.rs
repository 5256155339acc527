use crate::config::GeneralConfig;
use crate::models::history::{
    ConversionRecord, NewConversion, NewSearch, NewViewedMedia, SearchRecord, ViewedMediaRecord,
};
use crate::models::media::MediaResult;
use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod clock;
pub mod error;
pub mod migrator;
pub mod repositories;

use clock::MonotonicClock;
pub use error::HistoryError;
use repositories::collection::{CollectionRepository, HistoryCollection, KeyOf, ModelOf};
use repositories::conversion::Conversions;
use repositories::metadata::ViewedMedia;
use repositories::search::Searches;

/// Number of records returned by the `get_*` operations when the caller has no preference.
pub const DEFAULT_LIMIT: u64 = 50;

type PendingOpen = Shared<BoxFuture<'static, Result<DatabaseConnection, String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

enum ConnectionState {
    Uninitialized,
    Initializing {
        generation: u64,
        pending: PendingOpen,
    },
    Ready(DatabaseConnection),
    Failed(String),
}

enum Acquired {
    Ready(DatabaseConnection),
    Pending(u64, PendingOpen),
}

#[derive(Debug, Clone)]
struct StoreOptions {
    db_url: String,
    max_connections: u32,
    min_connections: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCounts {
    pub searches: u64,
    pub metadata: u64,
    pub conversions: u64,
}

struct StoreInner {
    options: StoreOptions,
    state: Mutex<ConnectionState>,
    generation: AtomicU64,
    open_attempts: AtomicUsize,
    clock: MonotonicClock,
}

/// Local history of searches, viewed media and conversions.
///
/// Construction opens nothing. The first operation (or an explicit [`init`])
/// opens the database and applies the schema; every caller that arrives while
/// that is in flight waits on the same attempt. Clones share the connection.
///
/// [`init`]: HistoryStore::init
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<StoreInner>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(db_url: &str) -> Self {
        Self::with_pool_options(db_url, 5, 1)
    }

    #[must_use]
    pub fn from_config(config: &GeneralConfig) -> Self {
        Self::with_pool_options(
            &config.database_path,
            config.max_db_connections,
            config.min_db_connections,
        )
    }

    #[must_use]
    pub fn with_pool_options(db_url: &str, max_connections: u32, min_connections: u32) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                options: StoreOptions {
                    db_url: db_url.to_string(),
                    max_connections,
                    min_connections,
                },
                state: Mutex::new(ConnectionState::Uninitialized),
                generation: AtomicU64::new(0),
                open_attempts: AtomicUsize::new(0),
                clock: MonotonicClock::new(),
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        match &*self.lock_state() {
            ConnectionState::Uninitialized => StoreState::Uninitialized,
            ConnectionState::Initializing { .. } => StoreState::Initializing,
            ConnectionState::Ready(_) => StoreState::Ready,
            ConnectionState::Failed(_) => StoreState::Failed,
        }
    }

    /// How many times this store has run the open/upgrade sequence.
    #[must_use]
    pub fn open_attempts(&self) -> usize {
        self.inner.open_attempts.load(Ordering::Relaxed)
    }

    /// Opens the database if needed. Unlike the other operations this also
    /// retries after a failed open.
    pub async fn init(&self) -> Result<(), HistoryError> {
        self.connect(true).await.map(|_| ())
    }

    pub async fn add_search(
        &self,
        query: &str,
        results: &[MediaResult],
    ) -> Result<i64, HistoryError> {
        self.add::<Searches>(NewSearch {
            query: query.to_string(),
            results: results.to_vec(),
        })
        .await
    }

    pub async fn get_searches(&self, limit: u64) -> Result<Vec<SearchRecord>, HistoryError> {
        self.recent::<Searches>(limit).await
    }

    pub async fn delete_search(&self, id: i64) -> Result<(), HistoryError> {
        self.delete::<Searches>(id).await
    }

    pub async fn clear_searches(&self) -> Result<(), HistoryError> {
        self.clear::<Searches>().await
    }

    pub async fn add_metadata(&self, media: NewViewedMedia) -> Result<i64, HistoryError> {
        self.add::<ViewedMedia>(media).await
    }

    pub async fn get_metadata(&self, limit: u64) -> Result<Vec<ViewedMediaRecord>, HistoryError> {
        self.recent::<ViewedMedia>(limit).await
    }

    pub async fn delete_metadata(&self, id: i64) -> Result<(), HistoryError> {
        self.delete::<ViewedMedia>(id).await
    }

    pub async fn clear_metadata(&self) -> Result<(), HistoryError> {
        self.clear::<ViewedMedia>().await
    }

    pub async fn add_conversion(&self, conversion: NewConversion) -> Result<i64, HistoryError> {
        self.add::<Conversions>(conversion).await
    }

    pub async fn get_conversions(
        &self,
        limit: u64,
    ) -> Result<Vec<ConversionRecord>, HistoryError> {
        self.recent::<Conversions>(limit).await
    }

    pub async fn delete_conversion(&self, id: i64) -> Result<(), HistoryError> {
        self.delete::<Conversions>(id).await
    }

    pub async fn clear_conversions(&self) -> Result<(), HistoryError> {
        self.clear::<Conversions>().await
    }

    /// Clears the three collections concurrently. Each clear commits on its
    /// own; a failure in one leaves the others cleared.
    pub async fn clear_all(&self) -> Result<(), HistoryError> {
        let (searches, metadata, conversions) = tokio::join!(
            self.clear_searches(),
            self.clear_metadata(),
            self.clear_conversions()
        );
        searches.and(metadata).and(conversions)
    }

    pub async fn counts(&self) -> Result<HistoryCounts, HistoryError> {
        let (searches, metadata, conversions) = tokio::join!(
            self.count::<Searches>(),
            self.count::<ViewedMedia>(),
            self.count::<Conversions>()
        );
        Ok(HistoryCounts {
            searches: searches?,
            metadata: metadata?,
            conversions: conversions?,
        })
    }

    async fn add<C>(&self, draft: C::Draft) -> Result<i64, HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        let repo = self.repo::<C>().await?;
        let timestamp = self.inner.clock.now_millis();
        let id = repo
            .add(draft, timestamp)
            .await
            .map_err(|e| HistoryError::write(C::NAME, &e))?;
        debug!("Recorded {} entry {} at {}", C::NAME, id, timestamp);
        Ok(id)
    }

    async fn recent<C>(&self, limit: u64) -> Result<Vec<C::Record>, HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        // SQLite's LIMIT is a signed 64-bit value.
        let limit = limit.min(i64::MAX as u64);
        self.repo::<C>()
            .await?
            .recent(limit)
            .await
            .map_err(|e| HistoryError::read(C::NAME, &e))
    }

    async fn delete<C>(&self, id: i64) -> Result<(), HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        let removed = self
            .repo::<C>()
            .await?
            .delete(id)
            .await
            .map_err(|e| HistoryError::write(C::NAME, &e))?;
        debug!("Deleted {} entry {} ({} rows)", C::NAME, id, removed);
        Ok(())
    }

    async fn clear<C>(&self) -> Result<(), HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        let removed = self
            .repo::<C>()
            .await?
            .clear()
            .await
            .map_err(|e| HistoryError::write(C::NAME, &e))?;
        info!("Cleared {} history ({} entries)", C::NAME, removed);
        Ok(())
    }

    async fn count<C>(&self) -> Result<u64, HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        self.repo::<C>()
            .await?
            .count()
            .await
            .map_err(|e| HistoryError::read(C::NAME, &e))
    }

    async fn repo<C>(&self) -> Result<CollectionRepository<C>, HistoryError>
    where
        C: HistoryCollection,
        ModelOf<C>: Sync,
        KeyOf<C>: Into<i64>,
    {
        Ok(CollectionRepository::new(self.connection().await?))
    }

    async fn connection(&self) -> Result<DatabaseConnection, HistoryError> {
        self.connect(false).await
    }

    async fn connect(&self, retry_failed: bool) -> Result<DatabaseConnection, HistoryError> {
        match self.acquire(retry_failed)? {
            Acquired::Ready(conn) => Ok(conn),
            Acquired::Pending(generation, pending) => {
                let result = pending.await;
                self.settle(generation, result)
            }
        }
    }

    fn acquire(&self, retry_failed: bool) -> Result<Acquired, HistoryError> {
        let mut state = self.lock_state();
        match &*state {
            ConnectionState::Ready(conn) => return Ok(Acquired::Ready(conn.clone())),
            ConnectionState::Initializing {
                generation,
                pending,
            } => return Ok(Acquired::Pending(*generation, pending.clone())),
            ConnectionState::Failed(reason) if !retry_failed => {
                return Err(HistoryError::StorageUnavailable(reason.clone()));
            }
            ConnectionState::Failed(_) | ConnectionState::Uninitialized => {}
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.open_attempts.fetch_add(1, Ordering::Relaxed);

        let options = self.inner.options.clone();
        let pending = async move { open_database(&options).await.map_err(|e| format!("{e:#}")) }
            .boxed()
            .shared();

        *state = ConnectionState::Initializing {
            generation,
            pending: pending.clone(),
        };
        Ok(Acquired::Pending(generation, pending))
    }

    fn settle(
        &self,
        generation: u64,
        result: Result<DatabaseConnection, String>,
    ) -> Result<DatabaseConnection, HistoryError> {
        let mut state = self.lock_state();
        let current = matches!(
            &*state,
            ConnectionState::Initializing { generation: g, .. } if *g == generation
        );

        if current {
            *state = match &result {
                Ok(conn) => ConnectionState::Ready(conn.clone()),
                Err(reason) => {
                    warn!("History database failed to open: {}", reason);
                    ConnectionState::Failed(reason.clone())
                }
            };
        }

        result.map_err(HistoryError::StorageUnavailable)
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn open_database(options: &StoreOptions) -> Result<DatabaseConnection> {
    use sea_orm_migration::MigratorTrait;

    let db_url = options.db_url.as_str();
    let in_memory = db_url.contains(":memory:");

    if !in_memory {
        let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
        if let Some(parent) = Path::new(path_str).parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        if !Path::new(path_str).exists() {
            std::fs::File::create(path_str)
                .with_context(|| format!("Failed to create database file {path_str}"))?;
        }
    }

    // Every pooled connection to `:memory:` would see its own empty database.
    let (max_connections, min_connections) = if in_memory {
        (1, 1)
    } else {
        (options.max_connections, options.min_connections)
    };

    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))?;

    migrator::Migrator::up(&conn, None)
        .await
        .context("Failed to apply history schema")?;

    info!(
        "History database ready at {} (pool: {}-{})",
        db_url, min_connections, max_connections
    );

    Ok(conn)
}
