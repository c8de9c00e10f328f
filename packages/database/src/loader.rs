//! Whole-table dataset loading with an explicit cache.
//!
//! The stops table is read once and kept until [`DatasetLoader::invalidate`]
//! is called. It feeds the preview grid and the filter option lists. The
//! cache sits behind a read-mostly lock so concurrent sessions share it.
//! Two sessions racing on a cold cache may both query the store; the last
//! result to land wins, which is harmless since both read the same table.
//!
//! Every [`DatasetLoader::invalidate`] bumps a generation counter. A load
//! only caches its rows if no invalidation happened while it was reading,
//! so a snapshot taken before an insert never outlives that insert.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use securecheck_database_models::{FilterOptions, QueryResult};
use securecheck_stop_models::STOPS_TABLE;

use crate::QueryError;
use crate::executor::QueryExecutor;

/// Outcome of a dataset load.
///
/// A failed load still carries a (empty) result so callers can render an
/// empty grid next to the error.
#[derive(Debug, Clone)]
pub struct DatasetLoad {
    /// The loaded rows, or an empty result on failure.
    pub data: Arc<QueryResult>,
    /// Why the load failed, if it did.
    pub error: Option<QueryError>,
}

impl DatasetLoad {
    /// Filter choices derived from the loaded rows.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_result(&self.data)
    }
}

/// Loads and memoizes the whole stops table.
pub struct DatasetLoader {
    executor: QueryExecutor,
    cache: RwLock<Option<Arc<QueryResult>>>,
    generation: AtomicU64,
}

impl DatasetLoader {
    /// Creates a loader with a cold cache.
    #[must_use]
    pub const fn new(executor: QueryExecutor) -> Self {
        Self {
            executor,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Statement used to read the whole table.
    #[must_use]
    pub fn select_all_sql() -> String {
        format!("SELECT * FROM {STOPS_TABLE};")
    }

    /// Returns the cached dataset, reading it from the store first if the
    /// cache is cold.
    ///
    /// Never fails: a store error yields an empty result plus the error,
    /// and is not cached so the next call tries again.
    pub async fn load(&self) -> DatasetLoad {
        if let Some(data) = self.cached() {
            log::trace!("Dataset cache hit ({} rows)", data.len());
            return DatasetLoad { data, error: None };
        }

        let generation = self.generation.load(Ordering::Acquire);

        match self.executor.execute(&Self::select_all_sql()).await {
            Ok(result) => {
                log::info!("Loaded {} stop record(s) from {STOPS_TABLE}", result.len());
                let data = Arc::new(result);
                self.store(generation, data.clone());
                DatasetLoad { data, error: None }
            }
            Err(e) => {
                log::error!("Failed to load {STOPS_TABLE}: {e}");
                DatasetLoad {
                    data: Arc::new(QueryResult::empty()),
                    error: Some(e),
                }
            }
        }
    }

    /// Drops the cached dataset so the next [`Self::load`] re-reads it.
    pub fn invalidate(&self) {
        log::debug!("Invalidating dataset cache");
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *cache = None;
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.cached().is_some()
    }

    /// Filter choices derived from the (possibly freshly loaded) dataset.
    pub async fn filter_options(&self) -> FilterOptions {
        self.load().await.filter_options()
    }

    /// Caches `data` read at `generation`, unless the cache was invalidated
    /// since. Returns whether it was cached.
    fn store(&self, generation: u64, data: Arc<QueryResult>) -> bool {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            log::debug!("Dataset was invalidated during the load; not caching it");
            return false;
        }
        *cache = Some(data);
        true
    }

    fn cached(&self) -> Option<Arc<QueryResult>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
