use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::parser::parse_csv;
use crate::parser::types::Dataset;

/// A loaded dataset and the moment it was loaded.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    pub dataset: Arc<Dataset>,
    pub loaded_at: DateTime<Utc>,
}

impl DatasetCache {
    pub fn new(dataset: Dataset, loaded_at: DateTime<Utc>) -> Self {
        DatasetCache {
            dataset: Arc::new(dataset),
            loaded_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl_secs: u64) -> bool {
        let age = now.signed_duration_since(self.loaded_at).num_seconds();
        age >= 0 && age as u64 >= ttl_secs
    }
}

/// Produces a complete dataset. Retries, if any, are the loader's business.
pub trait DatasetLoader: Send + Sync {
    fn load(&self) -> Result<Dataset, AppError>;

    fn source(&self) -> String {
        "dataset".into()
    }
}

/// Loads a CSV export from disk.
pub struct CsvFileLoader {
    path: PathBuf,
    config: DashboardConfig,
}

impl CsvFileLoader {
    pub fn new(path: impl Into<PathBuf>, config: DashboardConfig) -> Self {
        CsvFileLoader {
            path: path.into(),
            config,
        }
    }
}

impl DatasetLoader for CsvFileLoader {
    fn load(&self) -> Result<Dataset, AppError> {
        let output = parse_csv(&self.path, &self.config, |rows, accepted| {
            log::debug!("{}: {} rows read, {} accepted", self.path.display(), rows, accepted);
        })?;
        Ok(output.into())
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct AppState {
    pub config: DashboardConfig,
    pub cache: Mutex<Option<DatasetCache>>,
    loader: Mutex<Option<Box<dyn DatasetLoader>>>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        AppState {
            config,
            cache: Mutex::new(None),
            loader: Mutex::new(None),
        }
    }

    pub fn with_loader(config: DashboardConfig, loader: Box<dyn DatasetLoader>) -> Self {
        AppState {
            config,
            cache: Mutex::new(None),
            loader: Mutex::new(Some(loader)),
        }
    }

    /// Replaces the loader and drops the cached dataset, which came from the old source.
    pub fn set_loader(&self, loader: Box<dyn DatasetLoader>) -> Result<(), AppError> {
        *self.loader.lock().map_err(poisoned)? = Some(loader);
        self.invalidate()
    }

    /// The cached dataset without loading, if any.
    pub fn current(&self) -> Result<Option<DatasetCache>, AppError> {
        Ok(self.cache.lock().map_err(poisoned)?.clone())
    }

    /// Returns the cached dataset while it is fresh, otherwise loads a new one.
    pub fn get_or_load(&self, now: DateTime<Utc>) -> Result<Arc<Dataset>, AppError> {
        {
            let guard = self.cache.lock().map_err(poisoned)?;
            if let Some(cache) = guard.as_ref() {
                if !cache.is_expired(now, self.config.cache_ttl_secs) {
                    return Ok(Arc::clone(&cache.dataset));
                }
                log::info!("Cached dataset expired (loaded at {})", cache.loaded_at);
            }
        }
        self.refresh(now)
    }

    /// Loads a new dataset and swaps it in as a whole. On failure the state is
    /// left without a dataset.
    pub fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<Dataset>, AppError> {
        let loaded = {
            let guard = self.loader.lock().map_err(poisoned)?;
            let loader = guard
                .as_ref()
                .ok_or_else(|| AppError::NoDataset("no data source configured".into()))?;
            log::info!("Loading dataset from {}", loader.source());
            loader.load()
        };

        let mut cache = self.cache.lock().map_err(poisoned)?;
        match loaded {
            Ok(dataset) => {
                log::info!(
                    "Dataset loaded: {} records, {} rows excluded",
                    dataset.len(),
                    dataset.skipped_rows
                );
                let fresh = DatasetCache::new(dataset, now);
                let snapshot = Arc::clone(&fresh.dataset);
                *cache = Some(fresh);
                Ok(snapshot)
            }
            Err(err) => {
                *cache = None;
                log::warn!("Dataset load failed: {}", err);
                Err(AppError::NoDataset(err.to_string()))
            }
        }
    }

    /// Installs an already loaded dataset, e.g. one parsed by an import command.
    pub fn replace(&self, dataset: Dataset, now: DateTime<Utc>) -> Result<Arc<Dataset>, AppError> {
        let fresh = DatasetCache::new(dataset, now);
        let snapshot = Arc::clone(&fresh.dataset);
        *self.cache.lock().map_err(poisoned)? = Some(fresh);
        Ok(snapshot)
    }

    pub fn invalidate(&self) -> Result<(), AppError> {
        *self.cache.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> AppError {
    AppError::Custom(format!("Mutex poisoned: {}", e))
}

pub trait DatasetAccess {
    /// Runs `f` on the current dataset, loading it first when absent or expired.
    /// `f` works on a snapshot, so a concurrent refresh never changes it mid-way.
    fn with_dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset, &DashboardConfig) -> T;
}

impl DatasetAccess for AppState {
    fn with_dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset, &DashboardConfig) -> T,
    {
        let dataset = self.get_or_load(Utc::now())?;
        Ok(f(&dataset, &self.config))
    }
}
