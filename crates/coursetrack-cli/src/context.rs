// Per-run application context: configuration, store and port wiring

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use coursetrack_application::events::{EventPublisher, TracingEventPublisher};
use coursetrack_application::CompletionPorts;
use coursetrack_config::{AppConfig, ConfigManager, ConfigManagerTrait};
use coursetrack_domain::ports::{Clock, SystemClock};
use coursetrack_persistence::{InMemoryStore, Snapshot};

use crate::error::CliResult;

/// Load and validate configuration from `path` or the default location
pub fn load_config(path: Option<&Path>) -> CliResult<AppConfig> {
    let mut manager = match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()),
        None => ConfigManager::new(),
    };
    let config = manager.load_config()?;
    manager.validate_config(&config)?;
    Ok(config)
}

/// Everything a command needs for one run
pub struct AppContext {
    pub config: AppConfig,
    pub store: InMemoryStore,
    data_path: Option<PathBuf>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Open the snapshot named by `--data` or the configured `data_file`
    ///
    /// A path that does not exist yet starts an empty store.
    pub fn open(data: Option<PathBuf>, config: AppConfig) -> CliResult<Self> {
        let data_path = data.or_else(|| config.data_file.clone());
        let store = match &data_path {
            Some(path) if path.exists() => {
                InMemoryStore::from_snapshot(Snapshot::load(path)?, config.optimistic_locking)
            }
            Some(path) => {
                info!(path = %path.display(), "data file not found, starting empty");
                InMemoryStore::from_snapshot(Snapshot::default(), config.optimistic_locking)
            }
            None => InMemoryStore::from_snapshot(Snapshot::default(), config.optimistic_locking),
        };

        Ok(Self {
            config,
            store,
            data_path,
            events: Arc::new(TracingEventPublisher),
            clock: Arc::new(SystemClock),
        })
    }

    /// Context over an existing store, without a backing file
    pub fn with_store(store: InMemoryStore) -> Self {
        Self {
            config: AppConfig::default(),
            store,
            data_path: None,
            events: Arc::new(TracingEventPublisher),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Ports over the store
    pub fn ports(&self) -> CompletionPorts {
        CompletionPorts {
            repository: self.store.completions.clone(),
            enrolments: self.store.enrolments.clone(),
            criteria: self.store.criteria.clone(),
            catalog: self.store.catalog.clone(),
            events: self.events.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Write the store back to its snapshot file
    pub fn persist(&self) -> CliResult<()> {
        match &self.data_path {
            Some(path) => {
                self.store.snapshot().save(path)?;
                debug!(path = %path.display(), "store persisted");
            }
            None => info!("no data file given, nothing saved"),
        }
        Ok(())
    }
}
