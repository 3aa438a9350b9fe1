//! Data storage layer
//!
//! - `sqlite` - SQLite store for spots, vehicles and bookings
//! - `types` - Row types returned by repositories
//! - `traits` - `MarketplaceRepository`, the interface route handlers use
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::MarketplaceRepository;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::storage::AppStorage;

/// Transactional database service
///
/// Created once at startup, shared with route state through `Arc`, and
/// closed by the shutdown service.
pub struct TransactionalService {
    sqlite: Arc<SqliteService>,
}

impl TransactionalService {
    pub async fn init(storage: &AppStorage) -> Result<Self, DataError> {
        let service = SqliteService::init(storage).await?;
        Ok(Self {
            sqlite: Arc::new(service),
        })
    }

    /// Wrap an existing SQLite service (tests)
    pub fn from_sqlite(sqlite: SqliteService) -> Self {
        Self {
            sqlite: Arc::new(sqlite),
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> Result<(), DataError> {
        self.sqlite.ping().await.map_err(Into::into)
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        self.sqlite.checkpoint().await.map_err(Into::into)
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        self.sqlite.close().await
    }

    /// Start the background checkpoint task
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        self.sqlite.start_checkpoint_task(shutdown_rx)
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn MarketplaceRepository + Send + Sync> {
        Box::new(Arc::clone(&self.sqlite))
    }
}
