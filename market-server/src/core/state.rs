//! Server state - the explicit context object
//!
//! `ServerState` is the single context object: every handler receives it via
//! axum's `State` extractor, and every component hangs off it as a cheap
//! `Arc`-backed clone. No globals.

use std::sync::Arc;

use anyhow::Context;

use crate::cart::CartEngine;
use crate::catalog::Catalog;
use crate::core::Config;
use crate::db::MarketStorage;
use crate::orders::OrderBook;
use crate::session::SessionStore;

/// Shared server state
///
/// | Field | Purpose |
/// |-------|---------|
/// | `config` | Immutable configuration |
/// | `session` | Current identity + registered accounts |
/// | `cart` | The session's cart engine |
/// | `orders` | Persisted order book with push notifications |
/// | `catalog` | Product catalog |
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: Config,
    pub session: SessionStore,
    pub cart: CartEngine,
    pub orders: OrderBook,
    pub catalog: Arc<Catalog>,
}

impl ServerState {
    /// Initialize all services from configuration
    ///
    /// Creates the working directory, opens the database, and loads the
    /// catalog (file when configured, seed otherwise).
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;

        let storage =
            MarketStorage::open(config.db_path()).context("Failed to open market database")?;

        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?,
            None => Catalog::seeded(),
        };

        Ok(Self::with_storage(config.clone(), storage, catalog))
    }

    /// Assemble state around an already-open storage (used by tests)
    pub fn with_storage(config: Config, storage: MarketStorage, catalog: Catalog) -> Self {
        let session = SessionStore::new(storage.clone());
        let orders = OrderBook::new(storage.clone());
        let cart = CartEngine::new(storage, orders.clone());

        Self {
            config,
            session,
            cart,
            orders,
            catalog: Arc::new(catalog),
        }
    }
}
