//! redb-based storage for market state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `identities` | identity id | `IdentityRecord` | Registered accounts |
//! | `session` | `"current"` | `Identity` | Current identity (at most one) |
//! | `cart` | `"items"` | `Vec<LineItem>` | The session's cart, in insertion order |
//! | `orders` | order id | `Order` | Append-only order records |
//!
//! Values are JSON, matching the persisted-state layout of the storefront:
//! one record class per key space. The cart is stored as a single serialized
//! list because line ordering is part of its contract.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), so an operation either lands completely or not
//! at all. Checkout relies on this: order append and cart clear share one
//! write transaction.

use std::path::Path;
use std::sync::Arc;

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{Identity, LineItem, Order};
use thiserror::Error;

use crate::session::IdentityRecord;

/// Registered accounts: key = identity id, value = JSON IdentityRecord
const IDENTITIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("identities");

/// Current session: key = "current", value = JSON Identity
const SESSION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

/// Cart: key = "items", value = JSON Vec<LineItem>
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");

/// Orders: key = order id, value = JSON Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

const SESSION_KEY: &str = "current";
const CART_KEY: &str = "items";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => shared::AppError::not_found(format!("Order {}", id)),
            other => shared::AppError::storage(other.to_string()),
        }
    }
}

/// Market state storage backed by redb
#[derive(Clone)]
pub struct MarketStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for MarketStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketStorage").finish_non_exhaustive()
    }
}

impl MarketStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(IDENTITIES_TABLE)?;
            let _ = write_txn.open_table(SESSION_TABLE)?;
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Identity Operations ==========

    /// Store a registered identity record (within transaction)
    pub fn store_identity(
        &self,
        txn: &WriteTransaction,
        record: &IdentityRecord,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(IDENTITIES_TABLE)?;
        let value = serde_json::to_vec(record)?;
        table.insert(record.identity.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a registered identity by id
    pub fn get_identity(&self, id: &str) -> StorageResult<Option<IdentityRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(IDENTITIES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Find the first registered identity matching email and role
    ///
    /// Signup never rejects duplicate emails, so lookups resolve to the
    /// earliest-keyed match.
    pub fn find_identity(
        &self,
        email: &str,
        role: shared::models::Role,
    ) -> StorageResult<Option<IdentityRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(IDENTITIES_TABLE)?;
        for result in table.iter()? {
            let (_key, value) = result?;
            let record: IdentityRecord = serde_json::from_slice(value.value())?;
            if record.identity.email == email && record.identity.role == role {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    // ========== Session Operations ==========

    /// Replace the current identity
    pub fn set_current_identity(&self, identity: &Identity) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SESSION_TABLE)?;
            let value = serde_json::to_vec(identity)?;
            table.insert(SESSION_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get the current identity, if any
    pub fn get_current_identity(&self) -> StorageResult<Option<Identity>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;
        match table.get(SESSION_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Clear the current identity
    pub fn clear_current_identity(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SESSION_TABLE)?;
            table.remove(SESSION_KEY)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Cart Operations ==========

    /// Load the cart line items (empty vec when never written)
    pub fn load_cart(&self) -> StorageResult<Vec<LineItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        match table.get(CART_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(Vec::new()),
        }
    }

    /// Store the full cart (within transaction)
    pub fn store_cart(&self, txn: &WriteTransaction, items: &[LineItem]) -> StorageResult<()> {
        let mut table = txn.open_table(CART_TABLE)?;
        let value = serde_json::to_vec(items)?;
        table.insert(CART_KEY, value.as_slice())?;
        Ok(())
    }

    /// Store the full cart in its own transaction
    pub fn save_cart(&self, items: &[LineItem]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.store_cart(&txn, items)?;
        txn.commit()?;
        Ok(())
    }

    // ========== Order Operations ==========

    /// Store an order (within transaction)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all orders, oldest first
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }

        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    /// Replace a stored order in its own transaction
    ///
    /// Fails with [`StorageError::OrderNotFound`] when the id was never
    /// stored; orders are created at checkout and only updated afterwards.
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            if table.get(order.id.as_str())?.is_none() {
                return Err(StorageError::OrderNotFound(order.id.clone()));
            }
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}
