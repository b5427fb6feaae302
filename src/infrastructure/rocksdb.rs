use crate::domain::legacy::LegacyTransaction;
use crate::domain::ports::{LegacyTransactionLog, TransactionStore};
use crate::domain::transaction::{NewTransaction, Transaction};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for current checkout transactions, keyed by order id.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for the legacy audit log, keyed by big-endian sequence id.
pub const CF_LEGACY: &str = "legacy_transactions";

/// A persistent store implementation using RocksDB.
///
/// Holds both the transaction table and the legacy log in separate Column
/// Families. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    // Serializes check-then-write sequences (create, save, append).
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, making sure
    /// both column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let cf_legacy = ColumnFamilyDescriptor::new(CF_LEGACY, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions, cf_legacy])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| CheckoutError::Storage(format!("{} column family not found", name)))
    }

    fn put<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<()> {
        let value = serde_json::to_vec(value)
            .map_err(|e| CheckoutError::Storage(format!("Serialization error: {}", e)))?;
        self.db.put_cf(self.cf(cf)?, key, value)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        match self.db.get_cf(self.cf(cf)?, key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| CheckoutError::Storage(format!("Deserialization error: {}", e))),
            None => Ok(None),
        }
    }

    fn read_all<T: DeserializeOwned>(&self, cf: &str) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for item in self.db.iterator_cf(self.cf(cf)?, IteratorMode::Start) {
            let (_key, value) = item?;
            let value = serde_json::from_slice(&value)
                .map_err(|e| CheckoutError::Storage(format!("Deserialization error: {}", e)))?;
            values.push(value);
        }
        Ok(values)
    }

    fn exists(&self, cf: &str, key: &[u8]) -> Result<bool> {
        Ok(self.db.get_pinned_cf(self.cf(cf)?, key)?.is_some())
    }

    fn last_legacy_id(&self) -> Result<u64> {
        let mut iter = self.db.iterator_cf(self.cf(CF_LEGACY)?, IteratorMode::End);
        match iter.next() {
            Some(item) => {
                let (key, _value) = item?;
                let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                    CheckoutError::Storage("Malformed legacy log key".to_string())
                })?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn create(&self, new: NewTransaction) -> Result<Transaction> {
        let _guard = self.write_lock.lock().await;
        if self.exists(CF_TRANSACTIONS, new.order_id.as_bytes())? {
            return Err(CheckoutError::DuplicateOrder {
                order_id: new.order_id,
            });
        }
        let tx = Transaction::new(new, Utc::now());
        self.put(CF_TRANSACTIONS, tx.order_id.as_bytes(), &tx)?;
        Ok(tx)
    }

    async fn get(&self, order_id: &str) -> Result<Option<Transaction>> {
        self.read(CF_TRANSACTIONS, order_id.as_bytes())
    }

    async fn save(&self, tx: &Transaction) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.exists(CF_TRANSACTIONS, tx.order_id.as_bytes())? {
            return Err(CheckoutError::NotFound {
                order_id: tx.order_id.clone(),
            });
        }
        self.put(CF_TRANSACTIONS, tx.order_id.as_bytes(), tx)
    }

    async fn list(&self) -> Result<Vec<Transaction>> {
        let mut all: Vec<Transaction> = self.read_all(CF_TRANSACTIONS)?;
        all.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(all)
    }
}

#[async_trait]
impl LegacyTransactionLog for RocksDBStore {
    async fn append(&self, record: LegacyTransaction) -> Result<LegacyTransaction> {
        let _guard = self.write_lock.lock().await;
        let id = self.last_legacy_id()? + 1;
        let record = LegacyTransaction { id, ..record.redacted() };
        self.put(CF_LEGACY, &id.to_be_bytes(), &record)?;
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<LegacyTransaction>> {
        self.read(CF_LEGACY, &id.to_be_bytes())
    }

    async fn list(&self) -> Result<Vec<LegacyTransaction>> {
        let mut all: Vec<LegacyTransaction> = self.read_all(CF_LEGACY)?;
        all.reverse();
        all.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(all)
    }
}
