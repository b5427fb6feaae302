use crate::domain::legacy::LegacyTransaction;
use crate::domain::ports::{LegacyTransactionLog, TransactionStore};
use crate::domain::transaction::{NewTransaction, Transaction};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for checkout transactions.
///
/// Uses `Arc<RwLock<HashMap<String, Transaction>>>` keyed by gateway order id.
/// Suited to tests and single-process runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, new: NewTransaction) -> Result<Transaction> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&new.order_id) {
            return Err(CheckoutError::DuplicateOrder {
                order_id: new.order_id,
            });
        }
        let tx = Transaction::new(new, Utc::now());
        transactions.insert(tx.order_id.clone(), tx.clone());
        Ok(tx)
    }

    async fn get(&self, order_id: &str) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(order_id).cloned())
    }

    async fn save(&self, tx: &Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&tx.order_id) {
            Some(stored) => {
                *stored = tx.clone();
                Ok(())
            }
            None => Err(CheckoutError::NotFound {
                order_id: tx.order_id.clone(),
            }),
        }
    }

    async fn list(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<Transaction> = transactions.values().cloned().collect();
        all.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(all)
    }
}

/// In-memory log of legacy express checkout records, keyed by sequence id.
#[derive(Default, Clone)]
pub struct InMemoryLegacyLog {
    records: Arc<RwLock<BTreeMap<u64, LegacyTransaction>>>,
}

impl InMemoryLegacyLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LegacyTransactionLog for InMemoryLegacyLog {
    async fn append(&self, record: LegacyTransaction) -> Result<LegacyTransaction> {
        let mut records = self.records.write().await;
        let id = records.keys().next_back().map_or(1, |last| last + 1);
        let record = LegacyTransaction { id, ..record.redacted() };
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<LegacyTransaction>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<LegacyTransaction>> {
        let records = self.records.read().await;
        let mut all: Vec<LegacyTransaction> = records.values().rev().cloned().collect();
        all.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(all)
    }
}
