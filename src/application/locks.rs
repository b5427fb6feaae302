use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-order mutual exclusion for read-modify-persist sequences.
///
/// Entries are dropped once nobody holds or waits on them, so the map only
/// grows with the number of orders being worked on concurrently.
#[derive(Default)]
pub struct OrderLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other operation holds `order_id`.
    pub async fn acquire(&self, order_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(order_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
