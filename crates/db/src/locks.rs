//! In-process write locks, one per chain.
//!
//! A chain is the ordered set of active rows hanging off one parent: the fund
//! transactions of a project or the progress logs of an activity. Every write
//! to a chain holds that chain's lock from the `latest_active` read until the
//! commit, so two writers in this process never chain onto the same tail.
//! Writers in other processes are serialised by the parent row lock taken
//! inside the database transaction.
//!
//! An entry lives only while some writer holds or waits for it, so the table
//! stays as small as the number of chains being written concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-key async mutexes, keyed by the chain's parent id.
#[derive(Debug, Clone, Default)]
pub struct ChainLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ChainLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the chain of `key`.
    ///
    /// The chain stays locked until the returned guard is dropped.
    pub async fn acquire(&self, key: Uuid) -> ChainGuard {
        let mutex = Arc::clone(self.inner.entry(key).or_default().value());
        let guard = mutex.lock_owned().await;
        ChainGuard {
            key,
            table: Arc::clone(&self.inner),
            guard: Some(guard),
        }
    }

    /// Number of chains currently locked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no chain is locked or waited on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Exclusive hold on one chain. Dropping it unlocks the chain and evicts
/// the table entry when no other writer is waiting on it.
#[derive(Debug)]
pub struct ChainGuard {
    key: Uuid,
    table: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ChainGuard {
    fn drop(&mut self) {
        // Release first so the guard's own reference is not counted.
        self.guard.take();
        self.table
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = ChainLocks::new();
        let key = Uuid::now_v7();

        let guard = locks.acquire(key).await;
        let contender = locks.clone();
        let waiter = tokio::spawn(async move {
            let _guard = contender.acquire(key).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        assert_eq!(locks.len(), 1);
        drop(guard);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_evicted_after_release() {
        let locks = ChainLocks::new();
        for _ in 0..100 {
            let _guard = locks.acquire(Uuid::now_v7()).await;
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_waited_on() {
        let locks = ChainLocks::new();
        let key = Uuid::now_v7();

        let first = locks.acquire(key).await;
        let contender = locks.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let waiter = tokio::spawn(async move {
            let _guard = contender.acquire(key).await;
            rx.await.ok();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The waiter still references the entry.
        drop(first);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(locks.len(), 1);

        tx.send(()).unwrap();
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = ChainLocks::new();
        let _a = locks.acquire(Uuid::now_v7()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(Uuid::now_v7()))
            .await
            .unwrap();
        assert_eq!(locks.len(), 2);
        drop(b);
        assert_eq!(locks.len(), 1);
    }
}
