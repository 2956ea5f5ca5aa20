//! In-memory transactional ledger.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use super::TransactionContext;
use crate::domain::{CallerId, TxId};
use crate::error::{AmmError, StoreError};

/// A process-local key-value ledger with serializable transactions.
///
/// A transaction holds the ledger lock from [`MemoryLedger::begin`] until it
/// is committed or dropped, so concurrent transactions are strictly
/// serialized.  Writes are buffered and applied only by
/// [`MemoryTransaction::commit`]; dropping an uncommitted transaction
/// discards them.
///
/// # Examples
///
/// ```
/// use carbon_amm::domain::CallerId;
/// use carbon_amm::store::{MemoryLedger, TransactionContext};
///
/// let ledger = MemoryLedger::new();
/// let mut tx = ledger.begin(CallerId::new("alice")).expect("lock");
/// tx.write("k", b"v".to_vec()).expect("write");
/// tx.commit();
/// assert_eq!(ledger.get("k").expect("read"), Some(b"v".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<BTreeMap<String, Vec<u8>>>,
    tx_seq: AtomicU64,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a transaction on behalf of `caller`, blocking until no other
    /// transaction is open.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if a previous transaction
    /// panicked while holding the lock.
    pub fn begin(&self, caller: CallerId) -> Result<MemoryTransaction<'_>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        let seq = self.tx_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let tx_id = TxId::new(format!("tx-{seq:016x}"));
        trace!(%tx_id, %caller, "transaction opened");
        Ok(MemoryTransaction {
            guard,
            writes: BTreeMap::new(),
            caller,
            tx_id,
        })
    }

    /// Runs `f` inside a fresh transaction, committing only if it succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f` (after discarding its writes),
    /// or a [`StoreError`] if the transaction cannot be opened.
    pub fn execute<T, F>(&self, caller: CallerId, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut MemoryTransaction<'_>) -> Result<T, AmmError>,
    {
        let mut tx = self.begin(caller)?;
        let out = f(&mut tx)?;
        tx.commit();
        Ok(out)
    }

    /// Reads the last committed value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        Ok(state.get(key).cloned())
    }
}

/// An open transaction on a [`MemoryLedger`].
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, BTreeMap<String, Vec<u8>>>,
    writes: BTreeMap<String, Vec<u8>>,
    caller: CallerId,
    tx_id: TxId,
}

impl MemoryTransaction<'_> {
    /// Applies all staged writes and releases the ledger.
    pub fn commit(mut self) {
        let writes = core::mem::take(&mut self.writes);
        trace!(tx_id = %self.tx_id, keys = writes.len(), "transaction committed");
        self.guard.extend(writes);
    }
}

impl TransactionContext for MemoryTransaction<'_> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .writes
            .get(key)
            .or_else(|| self.guard.get(key))
            .cloned())
    }

    fn write(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key.to_owned(), value);
        Ok(())
    }

    fn caller_identity(&self) -> Result<CallerId, StoreError> {
        Ok(self.caller.clone())
    }

    fn transaction_id(&self) -> TxId {
        self.tx_id.clone()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn alice() -> CallerId {
        CallerId::new("alice")
    }

    #[test]
    fn uncommitted_writes_are_discarded() {
        let ledger = MemoryLedger::new();
        {
            let Ok(mut tx) = ledger.begin(alice()) else {
                panic!("begin");
            };
            let Ok(()) = tx.write("pool", b"draft".to_vec()) else {
                panic!("write");
            };
            assert_eq!(tx.read("pool"), Ok(Some(b"draft".to_vec())));
        }
        assert_eq!(ledger.get("pool"), Ok(None));
    }

    #[test]
    fn execute_commits_only_on_success() {
        let ledger = MemoryLedger::new();
        let failed: Result<(), AmmError> = ledger.execute(alice(), |tx| {
            tx.write("pool", b"x".to_vec())?;
            Err(AmmError::NoLiquidity)
        });
        assert_eq!(failed, Err(AmmError::NoLiquidity));
        assert_eq!(ledger.get("pool"), Ok(None));

        let ok = ledger.execute(alice(), |tx| {
            tx.write("pool", b"y".to_vec())?;
            Ok(tx.transaction_id())
        });
        assert!(ok.is_ok());
        assert_eq!(ledger.get("pool"), Ok(Some(b"y".to_vec())));
    }

    #[test]
    fn transaction_ids_are_unique_and_ordered() {
        let ledger = MemoryLedger::new();
        let ids: Vec<TxId> = (0..3)
            .map(|_| {
                let Ok(tx) = ledger.begin(alice()) else {
                    panic!("begin");
                };
                tx.transaction_id()
            })
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn caller_identity_is_threaded() {
        let ledger = MemoryLedger::new();
        let Ok(tx) = ledger.begin(CallerId::new("bob")) else {
            panic!("begin");
        };
        assert_eq!(tx.caller_identity(), Ok(CallerId::new("bob")));
    }

    #[test]
    fn concurrent_increments_are_serialized() {
        let ledger = Arc::new(MemoryLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let result = ledger.execute(alice(), |tx| {
                            let current = tx
                                .read("n")?
                                .map(|b| b.len())
                                .unwrap_or_default();
                            tx.write("n", vec![0; current + 1])?;
                            Ok(())
                        });
                        assert!(result.is_ok());
                    }
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().is_ok());
        }
        assert_eq!(ledger.get("n").ok().flatten().map(|v| v.len()), Some(400));
    }
}
