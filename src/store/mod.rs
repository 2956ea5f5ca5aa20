//! Backing-store contract.
//!
//! The state machine only needs four things from the ledger it runs on:
//! transactional `read`/`write` of raw bytes, the invoking identity, and the
//! transaction identifier.  [`TransactionContext`] captures exactly that, so
//! the exchange can be rehosted on any transactional key-value store.
//!
//! # Atomicity
//!
//! All reads and writes performed through one context belong to one
//! transaction.  The store is responsible for serializability: two
//! concurrent transactions touching the pool key must be linearized, and a
//! transaction that is not committed must leave no trace.
//!
//! [`MemoryLedger`] is the in-process implementation used by tests, demos
//! and embedders that need no durability.

mod memory;

pub use memory::{MemoryLedger, MemoryTransaction};

use crate::domain::{CallerId, TxId};
use crate::error::StoreError;

/// A single transaction against the backing key-value ledger.
///
/// # Errors
///
/// Every method may fail with a [`StoreError`]; the exchange surfaces it
/// unchanged and never retries.
pub trait TransactionContext {
    /// Reads the value at `key` as of this transaction, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stages `value` at `key`; visible to later reads of this transaction.
    fn write(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Identity that submitted this transaction.
    fn caller_identity(&self) -> Result<CallerId, StoreError>;

    /// Identifier assigned to this transaction by the ledger.
    fn transaction_id(&self) -> TxId;
}

impl<T: TransactionContext + ?Sized> TransactionContext for &mut T {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn caller_identity(&self) -> Result<CallerId, StoreError> {
        (**self).caller_identity()
    }

    fn transaction_id(&self) -> TxId {
        (**self).transaction_id()
    }
}
