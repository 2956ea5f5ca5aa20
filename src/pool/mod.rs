//! The pool aggregate, its state transitions and its persisted schema.
//!
//! [`Pool`] is a plain value: every transition takes `&mut self`, validates
//! its inputs and computes the complete new state before writing any field.
//! Loading and storing it through a ledger is the job of
//! [`Exchange`](crate::exchange::Exchange); [`PoolRecord`] defines the bytes.

mod record;
mod state;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use record::{PoolRecord, PoolRecordV1};
pub use state::Pool;
