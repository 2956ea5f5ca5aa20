//! Unified error types for the exchange state machine.
//!
//! Every fallible operation in the crate returns [`AmmError`].  Failures that
//! originate in the backing ledger are wrapped unchanged in
//! [`AmmError::Store`] so the caller layer can decide whether to retry.
//!
//! Messages are static and never embed pool state.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Errors raised by the backing transactional store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("failed to read state: {0}")]
    Read(String),

    /// Writing a key failed.
    #[error("failed to write state: {0}")]
    Write(String),

    /// The pool record could not be encoded.
    #[error("failed to serialize pool record: {0}")]
    Serialize(String),

    /// The stored bytes are not a valid pool record.
    #[error("failed to deserialize pool record: {0}")]
    Deserialize(String),

    /// The store cannot serve the transaction at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// All errors that can be produced by pool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Input amount is non-numeric, zero, or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// `create_pool` or `init` was called on a pool that already holds state.
    #[error("pool already initialized")]
    AlreadyInitialized,

    /// The pool has no outstanding shares, or its reserves are inconsistent
    /// with its share supply.
    #[error("pool is not initialized")]
    Uninitialized,

    /// A swap was attempted while one side of the pool is empty.
    #[error("pool has an empty reserve")]
    EmptyPool,

    /// The caller does not own enough shares for the request.
    #[error("insufficient liquidity shares")]
    InsufficientShares,

    /// The caller holds no shares at all.
    #[error("no liquidity to remove")]
    NoLiquidity,

    /// Provider ordinal is out of range.  `len` is kept for logs and stays
    /// out of the message.
    #[error("invalid provider index {index}")]
    InvalidIndex {
        /// Requested ordinal.
        index: u64,
        /// Number of registered providers.
        len: usize,
    },

    /// Swap fee fraction is malformed.
    #[error("invalid swap fee: {0}")]
    InvalidFee(&'static str),

    /// Operation name is not recognised by the dispatcher.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Positional arguments do not match the operation's signature.
    #[error("invalid arguments: {0}")]
    InvalidArguments(&'static str),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AmmError {
    /// Returns the stable, machine-readable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            Self::Uninitialized => ErrorKind::Uninitialized,
            Self::EmptyPool => ErrorKind::EmptyPool,
            Self::InsufficientShares => ErrorKind::InsufficientShares,
            Self::NoLiquidity => ErrorKind::NoLiquidity,
            Self::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            Self::InvalidFee(_) => ErrorKind::InvalidFee,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::Store(_) => ErrorKind::StoreFailure,
        }
    }
}

/// Flat discriminant of [`AmmError`], used in structured failure payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`AmmError::InvalidAmount`].
    InvalidAmount,
    /// See [`AmmError::AlreadyInitialized`].
    AlreadyInitialized,
    /// See [`AmmError::Uninitialized`].
    Uninitialized,
    /// See [`AmmError::EmptyPool`].
    EmptyPool,
    /// See [`AmmError::InsufficientShares`].
    InsufficientShares,
    /// See [`AmmError::NoLiquidity`].
    NoLiquidity,
    /// See [`AmmError::InvalidIndex`].
    InvalidIndex,
    /// See [`AmmError::InvalidFee`].
    InvalidFee,
    /// See [`AmmError::UnknownOperation`].
    UnknownOperation,
    /// See [`AmmError::InvalidArguments`].
    InvalidArguments,
    /// See [`AmmError::Store`].
    StoreFailure,
}

impl ErrorKind {
    /// Returns the snake-case name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::AlreadyInitialized => "already_initialized",
            Self::Uninitialized => "uninitialized",
            Self::EmptyPool => "empty_pool",
            Self::InsufficientShares => "insufficient_shares",
            Self::NoLiquidity => "no_liquidity",
            Self::InvalidIndex => "invalid_index",
            Self::InvalidFee => "invalid_fee",
            Self::UnknownOperation => "unknown_operation",
            Self::InvalidArguments => "invalid_arguments",
            Self::StoreFailure => "store_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
