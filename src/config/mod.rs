//! Exchange configuration.

use serde::{Deserialize, Serialize};

use crate::domain::SwapFee;
use crate::error::AmmError;

/// Ledger key the pool record lives under unless configured otherwise.
pub const DEFAULT_POOL_KEY: &str = "pool";

/// Deployment parameters of an [`Exchange`](crate::exchange::Exchange).
///
/// - `pool_key`: ledger key of the singleton pool record.
/// - `swap_fee`: fee a freshly initialized pool starts with.  Once a pool
///   record exists its persisted fee is authoritative.
///
/// # Validation
///
/// - The pool key must be non-empty.
/// - The fee is validated at [`SwapFee`] construction time, including when
///   deserialized.
///
/// # Examples
///
/// ```
/// use carbon_amm::config::ExchangeConfig;
///
/// let Ok(config) = ExchangeConfig::from_json(r#"{"poolKey": "amm"}"#) else {
///     panic!("valid config");
/// };
/// assert_eq!(config.pool_key(), "amm");
/// assert_eq!(config.swap_fee().denominator(), 1_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExchangeConfig", rename_all = "camelCase")]
pub struct ExchangeConfig {
    pool_key: String,
    swap_fee: SwapFee,
}

impl ExchangeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidArguments`] if `pool_key` is empty.
    pub fn new(pool_key: impl Into<String>, swap_fee: SwapFee) -> Result<Self, AmmError> {
        let config = Self {
            pool_key: pool_key.into(),
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidArguments`] if the document is malformed.
    /// - [`AmmError::InvalidFee`] or [`AmmError::InvalidArguments`] if a
    ///   field fails validation.
    pub fn from_json(json: &str) -> Result<Self, AmmError> {
        let raw: RawExchangeConfig = serde_json::from_str(json)
            .map_err(|_| AmmError::InvalidArguments("malformed configuration document"))?;
        Self::try_from(raw)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidArguments`] if the pool key is empty.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.pool_key.trim().is_empty() {
            return Err(AmmError::InvalidArguments("pool key must be non-empty"));
        }
        Ok(())
    }

    /// Returns the pool record key.
    #[must_use]
    pub fn pool_key(&self) -> &str {
        &self.pool_key
    }

    /// Returns the fee applied to a freshly initialized pool.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            pool_key: DEFAULT_POOL_KEY.to_owned(),
            swap_fee: SwapFee::DEFAULT,
        }
    }
}

// Fee fields stay unvalidated here so a bad fraction surfaces as
// `InvalidFee` rather than a parse failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExchangeConfig {
    #[serde(default = "default_pool_key")]
    pool_key: String,
    #[serde(default)]
    swap_fee: Option<RawFee>,
}

#[derive(Deserialize)]
struct RawFee {
    numerator: u64,
    denominator: u64,
}

fn default_pool_key() -> String {
    DEFAULT_POOL_KEY.to_owned()
}

impl TryFrom<RawExchangeConfig> for ExchangeConfig {
    type Error = AmmError;

    fn try_from(raw: RawExchangeConfig) -> Result<Self, Self::Error> {
        let swap_fee = match raw.swap_fee {
            Some(fee) => SwapFee::new(fee.numerator, fee.denominator)?,
            None => SwapFee::DEFAULT,
        };
        Self::new(raw.pool_key, swap_fee)
    }
}
