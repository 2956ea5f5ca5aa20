//! Name-addressed operation surface.
//!
//! Hosts that speak in primitive strings (a REST gateway, an RPC shim,
//! a CLI) call [`handle`] with an operation name and positional arguments.
//! Amounts travel as base-10 strings of unbounded length; results come back
//! as a [`Response`] carrying either the transaction id and computed values
//! or a structured `{kind, message}` failure.
//!
//! | Operation            | Arguments      | Values on success               |
//! |----------------------|----------------|---------------------------------|
//! | `Init`               | none           | none                            |
//! | `CreatePool`         | token amount   | base, token, shares             |
//! | `AddLiquidity`       | base amount    | base, token, shares             |
//! | `RemoveLiquidity`    | share amount   | base out, token out, shares     |
//! | `RemoveAllLiquidity` | none           | base out, token out, shares     |
//! | `SwapTokensForBase`  | token amount   | base out                        |
//! | `SwapBaseForTokens`  | base amount    | token out                       |
//! | `GetReserves`        | none           | base reserve, token reserve     |
//! | `GetSwapFee`         | none           | numerator, denominator          |
//! | `GetFeeReserves`     | none           | base fees, token fees           |
//! | `GetShares`          | provider       | share balance                   |
//! | `GetTotalShares`     | none           | total shares                    |
//! | `GetProviders`       | none           | provider identities             |
//! | `RemoveProvider`     | index          | evicted provider, shares burned |
//!
//! Names are also accepted in lower camel case (`createPool`, ...).

use serde::Serialize;

use crate::domain::{Amount, CallerId, LiquidityChange, Reserves, TxId};
use crate::error::{AmmError, ErrorKind, Result};
use crate::exchange::{Committed, Exchange};
use crate::store::TransactionContext;

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Write an empty pool record.
    Init,
    /// Seed the token side.
    CreatePool {
        /// Token amount deposited.
        token_amount: Amount,
    },
    /// Deposit base plus the price-preserving token amount.
    AddLiquidity {
        /// Base amount deposited.
        base_amount: Amount,
    },
    /// Redeem part of the caller's shares.
    RemoveLiquidity {
        /// Shares redeemed.
        share_amount: Amount,
    },
    /// Redeem all of the caller's shares.
    RemoveAllLiquidity,
    /// Sell tokens for base.
    SwapTokensForBase {
        /// Tokens sold.
        token_amount_in: Amount,
    },
    /// Sell base for tokens.
    SwapBaseForTokens {
        /// Base sold.
        base_amount_in: Amount,
    },
    /// Read the tradable reserves.
    GetReserves,
    /// Read the swap fee.
    GetSwapFee,
    /// Read the accrued fees.
    GetFeeReserves,
    /// Read one provider's share balance.
    GetShares {
        /// Provider queried.
        provider: CallerId,
    },
    /// Read the share supply.
    GetTotalShares,
    /// Read the provider list.
    GetProviders,
    /// Evict a provider by ordinal.
    RemoveProvider {
        /// Position in the provider list.
        index: u64,
    },
}

impl Operation {
    /// Parses an operation name and its positional arguments.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownOperation`] if `name` is not recognised.
    /// - [`AmmError::InvalidArguments`] if the argument count is wrong or an
    ///   index is not a non-negative integer.
    /// - [`AmmError::InvalidAmount`] if an amount is not a decimal integer.
    pub fn parse(name: &str, args: &[&str]) -> Result<Self> {
        let op = match name {
            "Init" | "init" => {
                arity(args, 0)?;
                Self::Init
            }
            "CreatePool" | "createPool" => Self::CreatePool {
                token_amount: amount_arg(args)?,
            },
            "AddLiquidity" | "addLiquidity" => Self::AddLiquidity {
                base_amount: amount_arg(args)?,
            },
            "RemoveLiquidity" | "removeLiquidity" => Self::RemoveLiquidity {
                share_amount: amount_arg(args)?,
            },
            "RemoveAllLiquidity" | "removeAllLiquidity" => {
                arity(args, 0)?;
                Self::RemoveAllLiquidity
            }
            "SwapTokensForBase" | "swapTokensForBase" => Self::SwapTokensForBase {
                token_amount_in: amount_arg(args)?,
            },
            "SwapBaseForTokens" | "swapBaseForTokens" => Self::SwapBaseForTokens {
                base_amount_in: amount_arg(args)?,
            },
            "GetReserves" | "getReserves" => {
                arity(args, 0)?;
                Self::GetReserves
            }
            "GetSwapFee" | "getSwapFee" => {
                arity(args, 0)?;
                Self::GetSwapFee
            }
            "GetFeeReserves" | "getFeeReserves" => {
                arity(args, 0)?;
                Self::GetFeeReserves
            }
            "GetShares" | "getShares" => {
                arity(args, 1)?;
                Self::GetShares {
                    provider: CallerId::new(args[0]),
                }
            }
            "GetTotalShares" | "getTotalShares" => {
                arity(args, 0)?;
                Self::GetTotalShares
            }
            "GetProviders" | "getProviders" => {
                arity(args, 0)?;
                Self::GetProviders
            }
            "RemoveProvider" | "removeProvider" => {
                arity(args, 1)?;
                let index = args[0].parse::<u64>().map_err(|_| {
                    AmmError::InvalidArguments("index must be a non-negative integer")
                })?;
                Self::RemoveProvider { index }
            }
            other => return Err(AmmError::UnknownOperation(other.to_owned())),
        };
        Ok(op)
    }

    /// Canonical operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::CreatePool { .. } => "CreatePool",
            Self::AddLiquidity { .. } => "AddLiquidity",
            Self::RemoveLiquidity { .. } => "RemoveLiquidity",
            Self::RemoveAllLiquidity => "RemoveAllLiquidity",
            Self::SwapTokensForBase { .. } => "SwapTokensForBase",
            Self::SwapBaseForTokens { .. } => "SwapBaseForTokens",
            Self::GetReserves => "GetReserves",
            Self::GetSwapFee => "GetSwapFee",
            Self::GetFeeReserves => "GetFeeReserves",
            Self::GetShares { .. } => "GetShares",
            Self::GetTotalShares => "GetTotalShares",
            Self::GetProviders => "GetProviders",
            Self::RemoveProvider { .. } => "RemoveProvider",
        }
    }

    /// Returns `true` for queries that never write.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetReserves
                | Self::GetSwapFee
                | Self::GetFeeReserves
                | Self::GetShares { .. }
                | Self::GetTotalShares
                | Self::GetProviders
        )
    }
}

fn arity(args: &[&str], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else if expected == 0 {
        Err(AmmError::InvalidArguments("operation takes no arguments"))
    } else {
        Err(AmmError::InvalidArguments("operation takes exactly one argument"))
    }
}

fn amount_arg(args: &[&str]) -> Result<Amount> {
    arity(args, 1)?;
    Amount::parse(args[0])
}

/// Outcome of a dispatched operation, ready to be marshaled by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// The operation succeeded.
    Success {
        /// Transaction that committed the change; absent for queries.
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_id: Option<TxId>,
        /// Computed values as decimal strings or identities.
        values: Vec<String>,
    },
    /// The operation was rejected; nothing was written.
    Failure {
        /// Machine-readable error kind.
        kind: ErrorKind,
        /// Human-readable reason.
        message: String,
    },
}

impl Response {
    /// Returns `true` for [`Response::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    fn committed<T>(committed: Committed<T>, values: Vec<String>) -> Self {
        Self::Success {
            tx_id: Some(committed.tx_id),
            values,
        }
    }

    fn query(values: Vec<String>) -> Self {
        Self::Success {
            tx_id: None,
            values,
        }
    }
}

impl From<AmmError> for Response {
    fn from(err: AmmError) -> Self {
        Self::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Parses and runs `name(args)` on behalf of the context's caller.
pub fn handle<C: TransactionContext>(
    exchange: &Exchange,
    ctx: &mut C,
    name: &str,
    args: &[&str],
) -> Response {
    Operation::parse(name, args)
        .and_then(|op| invoke(exchange, ctx, &op))
        .unwrap_or_else(Response::from)
}

/// Runs an already-parsed operation.
///
/// The acting identity is taken from [`TransactionContext::caller_identity`].
///
/// # Errors
///
/// Whatever the underlying [`Exchange`] operation returns.
pub fn invoke<C: TransactionContext>(
    exchange: &Exchange,
    ctx: &mut C,
    op: &Operation,
) -> Result<Response> {
    if op.is_read_only() {
        return query(exchange, &*ctx, op);
    }

    let caller = ctx.caller_identity()?;
    let response = match op {
        Operation::Init => Response::committed(exchange.init(ctx)?, Vec::new()),
        Operation::CreatePool { token_amount } => {
            change_response(exchange.create_pool(ctx, &caller, token_amount)?)
        }
        Operation::AddLiquidity { base_amount } => {
            change_response(exchange.add_liquidity(ctx, &caller, base_amount)?)
        }
        Operation::RemoveLiquidity { share_amount } => {
            change_response(exchange.remove_liquidity(ctx, &caller, share_amount)?)
        }
        Operation::RemoveAllLiquidity => {
            change_response(exchange.remove_all_liquidity(ctx, &caller)?)
        }
        Operation::SwapTokensForBase { token_amount_in } => {
            let committed = exchange.swap_tokens_for_base(ctx, &caller, token_amount_in)?;
            let out = committed.outcome.amount_out().to_string();
            Response::committed(committed, vec![out])
        }
        Operation::SwapBaseForTokens { base_amount_in } => {
            let committed = exchange.swap_base_for_tokens(ctx, &caller, base_amount_in)?;
            let out = committed.outcome.amount_out().to_string();
            Response::committed(committed, vec![out])
        }
        Operation::RemoveProvider { index } => {
            let committed = exchange.remove_provider(ctx, &caller, *index)?;
            let (provider, forfeited) = &committed.outcome;
            let values = vec![provider.to_string(), forfeited.to_string()];
            Response::committed(committed, values)
        }
        Operation::GetReserves
        | Operation::GetSwapFee
        | Operation::GetFeeReserves
        | Operation::GetShares { .. }
        | Operation::GetTotalShares
        | Operation::GetProviders => return query(exchange, &*ctx, op),
    };
    Ok(response)
}

fn query<C: TransactionContext>(
    exchange: &Exchange,
    ctx: &C,
    op: &Operation,
) -> Result<Response> {
    let values = match op {
        Operation::GetReserves => pair(&exchange.get_reserves(ctx)?),
        Operation::GetFeeReserves => pair(&exchange.get_fee_reserves(ctx)?),
        Operation::GetSwapFee => {
            let fee = exchange.get_swap_fee(ctx)?;
            vec![fee.numerator().to_string(), fee.denominator().to_string()]
        }
        Operation::GetShares { provider } => {
            vec![exchange.get_shares(ctx, provider)?.to_string()]
        }
        Operation::GetTotalShares => vec![exchange.get_total_shares(ctx)?.to_string()],
        Operation::GetProviders => exchange
            .get_providers(ctx)?
            .iter()
            .map(ToString::to_string)
            .collect(),
        _ => return Err(AmmError::InvalidArguments("operation is not a query")),
    };
    Ok(Response::query(values))
}

fn pair(reserves: &Reserves) -> Vec<String> {
    vec![reserves.base.to_string(), reserves.token.to_string()]
}

fn change_response(committed: Committed<LiquidityChange>) -> Response {
    let change = &committed.outcome;
    let values = vec![
        change.base.to_string(),
        change.token.to_string(),
        change.shares.to_string(),
    ];
    Response::committed(committed, values)
}
