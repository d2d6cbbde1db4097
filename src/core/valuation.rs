//! TVL and generated-interest figures for lending handlers.
//!
//! Sovryn handlers hold loan tokens whose principal and withdrawable profit
//! are read separately. Tropykus handlers hold kToken shares, converted to
//! underlying through the stored exchange rate and compared with the
//! supplier snapshot to find the interest accrued since the last deposit or
//! withdrawal.

use super::error::FetchError;
use super::gateway::ContractGateway;
use super::registry::{HANDLERS, HandlerConfig, Protocol};
use super::units::{TOKEN_DECIMALS, signed_delta, to_human, to_human_signed};
use alloy::primitives::{Address, U256};
use futures::future::try_join_all;
use futures::try_join;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvlResult {
    pub handler_address: Address,
    pub name: String,
    pub stablecoin_address: Address,
    pub protocol: Protocol,
    pub tvl_usd: f64,
    pub underlying_usd: f64,
    pub interest_generated: Option<f64>,
}

/// How a signed interest figure should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestStatus {
    Accrued,
    /// The protocol snapshot already accounts for the whole balance, for
    /// example after accrued interest was withdrawn.
    SnapshotReflectsBalance,
}

impl InterestStatus {
    pub fn classify(interest: f64) -> Self {
        if interest >= 0.0 {
            InterestStatus::Accrued
        } else {
            InterestStatus::SnapshotReflectsBalance
        }
    }
}

impl TvlResult {
    pub fn interest_status(&self) -> Option<InterestStatus> {
        self.interest_generated.map(InterestStatus::classify)
    }
}

struct Position {
    underlying: U256,
    interest_generated: f64,
}

/// Underlying amount for `shares` kTokens at an 18-decimal `exchange_rate`.
///
/// `None` if the intermediate product does not fit in 256 bits.
pub fn real_underlying(shares: U256, exchange_rate: U256) -> Option<U256> {
    let one = U256::from(10u64).pow(U256::from(TOKEN_DECIMALS));
    shares.checked_mul(exchange_rate).map(|product| product / one)
}

async fn sovryn_position(
    gateway: &dyn ContractGateway,
    handler: &HandlerConfig,
) -> Result<Position, FetchError> {
    let loan_token = handler.lending_token_address;
    let holder = handler.contract_address;
    let (asset, profit) = try_join!(
        gateway.asset_balance_of(loan_token, holder),
        gateway.profit_of(loan_token, holder),
    )?;
    debug!(%asset, %profit, "Read Sovryn position");

    Ok(Position {
        underlying: asset,
        interest_generated: to_human_signed(profit, TOKEN_DECIMALS),
    })
}

async fn tropykus_position(
    gateway: &dyn ContractGateway,
    handler: &HandlerConfig,
) -> Result<Position, FetchError> {
    let ktoken = handler.lending_token_address;
    let holder = handler.contract_address;
    let (shares, exchange_rate, snapshot) = try_join!(
        gateway.erc20_balance_of(ktoken, holder),
        gateway.exchange_rate_stored(ktoken),
        gateway.supplier_snapshot_stored(ktoken, holder),
    )?;
    debug!(%shares, %exchange_rate, snapshot = %snapshot.underlying_amount, "Read Tropykus position");

    let underlying = real_underlying(shares, exchange_rate).ok_or_else(|| {
        FetchError::malformed(
            "exchangeRateStored",
            format!("{shares} shares at rate {exchange_rate} overflow 256 bits"),
        )
    })?;

    Ok(Position {
        underlying,
        interest_generated: signed_delta(underlying, snapshot.underlying_amount, TOKEN_DECIMALS),
    })
}

/// Values one handler's position.
#[instrument(skip(gateway, handler), fields(handler = handler.name, protocol = %handler.protocol))]
pub async fn get_handler_tvl(
    gateway: &dyn ContractGateway,
    handler: &HandlerConfig,
) -> Result<TvlResult, FetchError> {
    let position = match handler.protocol {
        Protocol::Sovryn => sovryn_position(gateway, handler).await?,
        Protocol::Tropykus => tropykus_position(gateway, handler).await?,
    };

    let tvl_usd = to_human(position.underlying, TOKEN_DECIMALS);
    debug!(tvl_usd, interest = position.interest_generated, "Valued handler");

    Ok(TvlResult {
        handler_address: handler.contract_address,
        name: handler.name.to_string(),
        stablecoin_address: handler.stablecoin_address,
        protocol: handler.protocol,
        tvl_usd,
        underlying_usd: tvl_usd,
        interest_generated: Some(position.interest_generated),
    })
}

/// Values every handler concurrently.
///
/// Results keep the order of `handlers`. The first failing read fails the
/// whole call and no partial list is returned.
pub async fn get_all_tvl(
    gateway: &dyn ContractGateway,
    handlers: &[HandlerConfig],
) -> Result<Vec<TvlResult>, FetchError> {
    try_join_all(
        handlers
            .iter()
            .map(|handler| get_handler_tvl(gateway, handler)),
    )
    .await
}

/// [`get_all_tvl`] over the built-in handler registry.
pub async fn get_all_tvl_default(
    gateway: &dyn ContractGateway,
) -> Result<Vec<TvlResult>, FetchError> {
    get_all_tvl(gateway, &HANDLERS).await
}

pub fn total_tvl(results: &[TvlResult]) -> f64 {
    results.iter().fold(0.0, |acc, r| acc + r.tvl_usd)
}
