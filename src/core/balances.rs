//! Treasury balances: the swapper's native coin and the fee collector's stablecoins.

use super::error::FetchError;
use super::gateway::ContractGateway;
use super::registry::{operations, tokens};
use super::units::{PRICE_DECIMALS, TOKEN_DECIMALS, to_human, to_usd};
use alloy::primitives::{Address, U256};
use futures::try_join;
use serde::Serialize;
use tracing::{debug, instrument};

/// Addresses involved in the operational balances read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationalConfig {
    pub swapper_address: Address,
    pub fee_collector_address: Address,
    pub doc_token: Address,
    pub usdrif_token: Address,
    pub oracle_address: Address,
}

impl Default for OperationalConfig {
    fn default() -> Self {
        OperationalConfig {
            swapper_address: operations::SWAPPER,
            fee_collector_address: operations::FEE_COLLECTOR,
            doc_token: tokens::DOC,
            usdrif_token: tokens::USDRIF,
            oracle_address: operations::BTC_ORACLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapperBalance {
    pub address: Address,
    pub balance_wei: U256,
    pub balance_rbtc: f64,
    pub balance_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeCollectorBalances {
    pub address: Address,
    pub doc_balance_raw: U256,
    pub doc_balance: f64,
    pub usdrif_balance_raw: U256,
    pub usdrif_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalBalancesResult {
    pub swapper: SwapperBalance,
    pub fee_collector: FeeCollectorBalances,
    /// Stablecoins are counted at one dollar each.
    pub fee_collector_total_usd: f64,
    /// Oracle price used to value the swapper balance.
    pub native_price_usd: f64,
}

async fn fee_collector_balances(
    gateway: &dyn ContractGateway,
    address: Address,
    doc_token: Address,
    usdrif_token: Address,
) -> Result<FeeCollectorBalances, FetchError> {
    let (doc_balance_raw, usdrif_balance_raw) = try_join!(
        gateway.erc20_balance_of(doc_token, address),
        gateway.erc20_balance_of(usdrif_token, address),
    )?;

    Ok(FeeCollectorBalances {
        address,
        doc_balance_raw,
        doc_balance: to_human(doc_balance_raw, TOKEN_DECIMALS),
        usdrif_balance_raw,
        usdrif_balance: to_human(usdrif_balance_raw, TOKEN_DECIMALS),
    })
}

async fn swapper_balance(
    gateway: &dyn ContractGateway,
    address: Address,
    price_raw: U256,
) -> Result<SwapperBalance, FetchError> {
    let balance_wei = gateway.native_balance(address).await?;

    Ok(SwapperBalance {
        address,
        balance_wei,
        balance_rbtc: to_human(balance_wei, TOKEN_DECIMALS),
        balance_usd: to_usd(balance_wei, TOKEN_DECIMALS, price_raw, PRICE_DECIMALS),
    })
}

/// Reads the oracle price and fee collector balances together, then values
/// the swapper's native balance at that price.
#[instrument(skip(gateway, config))]
pub async fn get_operational_balances(
    gateway: &dyn ContractGateway,
    config: &OperationalConfig,
) -> Result<OperationalBalancesResult, FetchError> {
    let (price_raw, fee_collector) = try_join!(
        gateway.oracle_price(config.oracle_address),
        fee_collector_balances(
            gateway,
            config.fee_collector_address,
            config.doc_token,
            config.usdrif_token,
        ),
    )?;
    debug!(%price_raw, "Read native coin price");

    let swapper = swapper_balance(gateway, config.swapper_address, price_raw).await?;

    Ok(OperationalBalancesResult {
        fee_collector_total_usd: fee_collector.doc_balance + fee_collector.usdrif_balance,
        native_price_usd: to_human(price_raw, PRICE_DECIMALS),
        swapper,
        fee_collector,
    })
}
