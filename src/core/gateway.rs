//! Read-only access to the contracts the dashboard values

use super::error::FetchError;
use alloy::primitives::{Address, I256, U256};
use async_trait::async_trait;
use serde::Serialize;

/// Return of a Tropykus kToken `getSupplierSnapshotStored(account)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupplierSnapshot {
    pub deposits: U256,
    /// Underlying recorded at the last snapshot: deposits minus withdrawals.
    pub underlying_amount: U256,
    pub supplied_at: U256,
    pub promised_supply_rate: U256,
}

/// Contract calls needed to value handler positions and treasury balances.
///
/// Implementations must be safe to call concurrently; every method is a
/// plain read with no side effects.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Native coin balance of `account`, in wei.
    async fn native_balance(&self, account: Address) -> Result<U256, FetchError>;

    /// ERC20 `balanceOf(holder)` on `token`. Also used for kToken shares.
    async fn erc20_balance_of(&self, token: Address, holder: Address) -> Result<U256, FetchError>;

    /// Sovryn loan token `assetBalanceOf(holder)`.
    async fn asset_balance_of(
        &self,
        loan_token: Address,
        holder: Address,
    ) -> Result<U256, FetchError>;

    /// Sovryn loan token `profitOf(holder)`.
    async fn profit_of(&self, loan_token: Address, holder: Address) -> Result<I256, FetchError>;

    /// Tropykus kToken `exchangeRateStored()`, 18-decimal fixed point.
    async fn exchange_rate_stored(&self, ktoken: Address) -> Result<U256, FetchError>;

    /// Tropykus kToken `getSupplierSnapshotStored(holder)`.
    async fn supplier_snapshot_stored(
        &self,
        ktoken: Address,
        holder: Address,
    ) -> Result<SupplierSnapshot, FetchError>;

    /// Oracle `getPrice()`: USD price of the native coin, 18-decimal fixed point.
    async fn oracle_price(&self, oracle: Address) -> Result<U256, FetchError>;
}
