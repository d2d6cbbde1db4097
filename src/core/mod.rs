//! Core business logic abstractions

pub mod balances;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod log;
pub mod registry;
pub mod units;
pub mod valuation;

// Re-export main types for cleaner imports
pub use balances::{OperationalBalancesResult, OperationalConfig, get_operational_balances};
pub use error::FetchError;
pub use gateway::ContractGateway;
pub use history::{EvolutionQuery, Granularity, HistoryProvider, TotalPurchases, TvlPoint};
pub use valuation::{TvlResult, get_all_tvl, get_handler_tvl};
