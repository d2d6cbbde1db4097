//! Full dashboard: on-chain figures plus the backend-served sections.
//!
//! TVL and operational balances load as one unit; if either read fails
//! neither is shown. Purchases load at the same time and TVL evolution once
//! the on-chain total is known. Each backend section fails on its own.

use super::{OutputFormat, print_json, tvl, ui};
use crate::core::balances::{OperationalBalancesResult, OperationalConfig, get_operational_balances};
use crate::core::error::FetchError;
use crate::core::gateway::ContractGateway;
use crate::core::history::{EvolutionQuery, Granularity, HistoryProvider, TotalPurchases, TvlPoint};
use crate::core::valuation::{TvlResult, get_all_tvl_default, total_tvl};
use anyhow::Result;
use futures::{join, try_join};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of one independently loaded section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section<T> {
    Ok(T),
    Error(String),
}

impl<T> From<Result<T, FetchError>> for Section<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Section::Ok(value),
            Err(e) => Section::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnChain {
    pub total_tvl_usd: f64,
    pub tvl: Vec<TvlResult>,
    pub balances: OperationalBalancesResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub on_chain: Section<OnChain>,
    pub purchases: Section<TotalPurchases>,
    pub granularity: Granularity,
    pub evolution: Section<Vec<TvlPoint>>,
}

pub async fn load_on_chain(gateway: &dyn ContractGateway) -> Result<OnChain, FetchError> {
    let operational = OperationalConfig::default();
    let (tvl, balances) = try_join!(
        get_all_tvl_default(gateway),
        get_operational_balances(gateway, &operational),
    )?;

    Ok(OnChain {
        total_tvl_usd: total_tvl(&tvl),
        tvl,
        balances,
    })
}

/// Loads every section. Never fails as a whole; section errors are carried
/// in the report.
///
/// Purchases load alongside the chain reads. Only the evolution request
/// waits, since it is anchored to the on-chain total.
pub async fn load(
    gateway: &dyn ContractGateway,
    history: &dyn HistoryProvider,
    granularity: Granularity,
) -> DashboardReport {
    let (on_chain, purchases) = join!(load_on_chain(gateway), history.total_purchases());
    let on_chain: Section<OnChain> = on_chain.into();

    let mut query = EvolutionQuery::new(granularity);
    match &on_chain {
        Section::Ok(data) => query.current_tvl = Some(data.total_tvl_usd),
        Section::Error(e) => warn!("On-chain load failed: {}", e),
    }
    debug!(?query, "Loading TVL evolution");
    let evolution = history.tvl_evolution(&query).await;

    DashboardReport {
        on_chain,
        purchases: purchases.into(),
        granularity,
        evolution: evolution.into(),
    }
}

fn error_line(message: &str) -> String {
    ui::style_text(&format!("Error: {message}"), ui::StyleType::Error)
}

impl DashboardReport {
    /// Renders every section, separated by rules.
    pub fn sections(&self) -> Vec<String> {
        let mut sections = Vec::new();

        match &self.on_chain {
            Section::Ok(data) => {
                sections.push(tvl::display_as_table(&data.tvl));
                sections.push(data.balances.display_as_table());
            }
            Section::Error(e) => sections.push(error_line(e)),
        }

        sections.push(match &self.purchases {
            Section::Ok(purchases) => purchases.display_as_table(),
            Section::Error(e) => format!(
                "{}\n\n{}",
                ui::style_text("Total Purchases", ui::StyleType::Title),
                error_line(e)
            ),
        });

        sections.push(match &self.evolution {
            Section::Ok(points) => super::evolution::display_as_table(self.granularity, points),
            Section::Error(e) => format!(
                "{}\n\n{}",
                ui::style_text(
                    &format!("TVL Evolution ({})", self.granularity.label()),
                    ui::StyleType::Title
                ),
                error_line(e)
            ),
        });

        sections
    }
}

pub async fn run(
    gateway: &dyn ContractGateway,
    history: &dyn HistoryProvider,
    granularity: Granularity,
    output: OutputFormat,
) -> Result<()> {
    let pb = output.spinner("Loading dashboard...");
    let report = load(gateway, history, granularity).await;
    pb.finish_and_clear();

    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            let sections = report.sections();
            let count = sections.len();
            for (i, section) in sections.into_iter().enumerate() {
                println!("{section}");
                if i < count - 1 {
                    ui::print_separator();
                }
            }
            Ok(())
        }
    }
}
