//! Historical series and purchase totals served by the indexing backend

use super::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Heading used when rendering a series at this granularity.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Daily",
            Granularity::Week => "Weekly",
            Granularity::Month => "Monthly",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(anyhow::anyhow!("Invalid granularity: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPurchases {
    pub total_usd: f64,
    pub total_transactions: u64,
    /// Unix seconds.
    #[serde(default)]
    pub last_purchase_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TvlPoint {
    /// Unix seconds.
    pub timestamp: i64,
    pub tvl: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvolutionQuery {
    pub granularity: Granularity,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    /// Current on-chain TVL, which the backend uses to anchor the latest point.
    pub current_tvl: Option<f64>,
}

impl EvolutionQuery {
    pub fn new(granularity: Granularity) -> Self {
        EvolutionQuery {
            granularity,
            ..Default::default()
        }
    }

    /// Query-string pairs. Zero dates are treated as unset.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("granularity", self.granularity.to_string())];
        if let Some(start) = self.start_date.filter(|d| *d != 0) {
            params.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date.filter(|d| *d != 0) {
            params.push(("endDate", end.to_string()));
        }
        if let Some(tvl) = self.current_tvl {
            params.push(("currentTvl", tvl.to_string()));
        }
        params
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn total_purchases(&self) -> Result<TotalPurchases, FetchError>;
    async fn tvl_evolution(&self, query: &EvolutionQuery) -> Result<Vec<TvlPoint>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!("hour".parse::<Granularity>().is_err());
        assert_eq!(Granularity::default(), Granularity::Day);
    }

    #[test]
    fn test_query_params_skip_unset_and_zero_dates() {
        let query = EvolutionQuery {
            granularity: Granularity::Month,
            start_date: Some(0),
            end_date: Some(1_717_200_000),
            current_tvl: Some(1234.5),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("granularity", "month".to_string()),
                ("endDate", "1717200000".to_string()),
                ("currentTvl", "1234.5".to_string()),
            ]
        );

        assert_eq!(
            EvolutionQuery::new(Granularity::Day).to_params(),
            vec![("granularity", "day".to_string())]
        );
    }

    #[test]
    fn test_total_purchases_wire_format() {
        let json = r#"{"totalUsd": 1520.75, "totalTransactions": 42}"#;
        let purchases: TotalPurchases = serde_json::from_str(json).unwrap();
        assert_eq!(purchases.total_usd, 1520.75);
        assert_eq!(purchases.total_transactions, 42);
        assert!(purchases.last_purchase_timestamp.is_none());
    }
}
