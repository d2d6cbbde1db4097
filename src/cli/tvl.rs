use super::{OutputFormat, print_json, ui};
use crate::core::gateway::ContractGateway;
use crate::core::registry::token_symbol;
use crate::core::valuation::{InterestStatus, TvlResult, get_all_tvl_default, total_tvl};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Serialize;

const SNAPSHOT_MARKER: &str = "*";

#[derive(Debug, Serialize)]
pub struct TvlSummary<'a> {
    pub total_tvl_usd: f64,
    pub handlers: &'a [TvlResult],
}

fn interest_cell(result: &TvlResult) -> Cell {
    match (result.interest_generated, result.interest_status()) {
        (Some(interest), Some(InterestStatus::Accrued)) => {
            ui::interest_cell(format!("${}", ui::format_usd(interest)), true)
        }
        (Some(interest), Some(InterestStatus::SnapshotReflectsBalance)) => ui::interest_cell(
            format!("${} {SNAPSHOT_MARKER}", ui::format_usd(interest)),
            false,
        ),
        _ => ui::na_cell(false),
    }
}

/// Renders the TVL card: grand total, one row per handler, then addresses.
pub fn display_as_table(results: &[TvlResult]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Handler"),
        ui::header_cell("Protocol"),
        ui::header_cell("TVL (USD)"),
        ui::header_cell("Interest (USD)"),
    ]);

    for result in results {
        table.add_row(vec![
            Cell::new(&result.name),
            Cell::new(result.protocol.to_string()),
            ui::value_cell(format!("${}", ui::format_usd(result.tvl_usd))),
            interest_cell(result),
        ]);
    }

    let mut output = format!("{}\n\n", ui::style_text("TVL", ui::StyleType::Title));
    output.push_str(&format!(
        "{} {}\n\n",
        ui::style_text("Total TVL:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("${}", ui::format_usd(total_tvl(results))),
            ui::StyleType::TotalValue
        )
    ));
    output.push_str(&table.to_string());

    if results
        .iter()
        .any(|r| r.interest_status() == Some(InterestStatus::SnapshotReflectsBalance))
    {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("{SNAPSHOT_MARKER} snapshot already reflects balance"),
                ui::StyleType::Subtle
            )
        ));
    }

    for result in results {
        let symbol = token_symbol(&result.stablecoin_address).unwrap_or("token");
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "{}: handler {}, stablecoin {} ({})",
                    result.name, result.handler_address, result.stablecoin_address, symbol
                ),
                ui::StyleType::Subtle
            )
        ));
    }

    output
}

pub async fn run(gateway: &dyn ContractGateway, output: OutputFormat) -> Result<()> {
    let pb = output.spinner("Fetching TVL...");
    let results = get_all_tvl_default(gateway).await;
    pb.finish_and_clear();
    let results = results.context("Failed to load TVL")?;

    match output {
        OutputFormat::Json => print_json(&TvlSummary {
            total_tvl_usd: total_tvl(&results),
            handlers: &results,
        }),
        OutputFormat::Table => {
            println!("{}", display_as_table(&results));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::mock::funded_registry;

    #[tokio::test]
    async fn test_tvl_card_lists_every_handler() {
        console::set_colors_enabled(false);
        let gateway = funded_registry();
        let results = get_all_tvl_default(&gateway).await.unwrap();

        let rendered = display_as_table(&results);

        assert!(rendered.contains("Total TVL: $1,750.00"), "{rendered}");
        assert!(rendered.contains("Tropykus DOC"));
        assert!(rendered.contains("sovryn"));
        assert!(rendered.contains("$1,050.00"));
        assert!(rendered.contains("$50.00"));
        assert!(rendered.contains("(USDRIF)"));
    }

    #[tokio::test]
    async fn test_negative_interest_is_marked_as_snapshot_reflecting_balance() {
        console::set_colors_enabled(false);
        let gateway = funded_registry();
        let results = get_all_tvl_default(&gateway).await.unwrap();
        assert_eq!(
            results[2].interest_status(),
            Some(InterestStatus::SnapshotReflectsBalance)
        );

        let rendered = display_as_table(&results);

        assert!(rendered.contains("$-10.00 *"), "{rendered}");
        assert!(rendered.contains("* snapshot already reflects balance"));
        assert!(!rendered.contains("$50.00 *"));
    }

    #[test]
    fn test_empty_tvl_card() {
        console::set_colors_enabled(false);
        let rendered = display_as_table(&[]);
        assert!(rendered.contains("Total TVL: $0.00"), "{rendered}");
        assert!(!rendered.contains("snapshot already reflects balance"));
    }

    #[tokio::test]
    async fn test_json_summary_shape() {
        let gateway = funded_registry();
        let results = get_all_tvl_default(&gateway).await.unwrap();

        let value = serde_json::to_value(TvlSummary {
            total_tvl_usd: total_tvl(&results),
            handlers: &results,
        })
        .unwrap();

        assert_eq!(value["total_tvl_usd"], 1750.0);
        assert_eq!(value["handlers"].as_array().unwrap().len(), 3);
        assert_eq!(value["handlers"][1]["protocol"], "sovryn");
        assert_eq!(value["handlers"][1]["interest_generated"], 12.0);
    }
}
