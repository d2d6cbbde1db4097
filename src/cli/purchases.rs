use super::{OutputFormat, print_json, ui};
use crate::core::history::{HistoryProvider, TotalPurchases};
use anyhow::{Context, Result};
use comfy_table::Cell;

impl TotalPurchases {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

        table.add_row(vec![
            Cell::new("Total Spent"),
            ui::value_cell(format!("${}", ui::format_usd(self.total_usd))),
        ]);
        table.add_row(vec![
            Cell::new("Transactions"),
            ui::value_cell(self.total_transactions.to_string()),
        ]);
        table.add_row(vec![
            Cell::new("Last Purchase"),
            ui::format_optional_cell(self.last_purchase_timestamp, ui::format_date),
        ]);

        format!(
            "{}\n\n{}",
            ui::style_text("Total Purchases", ui::StyleType::Title),
            table
        )
    }
}

pub async fn run(history: &dyn HistoryProvider, output: OutputFormat) -> Result<()> {
    let pb = output.spinner("Fetching purchases...");
    let purchases = history.total_purchases().await;
    pb.finish_and_clear();
    let purchases = purchases.context("Failed to load total purchases")?;

    match output {
        OutputFormat::Json => print_json(&purchases),
        OutputFormat::Table => {
            println!("{}", purchases.display_as_table());
            Ok(())
        }
    }
}
