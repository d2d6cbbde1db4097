use super::{OutputFormat, print_json, ui};
use crate::core::balances::{OperationalBalancesResult, OperationalConfig, get_operational_balances};
use crate::core::gateway::ContractGateway;
use anyhow::{Context, Result};
use comfy_table::Cell;

const RBTC_DECIMALS: usize = 6;
const STABLECOIN_DECIMALS: usize = 2;

impl OperationalBalancesResult {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Account"),
            ui::header_cell("Balance"),
            ui::header_cell("Value (USD)"),
        ]);

        table.add_row(vec![
            Cell::new("Swapper"),
            ui::value_cell(format!(
                "{} RBTC",
                ui::format_amount(self.swapper.balance_rbtc, RBTC_DECIMALS)
            )),
            ui::value_cell(format!("≈ ${}", ui::format_usd(self.swapper.balance_usd))),
        ]);
        table.add_row(vec![
            Cell::new("Fee Collector"),
            ui::value_cell(format!(
                "{} DOC",
                ui::format_amount(self.fee_collector.doc_balance, STABLECOIN_DECIMALS)
            )),
            ui::value_cell(format!("${}", ui::format_usd(self.fee_collector.doc_balance))),
        ]);
        table.add_row(vec![
            Cell::new("Fee Collector"),
            ui::value_cell(format!(
                "{} USDRIF",
                ui::format_amount(self.fee_collector.usdrif_balance, STABLECOIN_DECIMALS)
            )),
            ui::value_cell(format!(
                "${}",
                ui::format_usd(self.fee_collector.usdrif_balance)
            )),
        ]);

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Operational Balances", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("Total Income:", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("~${}", ui::format_usd(self.fee_collector_total_usd)),
                ui::StyleType::TotalValue
            )
        ));
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("RBTC price: ${}", ui::format_usd(self.native_price_usd)),
                ui::StyleType::Subtle
            )
        ));
        output
    }
}

pub async fn run(gateway: &dyn ContractGateway, output: OutputFormat) -> Result<()> {
    let pb = output.spinner("Fetching operational balances...");
    let balances = get_operational_balances(gateway, &OperationalConfig::default()).await;
    pb.finish_and_clear();
    let balances = balances.context("Failed to load operational balances")?;

    match output {
        OutputFormat::Json => print_json(&balances),
        OutputFormat::Table => {
            println!("{}", balances.display_as_table());
            Ok(())
        }
    }
}
