use super::{OutputFormat, print_json, ui};
use crate::core::history::{EvolutionQuery, Granularity, HistoryProvider, TvlPoint};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Parses a `--start-date`/`--end-date` value: `YYYY-MM-DD` (midnight UTC)
/// or Unix seconds.
pub fn parse_date(value: &str) -> Result<i64> {
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD or Unix seconds"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid time of day")?;
    Ok(midnight.and_utc().timestamp())
}

pub fn display_as_table(granularity: Granularity, points: &[TvlPoint]) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("TVL Evolution ({})", granularity.label()),
            ui::StyleType::Title
        )
    );

    if points.is_empty() {
        output.push_str(&ui::style_text(
            "No TVL data available",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("TVL (USD)")]);
    for point in points {
        table.add_row(vec![
            comfy_table::Cell::new(ui::format_date(point.timestamp)),
            ui::value_cell(format!("${}", ui::format_usd(point.tvl))),
        ]);
    }
    output.push_str(&table.to_string());
    output
}

pub async fn run(
    history: &dyn HistoryProvider,
    query: &EvolutionQuery,
    output: OutputFormat,
) -> Result<()> {
    let pb = output.spinner("Fetching TVL evolution...");
    let points = history.tvl_evolution(query).await;
    pb.finish_and_clear();
    let points = points.context("Failed to load TVL evolution")?;

    match output {
        OutputFormat::Json => print_json(&points),
        OutputFormat::Table => {
            println!("{}", display_as_table(query.granularity, &points));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-01").unwrap(), 1_717_200_000);
        assert_eq!(parse_date("1714521600").unwrap(), 1_714_521_600);
        assert!(parse_date("06/01/2024").is_err());
    }

    #[test]
    fn test_evolution_table() {
        console::set_colors_enabled(false);
        let points = vec![
            TvlPoint {
                timestamp: 1_714_521_600,
                tvl: 1800.0,
            },
            TvlPoint {
                timestamp: 1_717_200_000,
                tvl: 2500.5,
            },
        ];

        let rendered = display_as_table(Granularity::Week, &points);

        assert!(rendered.contains("TVL Evolution (Weekly)"), "{rendered}");
        assert!(rendered.contains("2024-05-01"));
        assert!(rendered.contains("$1,800.00"));
        assert!(rendered.contains("$2,500.50"));
    }

    #[test]
    fn test_empty_series() {
        console::set_colors_enabled(false);
        let rendered = display_as_table(Granularity::Month, &[]);

        assert!(rendered.contains("TVL Evolution (Monthly)"));
        assert!(rendered.contains("No TVL data available"));
    }
}
