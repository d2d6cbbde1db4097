use anyhow::Result;
use clap::{Parser, Subcommand};
use tvldash::cli::OutputFormat;
use tvldash::cli::evolution::parse_date;
use tvldash::core::history::{EvolutionQuery, Granularity};
use tvldash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display TVL, operational balances, purchases and TVL history
    Dashboard {
        /// Granularity of the TVL history section
        #[arg(short, long, default_value = "day", value_parser = parse_granularity)]
        granularity: Granularity,
    },
    /// Display TVL and generated interest per handler
    Tvl,
    /// Display swapper and fee collector balances
    Balances,
    /// Display total DCA purchases
    Purchases,
    /// Display the historical TVL series
    Evolution {
        /// day, week or month
        #[arg(short, long, default_value = "day", value_parser = parse_granularity)]
        granularity: Granularity,

        /// First date to include (YYYY-MM-DD or Unix seconds)
        #[arg(long, value_parser = parse_date_arg)]
        start_date: Option<i64>,

        /// Last date to include (YYYY-MM-DD or Unix seconds)
        #[arg(long, value_parser = parse_date_arg)]
        end_date: Option<i64>,

        /// Current TVL used to anchor the latest point
        #[arg(long)]
        current_tvl: Option<f64>,
    },
}

impl From<Commands> for tvldash::AppCommand {
    fn from(cmd: Commands) -> tvldash::AppCommand {
        match cmd {
            Commands::Dashboard { granularity } => tvldash::AppCommand::Dashboard { granularity },
            Commands::Tvl => tvldash::AppCommand::Tvl,
            Commands::Balances => tvldash::AppCommand::Balances,
            Commands::Purchases => tvldash::AppCommand::Purchases,
            Commands::Evolution {
                granularity,
                start_date,
                end_date,
                current_tvl,
            } => tvldash::AppCommand::Evolution(EvolutionQuery {
                granularity,
                start_date,
                end_date,
                current_tvl,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn parse_granularity(value: &str) -> Result<Granularity, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_date_arg(value: &str) -> Result<i64, String> {
    parse_date(value).map_err(|e| format!("{e:#}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let result = match cli.command {
        Some(Commands::Setup) => tvldash::cli::setup::setup(),
        Some(cmd) => tvldash::run_command(cmd.into(), cli.config_path.as_deref(), output).await,
        None => {
            tvldash::run_command(
                tvldash::AppCommand::default(),
                cli.config_path.as_deref(),
                output,
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
