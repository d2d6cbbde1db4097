pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::history::{EvolutionQuery, Granularity};
use crate::providers::{backend::BackendClient, rpc};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    Dashboard { granularity: Granularity },
    Tvl,
    Balances,
    Purchases,
    Evolution(EvolutionQuery),
}

impl Default for AppCommand {
    fn default() -> Self {
        AppCommand::Dashboard {
            granularity: Granularity::default(),
        }
    }
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    run_command_with_env(command, config_path, output, |key| std::env::var(key).ok()).await
}

/// Like [`run_command`], with endpoint overrides looked up through `env`
/// instead of the process environment.
pub async fn run_command_with_env(
    command: AppCommand,
    config_path: Option<&str>,
    output: OutputFormat,
    env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    info!("tvldash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    let endpoints = config.endpoints_with(env);

    match command {
        AppCommand::Dashboard { granularity } => {
            let gateway = rpc::connect(&endpoints.rpc_url)?;
            let history = BackendClient::new(&endpoints.backend_url)?;
            cli::dashboard::run(&gateway, &history, granularity, output).await
        }
        AppCommand::Tvl => {
            let gateway = rpc::connect(&endpoints.rpc_url)?;
            cli::tvl::run(&gateway, output).await
        }
        AppCommand::Balances => {
            let gateway = rpc::connect(&endpoints.rpc_url)?;
            cli::balances::run(&gateway, output).await
        }
        AppCommand::Purchases => {
            let history = BackendClient::new(&endpoints.backend_url)?;
            cli::purchases::run(&history, output).await
        }
        AppCommand::Evolution(query) => {
            let history = BackendClient::new(&endpoints.backend_url)?;
            cli::evolution::run(&history, &query, output).await
        }
    }
}
