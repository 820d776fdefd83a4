// src/cli/mod.rs — CLI definition (clap derive)

pub mod evm;
pub mod gantt;
pub mod init;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::data::{
    DataMode, MockRepository, OrionClient, PortfolioRepository, SupabaseRepository,
};
use crate::gantt::TimelineScale;
use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "orion", about = "EPC project portfolio dashboard and API", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Data mode for this invocation (mock or live)
    #[arg(long, global = true)]
    pub mode: Option<DataMode>,

    /// Tenant to read data for
    #[arg(long, global = true, env = "ORION_TENANT", default_value = "demo")]
    pub tenant: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind address (overrides [server].host)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Interactive first-time setup
    Init,
    /// Show configuration, connectivity and a portfolio summary
    Status {
        /// Also list the physical table behind every logical name
        #[arg(long)]
        verbose: bool,
    },
    /// Launch the terminal dashboard
    Dashboard,
    /// Export a project's Gantt chart
    Gantt {
        /// Project id
        project: String,
        /// Timeline scale (day, week, month, quarter, year)
        #[arg(short, long)]
        scale: Option<TimelineScale>,
        /// Output format (svg, json)
        #[arg(short, long, default_value = "svg")]
        format: String,
        /// Output file (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute EVM indices and forecasts from raw figures
    Evm {
        /// Budget at completion
        #[arg(long)]
        bac: f64,
        /// Planned value
        #[arg(long)]
        pv: f64,
        /// Earned value
        #[arg(long)]
        ev: f64,
        /// Actual cost
        #[arg(long)]
        ac: f64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Where CLI commands read from: a remote ORION server if configured, then
/// Supabase, then the demo fixtures.
pub fn repository(config: &Config) -> anyhow::Result<Arc<dyn PortfolioRepository>> {
    if let Some(api) = config.remote.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(Arc::new(OrionClient::new(api)?));
    }
    if let Some(repo) = SupabaseRepository::from_credentials(config.supabase.credentials())? {
        return Ok(Arc::new(repo));
    }
    Ok(Arc::new(MockRepository::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "orion", "gantt", "PRJ-001", "--scale", "week", "--mode", "live",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(DataMode::Live));
        match cli.command {
            Commands::Gantt { project, scale, .. } => {
                assert_eq!(project, "PRJ-001");
                assert_eq!(scale, Some(TimelineScale::Week));
            }
            _ => panic!("expected gantt"),
        }
    }

    #[test]
    fn test_repository_defaults_to_mock() {
        let repo = repository(&Config::default()).unwrap();
        assert_eq!(repo.source(), DataSource::Mock);
    }

    #[test]
    fn test_repository_prefers_remote() {
        let mut config = Config::default();
        config.remote.api_url = Some("http://localhost:8710".into());
        config.supabase.url = Some("https://x.supabase.co".into());
        config.supabase.anon_key = Some("key".into());
        assert_eq!(repository(&config).unwrap().source(), DataSource::Remote);
    }
}
