// src/main.rs — ORION entry point

use std::path::PathBuf;

use clap::Parser;

use orion::cli::{Cli, Commands};
use orion::infra::config::Config;
use orion::metrics::EvmInputs;
use orion::infra::{logger, paths};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The server logs its requests; other commands only surface warnings
    // unless ORION_LOG / RUST_LOG say otherwise.
    let level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    logger::init_logging(level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(paths::config_file_path);

    // Init writes the config, so it must not require one to parse.
    if let Commands::Init = cli.command {
        return orion::cli::init::run_init(&config_path).await;
    }

    let config = if cli.config.is_some() {
        let mut config = Config::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config
    } else {
        Config::load()?
    };
    let mode = cli.mode.unwrap_or(config.data.default_mode);

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Serve { host, port } => {
            orion::cli::serve::run_serve(config, host, port, cli.mode).await
        }
        Commands::Status { verbose } => {
            orion::cli::status::show_status(&config, &config_path, &cli.tenant, mode, verbose)
                .await
        }
        Commands::Dashboard => orion::tui::run_dashboard(&config, &cli.tenant, mode).await,
        Commands::Gantt {
            project,
            scale,
            format,
            output,
        } => {
            orion::cli::gantt::run_gantt(
                &config,
                &cli.tenant,
                mode,
                &project,
                scale,
                &format,
                output.as_deref(),
            )
            .await
        }
        Commands::Evm {
            bac,
            pv,
            ev,
            ac,
            json,
        } => orion::cli::evm::run_evm(EvmInputs { bac, ev, ac, pv }, json),
    }
}
