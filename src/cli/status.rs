// src/cli/status.rs — Configuration, connectivity and portfolio overview

use std::path::Path;

use crate::cli::repository;
use crate::data::tables::{logical_names, table_for};
use crate::data::{DataMode, OrionClient, PortfolioRepository, Scope};
use crate::infra::config::Config;
use crate::infra::paths;
use crate::metrics::format::format_index;
use crate::settings::SettingsStore;

/// Display system status.
pub async fn show_status(
    config: &Config,
    config_path: &Path,
    tenant: &str,
    mode: DataMode,
    verbose: bool,
) -> anyhow::Result<()> {
    println!("orion v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:     {} (loaded)", config_path.display());
    } else {
        println!("  Config:     (using defaults)");
    }

    let db_path = paths::db_path();
    if db_path.exists() {
        let size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
        println!("  Settings:   {} ({})", db_path.display(), format_bytes(size));
    } else {
        println!("  Settings:   (not initialized, run `orion init`)");
    }

    match config.supabase.url.as_deref() {
        Some(url) if config.supabase.credentials().is_some() => {
            println!("  Supabase:   {url}")
        }
        Some(url) => println!("  Supabase:   {url} (anon key missing, serving mock data)"),
        None => println!("  Supabase:   (not configured, serving mock data)"),
    }

    if let Some(api) = config.remote.api_url.as_deref() {
        match OrionClient::new(api) {
            Ok(client) => match client.health().await {
                Ok(h) => println!(
                    "  Remote API: {api} (v{}, {} default)",
                    h.version, h.data_mode
                ),
                Err(e) => println!("  Remote API: {api} (unreachable: {e})"),
            },
            Err(e) => println!("  Remote API: {e}"),
        }
    }

    println!("  Tenant:     {tenant}");
    println!("  Data mode:  {mode}");

    if db_path.exists() {
        if let Ok(store) = SettingsStore::open(&db_path) {
            let connections = store.connections(tenant).unwrap_or_default();
            for c in &connections {
                println!(
                    "  {:<11} {} as {} ({:?})",
                    format!("{}:", c.system.label()),
                    c.host,
                    c.username,
                    c.status
                );
            }
            if let Ok(sync) = store.sync_settings(tenant) {
                let state = if sync.enabled { "enabled" } else { "disabled" };
                println!(
                    "  Sync:       {state}, every {} min",
                    sync.interval_minutes
                );
            }
        }
    }

    let repo = repository(config)?;
    let scope = Scope::new(tenant, mode);
    println!();
    match repo.portfolio_summary(&scope).await {
        Ok(s) => {
            println!("  Portfolio ({}):", repo.source());
            println!(
                "    {} projects: {} on track, {} at risk, {} critical",
                s.total_projects, s.on_track, s.at_risk, s.critical
            );
            println!(
                "    Status {}  SPI {}  CPI {}",
                s.portfolio_status.as_str(),
                format_index(s.average_spi),
                format_index(s.average_cpi)
            );
        }
        Err(e) => println!("  Portfolio:  unavailable ({e})"),
    }

    if verbose {
        println!();
        println!("  Tables ({mode}):");
        for name in logical_names() {
            if let Ok(table) = table_for(mode, name) {
                println!("    {name:<14} {table}");
            }
        }
        println!();
        println!("  Data dir:   {}", paths::data_dir().display());
        println!("  Config dir: {}", paths::config_dir().display());
        println!("  Exports:    {}", paths::exports_dir().display());
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
