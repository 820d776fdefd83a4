// src/cli/init.rs — First-time setup wizard
//
// Asks for Supabase credentials and defaults, writes config.toml and
// creates the settings database.

use anyhow::anyhow;
use inquire::{Select, Text};
use std::fmt;
use std::path::Path;

use crate::data::DataMode;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::settings::SettingsStore;

struct ModeOption {
    mode: DataMode,
    hint: &'static str,
}

impl fmt::Display for ModeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {}", self.mode, self.hint)
    }
}

/// Run the first-time setup wizard.
pub async fn run_init(config_path: &Path) -> anyhow::Result<()> {
    println!("orion setup");
    println!();

    eprint!("  Creating directories... ");
    paths::ensure_dirs().await?;
    eprintln!("done");

    let mut config = if config_path.exists() {
        println!("  Config: {} (updating)", config_path.display());
        Config::load_from(config_path)?
    } else {
        Config::default()
    };
    println!();

    let url = Text::new("Supabase URL (leave empty for demo data only):")
        .with_default(config.supabase.url.as_deref().unwrap_or(""))
        .prompt()
        .map_err(|e| anyhow!("Input cancelled: {e}"))?;
    config.supabase.url = non_empty(url);

    if config.supabase.url.is_some() {
        let key = inquire::Password::new("Supabase anon key:")
            .without_confirmation()
            .prompt()
            .map_err(|e| anyhow!("Input cancelled: {e}"))?;
        if let Some(key) = non_empty(key) {
            config.supabase.anon_key = Some(key);
        }
    }

    let options = vec![
        ModeOption {
            mode: DataMode::Mock,
            hint: "curated demo portfolio (client_demo schema)",
        },
        ModeOption {
            mode: DataMode::Live,
            hint: "synced P6/SAP tables",
        },
    ];
    let start = usize::from(config.data.default_mode == DataMode::Live);
    let picked = Select::new("Default data mode:", options)
        .with_starting_cursor(start)
        .prompt()
        .map_err(|e| anyhow!("Input cancelled: {e}"))?;
    config.data.default_mode = picked.mode;

    let port = Text::new("API port:")
        .with_default(&config.server.port.to_string())
        .prompt()
        .map_err(|e| anyhow!("Input cancelled: {e}"))?;
    config.server.port = port
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid port '{port}'"))?;

    config.save_to(config_path)?;
    println!();
    println!("  Config:   {} (saved)", config_path.display());

    let db_path = paths::db_path();
    eprint!("  Initializing settings database... ");
    SettingsStore::open(&db_path)?;
    eprintln!("done");

    println!();
    println!("Setup complete!");
    println!();
    println!("Tips:");
    println!("  orion serve                        Run the API server");
    println!("  orion dashboard                    Open the terminal dashboard");
    println!("  orion status                       Show configuration and portfolio");
    println!("  orion gantt PRJ-001 --scale week   Export a Gantt chart");

    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" https://x.co ".into()).as_deref(), Some("https://x.co"));
    }
}
