// src/infra/paths.rs — Filesystem layout
//
// All paths respect the ORION_HOME environment variable for isolation.
// When ORION_HOME is set, config and data live under that directory.
// When unset, config uses ~/.orion/ and data uses XDG_DATA_HOME/orion.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the ORION_HOME override, if set.
fn orion_home() -> Option<PathBuf> {
    std::env::var_os("ORION_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when none can be determined
/// (containers running as a user without a passwd entry).
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $ORION_HOME/ or ~/.orion/
pub fn config_dir() -> PathBuf {
    if let Some(home) = orion_home() {
        return home;
    }
    dirs_home().join(".orion")
}

/// Data directory: $ORION_HOME/data/ or ~/.local/share/orion/
pub fn data_dir() -> PathBuf {
    if let Some(home) = orion_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "orion")
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Settings database path
pub fn db_path() -> PathBuf {
    data_dir().join("orion.db")
}

/// Default directory for exported charts
pub fn exports_dir() -> PathBuf {
    data_dir().join("exports")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure all required directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    for dir in [config_dir(), data_dir(), exports_dir()] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert!(db_path().ends_with("orion.db"));
        assert!(config_file_path().ends_with("config.toml"));
        assert!(exports_dir().starts_with(data_dir()));
    }
}
