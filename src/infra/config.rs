// src/infra/config.rs — Configuration loading (TOML + environment)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::mode::DataMode;
use crate::gantt::scale::TimelineScale;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub supabase: SupabaseConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub gantt: GanttConfig,

    /// Remote ORION API used by `status` and `dashboard` instead of
    /// querying Supabase directly.
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8710,
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl SupabaseConfig {
    /// Both URL and key, if both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let key = self
            .anon_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((url, key))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub default_mode: DataMode,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_mode: DataMode::Mock,
            default_limit: 50,
            max_limit: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GanttConfig {
    pub default_scale: TimelineScale,
    pub padding_days: i64,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            default_scale: TimelineScale::Month,
            padding_days: 14,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub api_url: Option<String>,
}

impl Config {
    /// Load config from file, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay environment variables. The `NEXT_PUBLIC_` spellings are
    /// accepted so an existing web deployment's `.env` works unchanged.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        };

        if let Some(url) = first(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = first(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]) {
            self.supabase.anon_key = Some(key);
        }
        if let Some(api) = first(&["ORION_API_URL"]) {
            self.remote.api_url = Some(api);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.server.port, 8710);
        assert_eq!(c.data.default_mode, DataMode::Mock);
        assert_eq!(c.data.default_limit, 50);
        assert_eq!(c.gantt.default_scale, TimelineScale::Month);
        assert_eq!(c.gantt.padding_days, 14);
        assert!(c.supabase.credentials().is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.remote.api_url.is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[server]
host = "0.0.0.0"
port = 9000
cors_origins = ["https://orion.example.com"]

[supabase]
url = "https://abc.supabase.co"
anon_key = "eyJhbGciOi"

[data]
default_mode = "live"
default_limit = 20
max_limit = 100

[gantt]
default_scale = "week"
padding_days = 7
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.data.default_mode, DataMode::Live);
        assert_eq!(config.data.max_limit, 100);
        assert_eq!(config.gantt.default_scale, TimelineScale::Week);
        assert_eq!(
            config.supabase.credentials(),
            Some(("https://abc.supabase.co", "eyJhbGciOi"))
        );
    }

    #[test]
    fn test_blank_credentials_are_unconfigured() {
        let s = SupabaseConfig {
            url: Some("https://abc.supabase.co".into()),
            anon_key: Some("   ".into()),
        };
        assert!(s.credentials().is_none());
    }

    #[test]
    fn test_env_overrides_prefer_plain_names() {
        let env: HashMap<&str, &str> = [
            ("SUPABASE_URL", "https://plain.supabase.co"),
            ("NEXT_PUBLIC_SUPABASE_URL", "https://public.supabase.co"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon"),
            ("ORION_API_URL", "http://orion.internal:8710"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.supabase.url.as_deref(),
            Some("https://plain.supabase.co")
        );
        assert_eq!(config.supabase.anon_key.as_deref(), Some("anon"));
        assert_eq!(
            config.remote.api_url.as_deref(),
            Some("http://orion.internal:8710")
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.data.default_mode = DataMode::Live;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.default_mode, DataMode::Live);
        assert_eq!(loaded.server.port, config.server.port);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
