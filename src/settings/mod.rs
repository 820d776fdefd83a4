// src/settings/mod.rs — Tenant settings: source-system connections, sync
// schedule and the selected project list, persisted in SQLite.

pub mod schema;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use crate::infra::errors::OrionError;

/// Shown in place of stored passwords.
pub const PASSWORD_MASK: &str = "********";
pub const MIN_SYNC_INTERVAL: u32 = 15;
pub const MAX_SYNC_INTERVAL: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSystem {
    P6,
    Sap,
}

impl SourceSystem {
    pub const ALL: [SourceSystem; 2] = [SourceSystem::P6, SourceSystem::Sap];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSystem::P6 => "p6",
            SourceSystem::Sap => "sap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceSystem::P6 => "Primavera P6",
            SourceSystem::Sap => "SAP",
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceSystem {
    type Err = OrionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p6" => Ok(SourceSystem::P6),
            "sap" => Ok(SourceSystem::Sap),
            _ => Err(OrionError::UnknownSystem(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Untested,
    Connected,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Untested => "untested",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed => "failed",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "connected" => ConnectionStatus::Connected,
            "failed" => ConnectionStatus::Failed,
            _ => ConnectionStatus::Untested,
        }
    }
}

/// Stored connection to a source system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub system: SourceSystem,
    pub host: String,
    pub username: String,
    pub password: Option<String>,
    /// P6 database instance.
    pub database: Option<String>,
    /// SAP client number (`sap-client`).
    pub client: Option<String>,
    pub status: ConnectionStatus,
    pub last_tested_at: Option<DateTime<Utc>>,
    pub last_message: Option<String>,
}

impl ConnectionConfig {
    /// Copy safe to hand back to callers.
    pub fn masked(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| PASSWORD_MASK.to_string()),
            ..self.clone()
        }
    }
}

/// Body of a connection update. A missing or masked password keeps the
/// stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInput {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
}

impl ConnectionInput {
    pub fn validate(&self) -> Result<(), OrionError> {
        if self.host.trim().is_empty() {
            return Err(OrionError::InvalidSetting("host is required".into()));
        }
        if self.username.trim().is_empty() {
            return Err(OrionError::InvalidSetting("username is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    pub enabled: bool,
    pub interval_minutes: u32,
    pub p6_enabled: bool,
    pub sap_enabled: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: 720,
            p6_enabled: true,
            sap_enabled: true,
        }
    }
}

impl SyncSettings {
    pub fn validate(&self) -> Result<(), OrionError> {
        if !(MIN_SYNC_INTERVAL..=MAX_SYNC_INTERVAL).contains(&self.interval_minutes) {
            return Err(OrionError::InvalidSetting(format!(
                "intervalMinutes must be between {MIN_SYNC_INTERVAL} and {MAX_SYNC_INTERVAL}"
            )));
        }
        Ok(())
    }
}

/// SQLite-backed settings, shared across request handlers.
pub struct SettingsStore {
    conn: Mutex<Connection>,
}

impl SettingsStore {
    pub fn open(path: &Path) -> Result<Self, OrionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, OrionError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, OrionError> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        schema::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -- Connections --

    pub fn connection(
        &self,
        tenant: &str,
        system: SourceSystem,
    ) -> Result<Option<ConnectionConfig>, OrionError> {
        let conn = self.conn();
        let found = conn
            .query_row(
                "SELECT host, username, password, database_name, sap_client, status,
                        last_tested_at, last_message
                 FROM connections WHERE tenant_id = ?1 AND system = ?2",
                params![tenant, system.as_str()],
                |r| {
                    Ok(ConnectionConfig {
                        system,
                        host: r.get(0)?,
                        username: r.get(1)?,
                        password: r.get(2)?,
                        database: r.get(3)?,
                        client: r.get(4)?,
                        status: ConnectionStatus::parse(&r.get::<_, String>(5)?),
                        last_tested_at: r
                            .get::<_, Option<String>>(6)?
                            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                            .map(|d| d.with_timezone(&Utc)),
                        last_message: r.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    pub fn connections(&self, tenant: &str) -> Result<Vec<ConnectionConfig>, OrionError> {
        let mut out = Vec::new();
        for system in SourceSystem::ALL {
            if let Some(c) = self.connection(tenant, system)? {
                out.push(c);
            }
        }
        Ok(out)
    }

    /// Insert or replace a connection. Changing it resets the test status.
    pub fn save_connection(
        &self,
        tenant: &str,
        system: SourceSystem,
        input: &ConnectionInput,
    ) -> Result<ConnectionConfig, OrionError> {
        input.validate()?;
        let previous = self.connection(tenant, system)?;
        let password = match input.password.as_deref() {
            None | Some(PASSWORD_MASK) => previous.and_then(|p| p.password),
            Some(p) => Some(p.to_string()),
        };

        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO connections
                (tenant_id, system, host, username, password, database_name, sap_client,
                 status, last_tested_at, last_message, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'untested', NULL, NULL, ?8)
             ON CONFLICT (tenant_id, system) DO UPDATE SET
                host = excluded.host,
                username = excluded.username,
                password = excluded.password,
                database_name = excluded.database_name,
                sap_client = excluded.sap_client,
                status = 'untested',
                last_tested_at = NULL,
                last_message = NULL,
                updated_at = excluded.updated_at",
            params![
                tenant,
                system.as_str(),
                input.host.trim(),
                input.username.trim(),
                password,
                input.database,
                input.client,
                now
            ],
        )?;

        self.connection(tenant, system)?
            .ok_or_else(|| OrionError::Config("connection vanished after save".into()))
    }

    /// Record a connection test. Returns false if nothing is stored for the
    /// tenant and system.
    pub fn record_test(
        &self,
        tenant: &str,
        system: SourceSystem,
        success: bool,
        message: &str,
    ) -> Result<bool, OrionError> {
        let status = if success {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Failed
        };
        let now = Utc::now().to_rfc3339();
        let changed = self.conn().execute(
            "UPDATE connections SET status = ?1, last_tested_at = ?2, last_message = ?3
             WHERE tenant_id = ?4 AND system = ?5",
            params![status.as_str(), now, message, tenant, system.as_str()],
        )?;
        Ok(changed > 0)
    }

    // -- Sync schedule --

    pub fn sync_settings(&self, tenant: &str) -> Result<SyncSettings, OrionError> {
        let found = self
            .conn()
            .query_row(
                "SELECT enabled, interval_minutes, p6_enabled, sap_enabled
                 FROM sync_settings WHERE tenant_id = ?1",
                params![tenant],
                |r| {
                    Ok(SyncSettings {
                        enabled: r.get(0)?,
                        interval_minutes: r.get(1)?,
                        p6_enabled: r.get(2)?,
                        sap_enabled: r.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(found.unwrap_or_default())
    }

    pub fn save_sync_settings(
        &self,
        tenant: &str,
        settings: &SyncSettings,
    ) -> Result<SyncSettings, OrionError> {
        settings.validate()?;
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO sync_settings
                (tenant_id, enabled, interval_minutes, p6_enabled, sap_enabled, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (tenant_id) DO UPDATE SET
                enabled = excluded.enabled,
                interval_minutes = excluded.interval_minutes,
                p6_enabled = excluded.p6_enabled,
                sap_enabled = excluded.sap_enabled,
                updated_at = excluded.updated_at",
            params![
                tenant,
                settings.enabled,
                settings.interval_minutes,
                settings.p6_enabled,
                settings.sap_enabled,
                now
            ],
        )?;
        Ok(*settings)
    }

    // -- Selected projects --

    pub fn selected_projects(&self, tenant: &str) -> Result<Vec<String>, OrionError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT project_id FROM selected_projects WHERE tenant_id = ?1 ORDER BY position",
        )?;
        let ids = stmt
            .query_map(params![tenant], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Replace the tenant's selection, keeping the given order and
    /// dropping blanks and duplicates.
    pub fn set_selected_projects(
        &self,
        tenant: &str,
        project_ids: &[String],
    ) -> Result<Vec<String>, OrionError> {
        let mut ids: Vec<String> = Vec::new();
        for id in project_ids.iter().map(|s| s.trim()) {
            if !id.is_empty() && !ids.iter().any(|x| x == id) {
                ids.push(id.to_string());
            }
        }

        let conn = self.conn();
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM selected_projects WHERE tenant_id = ?1",
            params![tenant],
        )?;
        for (position, id) in ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO selected_projects (tenant_id, project_id, position)
                 VALUES (?1, ?2, ?3)",
                params![tenant, id, position as i64],
            )?;
        }
        tx.commit()?;
        Ok(ids)
    }
}
