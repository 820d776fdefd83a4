// src/settings/schema.rs — Settings database schema + migrations

use rusqlite::{params, Connection};
use tracing::info;

pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub up: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "connections",
        up: "CREATE TABLE connections (
                tenant_id      TEXT NOT NULL,
                system         TEXT NOT NULL CHECK (system IN ('p6', 'sap')),
                host           TEXT NOT NULL,
                username       TEXT NOT NULL,
                password       TEXT,
                database_name  TEXT,
                sap_client     TEXT,
                status         TEXT NOT NULL DEFAULT 'untested',
                last_tested_at TEXT,
                last_message   TEXT,
                updated_at     TEXT NOT NULL,
                PRIMARY KEY (tenant_id, system)
            );",
    },
    Migration {
        version: 2,
        name: "sync_settings",
        up: "CREATE TABLE sync_settings (
                tenant_id        TEXT PRIMARY KEY,
                enabled          INTEGER NOT NULL DEFAULT 1,
                interval_minutes INTEGER NOT NULL DEFAULT 720,
                p6_enabled       INTEGER NOT NULL DEFAULT 1,
                sap_enabled      INTEGER NOT NULL DEFAULT 1,
                updated_at       TEXT NOT NULL
            );",
    },
    Migration {
        version: 3,
        name: "selected_projects",
        up: "CREATE TABLE selected_projects (
                tenant_id  TEXT NOT NULL,
                project_id TEXT NOT NULL,
                position   INTEGER NOT NULL,
                PRIMARY KEY (tenant_id, project_id)
            );
            CREATE INDEX idx_selected_projects_tenant
                ON selected_projects (tenant_id, position);",
    },
];

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        info!(
            "Applying settings migration {}: {}",
            migration.version, migration.name
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.up)?;
        tx.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let applied: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(applied as usize, MIGRATIONS.len());
    }

    #[test]
    fn test_versions_ascending() {
        assert!(MIGRATIONS.windows(2).all(|w| w[0].version < w[1].version));
    }
}
