// src/data/tables.rs — Logical table names → physical "schema.table"
//
// Mock mode reads the curated `client_demo` schema; live mode reads the
// synced source schemas. Connection settings live in `orion_xconf` for both.

use std::fmt;

use super::mode::DataMode;
use crate::infra::errors::OrionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub schema: &'static str,
    pub table: &'static str,
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// (logical name, mock table, live table)
const TABLES: &[(&str, TableRef, TableRef)] = &[
    (
        "projects",
        TableRef { schema: "client_demo", table: "projects" },
        TableRef { schema: "orion_core", table: "projects" },
    ),
    (
        "project_health",
        TableRef { schema: "client_demo", table: "project_health" },
        TableRef { schema: "orion_evm", table: "project_health" },
    ),
    (
        "evm_snapshots",
        TableRef { schema: "client_demo", table: "evm_snapshots" },
        TableRef { schema: "orion_evm", table: "evm_snapshots" },
    ),
    (
        "sync_status",
        TableRef { schema: "client_demo", table: "sync_status" },
        TableRef { schema: "orion_sync", table: "sync_status" },
    ),
    (
        "wbs",
        TableRef { schema: "client_demo", table: "wbs" },
        TableRef { schema: "p6_raw", table: "wbs" },
    ),
    (
        "activities",
        TableRef { schema: "client_demo", table: "activities" },
        TableRef { schema: "p6_raw", table: "activities" },
    ),
    (
        "relationships",
        TableRef { schema: "client_demo", table: "relationships" },
        TableRef { schema: "p6_raw", table: "relationships" },
    ),
    (
        "cost_actuals",
        TableRef { schema: "client_demo", table: "cost_actuals" },
        TableRef { schema: "sap_raw", table: "cost_actuals" },
    ),
    (
        "connections",
        TableRef { schema: "orion_xconf", table: "connections" },
        TableRef { schema: "orion_xconf", table: "connections" },
    ),
];

/// Physical table for a logical name in the given mode.
pub fn table_for(mode: DataMode, logical: &str) -> Result<TableRef, OrionError> {
    TABLES
        .iter()
        .find(|(name, _, _)| *name == logical)
        .map(|(_, mock, live)| match mode {
            DataMode::Mock => *mock,
            DataMode::Live => *live,
        })
        .ok_or_else(|| OrionError::UnknownTable(logical.to_string()))
}

/// Every logical name, for diagnostics.
pub fn logical_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _, _)| *name)
}
