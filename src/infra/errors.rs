// src/infra/errors.rs — Error types for ORION

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrionError {
    // Backend errors (degrade to mock payloads)
    #[error("Backend query on '{table}' failed with {status}: {message}")]
    Backend {
        table: String,
        status: u16,
        message: String,
    },

    #[error("Backend unreachable: {0}")]
    Http(#[from] reqwest::Error),

    // Data errors (not recoverable by falling back)
    #[error("Could not decode rows from '{table}': {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown logical table '{0}'")]
    UnknownTable(String),

    // User errors
    #[error("Invalid data mode '{0}' (expected 'mock' or 'live')")]
    InvalidDataMode(String),

    #[error("Invalid timeline scale '{0}' (expected day, week, month, quarter or year)")]
    InvalidScale(String),

    #[error("Unknown connection system '{0}' (expected 'p6' or 'sap')")]
    UnknownSystem(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrionError {
    /// Whether a request that hit this error should be answered from fixtures
    /// instead of failing.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(self, OrionError::Backend { .. } | OrionError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_fall_back() {
        let err = OrionError::Backend {
            table: "orion_core.projects".into(),
            status: 503,
            message: "upstream down".into(),
        };
        assert!(err.is_fallback_eligible());
    }

    #[test]
    fn test_decode_errors_do_not_fall_back() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = OrionError::Decode {
            table: "p6_raw.wbs".into(),
            source,
        };
        assert!(!err.is_fallback_eligible());
        assert!(!OrionError::UnknownTable("ghosts".into()).is_fallback_eligible());
    }

    #[test]
    fn test_messages_name_the_table() {
        let err = OrionError::Backend {
            table: "sap_raw.cost_actuals".into(),
            status: 401,
            message: "JWT expired".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sap_raw.cost_actuals"));
        assert!(msg.contains("401"));
    }
}
