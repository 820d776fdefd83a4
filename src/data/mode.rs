// src/data/mode.rs — Mock/live data mode and its process-wide switch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use axum::http::HeaderMap;

use crate::infra::errors::OrionError;

/// Request header carrying the caller's data mode.
pub const DATA_MODE_HEADER: &str = "x-data-mode";
/// Query parameter carrying the caller's data mode.
pub const DATA_MODE_PARAM: &str = "dataMode";

/// Which schema family a request reads: curated demo data or the tenant's
/// synced production tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    #[default]
    Mock,
    Live,
}

impl DataMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataMode::Mock => "mock",
            DataMode::Live => "live",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = OrionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(DataMode::Mock),
            "live" => Ok(DataMode::Live),
            _ => Err(OrionError::InvalidDataMode(s.to_string())),
        }
    }
}

/// Header first, then query parameter, then `fallback`. Values other than
/// `mock`/`live` are ignored rather than rejected.
pub fn resolve_mode(headers: &HeaderMap, query: Option<&str>, fallback: DataMode) -> DataMode {
    let from_header = headers
        .get(DATA_MODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    from_header
        .or_else(|| query.and_then(|q| q.parse().ok()))
        .unwrap_or(fallback)
}

/// The server-wide default mode, shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct DataModeSwitch {
    inner: Arc<RwLock<DataMode>>,
}

impl DataModeSwitch {
    pub fn new(initial: DataMode) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> DataMode {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, mode: DataMode) {
        match self.inner.write() {
            Ok(mut guard) => *guard = mode,
            Err(poisoned) => *poisoned.into_inner() = mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(mode: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(DATA_MODE_HEADER, HeaderValue::from_str(mode).unwrap());
        h
    }

    #[test]
    fn test_defaults_to_mock() {
        assert_eq!(
            resolve_mode(&HeaderMap::new(), None, DataMode::default()),
            DataMode::Mock
        );
    }

    #[test]
    fn test_header_beats_query() {
        assert_eq!(
            resolve_mode(&headers("live"), Some("mock"), DataMode::Mock),
            DataMode::Live
        );
    }

    #[test]
    fn test_query_used_without_header() {
        assert_eq!(
            resolve_mode(&HeaderMap::new(), Some("LIVE"), DataMode::Mock),
            DataMode::Live
        );
    }

    #[test]
    fn test_garbage_falls_through() {
        assert_eq!(
            resolve_mode(&headers("staging"), Some("live"), DataMode::Mock),
            DataMode::Live
        );
        assert_eq!(
            resolve_mode(&headers("staging"), Some("nope"), DataMode::Live),
            DataMode::Live
        );
    }

    #[test]
    fn test_switch_get_set_shared_between_clones() {
        let switch = DataModeSwitch::new(DataMode::Mock);
        let other = switch.clone();
        other.set(DataMode::Live);
        assert_eq!(switch.get(), DataMode::Live);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("demo".parse::<DataMode>().is_err());
        assert_eq!(" Mock ".parse::<DataMode>().unwrap(), DataMode::Mock);
    }
}
