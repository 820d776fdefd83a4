// src/api/context.rs — Per-request tenant/mode resolution and response headers

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use chrono::{SecondsFormat, Utc};

use crate::api::types::{bad_request, ApiError, ApiQuery};
use crate::api::ApiState;
use crate::data::{resolve_mode, DataMode, DataSource, Scope};

pub const DATA_SOURCE: HeaderName = HeaderName::from_static("x-data-source");
pub const DATA_MODE: HeaderName = HeaderName::from_static("x-data-mode");
pub const TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");
pub const VERIFIED_AT: HeaderName = HeaderName::from_static("x-verified-at");

/// Trimmed `tenant` parameter, if non-empty.
pub fn tenant(query: &ApiQuery) -> Option<&str> {
    query
        .tenant
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Caller's data mode: header, then `dataMode`, then the server default.
pub fn mode(state: &ApiState, headers: &HeaderMap, query: &ApiQuery) -> DataMode {
    resolve_mode(headers, query.data_mode.as_deref(), state.data_mode.get())
}

/// Tenant is required on every data route.
pub fn scope(state: &ApiState, headers: &HeaderMap, query: &ApiQuery) -> Result<Scope, ApiError> {
    let tenant = tenant(query).ok_or_else(|| bad_request("Missing tenant parameter"))?;
    Ok(Scope::new(tenant, mode(state, headers, query)))
}

/// `limit` parameter: defaults from config, capped at the configured max.
pub fn limit(state: &ApiState, query: &ApiQuery) -> Result<usize, ApiError> {
    let data = &state.config.data;
    match query.limit.as_deref().map(str::trim) {
        None | Some("") => Ok(data.default_limit),
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) | Err(_) => Err(bad_request("Invalid limit parameter")),
            Ok(n) => Ok(n.min(data.max_limit)),
        },
    }
}

/// Diagnostic headers attached to every data response.
pub fn provenance(source: DataSource, scope: &Scope) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(DATA_SOURCE, HeaderValue::from_static(source.as_str()));
    headers.insert(DATA_MODE, HeaderValue::from_static(scope.mode.as_str()));
    if let Ok(tenant) = HeaderValue::from_str(&scope.tenant) {
        headers.insert(TENANT_ID, tenant);
    }
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(at) = HeaderValue::from_str(&now) {
        headers.insert(VERIFIED_AT, at);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state;
    use axum::http::StatusCode;

    fn query(tenant: Option<&str>, limit: Option<&str>) -> ApiQuery {
        ApiQuery {
            tenant: tenant.map(String::from),
            limit: limit.map(String::from),
            ..ApiQuery::default()
        }
    }

    #[test]
    fn test_blank_tenant_rejected() {
        let state = test_state();
        let err = scope(&state, &HeaderMap::new(), &query(Some("  "), None)).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1.error, "Missing tenant parameter");
    }

    #[test]
    fn test_scope_uses_switch_default() {
        let state = test_state();
        state.data_mode.set(DataMode::Live);
        let s = scope(&state, &HeaderMap::new(), &query(Some("t1"), None)).unwrap();
        assert_eq!(s, Scope::new("t1", DataMode::Live));
    }

    #[test]
    fn test_limit_parsing() {
        let state = test_state();
        assert_eq!(limit(&state, &query(None, None)).unwrap(), 50);
        assert_eq!(limit(&state, &query(None, Some("2"))).unwrap(), 2);
        assert_eq!(limit(&state, &query(None, Some("100000"))).unwrap(), 500);
        assert!(limit(&state, &query(None, Some("0"))).is_err());
        assert!(limit(&state, &query(None, Some("-3"))).is_err());
        assert!(limit(&state, &query(None, Some("ten"))).is_err());
    }

    #[test]
    fn test_provenance_headers() {
        let h = provenance(DataSource::Mock, &Scope::new("t1", DataMode::Mock));
        assert_eq!(h[DATA_SOURCE], "mock");
        assert_eq!(h[DATA_MODE], "mock");
        assert_eq!(h[TENANT_ID], "t1");
        assert!(h.contains_key(VERIFIED_AT));
    }
}
