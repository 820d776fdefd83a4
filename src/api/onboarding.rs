// src/api/onboarding.rs — Connection tests and P6 project discovery
//
// In mock mode nothing leaves the process: tests report success and the
// project list comes from fixtures.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::context;
use crate::api::types::*;
use crate::api::ApiState;
use crate::data::{mock, DataMode};
use crate::infra::errors::OrionError;
use crate::model::P6Project;
use crate::onboarding::{self, ConnectionTestResult};
use crate::settings::{ConnectionInput, SourceSystem};

const MISSING_FIELDS: &str = "Missing required fields: host and username";

fn parse_input(body: &Bytes) -> Result<ConnectionInput, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConnectionInput::default());
    }
    parse_body(body)
}

fn has_required(input: &ConnectionInput) -> bool {
    !input.host.trim().is_empty() && !input.username.trim().is_empty()
}

async fn run_test(
    state: ApiState,
    headers: HeaderMap,
    query: ApiQuery,
    system: SourceSystem,
    body: Bytes,
) -> Result<Json<ConnectionTestResult>, ApiError> {
    let input = parse_input(&body)?;
    if !has_required(&input) {
        return Err(bad_request(MISSING_FIELDS));
    }

    let result = match context::mode(&state, &headers, &query) {
        DataMode::Mock => ConnectionTestResult::simulated(system),
        DataMode::Live => onboarding::test_connection(&state.http, system, &input)
            .await
            .map_err(|e| match e {
                OrionError::InvalidSetting(msg) => bad_request(msg),
                other => internal("onboarding.test", &other),
            })?,
    };

    if let Some(tenant) = context::tenant(&query) {
        match state
            .settings
            .record_test(tenant, system, result.success, &result.message)
        {
            Ok(true) => {}
            Ok(false) => tracing::debug!(tenant, system = %system, "No stored connection to update"),
            Err(e) => tracing::warn!(tenant, system = %system, error = %e, "Could not record connection test"),
        }
    }
    Ok(Json(result))
}

/// POST /api/v1/onboarding/p6/test
pub async fn test_p6(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<ConnectionTestResult>, ApiError> {
    run_test(state, headers, query, SourceSystem::P6, body).await
}

/// POST /api/v1/onboarding/sap/test
pub async fn test_sap(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<ConnectionTestResult>, ApiError> {
    run_test(state, headers, query, SourceSystem::Sap, body).await
}

/// POST /api/v1/onboarding/p6/projects — Projects visible to the P6 user.
/// Live mode uses the body's credentials, or the tenant's stored P6
/// connection when the body has none.
pub async fn p6_projects(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<Vec<P6Project>>, ApiError> {
    let input = parse_input(&body)?;
    if context::mode(&state, &headers, &query) == DataMode::Mock {
        return Ok(Json(mock::p6_projects()));
    }

    let input = if has_required(&input) {
        input
    } else {
        let stored = match context::tenant(&query) {
            Some(tenant) => state
                .settings
                .connection(tenant, SourceSystem::P6)
                .map_err(|e| internal("onboarding.p6_projects", &e))?,
            None => None,
        };
        stored
            .map(|c| ConnectionInput {
                host: c.host,
                username: c.username,
                password: c.password,
                database: c.database,
                client: c.client,
            })
            .ok_or_else(|| bad_request(MISSING_FIELDS))?
    };

    match onboarding::p6::list_projects(&state.http, &input).await {
        Ok(projects) => Ok(Json(projects)),
        Err(OrionError::InvalidSetting(msg)) => Err(bad_request(msg)),
        Err(e) if e.is_fallback_eligible() => {
            tracing::warn!(host = %input.host, error = %e, "P6 project listing failed");
            Err(error(StatusCode::BAD_GATEWAY, "P6 request failed"))
        }
        Err(e) => Err(internal("onboarding.p6_projects", &e)),
    }
}
