// src/api/settings.rs — Tenant settings routes

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::context;
use crate::api::types::*;
use crate::api::ApiState;
use crate::infra::errors::OrionError;
use crate::settings::{ConnectionConfig, ConnectionInput, SourceSystem, SyncSettings};

fn require_tenant(query: &ApiQuery) -> Result<&str, ApiError> {
    context::tenant(query).ok_or_else(|| bad_request("Missing tenant parameter"))
}

fn parse_system(raw: &str) -> Result<SourceSystem, ApiError> {
    raw.parse().map_err(|e: OrionError| bad_request(e.to_string()))
}

fn store_error(what: &str, e: OrionError) -> ApiError {
    match e {
        OrionError::InvalidSetting(msg) => bad_request(msg),
        e @ OrionError::UnknownSystem(_) => bad_request(e.to_string()),
        other => internal(what, &other),
    }
}

/// GET /api/v1/settings/connections?tenant=
pub async fn list_connections(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<Vec<ConnectionConfig>>, ApiError> {
    let tenant = require_tenant(&query)?;
    let list = state
        .settings
        .connections(tenant)
        .map_err(|e| store_error("settings.connections", e))?;
    Ok(Json(list.iter().map(ConnectionConfig::masked).collect()))
}

/// GET /api/v1/settings/connections/{system}?tenant=
pub async fn get_connection(
    State(state): State<ApiState>,
    Path(system): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<ConnectionConfig>, ApiError> {
    let tenant = require_tenant(&query)?;
    let system = parse_system(&system)?;
    let found = state
        .settings
        .connection(tenant, system)
        .map_err(|e| store_error("settings.connection", e))?
        .ok_or_else(|| not_found(format!("No {} connection configured", system.label())))?;
    Ok(Json(found.masked()))
}

/// PUT /api/v1/settings/connections/{system}?tenant=
pub async fn put_connection(
    State(state): State<ApiState>,
    Path(system): Path<String>,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<ConnectionConfig>, ApiError> {
    let tenant = require_tenant(&query)?;
    let system = parse_system(&system)?;
    let body: ConnectionInput = parse_body(&body)?;
    let saved = state
        .settings
        .save_connection(tenant, system, &body)
        .map_err(|e| store_error("settings.connection", e))?;
    tracing::info!(tenant, system = %system, host = %saved.host, "Connection saved");
    Ok(Json(saved.masked()))
}

/// GET /api/v1/settings/sync?tenant=
pub async fn get_sync(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<SyncSettings>, ApiError> {
    let tenant = require_tenant(&query)?;
    state
        .settings
        .sync_settings(tenant)
        .map(Json)
        .map_err(|e| store_error("settings.sync", e))
}

/// PUT /api/v1/settings/sync?tenant=
pub async fn put_sync(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<SyncSettings>, ApiError> {
    let tenant = require_tenant(&query)?;
    let body: SyncSettings = parse_body(&body)?;
    state
        .settings
        .save_sync_settings(tenant, &body)
        .map(Json)
        .map_err(|e| store_error("settings.sync", e))
}

/// GET /api/v1/settings/projects?tenant=
pub async fn get_projects(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<SelectedProjects>, ApiError> {
    let tenant = require_tenant(&query)?;
    let project_ids = state
        .settings
        .selected_projects(tenant)
        .map_err(|e| store_error("settings.projects", e))?;
    Ok(Json(SelectedProjects { project_ids }))
}

/// PUT /api/v1/settings/projects?tenant=
pub async fn put_projects(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Result<Json<SelectedProjects>, ApiError> {
    let tenant = require_tenant(&query)?;
    let body: SelectedProjects = parse_body(&body)?;
    let project_ids = state
        .settings
        .set_selected_projects(tenant, &body.project_ids)
        .map_err(|e| store_error("settings.projects", e))?;
    Ok(Json(SelectedProjects { project_ids }))
}
