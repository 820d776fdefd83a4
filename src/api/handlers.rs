// src/api/handlers.rs — Portfolio and project data routes

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::context::{self, provenance};
use crate::api::types::*;
use crate::api::ApiState;
use crate::data::{DataMode, PortfolioRepository};
use crate::gantt::{GanttChart, TimelineScale};
use crate::infra::errors::OrionError;
use crate::model::{
    PortfolioSummary, Project, ProjectBudget, ProjectDetail, ProjectPerformance, SyncStatus,
};
use crate::wbs::WbsTree;

type Sourced<T> = Result<(HeaderMap, Json<T>), ApiError>;

const PROJECT_NOT_FOUND: &str = "Project not found";

/// GET /api/v1/health — Liveness plus what the server is answering from.
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supabase_configured: state.backend.is_some(),
        data_mode: state.data_mode.get(),
    })
}

/// GET /api/v1/data-mode
pub async fn get_data_mode(State(state): State<ApiState>) -> Json<DataModeResponse> {
    Json(DataModeResponse {
        mode: state.data_mode.get(),
    })
}

/// POST /api/v1/data-mode — Change the default for requests that do not
/// name a mode.
pub async fn set_data_mode(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<DataModeResponse>, ApiError> {
    let body: DataModeBody = parse_body(&body)?;
    let mode: DataMode = body
        .mode
        .parse()
        .map_err(|e: OrionError| bad_request(e.to_string()))?;
    state.data_mode.set(mode);
    tracing::info!(mode = %mode, "Default data mode changed");
    Ok(Json(DataModeResponse { mode }))
}

/// GET /api/v1/portfolio/summary?tenant=
pub async fn portfolio_summary(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
) -> Sourced<PortfolioSummary> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.portfolio_summary(&scope));
    let (summary, source) = state
        .fetch("portfolio.summary", live, state.mock.portfolio_summary(&scope))
        .await
        .map_err(|e| internal("portfolio.summary", &e))?;
    Ok((provenance(source, &scope), Json(summary)))
}

/// GET /api/v1/projects/health?tenant=&limit=
pub async fn projects_health(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
) -> Sourced<Vec<Project>> {
    let scope = context::scope(&state, &headers, &query)?;
    let limit = Some(context::limit(&state, &query)?);
    let live = state.backend.as_ref().map(|b| b.project_health(&scope, limit));
    let (projects, source) = state
        .fetch("projects.health", live, state.mock.project_health(&scope, limit))
        .await
        .map_err(|e| internal("projects.health", &e))?;
    Ok((provenance(source, &scope), Json(projects)))
}

/// GET /api/v1/sync/status?tenant=
pub async fn sync_status(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ApiQuery>,
) -> Sourced<SyncStatus> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.sync_status(&scope));
    let (status, source) = state
        .fetch("sync.status", live, state.mock.sync_status(&scope))
        .await
        .map_err(|e| internal("sync.status", &e))?;
    Ok((provenance(source, &scope), Json(status)))
}

/// GET /api/v1/project/{id}?tenant=
pub async fn project(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Sourced<ProjectDetail> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.project(&scope, &id));
    let (detail, source) = state
        .fetch("project.detail", live, state.mock.project(&scope, &id))
        .await
        .map_err(|e| internal("project.detail", &e))?;
    let detail = detail.ok_or_else(|| not_found(PROJECT_NOT_FOUND))?;
    Ok((provenance(source, &scope), Json(detail)))
}

/// GET /api/v1/project/{id}/performance?tenant=
pub async fn performance(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Sourced<ProjectPerformance> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.performance(&scope, &id));
    let (perf, source) = state
        .fetch("project.performance", live, state.mock.performance(&scope, &id))
        .await
        .map_err(|e| internal("project.performance", &e))?;
    let perf = perf.ok_or_else(|| not_found(PROJECT_NOT_FOUND))?;
    Ok((provenance(source, &scope), Json(perf)))
}

/// GET /api/v1/project/{id}/budget?tenant=
pub async fn budget(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Sourced<ProjectBudget> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.budget(&scope, &id));
    let (budget, source) = state
        .fetch("project.budget", live, state.mock.budget(&scope, &id))
        .await
        .map_err(|e| internal("project.budget", &e))?;
    let budget = budget.ok_or_else(|| not_found(PROJECT_NOT_FOUND))?;
    Ok((provenance(source, &scope), Json(budget)))
}

/// GET /api/v1/project/{id}/wbs?tenant= — Assembled tree with cost rollup.
pub async fn wbs(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Sourced<WbsTree> {
    let scope = context::scope(&state, &headers, &query)?;
    let live = state.backend.as_ref().map(|b| b.wbs(&scope, &id));
    let (records, source) = state
        .fetch("project.wbs", live, state.mock.wbs(&scope, &id))
        .await
        .map_err(|e| internal("project.wbs", &e))?;
    Ok((provenance(source, &scope), Json(WbsTree::build(id, &records))))
}

/// GET /api/v1/project/{id}/gantt?tenant=&scale=&format=json|svg
pub async fn gantt(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Result<Response, ApiError> {
    let scope = context::scope(&state, &headers, &query)?;
    let scale = match query.scale.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<TimelineScale>()
            .map_err(|e| bad_request(e.to_string()))?,
        None => state.config.gantt.default_scale,
    };
    let svg = match query.format.as_deref().map(str::trim) {
        None | Some("") | Some("json") => false,
        Some("svg") => true,
        Some(_) => return Err(bad_request("Invalid format parameter")),
    };

    let live = state.backend.as_ref().map(|b| b.activities(&scope, &id));
    let (activities, source) = state
        .fetch("project.gantt", live, state.mock.activities(&scope, &id))
        .await
        .map_err(|e| internal("project.gantt", &e))?;
    let chart = GanttChart::build(id, activities, scale, state.config.gantt.padding_days);

    let headers = provenance(source, &scope);
    if svg {
        Ok((
            headers,
            [(header::CONTENT_TYPE, "image/svg+xml")],
            chart.to_svg(),
        )
            .into_response())
    } else {
        Ok((headers, Json(chart)).into_response())
    }
}
