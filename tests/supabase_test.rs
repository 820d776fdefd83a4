// tests/supabase_test.rs — Integration test: PostgREST queries and mock fallback

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orion::api::{build_router, ApiState};
use orion::data::{
    DataMode, DataSource, PortfolioRepository, Scope, SupabaseClient, SupabaseRepository,
};
use orion::infra::config::Config;
use orion::infra::errors::OrionError;
use orion::metrics::HealthStatus;
use orion::settings::SettingsStore;

fn repo(server: &MockServer) -> SupabaseRepository {
    SupabaseRepository::new(SupabaseClient::new(&server.uri(), "anon-key").unwrap())
}

#[tokio::test]
async fn test_project_health_query_and_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/project_health"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("accept-profile", "orion_evm"))
        .and(query_param("tenant_id", "eq.acme"))
        .and(query_param("order", "project_id.asc"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "project_id": "P-100",
                "project_name": "Refinery Expansion",
                "percent_complete": 41.5,
                "spi": 0.97,
                "cpi": 0.96,
                "planned_finish": "2027-06-30",
                "data_date": "2026-09-30"
            },
            {
                "project_id": "P-200",
                "project_name": "Tank Farm",
                "spi": 0.80
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let projects = repo(&server)
        .project_health(&Scope::new("acme", DataMode::Live), Some(2))
        .await
        .unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Refinery Expansion");
    assert_eq!(projects[0].status, HealthStatus::OnTrack);
    // Missing CPI counts as nominal; SPI alone makes it critical.
    assert_eq!(projects[1].cpi, 1.0);
    assert_eq!(projects[1].status, HealthStatus::Critical);
}

#[tokio::test]
async fn test_mock_mode_reads_demo_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/sync_status"))
        .and(header("accept-profile", "client_demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "system": "p6",
                "connected": true,
                "last_sync": "2026-09-30T02:00:00Z",
                "status": "success",
                "next_scheduled": "2026-09-30T14:00:00Z"
            },
            {
                "system": "sap",
                "connected": true,
                "status": "failed",
                "next_scheduled": "2026-09-30T08:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = repo(&server)
        .sync_status(&Scope::new("acme", DataMode::Mock))
        .await
        .unwrap();
    assert!(sync.p6.connected);
    assert!(sync.p6.last_sync.is_some());
    assert_eq!(
        sync.next_scheduled.unwrap().to_rfc3339(),
        "2026-09-30T08:00:00+00:00"
    );
}

#[tokio::test]
async fn test_unknown_project_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .and(query_param("id", "eq.GHOST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let found = repo(&server)
        .project(&Scope::new("acme", DataMode::Live), "GHOST")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_postgrest_error_is_fallback_eligible() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "upstream down" })),
        )
        .mount(&server)
        .await;

    let err = repo(&server)
        .sync_status(&Scope::new("acme", DataMode::Live))
        .await
        .unwrap_err();
    match &err {
        OrionError::Backend { status, message, .. } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert!(err.is_fallback_eligible());
}

#[tokio::test]
async fn test_malformed_rows_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "unexpected": 1 }])))
        .mount(&server)
        .await;

    let err = repo(&server)
        .project_health(&Scope::new("acme", DataMode::Live), None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrionError::Decode { .. }));
    assert!(!err.is_fallback_eligible());
}

fn router_with(server: &MockServer) -> axum::Router {
    let backend: Arc<dyn PortfolioRepository> = Arc::new(repo(server));
    let state = ApiState::new(
        Config::default(),
        Some(backend),
        SettingsStore::open_in_memory().unwrap(),
    );
    build_router(state)
}

#[tokio::test]
async fn test_route_serves_live_rows_with_supabase_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/project_health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "project_id": "P-100", "project_name": "Refinery Expansion", "spi": 1.0, "cpi": 1.0 }
        ])))
        .mount(&server)
        .await;

    let req = Request::builder()
        .uri("/api/v1/projects/health?tenant=acme")
        .header("x-data-mode", "live")
        .body(Body::empty())
        .unwrap();
    let resp = router_with(&server).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-data-source"], DataSource::Supabase.as_str());
    assert_eq!(resp.headers()["x-data-mode"], "live");

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let projects: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(projects[0]["id"], "P-100");
}

#[tokio::test]
async fn test_route_falls_back_to_mock_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let req = Request::builder()
        .uri("/api/v1/projects/health?tenant=acme&limit=2")
        .body(Body::empty())
        .unwrap();
    let resp = router_with(&server).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-data-source"], "mock");

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let projects: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(projects.as_array().unwrap().len(), 2);
    assert_eq!(projects[0]["id"], "PRJ-001");
}

#[tokio::test]
async fn test_route_returns_500_on_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let req = Request::builder()
        .uri("/api/v1/sync/status?tenant=acme")
        .body(Body::empty())
        .unwrap();
    let resp = router_with(&server).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Internal server error");
}
