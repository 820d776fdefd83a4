// src/api/mod.rs — ORION HTTP API: portfolio data, onboarding and settings

pub mod context;
pub mod handlers;
pub mod onboarding;
pub mod settings;
pub mod types;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::data::{
    DataModeSwitch, DataSource, MockRepository, PortfolioRepository, SupabaseRepository,
};
use crate::infra::config::Config;
use crate::infra::errors::OrionError;
use crate::infra::paths;
use crate::settings::SettingsStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    /// Live repository; `None` when Supabase credentials are absent.
    pub backend: Option<Arc<dyn PortfolioRepository>>,
    pub mock: MockRepository,
    pub data_mode: DataModeSwitch,
    pub settings: Arc<SettingsStore>,
    /// Used for onboarding probes.
    pub http: reqwest::Client,
}

impl ApiState {
    pub fn new(
        config: Config,
        backend: Option<Arc<dyn PortfolioRepository>>,
        settings: SettingsStore,
    ) -> Self {
        let data_mode = DataModeSwitch::new(config.data.default_mode);
        Self {
            config: Arc::new(config),
            backend,
            mock: MockRepository::new(),
            data_mode,
            settings: Arc::new(settings),
            http: reqwest::Client::new(),
        }
    }

    /// Supabase from the config's credentials, settings from `$ORION_HOME`.
    pub fn from_config(config: Config) -> Result<Self, OrionError> {
        let backend = SupabaseRepository::from_credentials(config.supabase.credentials())?
            .map(|repo| Arc::new(repo) as Arc<dyn PortfolioRepository>);
        if backend.is_none() {
            tracing::warn!("Supabase credentials not set; every route will serve mock data");
        }
        let settings = SettingsStore::open(&paths::db_path())?;
        Ok(Self::new(config, backend, settings))
    }

    /// Run the live query if there is one, answering from fixtures when the
    /// backend is missing or unavailable. Other errors propagate.
    pub async fn fetch<T, L, M>(
        &self,
        what: &str,
        live: Option<L>,
        mock: M,
    ) -> Result<(T, DataSource), OrionError>
    where
        L: Future<Output = Result<T, OrionError>>,
        M: Future<Output = Result<T, OrionError>>,
    {
        let Some(live) = live else {
            tracing::debug!(route = what, "No backend configured, serving mock data");
            return Ok((mock.await?, DataSource::Mock));
        };
        let source = self
            .backend
            .as_ref()
            .map(|b| b.source())
            .unwrap_or(DataSource::Supabase);

        match live.await {
            Ok(value) => Ok((value, source)),
            Err(e) if e.is_fallback_eligible() => {
                tracing::warn!(route = what, error = %e, "Backend unavailable, serving mock data");
                Ok((mock.await?, DataSource::Mock))
            }
            Err(e) => Err(e),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .expose_headers([
            context::DATA_SOURCE,
            context::DATA_MODE,
            context::TENANT_ID,
            context::VERIFIED_AT,
            HeaderName::from_static("content-type"),
        ])
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route(
            "/api/v1/data-mode",
            get(handlers::get_data_mode).post(handlers::set_data_mode),
        )
        .route("/api/v1/portfolio/summary", get(handlers::portfolio_summary))
        .route("/api/v1/projects/health", get(handlers::projects_health))
        .route("/api/v1/sync/status", get(handlers::sync_status))
        .route("/api/v1/project/{id}", get(handlers::project))
        .route("/api/v1/project/{id}/performance", get(handlers::performance))
        .route("/api/v1/project/{id}/budget", get(handlers::budget))
        .route("/api/v1/project/{id}/wbs", get(handlers::wbs))
        .route("/api/v1/project/{id}/gantt", get(handlers::gantt))
        .route("/api/v1/onboarding/p6/test", post(onboarding::test_p6))
        .route("/api/v1/onboarding/sap/test", post(onboarding::test_sap))
        .route("/api/v1/onboarding/p6/projects", post(onboarding::p6_projects))
        .route("/api/v1/settings/connections", get(settings::list_connections))
        .route(
            "/api/v1/settings/connections/{system}",
            get(settings::get_connection).put(settings::put_connection),
        )
        .route(
            "/api/v1/settings/sync",
            get(settings::get_sync).put(settings::put_sync),
        )
        .route(
            "/api/v1/settings/projects",
            get(settings::get_projects).put(settings::put_projects),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start_server(host: &str, port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down API server");
            }
        })
        .await?;
    Ok(())
}

/// Mock-only state with an in-memory settings store.
#[cfg(test)]
pub(crate) fn test_state() -> ApiState {
    ApiState::new(
        Config::default(),
        None,
        SettingsStore::open_in_memory().expect("in-memory settings"),
    )
}
