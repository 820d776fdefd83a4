// src/data/remote.rs — Repository backed by a running ORION API server

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::mode::DATA_MODE_HEADER;
use super::repository::{DataSource, PortfolioRepository, Scope};
use crate::api::types::HealthResponse;
use crate::gantt::GanttChart;
use crate::infra::errors::OrionError;
use crate::model::{
    GanttActivity, PortfolioSummary, Project, ProjectBudget, ProjectDetail, ProjectPerformance,
    SyncStatus, WbsRecord,
};
use crate::wbs::{self, WbsTree};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for `/api/v1`. Used by the dashboard and `orion status`
/// when `ORION_API_URL` points at a deployed server.
#[derive(Debug, Clone)]
pub struct OrionClient {
    http: Client,
    base: Url,
}

impl OrionClient {
    pub fn new(base_url: &str) -> Result<Self, OrionError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, OrionError> {
        let base = Url::parse(base_url)
            .map_err(|e| OrionError::Config(format!("invalid API URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(OrionError::Config(format!(
                "invalid API URL '{base_url}': not a base URL"
            )));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    /// `Ok(None)` on 404; other non-success statuses are backend errors.
    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        scope: Option<&Scope>,
        query: &[(&str, String)],
    ) -> Result<Option<T>, OrionError> {
        let url = self.endpoint(segments);
        let path = url.path().to_string();

        let mut req = self.http.get(url).query(query);
        if let Some(scope) = scope {
            req = req
                .query(&[("tenant", scope.tenant.as_str())])
                .header(DATA_MODE_HEADER, scope.mode.as_str());
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(source) = resp.headers().get("x-data-source") {
            tracing::debug!(path = %path, source = ?source, "API response");
        }
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(OrionError::Backend {
                table: path,
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| OrionError::Decode {
                table: path,
                source,
            })
    }

    async fn require<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        scope: Option<&Scope>,
        query: &[(&str, String)],
    ) -> Result<T, OrionError> {
        self.get(segments, scope, query).await?.ok_or_else(|| OrionError::Backend {
            table: segments.join("/"),
            status: StatusCode::NOT_FOUND.as_u16(),
            message: "not found".into(),
        })
    }

    pub async fn health(&self) -> Result<HealthResponse, OrionError> {
        self.require(&["health"], None, &[]).await
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl PortfolioRepository for OrionClient {
    fn source(&self) -> DataSource {
        DataSource::Remote
    }

    async fn project_health(
        &self,
        scope: &Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Project>, OrionError> {
        let query: Vec<(&str, String)> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
        self.require(&["projects", "health"], Some(scope), &query).await
    }

    async fn portfolio_summary(&self, scope: &Scope) -> Result<PortfolioSummary, OrionError> {
        self.require(&["portfolio", "summary"], Some(scope), &[]).await
    }

    async fn sync_status(&self, scope: &Scope) -> Result<SyncStatus, OrionError> {
        self.require(&["sync", "status"], Some(scope), &[]).await
    }

    async fn project(&self, scope: &Scope, id: &str) -> Result<Option<ProjectDetail>, OrionError> {
        self.get(&["project", id], Some(scope), &[]).await
    }

    async fn performance(
        &self,
        scope: &Scope,
        id: &str,
    ) -> Result<Option<ProjectPerformance>, OrionError> {
        self.get(&["project", id, "performance"], Some(scope), &[]).await
    }

    async fn budget(&self, scope: &Scope, id: &str) -> Result<Option<ProjectBudget>, OrionError> {
        self.get(&["project", id, "budget"], Some(scope), &[]).await
    }

    async fn wbs(&self, scope: &Scope, id: &str) -> Result<Vec<WbsRecord>, OrionError> {
        let tree: Option<WbsTree> = self.get(&["project", id, "wbs"], Some(scope), &[]).await?;
        Ok(tree.map(|t| wbs::to_records(&t.nodes)).unwrap_or_default())
    }

    async fn activities(
        &self,
        scope: &Scope,
        id: &str,
    ) -> Result<Vec<GanttActivity>, OrionError> {
        let chart: Option<GanttChart> = self
            .get(&["project", id, "gantt"], Some(scope), &[])
            .await?;
        Ok(chart.map(|c| c.activities).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = OrionClient::new("https://orion.example.com/").unwrap();
        assert_eq!(
            client.endpoint(&["project", "PRJ-001", "wbs"]).as_str(),
            "https://orion.example.com/api/v1/project/PRJ-001/wbs"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = OrionClient::new("http://localhost:8710").unwrap();
        let url = client.endpoint(&["project", "A/B C"]);
        assert_eq!(url.path(), "/api/v1/project/A%2FB%20C");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(OrionClient::new("mailto:ops@example.com").is_err());
        assert!(OrionClient::new("not a url").is_err());
    }
}
