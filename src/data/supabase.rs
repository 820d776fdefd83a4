// src/data/supabase.rs — Supabase (PostgREST) repository
//
// Schemas other than `public` are selected per request with the
// Accept-Profile header (https://postgrest.org/en/stable/references/api/schemas.html).

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::repository::{DataSource, PortfolioRepository, Scope};
use super::rows::{
    self, ActivityRow, CostActualRow, EvmSnapshotRow, ProjectHealthRow, ProjectRow,
    RelationshipRow, SyncStatusRow, WbsRow,
};
use super::tables::{table_for, TableRef};
use crate::infra::errors::OrionError;
use crate::model::{
    GanttActivity, Project, ProjectBudget, ProjectDetail, ProjectPerformance, SyncStatus,
    WbsRecord,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A PostgREST select: filters are `column=eq.value` pairs.
#[derive(Debug, Default, Clone)]
pub struct Select {
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{dir}"));
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut q = vec![("select".to_string(), "*".to_string())];
        q.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            q.push(("order".into(), order.clone()));
        }
        if let Some(limit) = self.limit {
            q.push(("limit".into(), limit.to_string()));
        }
        q
    }
}

/// Thin PostgREST client authenticated with the project's anon key.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, OrionError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url, anon_key))
    }

    pub fn with_client(http: Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// `GET /rest/v1/{table}` in the table's schema.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: TableRef,
        select: &Select,
    ) -> Result<Vec<T>, OrionError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table.table);
        tracing::debug!(table = %table, "PostgREST select");

        let resp = self
            .http
            .get(&url)
            .query(&select.query())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept-Profile", table.schema)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(OrionError::Backend {
                table: table.to_string(),
                status: status.as_u16(),
                message: postgrest_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| OrionError::Decode {
            table: table.to_string(),
            source,
        })
    }
}

/// PostgREST errors carry a JSON `message`; anything else is passed through.
fn postgrest_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

pub struct SupabaseRepository {
    client: SupabaseClient,
}

impl SupabaseRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// `None` unless both URL and anon key are set.
    pub fn from_credentials(credentials: Option<(&str, &str)>) -> Result<Option<Self>, OrionError> {
        match credentials {
            Some((url, key)) => Ok(Some(Self::new(SupabaseClient::new(url, key)?))),
            None => Ok(None),
        }
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        logical: &str,
        select: Select,
    ) -> Result<Vec<T>, OrionError> {
        let table = table_for(scope.mode, logical)?;
        self.client
            .select(table, &select.eq("tenant_id", &scope.tenant))
            .await
    }
}

#[async_trait]
impl PortfolioRepository for SupabaseRepository {
    fn source(&self) -> DataSource {
        DataSource::Supabase
    }

    async fn project_health(
        &self,
        scope: &Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Project>, OrionError> {
        let rows: Vec<ProjectHealthRow> = self
            .rows(
                scope,
                "project_health",
                Select::new().order("project_id", true).limit(limit),
            )
            .await?;
        Ok(rows.into_iter().map(ProjectHealthRow::into_project).collect())
    }

    async fn sync_status(&self, scope: &Scope) -> Result<SyncStatus, OrionError> {
        let rows: Vec<SyncStatusRow> = self.rows(scope, "sync_status", Select::new()).await?;
        Ok(rows::sync_status(&rows))
    }

    async fn project(&self, scope: &Scope, id: &str) -> Result<Option<ProjectDetail>, OrionError> {
        let found: Vec<ProjectRow> = self
            .rows(scope, "projects", Select::new().eq("id", id).limit(Some(1)))
            .await?;
        let Some(row) = found.into_iter().next() else {
            return Ok(None);
        };

        let latest: Vec<EvmSnapshotRow> = self
            .rows(
                scope,
                "evm_snapshots",
                Select::new()
                    .eq("project_id", id)
                    .order("snapshot_date", false)
                    .limit(Some(1)),
            )
            .await?;
        Ok(Some(rows::project_detail(row, latest.first())))
    }

    async fn performance(
        &self,
        scope: &Scope,
        id: &str,
    ) -> Result<Option<ProjectPerformance>, OrionError> {
        let snapshots: Vec<EvmSnapshotRow> = self
            .rows(
                scope,
                "evm_snapshots",
                Select::new()
                    .eq("project_id", id)
                    .order("snapshot_date", true),
            )
            .await?;
        Ok(rows::project_performance(id, snapshots))
    }

    async fn budget(&self, scope: &Scope, id: &str) -> Result<Option<ProjectBudget>, OrionError> {
        let lines: Vec<CostActualRow> = self
            .rows(scope, "cost_actuals", Select::new().eq("project_id", id))
            .await?;
        Ok(rows::project_budget(id, &lines))
    }

    async fn wbs(&self, scope: &Scope, id: &str) -> Result<Vec<WbsRecord>, OrionError> {
        let rows: Vec<WbsRow> = self
            .rows(scope, "wbs", Select::new().eq("project_id", id))
            .await?;
        Ok(rows.into_iter().map(WbsRow::into_record).collect())
    }

    async fn activities(
        &self,
        scope: &Scope,
        id: &str,
    ) -> Result<Vec<GanttActivity>, OrionError> {
        let activities: Vec<ActivityRow> = self
            .rows(scope, "activities", Select::new().eq("project_id", id))
            .await?;
        let links: Vec<RelationshipRow> = self
            .rows(scope, "relationships", Select::new().eq("project_id", id))
            .await?;
        Ok(rows::gantt_activities(activities, &links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_query_shape() {
        let q = Select::new()
            .eq("tenant_id", "acme")
            .order("project_id", true)
            .limit(Some(25))
            .query();
        assert_eq!(q[0], ("select".into(), "*".into()));
        assert!(q.contains(&("tenant_id".into(), "eq.acme".into())));
        assert!(q.contains(&("order".into(), "project_id.asc".into())));
        assert!(q.contains(&("limit".into(), "25".into())));
    }

    #[test]
    fn test_postgrest_message_extracted() {
        let body = r#"{"code":"42P01","message":"relation does not exist"}"#;
        assert_eq!(postgrest_message(body), "relation does not exist");
        assert_eq!(postgrest_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_no_credentials_no_repository() {
        assert!(SupabaseRepository::from_credentials(None).unwrap().is_none());
    }
}
