// src/data/repository.rs — Portfolio data access seam

use async_trait::async_trait;
use std::fmt;

use super::mode::DataMode;
use crate::infra::errors::OrionError;
use crate::metrics::health::summarize;
use crate::model::{
    GanttActivity, PortfolioSummary, Project, ProjectBudget, ProjectDetail, ProjectPerformance,
    SyncStatus, WbsRecord,
};

/// Who answered a request. Reported to callers as `X-Data-Source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Mock,
    Supabase,
    Remote,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Mock => "mock",
            DataSource::Supabase => "supabase",
            DataSource::Remote => "remote",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant and mode every read is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub tenant: String,
    pub mode: DataMode,
}

impl Scope {
    pub fn new(tenant: impl Into<String>, mode: DataMode) -> Self {
        Self {
            tenant: tenant.into(),
            mode,
        }
    }
}

/// Read access to portfolio data. Lookups by project id return `Ok(None)`
/// for projects the tenant does not have.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    fn source(&self) -> DataSource;

    async fn project_health(
        &self,
        scope: &Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Project>, OrionError>;

    /// Counts derived from the full health listing.
    async fn portfolio_summary(&self, scope: &Scope) -> Result<PortfolioSummary, OrionError> {
        let projects = self.project_health(scope, None).await?;
        Ok(summarize(&projects))
    }

    async fn sync_status(&self, scope: &Scope) -> Result<SyncStatus, OrionError>;

    async fn project(&self, scope: &Scope, id: &str) -> Result<Option<ProjectDetail>, OrionError>;

    async fn performance(
        &self,
        scope: &Scope,
        id: &str,
    ) -> Result<Option<ProjectPerformance>, OrionError>;

    async fn budget(&self, scope: &Scope, id: &str) -> Result<Option<ProjectBudget>, OrionError>;

    async fn wbs(&self, scope: &Scope, id: &str) -> Result<Vec<WbsRecord>, OrionError>;

    async fn activities(&self, scope: &Scope, id: &str)
        -> Result<Vec<GanttActivity>, OrionError>;
}
