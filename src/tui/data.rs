// src/tui/data.rs — Data loaders for the TUI dashboard.
//
// Every panel owns its own `Slice`, so one failing query renders as an
// inline alert while the rest of the screen stays usable.

use std::path::{Path, PathBuf};

use crate::data::{DataSource, PortfolioRepository, Scope};
use crate::gantt::{GanttChart, TimelineScale};
use crate::model::{PortfolioSummary, Project, ProjectDetail, SyncStatus};
use crate::settings::{ConnectionConfig, SettingsStore, SyncSettings};
use crate::wbs::WbsTree;

/// A loaded value, or the message to show in its place.
pub type Slice<T> = Result<T, String>;

/// The three Dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Summary,
    Projects,
    Sync,
}

#[derive(Debug)]
pub struct DashboardData {
    pub source: DataSource,
    pub summary: Slice<PortfolioSummary>,
    pub projects: Slice<Vec<Project>>,
    pub sync: Slice<SyncStatus>,
}

impl DashboardData {
    /// Panels whose last load failed.
    pub fn failed(&self) -> Vec<Panel> {
        let mut out = Vec::new();
        if self.summary.is_err() {
            out.push(Panel::Summary);
        }
        if self.projects.is_err() {
            out.push(Panel::Projects);
        }
        if self.sync.is_err() {
            out.push(Panel::Sync);
        }
        out
    }

    pub fn project_ids(&self) -> Vec<String> {
        match &self.projects {
            Ok(list) => list.iter().map(|p| p.id.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Load all three panels concurrently.
pub async fn load_dashboard(
    repo: &dyn PortfolioRepository,
    scope: &Scope,
    limit: usize,
) -> DashboardData {
    let (summary, projects, sync) = tokio::join!(
        repo.portfolio_summary(scope),
        repo.project_health(scope, Some(limit)),
        repo.sync_status(scope),
    );
    DashboardData {
        source: repo.source(),
        summary: summary.map_err(|e| e.to_string()),
        projects: projects.map_err(|e| e.to_string()),
        sync: sync.map_err(|e| e.to_string()),
    }
}

/// Re-run only the given panels' loads, leaving the others untouched.
pub async fn retry(
    data: &mut DashboardData,
    panels: &[Panel],
    repo: &dyn PortfolioRepository,
    scope: &Scope,
    limit: usize,
) {
    let wants = |p: Panel| panels.contains(&p);
    let (summary, projects, sync) = tokio::join!(
        async {
            if wants(Panel::Summary) {
                Some(repo.portfolio_summary(scope).await)
            } else {
                None
            }
        },
        async {
            if wants(Panel::Projects) {
                Some(repo.project_health(scope, Some(limit)).await)
            } else {
                None
            }
        },
        async {
            if wants(Panel::Sync) {
                Some(repo.sync_status(scope).await)
            } else {
                None
            }
        },
    );
    if let Some(r) = summary {
        data.summary = r.map_err(|e| e.to_string());
    }
    if let Some(r) = projects {
        data.projects = r.map_err(|e| e.to_string());
    }
    if let Some(r) = sync {
        data.sync = r.map_err(|e| e.to_string());
    }
}

/// Detail, WBS and schedule of the selected project.
#[derive(Debug)]
pub struct ProjectData {
    pub project_id: String,
    pub detail: Slice<Option<ProjectDetail>>,
    pub wbs: Slice<WbsTree>,
    pub chart: Slice<GanttChart>,
}

impl ProjectData {
    /// Re-lay the chart at another scale without refetching.
    pub fn rescale(&mut self, scale: TimelineScale, padding_days: i64) {
        if let Ok(chart) = &self.chart {
            let rebuilt = GanttChart::build(
                chart.project_id.clone(),
                chart.activities.clone(),
                scale,
                padding_days,
            );
            self.chart = Ok(rebuilt);
        }
    }
}

pub async fn load_project(
    repo: &dyn PortfolioRepository,
    scope: &Scope,
    project_id: &str,
    scale: TimelineScale,
    padding_days: i64,
) -> ProjectData {
    let (detail, wbs, activities) = tokio::join!(
        repo.project(scope, project_id),
        repo.wbs(scope, project_id),
        repo.activities(scope, project_id),
    );
    ProjectData {
        project_id: project_id.to_string(),
        detail: detail.map_err(|e| e.to_string()),
        wbs: wbs
            .map(|records| WbsTree::build(project_id, &records))
            .map_err(|e| e.to_string()),
        chart: activities
            .map(|acts| GanttChart::build(project_id, acts, scale, padding_days))
            .map_err(|e| e.to_string()),
    }
}

/// Locally stored settings for the tenant.
#[derive(Debug)]
pub struct SettingsData {
    pub db_path: PathBuf,
    pub connections: Slice<Vec<ConnectionConfig>>,
    pub sync: Slice<SyncSettings>,
    pub selected_projects: Slice<Vec<String>>,
}

pub fn load_settings(db_path: &Path, tenant: &str) -> SettingsData {
    let unavailable = |msg: String| SettingsData {
        db_path: db_path.to_path_buf(),
        connections: Err(msg.clone()),
        sync: Err(msg.clone()),
        selected_projects: Err(msg),
    };

    if !db_path.exists() {
        return unavailable("Settings database not initialized, run `orion init`".into());
    }
    let store = match SettingsStore::open(db_path) {
        Ok(s) => s,
        Err(e) => return unavailable(e.to_string()),
    };

    SettingsData {
        db_path: db_path.to_path_buf(),
        connections: store
            .connections(tenant)
            .map(|list| list.iter().map(ConnectionConfig::masked).collect())
            .map_err(|e| e.to_string()),
        sync: store.sync_settings(tenant).map_err(|e| e.to_string()),
        selected_projects: store.selected_projects(tenant).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataMode, MockRepository};
    use crate::infra::errors::OrionError;
    use crate::model::{GanttActivity, ProjectBudget, ProjectPerformance, WbsRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sync always fails; everything else comes from the fixtures.
    struct BrokenSync {
        inner: MockRepository,
        sync_calls: AtomicUsize,
    }

    #[async_trait]
    impl PortfolioRepository for BrokenSync {
        fn source(&self) -> DataSource {
            DataSource::Supabase
        }
        async fn project_health(
            &self,
            scope: &Scope,
            limit: Option<usize>,
        ) -> Result<Vec<Project>, OrionError> {
            self.inner.project_health(scope, limit).await
        }
        async fn sync_status(&self, _scope: &Scope) -> Result<SyncStatus, OrionError> {
            self.sync_calls.fetch_add(1, Ordering::SeqCst);
            Err(OrionError::Backend {
                table: "sync_status".into(),
                status: 503,
                message: "connection refused".into(),
            })
        }
        async fn project(
            &self,
            scope: &Scope,
            id: &str,
        ) -> Result<Option<ProjectDetail>, OrionError> {
            self.inner.project(scope, id).await
        }
        async fn performance(
            &self,
            scope: &Scope,
            id: &str,
        ) -> Result<Option<ProjectPerformance>, OrionError> {
            self.inner.performance(scope, id).await
        }
        async fn budget(
            &self,
            scope: &Scope,
            id: &str,
        ) -> Result<Option<ProjectBudget>, OrionError> {
            self.inner.budget(scope, id).await
        }
        async fn wbs(&self, scope: &Scope, id: &str) -> Result<Vec<WbsRecord>, OrionError> {
            self.inner.wbs(scope, id).await
        }
        async fn activities(
            &self,
            scope: &Scope,
            id: &str,
        ) -> Result<Vec<GanttActivity>, OrionError> {
            self.inner.activities(scope, id).await
        }
    }

    fn scope() -> Scope {
        Scope::new("demo", DataMode::Mock)
    }

    #[tokio::test]
    async fn test_load_dashboard_from_fixtures() {
        let data = load_dashboard(&MockRepository::new(), &scope(), 50).await;
        assert_eq!(data.source, DataSource::Mock);
        assert_eq!(data.summary.as_ref().unwrap().total_projects, 6);
        assert_eq!(data.projects.as_ref().unwrap().len(), 6);
        assert!(data.sync.is_ok());
        assert!(data.failed().is_empty());
        assert_eq!(data.project_ids()[0], "PRJ-001");
    }

    #[tokio::test]
    async fn test_one_failing_panel_leaves_others_loaded() {
        let repo = BrokenSync {
            inner: MockRepository::new(),
            sync_calls: AtomicUsize::new(0),
        };
        let mut data = load_dashboard(&repo, &scope(), 3).await;
        assert_eq!(data.projects.as_ref().unwrap().len(), 3);
        assert!(data.summary.is_ok());
        assert!(data.sync.as_ref().unwrap_err().contains("connection refused"));
        assert_eq!(data.failed(), vec![Panel::Sync]);

        let failed = data.failed();
        retry(&mut data, &failed, &repo, &scope(), 3).await;
        assert_eq!(repo.sync_calls.load(Ordering::SeqCst), 2);
        assert!(data.summary.is_ok());
    }

    #[tokio::test]
    async fn test_load_project_and_rescale() {
        let mut project = load_project(
            &MockRepository::new(),
            &scope(),
            "PRJ-003",
            TimelineScale::Month,
            7,
        )
        .await;
        assert!(project.detail.as_ref().unwrap().is_some());
        assert!(!project.wbs.as_ref().unwrap().nodes.is_empty());
        let month_width = project.chart.as_ref().unwrap().layout.width;

        project.rescale(TimelineScale::Week, 7);
        let chart = project.chart.as_ref().unwrap();
        assert_eq!(chart.layout.scale, TimelineScale::Week);
        assert!(chart.layout.width > month_width);
    }

    #[test]
    fn test_settings_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_settings(&dir.path().join("orion.db"), "demo");
        assert!(data.connections.unwrap_err().contains("orion init"));
    }

    #[test]
    fn test_settings_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orion.db");
        let store = SettingsStore::open(&path).unwrap();
        store
            .set_selected_projects("demo", &["PRJ-002".to_string()])
            .unwrap();
        drop(store);

        let data = load_settings(&path, "demo");
        assert_eq!(data.selected_projects.unwrap(), vec!["PRJ-002".to_string()]);
        assert_eq!(data.sync.unwrap().interval_minutes, 720);
        assert!(data.connections.unwrap().is_empty());
    }
}
