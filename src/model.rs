// src/model.rs — Data-transfer shapes exchanged between the API, the
// repositories and the dashboard.
//
// Every DTO serializes as camelCase. Database rows (snake_case) live in
// `data::rows` and are mapped into these types there.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::evm::EvmSnapshot;
use crate::metrics::health::{HealthStatus, PortfolioStatus};

/// One row of the projects table / health listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub percent_complete: f64,
    pub spi: f64,
    pub cpi: f64,
    /// Always `classify(spi, cpi)`; never read from storage.
    pub status: HealthStatus,
    pub planned_finish: Option<NaiveDate>,
    pub data_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_projects: u32,
    pub on_track: u32,
    pub at_risk: u32,
    pub critical: u32,
    pub portfolio_status: PortfolioStatus,
    pub average_spi: f64,
    pub average_cpi: f64,
}

/// Header data for a single project page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: String,
    pub code: String,
    pub name: String,
    pub planned_start: Option<NaiveDate>,
    pub planned_finish: Option<NaiveDate>,
    pub data_date: Option<NaiveDate>,
    pub percent_complete: f64,
    pub spi: f64,
    pub cpi: f64,
    pub status: HealthStatus,
    pub budget_at_completion: f64,
    pub health_score: u8,
}

/// One period of the cumulative PV/EV/AC curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub period: NaiveDate,
    pub pv: f64,
    pub ev: f64,
    pub ac: f64,
    pub spi: f64,
    pub cpi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPerformance {
    pub project_id: String,
    pub data_date: Option<NaiveDate>,
    pub current: EvmSnapshot,
    pub history: Vec<PerformancePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub category: String,
    pub budget: f64,
    pub actual: f64,
    pub committed: f64,
    /// `budget - actual - committed`; negative means overrun.
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBudget {
    pub project_id: String,
    pub currency: String,
    pub budget_at_completion: f64,
    pub actual_cost: f64,
    pub committed: f64,
    pub remaining: f64,
    pub percent_spent: f64,
    pub by_category: Vec<BudgetCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Success,
    Failed,
    Running,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSync {
    pub connected: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub status: SyncState,
}

impl SystemSync {
    pub fn never() -> Self {
        Self {
            connected: false,
            last_sync: None,
            status: SyncState::Never,
        }
    }
}

/// Outcome of the last batch sync of each source system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub p6: SystemSync,
    pub sap: SystemSync,
    pub next_scheduled: Option<DateTime<Utc>>,
}

/// A node of the schedule network as exported from P6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttActivity {
    pub object_id: i64,
    pub wbs_object_id: Option<i64>,
    pub activity_id: String,
    pub name: String,
    pub planned_start: NaiveDate,
    pub planned_finish: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_finish: Option<NaiveDate>,
    pub percent_complete: f64,
    pub is_critical: bool,
    pub is_milestone: bool,
    #[serde(default)]
    pub predecessors: Vec<i64>,
    #[serde(default)]
    pub successors: Vec<i64>,
}

/// Flat WBS element; `wbs::build_tree` assembles these into a hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbsRecord {
    pub object_id: i64,
    pub parent_object_id: Option<i64>,
    pub wbs_code: String,
    pub name: String,
    pub budget_cost: f64,
    pub actual_cost: f64,
    pub percent_complete: f64,
}

/// A project as listed by P6 during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P6Project {
    pub object_id: i64,
    pub id: String,
    pub name: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub finish_date: Option<NaiveDate>,
}
