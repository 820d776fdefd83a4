// src/data/rows.rs — Database row shapes (snake_case) and their mapping to DTOs
//
// Rows mirror the PostgREST payloads column for column. Mapping is the only
// place derived fields (status, EVM indices, rollups) get computed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::metrics::evm::{self, EvmInputs, EvmSnapshot};
use crate::metrics::health::classify;
use crate::model::{
    BudgetCategory, GanttActivity, PerformancePoint, Project, ProjectBudget, ProjectDetail,
    ProjectPerformance, SyncState, SyncStatus, SystemSync, WbsRecord,
};

/// Missing indices read as nominal.
const NOMINAL_INDEX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHealthRow {
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub percent_complete: Option<f64>,
    #[serde(default)]
    pub spi: Option<f64>,
    #[serde(default)]
    pub cpi: Option<f64>,
    #[serde(default)]
    pub planned_finish: Option<NaiveDate>,
    #[serde(default)]
    pub data_date: Option<NaiveDate>,
}

impl ProjectHealthRow {
    pub fn into_project(self) -> Project {
        let spi = self.spi.unwrap_or(NOMINAL_INDEX);
        let cpi = self.cpi.unwrap_or(NOMINAL_INDEX);
        Project {
            id: self.project_id,
            name: self.project_name,
            percent_complete: self.percent_complete.unwrap_or(0.0),
            spi,
            cpi,
            status: classify(spi, cpi),
            planned_finish: self.planned_finish,
            data_date: self.data_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub planned_start: Option<NaiveDate>,
    #[serde(default)]
    pub planned_finish: Option<NaiveDate>,
    #[serde(default)]
    pub data_date: Option<NaiveDate>,
    #[serde(default)]
    pub percent_complete: Option<f64>,
    #[serde(default)]
    pub budget_at_completion: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmSnapshotRow {
    pub project_id: String,
    pub snapshot_date: NaiveDate,
    pub bac: f64,
    pub pv: f64,
    pub ev: f64,
    pub ac: f64,
}

impl EvmSnapshotRow {
    pub fn snapshot(&self) -> EvmSnapshot {
        EvmSnapshot::compute(EvmInputs {
            bac: self.bac,
            ev: self.ev,
            ac: self.ac,
            pv: self.pv,
        })
    }
}

/// Header data; indices come from the latest snapshot when there is one.
pub fn project_detail(row: ProjectRow, latest: Option<&EvmSnapshotRow>) -> ProjectDetail {
    let snapshot = latest.map(EvmSnapshotRow::snapshot);
    let (spi, cpi) = snapshot
        .as_ref()
        .map(|s| (s.spi, s.cpi))
        .unwrap_or((NOMINAL_INDEX, NOMINAL_INDEX));
    let bac = row
        .budget_at_completion
        .or_else(|| snapshot.as_ref().map(|s| s.bac))
        .unwrap_or(0.0);

    ProjectDetail {
        id: row.id,
        code: row.code,
        name: row.name,
        planned_start: row.planned_start,
        planned_finish: row.planned_finish,
        data_date: row.data_date.or_else(|| latest.map(|l| l.snapshot_date)),
        percent_complete: row.percent_complete.unwrap_or(0.0),
        spi,
        cpi,
        status: classify(spi, cpi),
        budget_at_completion: bac,
        health_score: evm::health_score(spi, cpi),
    }
}

/// Time-phased performance; `None` when the project has no snapshots.
pub fn project_performance(
    project_id: &str,
    mut rows: Vec<EvmSnapshotRow>,
) -> Option<ProjectPerformance> {
    rows.sort_by_key(|r| r.snapshot_date);
    let last = rows.last()?;
    let current = last.snapshot();
    let data_date = Some(last.snapshot_date);

    let history = rows
        .iter()
        .map(|r| PerformancePoint {
            period: r.snapshot_date,
            pv: r.pv,
            ev: r.ev,
            ac: r.ac,
            spi: evm::spi(r.ev, r.pv),
            cpi: evm::cpi(r.ev, r.ac),
        })
        .collect();

    Some(ProjectPerformance {
        project_id: project_id.to_string(),
        data_date,
        current,
        history,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatusRow {
    pub system: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub next_scheduled: Option<DateTime<Utc>>,
}

impl SyncStatusRow {
    fn system_sync(&self) -> SystemSync {
        let status = match self.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("success") | Some("completed") => SyncState::Success,
            Some("failed") | Some("error") => SyncState::Failed,
            Some("running") | Some("in_progress") => SyncState::Running,
            _ if self.last_sync.is_some() => SyncState::Success,
            _ => SyncState::Never,
        };
        SystemSync {
            connected: self.connected,
            last_sync: self.last_sync,
            status,
        }
    }
}

/// Fold per-system rows into one status. Systems without a row read as
/// never synced; the earliest upcoming run across systems is reported.
pub fn sync_status(rows: &[SyncStatusRow]) -> SyncStatus {
    let find = |system: &str| {
        rows.iter()
            .filter(|r| r.system.eq_ignore_ascii_case(system))
            .max_by_key(|r| r.last_sync)
            .map(SyncStatusRow::system_sync)
            .unwrap_or_else(SystemSync::never)
    };
    SyncStatus {
        p6: find("p6"),
        sap: find("sap"),
        next_scheduled: rows.iter().filter_map(|r| r.next_scheduled).min(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WbsRow {
    pub object_id: i64,
    #[serde(default)]
    pub parent_object_id: Option<i64>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub budget_cost: Option<f64>,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub percent_complete: Option<f64>,
}

impl WbsRow {
    pub fn into_record(self) -> WbsRecord {
        WbsRecord {
            object_id: self.object_id,
            parent_object_id: self.parent_object_id,
            wbs_code: self.code,
            name: self.name,
            budget_cost: self.budget_cost.unwrap_or(0.0),
            actual_cost: self.actual_cost.unwrap_or(0.0),
            percent_complete: self.percent_complete.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub object_id: i64,
    #[serde(default)]
    pub wbs_object_id: Option<i64>,
    pub id: String,
    pub name: String,
    pub planned_start_date: NaiveDate,
    pub planned_finish_date: NaiveDate,
    #[serde(default)]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub actual_finish_date: Option<NaiveDate>,
    #[serde(default)]
    pub percent_complete: Option<f64>,
    #[serde(default)]
    pub is_critical: bool,
    /// P6 activity type, e.g. `TT_Task`, `TT_StartMile`, `TT_FinMile`.
    #[serde(default, rename = "type")]
    pub activity_type: Option<String>,
}

impl ActivityRow {
    pub fn is_milestone(&self) -> bool {
        self.activity_type
            .as_deref()
            .is_some_and(|t| t.ends_with("Mile"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub predecessor_object_id: i64,
    pub successor_object_id: i64,
}

/// Attach relationships to activities and order by planned start.
pub fn gantt_activities(rows: Vec<ActivityRow>, links: &[RelationshipRow]) -> Vec<GanttActivity> {
    let mut preds: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut succs: HashMap<i64, Vec<i64>> = HashMap::new();
    for l in links {
        preds
            .entry(l.successor_object_id)
            .or_default()
            .push(l.predecessor_object_id);
        succs
            .entry(l.predecessor_object_id)
            .or_default()
            .push(l.successor_object_id);
    }

    let mut out: Vec<GanttActivity> = rows
        .into_iter()
        .map(|r| {
            let is_milestone = r.is_milestone();
            GanttActivity {
                object_id: r.object_id,
                wbs_object_id: r.wbs_object_id,
                predecessors: preds.remove(&r.object_id).unwrap_or_default(),
                successors: succs.remove(&r.object_id).unwrap_or_default(),
                activity_id: r.id,
                name: r.name,
                planned_start: r.planned_start_date,
                planned_finish: r.planned_finish_date,
                actual_start: r.actual_start_date,
                actual_finish: r.actual_finish_date,
                percent_complete: r.percent_complete.unwrap_or(0.0),
                is_critical: r.is_critical,
                is_milestone,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        a.planned_start
            .cmp(&b.planned_start)
            .then_with(|| a.activity_id.cmp(&b.activity_id))
    });
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostActualRow {
    pub project_id: String,
    pub category: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub actual: f64,
    #[serde(default)]
    pub committed: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Roll cost lines up by category. `None` when there are no lines.
pub fn project_budget(project_id: &str, rows: &[CostActualRow]) -> Option<ProjectBudget> {
    if rows.is_empty() {
        return None;
    }

    let mut by_category: BTreeMap<&str, (f64, f64, f64)> = BTreeMap::new();
    for r in rows {
        let entry = by_category.entry(r.category.as_str()).or_default();
        entry.0 += r.budget;
        entry.1 += r.actual;
        entry.2 += r.committed;
    }

    let categories: Vec<BudgetCategory> = by_category
        .into_iter()
        .map(|(category, (budget, actual, committed))| BudgetCategory {
            category: category.to_string(),
            budget,
            actual,
            committed,
            variance: budget - actual - committed,
        })
        .collect();

    let bac: f64 = categories.iter().map(|c| c.budget).sum();
    let actual: f64 = categories.iter().map(|c| c.actual).sum();
    let committed: f64 = categories.iter().map(|c| c.committed).sum();
    let percent_spent = if bac > 0.0 { actual / bac * 100.0 } else { 0.0 };

    Some(ProjectBudget {
        project_id: project_id.to_string(),
        currency: rows
            .iter()
            .find_map(|r| r.currency.clone())
            .unwrap_or_else(|| "USD".into()),
        budget_at_completion: bac,
        actual_cost: actual,
        committed,
        remaining: bac - actual - committed,
        percent_spent,
        by_category: categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::health::HealthStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_health_row_from_snake_case_json() {
        let json = r#"{
            "project_id": "PRJ-9",
            "project_name": "Coker Unit",
            "percent_complete": 41.5,
            "spi": 0.83,
            "cpi": 1.1,
            "planned_finish": "2027-02-28",
            "data_date": null
        }"#;
        let row: ProjectHealthRow = serde_json::from_str(json).unwrap();
        let p = row.into_project();
        assert_eq!(p.id, "PRJ-9");
        assert_eq!(p.status, HealthStatus::Critical);
        assert_eq!(p.planned_finish, Some(d(2027, 2, 28)));
    }

    #[test]
    fn test_missing_indices_are_nominal() {
        let row: ProjectHealthRow =
            serde_json::from_str(r#"{"project_id":"P","project_name":"N"}"#).unwrap();
        let p = row.into_project();
        assert_eq!((p.spi, p.cpi), (1.0, 1.0));
        assert_eq!(p.status, HealthStatus::OnTrack);
    }

    #[test]
    fn test_performance_sorted_and_current_is_latest() {
        let rows = vec![
            EvmSnapshotRow {
                project_id: "P".into(),
                snapshot_date: d(2026, 9, 30),
                bac: 1000.0,
                pv: 600.0,
                ev: 540.0,
                ac: 600.0,
            },
            EvmSnapshotRow {
                project_id: "P".into(),
                snapshot_date: d(2026, 8, 31),
                bac: 1000.0,
                pv: 500.0,
                ev: 500.0,
                ac: 500.0,
            },
        ];
        let perf = project_performance("P", rows).unwrap();
        assert_eq!(perf.history[0].period, d(2026, 8, 31));
        assert_eq!(perf.data_date, Some(d(2026, 9, 30)));
        assert!((perf.current.spi - 0.9).abs() < 1e-9);
        assert!(project_performance("P", Vec::new()).is_none());
    }

    #[test]
    fn test_sync_status_missing_system_is_never() {
        let rows = vec![SyncStatusRow {
            system: "P6".into(),
            connected: true,
            last_sync: None,
            status: Some("FAILED".into()),
            next_scheduled: None,
        }];
        let s = sync_status(&rows);
        assert!(s.p6.connected);
        assert_eq!(s.p6.status, SyncState::Failed);
        assert_eq!(s.sap.status, SyncState::Never);
        assert!(!s.sap.connected);
    }

    #[test]
    fn test_activities_get_links_and_milestones() {
        let row = |id: i64, start: NaiveDate, ty: &str| ActivityRow {
            object_id: id,
            wbs_object_id: None,
            id: format!("A{id}"),
            name: "x".into(),
            planned_start_date: start,
            planned_finish_date: start,
            actual_start_date: None,
            actual_finish_date: None,
            percent_complete: None,
            is_critical: false,
            activity_type: Some(ty.into()),
        };
        let rows = vec![
            row(2, d(2026, 2, 1), "TT_FinMile"),
            row(1, d(2026, 1, 1), "TT_Task"),
        ];
        let links = vec![RelationshipRow {
            predecessor_object_id: 1,
            successor_object_id: 2,
        }];
        let acts = gantt_activities(rows, &links);
        assert_eq!(acts[0].object_id, 1);
        assert_eq!(acts[0].successors, vec![2]);
        assert_eq!(acts[1].predecessors, vec![1]);
        assert!(acts[1].is_milestone);
        assert!(!acts[0].is_milestone);
    }

    #[test]
    fn test_budget_groups_categories() {
        let line = |cat: &str, b: f64, a: f64, c: f64| CostActualRow {
            project_id: "P".into(),
            category: cat.into(),
            budget: b,
            actual: a,
            committed: c,
            currency: Some("EUR".into()),
        };
        let rows = vec![
            line("Procurement", 100.0, 40.0, 30.0),
            line("Engineering", 50.0, 45.0, 0.0),
            line("Procurement", 20.0, 0.0, 5.0),
        ];
        let b = project_budget("P", &rows).unwrap();
        assert_eq!(b.currency, "EUR");
        assert_eq!(b.by_category.len(), 2);
        assert_eq!(b.by_category[0].category, "Engineering");
        assert_eq!(b.by_category[1].budget, 120.0);
        assert_eq!(b.by_category[1].variance, 45.0);
        assert_eq!(b.budget_at_completion, 170.0);
        assert_eq!(b.remaining, 170.0 - 85.0 - 35.0);
        assert!(project_budget("P", &[]).is_none());
    }

    #[test]
    fn test_detail_without_snapshot() {
        let row = ProjectRow {
            id: "P".into(),
            code: "P-1".into(),
            name: "N".into(),
            planned_start: None,
            planned_finish: None,
            data_date: None,
            percent_complete: Some(10.0),
            budget_at_completion: None,
        };
        let detail = project_detail(row, None);
        assert_eq!(detail.budget_at_completion, 0.0);
        assert_eq!(detail.health_score, 50);
        assert_eq!(detail.status, HealthStatus::OnTrack);
    }
}
