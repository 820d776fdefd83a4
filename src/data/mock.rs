// src/data/mock.rs — Demo portfolio fixtures and the repository that serves them
//
// Fixtures are expressed as database rows and go through the same mapping
// as live data, so derived fields are computed one way only.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::repository::{DataSource, PortfolioRepository, Scope};
use super::rows::{
    self, ActivityRow, CostActualRow, EvmSnapshotRow, ProjectHealthRow, ProjectRow,
    RelationshipRow, SyncStatusRow, WbsRow,
};
use crate::infra::errors::OrionError;
use crate::model::{
    GanttActivity, P6Project, Project, ProjectBudget, ProjectDetail, ProjectPerformance,
    SyncStatus, WbsRecord,
};

struct Fixture {
    id: &'static str,
    name: &'static str,
    start: (i32, u32, u32),
    finish: (i32, u32, u32),
    percent_complete: f64,
    bac: f64,
    spi: f64,
    cpi: f64,
}

/// Three on track, two at risk, one critical.
const PROJECTS: &[Fixture] = &[
    Fixture {
        id: "PRJ-001",
        name: "Gulf Coast LNG Train 3",
        start: (2024, 3, 1),
        finish: (2027, 6, 30),
        percent_complete: 62.5,
        bac: 1_850_000_000.0,
        spi: 0.97,
        cpi: 0.96,
    },
    Fixture {
        id: "PRJ-002",
        name: "Permian Gas Processing Plant",
        start: (2025, 1, 15),
        finish: (2027, 3, 31),
        percent_complete: 48.0,
        bac: 420_000_000.0,
        spi: 0.91,
        cpi: 0.93,
    },
    Fixture {
        id: "PRJ-003",
        name: "North Sea Platform Hookup",
        start: (2025, 5, 1),
        finish: (2026, 12, 15),
        percent_complete: 35.2,
        bac: 260_000_000.0,
        spi: 0.82,
        cpi: 0.95,
    },
    Fixture {
        id: "PRJ-004",
        name: "Hydrocracker Revamp",
        start: (2024, 9, 1),
        finish: (2026, 11, 30),
        percent_complete: 78.4,
        bac: 310_000_000.0,
        spi: 1.02,
        cpi: 0.99,
    },
    Fixture {
        id: "PRJ-005",
        name: "Desert Sun Solar 250MW",
        start: (2025, 6, 1),
        finish: (2027, 1, 31),
        percent_complete: 22.1,
        bac: 285_000_000.0,
        spi: 0.96,
        cpi: 0.88,
    },
    Fixture {
        id: "PRJ-006",
        name: "Ammonia Plant Debottleneck",
        start: (2025, 2, 1),
        finish: (2026, 10, 31),
        percent_complete: 55.0,
        bac: 95_000_000.0,
        spi: 0.99,
        cpi: 1.01,
    },
];

const DATA_DATE: (i32, u32, u32) = (2026, 9, 30);

const SNAPSHOT_DATES: [(i32, u32, u32); 6] = [
    (2026, 4, 30),
    (2026, 5, 31),
    (2026, 6, 30),
    (2026, 7, 31),
    (2026, 8, 31),
    (2026, 9, 30),
];

/// (category, share of BAC, committed share of category budget)
const COST_CATEGORIES: &[(&str, f64, f64)] = &[
    ("Engineering", 0.12, 0.05),
    ("Procurement", 0.45, 0.30),
    ("Construction", 0.33, 0.10),
    ("Commissioning", 0.05, 0.02),
    ("Owner Costs", 0.05, 0.05),
];

/// (suffix, parent suffix, code, name, share of BAC, progress factor)
const WBS_TEMPLATE: &[(i64, Option<i64>, &str, &str, f64, f64)] = &[
    (1, None, "1", "Engineering", 0.0, 0.0),
    (2, Some(1), "1.1", "Process Design", 0.04, 1.6),
    (3, Some(1), "1.2", "Detailed Engineering", 0.08, 1.4),
    (4, None, "2", "Procurement", 0.0, 0.0),
    (5, Some(4), "2.1", "Long-Lead Equipment", 0.30, 1.2),
    (6, Some(4), "2.2", "Bulk Materials", 0.15, 1.0),
    (7, None, "3", "Construction", 0.0, 0.0),
    (8, Some(7), "3.1", "Civil & Structural", 0.10, 0.9),
    (9, Some(7), "3.2", "Mechanical & Piping", 0.15, 0.6),
    (10, Some(7), "3.3", "Electrical & Instrumentation", 0.08, 0.4),
    (11, None, "4", "Commissioning", 0.10, 0.05),
];

struct ActivityTemplate {
    suffix: i64,
    id: &'static str,
    name: &'static str,
    wbs: i64,
    start: i64,
    finish: i64,
    critical: bool,
    milestone: bool,
    preds: &'static [i64],
}

/// Offsets are days on a 690-day reference schedule, stretched to each
/// project's planned span.
const ACTIVITY_TEMPLATE: &[ActivityTemplate] = &[
    ActivityTemplate { suffix: 1, id: "A1000", name: "Notice to proceed", wbs: 2, start: 0, finish: 0, critical: true, milestone: true, preds: &[] },
    ActivityTemplate { suffix: 2, id: "A1010", name: "Process design basis", wbs: 2, start: 0, finish: 60, critical: true, milestone: false, preds: &[1] },
    ActivityTemplate { suffix: 3, id: "A1020", name: "Detailed engineering", wbs: 3, start: 45, finish: 225, critical: false, milestone: false, preds: &[2] },
    ActivityTemplate { suffix: 4, id: "A1030", name: "Long-lead equipment PO placement", wbs: 5, start: 60, finish: 120, critical: true, milestone: false, preds: &[2] },
    ActivityTemplate { suffix: 5, id: "A1040", name: "Equipment fabrication and delivery", wbs: 5, start: 120, finish: 420, critical: true, milestone: false, preds: &[4] },
    ActivityTemplate { suffix: 6, id: "A1050", name: "Bulk material procurement", wbs: 6, start: 200, finish: 360, critical: false, milestone: false, preds: &[3] },
    ActivityTemplate { suffix: 7, id: "A1060", name: "Site preparation and civil works", wbs: 8, start: 150, finish: 330, critical: false, milestone: false, preds: &[2] },
    ActivityTemplate { suffix: 8, id: "A1070", name: "Mechanical erection", wbs: 9, start: 420, finish: 600, critical: true, milestone: false, preds: &[5, 7] },
    ActivityTemplate { suffix: 9, id: "A1080", name: "Electrical and instrumentation", wbs: 10, start: 480, finish: 640, critical: false, milestone: false, preds: &[6] },
    ActivityTemplate { suffix: 10, id: "A1090", name: "Pre-commissioning", wbs: 11, start: 600, finish: 690, critical: true, milestone: false, preds: &[8, 9] },
    ActivityTemplate { suffix: 11, id: "A1100", name: "Mechanical completion", wbs: 11, start: 690, finish: 690, critical: true, milestone: true, preds: &[10] },
];

const TEMPLATE_SPAN_DAYS: f64 = 690.0;

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single()
}

fn fixture(id: &str) -> Option<(usize, &'static Fixture)> {
    PROJECTS.iter().enumerate().find(|(_, f)| f.id == id)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn project_health_rows() -> Vec<ProjectHealthRow> {
    PROJECTS
        .iter()
        .map(|f| ProjectHealthRow {
            project_id: f.id.to_string(),
            project_name: f.name.to_string(),
            percent_complete: Some(f.percent_complete),
            spi: Some(f.spi),
            cpi: Some(f.cpi),
            planned_finish: Some(date(f.finish)),
            data_date: Some(date(DATA_DATE)),
        })
        .collect()
}

pub fn project_row(id: &str) -> Option<ProjectRow> {
    let (index, f) = fixture(id)?;
    Some(ProjectRow {
        id: f.id.to_string(),
        code: format!("EPC-{}", 2400 + index * 7),
        name: f.name.to_string(),
        planned_start: Some(date(f.start)),
        planned_finish: Some(date(f.finish)),
        data_date: Some(date(DATA_DATE)),
        percent_complete: Some(f.percent_complete),
        budget_at_completion: Some(f.bac),
    })
}

/// Monthly cumulative snapshots ending at the data date. Earlier months run
/// slightly ahead on both indices so the trend drifts into today's values.
pub fn evm_rows(id: &str) -> Vec<EvmSnapshotRow> {
    let Some((_, f)) = fixture(id) else {
        return Vec::new();
    };
    let ev_now = f.bac * f.percent_complete / 100.0;
    let periods = SNAPSHOT_DATES.len();

    SNAPSHOT_DATES
        .iter()
        .enumerate()
        .map(|(k, d)| {
            let behind = (periods - 1 - k) as f64;
            let progress = 0.4 + 0.6 * (k + 1) as f64 / periods as f64;
            let spi = f.spi + behind * 0.01;
            let cpi = f.cpi + behind * 0.005;
            let ev = round2(ev_now * progress);
            EvmSnapshotRow {
                project_id: f.id.to_string(),
                snapshot_date: date(*d),
                bac: f.bac,
                pv: round2(ev / spi),
                ev,
                ac: round2(ev / cpi),
            }
        })
        .collect()
}

pub fn cost_rows(id: &str) -> Vec<CostActualRow> {
    let Some((_, f)) = fixture(id) else {
        return Vec::new();
    };
    let spent = f.percent_complete / 100.0 / f.cpi;
    COST_CATEGORIES
        .iter()
        .map(|(category, share, committed)| {
            let budget = round2(f.bac * share);
            CostActualRow {
                project_id: f.id.to_string(),
                category: category.to_string(),
                budget,
                actual: round2(budget * spent),
                committed: round2(budget * committed),
                currency: Some("USD".into()),
            }
        })
        .collect()
}

pub fn wbs_rows(id: &str) -> Vec<WbsRow> {
    let Some((index, f)) = fixture(id) else {
        return Vec::new();
    };
    let base = (index as i64 + 1) * 1000;
    WBS_TEMPLATE
        .iter()
        .map(|(suffix, parent, code, name, share, factor)| {
            let budget = f.bac * share;
            let percent = (f.percent_complete * factor).min(100.0);
            let (budget_cost, actual_cost, percent_complete) = if *share > 0.0 {
                (
                    Some(round2(budget)),
                    Some(round2(budget * percent / 100.0 / f.cpi)),
                    Some(round2(percent)),
                )
            } else {
                (Some(0.0), Some(0.0), None)
            };
            WbsRow {
                object_id: base + suffix,
                parent_object_id: parent.map(|p| base + p),
                code: code.to_string(),
                name: name.to_string(),
                budget_cost,
                actual_cost,
                percent_complete,
            }
        })
        .collect()
}

pub fn activity_rows(id: &str) -> (Vec<ActivityRow>, Vec<RelationshipRow>) {
    let Some((index, f)) = fixture(id) else {
        return (Vec::new(), Vec::new());
    };
    let start = date(f.start);
    let span = (date(f.finish) - start).num_days() as f64;
    let stretch = span / TEMPLATE_SPAN_DAYS;
    let data_date = date(DATA_DATE);
    let base = (index as i64 + 1) * 10_000;
    let wbs_base = (index as i64 + 1) * 1000;
    let at = |offset: i64| start + Duration::days((offset as f64 * stretch).round() as i64);

    let activities = ACTIVITY_TEMPLATE
        .iter()
        .map(|t| {
            let planned_start = at(t.start);
            let planned_finish = at(t.finish);
            let total = (planned_finish - planned_start).num_days();
            let elapsed = (data_date - planned_start).num_days();
            let percent = if data_date >= planned_finish {
                100.0
            } else if elapsed <= 0 || total == 0 {
                0.0
            } else {
                round2(elapsed as f64 / total as f64 * 100.0 * f.spi).min(99.0)
            };
            ActivityRow {
                object_id: base + t.suffix,
                wbs_object_id: Some(wbs_base + t.wbs),
                id: t.id.to_string(),
                name: t.name.to_string(),
                planned_start_date: planned_start,
                planned_finish_date: planned_finish,
                actual_start_date: (percent > 0.0).then_some(planned_start),
                actual_finish_date: (percent >= 100.0).then_some(planned_finish),
                percent_complete: Some(percent),
                is_critical: t.critical,
                activity_type: Some(if t.milestone { "TT_FinMile" } else { "TT_Task" }.into()),
            }
        })
        .collect();

    let links = ACTIVITY_TEMPLATE
        .iter()
        .flat_map(|t| {
            t.preds.iter().map(move |p| RelationshipRow {
                predecessor_object_id: base + p,
                successor_object_id: base + t.suffix,
            })
        })
        .collect();

    (activities, links)
}

pub fn sync_rows() -> Vec<SyncStatusRow> {
    vec![
        SyncStatusRow {
            system: "p6".into(),
            connected: true,
            last_sync: timestamp(2026, 9, 30, 6, 0),
            status: Some("success".into()),
            next_scheduled: timestamp(2026, 9, 30, 18, 0),
        },
        SyncStatusRow {
            system: "sap".into(),
            connected: true,
            last_sync: timestamp(2026, 9, 30, 6, 15),
            status: Some("success".into()),
            next_scheduled: timestamp(2026, 9, 30, 18, 15),
        },
    ]
}

/// What a P6 EPPM instance lists during onboarding.
pub fn p6_projects() -> Vec<P6Project> {
    let p = |object_id: i64, id: &str, name: &str, status: &str, start, finish| P6Project {
        object_id,
        id: id.to_string(),
        name: name.to_string(),
        status: status.to_string(),
        start_date: Some(date(start)),
        finish_date: Some(date(finish)),
    };
    vec![
        p(4501, "LNG-T3", "Gulf Coast LNG Train 3", "Active", (2024, 3, 1), (2027, 6, 30)),
        p(4502, "PGP-01", "Permian Gas Processing Plant", "Active", (2025, 1, 15), (2027, 3, 31)),
        p(4503, "NSP-HU", "North Sea Platform Hookup", "Active", (2025, 5, 1), (2026, 12, 15)),
        p(4504, "HCR-RV", "Hydrocracker Revamp", "Active", (2024, 9, 1), (2026, 11, 30)),
        p(4505, "ETH-CR", "Ethane Cracker FEED", "What-If", (2026, 1, 5), (2026, 12, 18)),
    ]
}

/// Serves the demo portfolio regardless of tenant or mode.
#[derive(Debug, Clone, Default)]
pub struct MockRepository;

impl MockRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortfolioRepository for MockRepository {
    fn source(&self) -> DataSource {
        DataSource::Mock
    }

    async fn project_health(
        &self,
        _scope: &Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Project>, OrionError> {
        let rows = project_health_rows();
        let take = limit.unwrap_or(rows.len());
        Ok(rows
            .into_iter()
            .take(take)
            .map(ProjectHealthRow::into_project)
            .collect())
    }

    async fn sync_status(&self, _scope: &Scope) -> Result<SyncStatus, OrionError> {
        Ok(rows::sync_status(&sync_rows()))
    }

    async fn project(&self, _scope: &Scope, id: &str) -> Result<Option<ProjectDetail>, OrionError> {
        let snapshots = evm_rows(id);
        Ok(project_row(id).map(|row| rows::project_detail(row, snapshots.last())))
    }

    async fn performance(
        &self,
        _scope: &Scope,
        id: &str,
    ) -> Result<Option<ProjectPerformance>, OrionError> {
        Ok(rows::project_performance(id, evm_rows(id)))
    }

    async fn budget(&self, _scope: &Scope, id: &str) -> Result<Option<ProjectBudget>, OrionError> {
        Ok(rows::project_budget(id, &cost_rows(id)))
    }

    async fn wbs(&self, _scope: &Scope, id: &str) -> Result<Vec<WbsRecord>, OrionError> {
        Ok(wbs_rows(id).into_iter().map(WbsRow::into_record).collect())
    }

    async fn activities(
        &self,
        _scope: &Scope,
        id: &str,
    ) -> Result<Vec<GanttActivity>, OrionError> {
        let (activities, links) = activity_rows(id);
        Ok(rows::gantt_activities(activities, &links))
    }
}
