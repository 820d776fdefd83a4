// src/gantt/layout.rs — Date → pixel geometry for the Gantt chart
//
// Pure layout math. There is no scheduling here: criticality comes from
// the source system's `is_critical` flag and is only carried through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::scale::TimelineScale;
use crate::model::GanttActivity;

/// Default days of empty timeline before the first and after the last bar.
pub const PADDING_DAYS: i64 = 14;
/// Upper bound on padding, about ten years.
pub const MAX_PADDING_DAYS: i64 = 3650;
pub const ROW_HEIGHT: f64 = 32.0;
pub const BAR_HEIGHT: f64 = 20.0;
pub const BAR_OFFSET: f64 = (ROW_HEIGHT - BAR_HEIGHT) / 2.0;
pub const MILESTONE_MIN_WIDTH: f64 = 16.0;
pub const MIN_BAR_WIDTH: f64 = 2.0;
/// Horizontal run of a dependency line before it turns toward its target.
pub const DEPENDENCY_ELBOW: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineBounds {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub object_id: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub progress_width: f64,
    pub is_critical: bool,
    pub is_milestone: bool,
}

impl Bar {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLine {
    pub from: i64,
    pub to: i64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Polyline from the predecessor's right edge to the successor's left
    /// edge, including the elbow.
    pub points: Vec<(f64, f64)>,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub date: NaiveDate,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttLayout {
    pub scale: TimelineScale,
    pub px_per_day: f64,
    pub bounds: Option<TimelineBounds>,
    pub width: f64,
    pub height: f64,
    pub bars: Vec<Bar>,
    pub dependencies: Vec<DependencyLine>,
    pub ticks: Vec<Tick>,
}

/// Earliest planned start and latest planned finish, each padded by
/// `padding_days` (clamped to `0..=MAX_PADDING_DAYS`). `None` for an empty
/// schedule. A side that would leave the calendar stays unpadded.
pub fn bounds(activities: &[GanttActivity], padding_days: i64) -> Option<TimelineBounds> {
    let start = activities.iter().map(|a| a.planned_start.min(a.planned_finish)).min()?;
    let end = activities.iter().map(|a| a.planned_finish.max(a.planned_start)).max()?;
    let pad = chrono::Duration::days(padding_days.clamp(0, MAX_PADDING_DAYS));
    Some(TimelineBounds {
        start: start.checked_sub_signed(pad).unwrap_or(start),
        end: end.checked_add_signed(pad).unwrap_or(end),
    })
}

/// Linear date → x mapping relative to the timeline origin.
pub fn date_to_x(date: NaiveDate, origin: NaiveDate, px_per_day: f64) -> f64 {
    (date - origin).num_days() as f64 * px_per_day
}

/// Bar width for an activity: duration in days times scale, with milestones
/// floored to a visible diamond.
pub fn bar_width(activity: &GanttActivity, px_per_day: f64) -> f64 {
    let days = (activity.planned_finish - activity.planned_start).num_days().max(0);
    let raw = days as f64 * px_per_day;
    if activity.is_milestone {
        raw.max(MILESTONE_MIN_WIDTH)
    } else {
        raw.max(MIN_BAR_WIDTH)
    }
}

/// Lay out every activity (one row each, in input order) and every
/// dependency between two laid-out activities.
pub fn layout(activities: &[GanttActivity], scale: TimelineScale, padding_days: i64) -> GanttLayout {
    let px = scale.px_per_day();
    let Some(bounds) = bounds(activities, padding_days) else {
        return GanttLayout {
            scale,
            px_per_day: px,
            bounds: None,
            width: 0.0,
            height: 0.0,
            bars: Vec::new(),
            dependencies: Vec::new(),
            ticks: Vec::new(),
        };
    };

    let bars: Vec<Bar> = activities
        .iter()
        .enumerate()
        .map(|(row, a)| {
            let width = bar_width(a, px);
            let progress = a.percent_complete.clamp(0.0, 100.0) / 100.0;
            Bar {
                object_id: a.object_id,
                x: date_to_x(a.planned_start, bounds.start, px),
                y: row as f64 * ROW_HEIGHT + BAR_OFFSET,
                width,
                height: BAR_HEIGHT,
                progress_width: width * progress,
                is_critical: a.is_critical,
                is_milestone: a.is_milestone,
            }
        })
        .collect();

    let dependencies = dependency_lines(activities, &bars);

    let ticks = scale
        .ticks(bounds.start, bounds.end)
        .into_iter()
        .map(|date| Tick {
            date,
            x: date_to_x(date, bounds.start, px),
            label: scale.tick_label(date),
        })
        .collect();

    GanttLayout {
        scale,
        px_per_day: px,
        bounds: Some(bounds),
        width: bounds.days() as f64 * px,
        height: activities.len() as f64 * ROW_HEIGHT,
        bars,
        dependencies,
        ticks,
    }
}

/// Collect predecessor→successor pairs from both sides of each activity,
/// deduplicated, and draw an elbow line for each pair whose ends exist.
fn dependency_lines(activities: &[GanttActivity], bars: &[Bar]) -> Vec<DependencyLine> {
    let by_id: HashMap<i64, &Bar> = bars.iter().map(|b| (b.object_id, b)).collect();

    let mut pairs = BTreeSet::new();
    for a in activities {
        for &pred in &a.predecessors {
            pairs.insert((pred, a.object_id));
        }
        for &succ in &a.successors {
            pairs.insert((a.object_id, succ));
        }
    }

    pairs
        .into_iter()
        .filter(|(from, to)| from != to)
        .filter_map(|(from, to)| {
            let pred = by_id.get(&from)?;
            let succ = by_id.get(&to)?;
            let (x1, y1) = (pred.right(), pred.center_y());
            let (x2, y2) = (succ.x, succ.center_y());
            let elbow_x = x1 + DEPENDENCY_ELBOW;
            Some(DependencyLine {
                from,
                to,
                x1,
                y1,
                x2,
                y2,
                points: vec![(x1, y1), (elbow_x, y1), (elbow_x, y2), (x2, y2)],
                is_critical: pred.is_critical && succ.is_critical,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn activity(id: i64, start: NaiveDate, finish: NaiveDate) -> GanttActivity {
        GanttActivity {
            object_id: id,
            wbs_object_id: None,
            activity_id: format!("A{id}"),
            name: format!("Activity {id}"),
            planned_start: start,
            planned_finish: finish,
            actual_start: None,
            actual_finish: None,
            percent_complete: 0.0,
            is_critical: false,
            is_milestone: false,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    #[test]
    fn test_thirty_days_at_month_scale_is_240px() {
        let acts = vec![activity(1, d(2026, 1, 1), d(2026, 1, 31))];
        let l = layout(&acts, TimelineScale::Month, PADDING_DAYS);
        assert_eq!(l.bars[0].width, 240.0);
        assert_eq!(l.bars[0].x, 14.0 * 8.0);
        assert_eq!(l.width, (30.0 + 28.0) * 8.0);
    }

    #[test]
    fn test_bounds_padded_both_sides() {
        let acts = vec![
            activity(1, d(2026, 3, 10), d(2026, 3, 20)),
            activity(2, d(2026, 2, 1), d(2026, 2, 5)),
        ];
        let b = bounds(&acts, PADDING_DAYS).unwrap();
        assert_eq!(b.start, d(2026, 1, 18));
        assert_eq!(b.end, d(2026, 4, 3));
    }

    #[test]
    fn test_oversized_padding_is_clamped() {
        let acts = vec![activity(1, d(2026, 3, 10), d(2026, 3, 20))];
        let b = bounds(&acts, 1_000_000_000).unwrap();
        assert_eq!(b.start, d(2026, 3, 10) - chrono::Duration::days(MAX_PADDING_DAYS));
        assert_eq!(b.end, d(2026, 3, 20) + chrono::Duration::days(MAX_PADDING_DAYS));

        let b = bounds(&acts, -5).unwrap();
        assert_eq!((b.start, b.end), (d(2026, 3, 10), d(2026, 3, 20)));
    }

    #[test]
    fn test_padding_stops_at_calendar_edge() {
        let acts = vec![activity(1, NaiveDate::MIN, d(2026, 1, 1))];
        let b = bounds(&acts, PADDING_DAYS).unwrap();
        assert_eq!(b.start, NaiveDate::MIN);
        assert_eq!(b.end, d(2026, 1, 15));
    }

    #[test]
    fn test_empty_schedule() {
        let l = layout(&[], TimelineScale::Week, PADDING_DAYS);
        assert!(l.bounds.is_none());
        assert!(l.bars.is_empty());
        assert_eq!(l.width, 0.0);
    }

    #[test]
    fn test_milestone_min_width() {
        let mut m = activity(1, d(2026, 5, 1), d(2026, 5, 1));
        m.is_milestone = true;
        for scale in TimelineScale::ALL {
            assert_eq!(bar_width(&m, scale.px_per_day()), MILESTONE_MIN_WIDTH);
        }
        // A long "milestone" keeps its true span.
        let mut long = activity(2, d(2026, 5, 1), d(2026, 5, 11));
        long.is_milestone = true;
        assert_eq!(bar_width(&long, TimelineScale::Day.px_per_day()), 400.0);
    }

    #[test]
    fn test_progress_width_clamped() {
        let mut a = activity(1, d(2026, 1, 1), d(2026, 1, 11));
        a.percent_complete = 50.0;
        let mut b = activity(2, d(2026, 1, 1), d(2026, 1, 11));
        b.percent_complete = 150.0;
        let l = layout(&[a, b], TimelineScale::Day, 0);
        assert_eq!(l.bars[0].progress_width, 200.0);
        assert_eq!(l.bars[1].progress_width, 400.0);
    }

    #[test]
    fn test_rows_stack() {
        let acts = vec![
            activity(1, d(2026, 1, 1), d(2026, 1, 2)),
            activity(2, d(2026, 1, 1), d(2026, 1, 2)),
        ];
        let l = layout(&acts, TimelineScale::Day, 0);
        assert_eq!(l.bars[0].y, BAR_OFFSET);
        assert_eq!(l.bars[1].y, ROW_HEIGHT + BAR_OFFSET);
        assert_eq!(l.height, 2.0 * ROW_HEIGHT);
    }

    #[test]
    fn test_dependency_endpoints() {
        let mut a = activity(1, d(2026, 1, 1), d(2026, 1, 11));
        a.successors = vec![2];
        a.is_critical = true;
        let mut b = activity(2, d(2026, 1, 11), d(2026, 1, 21));
        b.predecessors = vec![1];
        b.is_critical = true;

        let l = layout(&[a, b], TimelineScale::Day, 0);
        // Listed on both sides, drawn once.
        assert_eq!(l.dependencies.len(), 1);
        let dep = &l.dependencies[0];
        assert_eq!((dep.from, dep.to), (1, 2));
        assert_eq!(dep.x1, 400.0);
        assert_eq!(dep.y1, BAR_OFFSET + BAR_HEIGHT / 2.0);
        assert_eq!(dep.x2, 400.0);
        assert_eq!(dep.y2, ROW_HEIGHT + BAR_OFFSET + BAR_HEIGHT / 2.0);
        assert_eq!(dep.points.len(), 4);
        assert!(dep.is_critical);
    }

    #[test]
    fn test_dangling_dependency_skipped() {
        let mut a = activity(1, d(2026, 1, 1), d(2026, 1, 11));
        a.predecessors = vec![99];
        let l = layout(&[a], TimelineScale::Day, 0);
        assert!(l.dependencies.is_empty());
    }

    #[test]
    fn test_ticks_inside_bounds() {
        let acts = vec![activity(1, d(2026, 1, 20), d(2026, 4, 10))];
        let l = layout(&acts, TimelineScale::Month, PADDING_DAYS);
        let b = l.bounds.unwrap();
        assert!(!l.ticks.is_empty());
        assert!(l.ticks.iter().all(|t| t.date >= b.start && t.date <= b.end));
        assert!(l.ticks.iter().all(|t| t.x >= 0.0 && t.x <= l.width));
    }
}
