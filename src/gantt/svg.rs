// src/gantt/svg.rs — Standalone SVG rendering of a Gantt layout

use std::collections::HashMap;

use super::layout::{GanttLayout, ROW_HEIGHT};
use crate::model::GanttActivity;

const LABEL_WIDTH: f64 = 260.0;
const HEADER_HEIGHT: f64 = 28.0;

const COLOR_BAR: &str = "#4f7cff";
const COLOR_PROGRESS: &str = "#2c4fc7";
const COLOR_CRITICAL: &str = "#e5484d";
const COLOR_MILESTONE: &str = "#f5a524";
const COLOR_LINK: &str = "#8892a6";
const COLOR_GRID: &str = "#e4e7ee";
const COLOR_TEXT: &str = "#1f2430";

/// Render `layout` to an SVG document. `activities` supplies row labels and
/// must be the same slice the layout was computed from.
pub fn render(layout: &GanttLayout, activities: &[GanttActivity]) -> String {
    let width = LABEL_WIDTH + layout.width;
    let height = HEADER_HEIGHT + layout.height;
    let names: HashMap<i64, &GanttActivity> =
        activities.iter().map(|a| (a.object_id, a)).collect();

    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif" font-size="11">"#
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<rect width="{width:.0}" height="{height:.0}" fill="white"/>"#
    ));
    out.push('\n');

    // Header ticks and vertical grid
    for tick in &layout.ticks {
        let x = LABEL_WIDTH + tick.x;
        out.push_str(&format!(
            r#"<line x1="{x:.1}" y1="0" x2="{x:.1}" y2="{height:.0}" stroke="{COLOR_GRID}"/>"#
        ));
        out.push_str(&format!(
            r#"<text x="{:.1}" y="18" fill="{COLOR_TEXT}">{}</text>"#,
            x + 3.0,
            escape(&tick.label)
        ));
        out.push('\n');
    }

    // Row labels
    for (row, bar) in layout.bars.iter().enumerate() {
        let y = HEADER_HEIGHT + row as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0 + 4.0;
        let label = names
            .get(&bar.object_id)
            .map(|a| format!("{} {}", a.activity_id, a.name))
            .unwrap_or_else(|| bar.object_id.to_string());
        out.push_str(&format!(
            r#"<text x="6" y="{y:.1}" fill="{COLOR_TEXT}">{}</text>"#,
            escape(&label)
        ));
        out.push('\n');
    }

    // Dependencies under the bars
    for dep in &layout.dependencies {
        let points: Vec<String> = dep
            .points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", LABEL_WIDTH + x, HEADER_HEIGHT + y))
            .collect();
        let color = if dep.is_critical {
            COLOR_CRITICAL
        } else {
            COLOR_LINK
        };
        out.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1"/>"#,
            points.join(" ")
        ));
        out.push('\n');
    }

    for bar in &layout.bars {
        let x = LABEL_WIDTH + bar.x;
        let y = HEADER_HEIGHT + bar.y;
        if bar.is_milestone {
            let cx = x + bar.width / 2.0;
            let cy = y + bar.height / 2.0;
            // Diamond spans the bar's own box.
            let (rx, ry) = (bar.width / 2.0, bar.height / 2.0);
            let fill = if bar.is_critical {
                COLOR_CRITICAL
            } else {
                COLOR_MILESTONE
            };
            out.push_str(&format!(
                r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="{fill}"/>"#,
                cx,
                cy - ry,
                cx + rx,
                cy,
                cx,
                cy + ry,
                cx - rx,
                cy
            ));
        } else {
            let fill = if bar.is_critical {
                COLOR_CRITICAL
            } else {
                COLOR_BAR
            };
            out.push_str(&format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" rx="3" fill="{fill}" fill-opacity="0.55"/>"#,
                bar.width, bar.height
            ));
            if bar.progress_width > 0.0 {
                out.push_str(&format!(
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" rx="3" fill="{COLOR_PROGRESS}"/>"#,
                    bar.progress_width, bar.height
                ));
            }
            if bar.is_critical {
                let uy = y + bar.height + 2.0;
                out.push_str(&format!(
                    r#"<line x1="{x:.1}" y1="{uy:.1}" x2="{:.1}" y2="{uy:.1}" stroke="{COLOR_CRITICAL}" stroke-width="2"/>"#,
                    x + bar.width
                ));
            }
        }
        out.push('\n');
    }

    out.push_str("</svg>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gantt::layout::{layout, PADDING_DAYS};
    use crate::gantt::scale::TimelineScale;
    use chrono::NaiveDate;

    fn acts() -> Vec<GanttActivity> {
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        vec![
            GanttActivity {
                object_id: 1,
                wbs_object_id: None,
                activity_id: "E100".into(),
                name: "P&ID review <rev B>".into(),
                planned_start: d(1, 5),
                planned_finish: d(2, 4),
                actual_start: None,
                actual_finish: None,
                percent_complete: 40.0,
                is_critical: true,
                is_milestone: false,
                predecessors: vec![],
                successors: vec![2],
            },
            GanttActivity {
                object_id: 2,
                wbs_object_id: None,
                activity_id: "M100".into(),
                name: "IFC issued".into(),
                planned_start: d(2, 4),
                planned_finish: d(2, 4),
                actual_start: None,
                actual_finish: None,
                percent_complete: 0.0,
                is_critical: true,
                is_milestone: true,
                predecessors: vec![1],
                successors: vec![],
            },
        ]
    }

    #[test]
    fn test_render_contains_shapes() {
        let a = acts();
        let l = layout(&a, TimelineScale::Week, PADDING_DAYS);
        let svg = render(&l, &a);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(COLOR_CRITICAL));
    }

    #[test]
    fn test_milestone_diamond_spans_bar_width() {
        let a = acts();
        let l = layout(&a, TimelineScale::Week, PADDING_DAYS);
        let bar = l.bars.iter().find(|b| b.is_milestone).unwrap();
        assert_eq!(bar.width, crate::gantt::layout::MILESTONE_MIN_WIDTH);

        let left = LABEL_WIDTH + bar.x;
        let right = left + bar.width;
        let cx = left + bar.width / 2.0;
        let top = HEADER_HEIGHT + bar.y;
        let cy = top + bar.height / 2.0;
        let expected = format!(
            "{cx:.1},{top:.1} {right:.1},{cy:.1} {cx:.1},{:.1} {left:.1},{cy:.1}",
            top + bar.height
        );
        assert!(render(&l, &a).contains(&expected), "missing diamond {expected}");
    }

    #[test]
    fn test_labels_are_escaped() {
        let a = acts();
        let l = layout(&a, TimelineScale::Month, PADDING_DAYS);
        let svg = render(&l, &a);
        assert!(svg.contains("P&amp;ID review &lt;rev B&gt;"));
        assert!(!svg.contains("<rev B>"));
    }

    #[test]
    fn test_empty_layout_is_valid_document() {
        let l = layout(&[], TimelineScale::Month, PADDING_DAYS);
        let svg = render(&l, &[]);
        assert!(svg.contains("width=\"260\""));
        assert!(svg.ends_with("</svg>\n"));
    }
}
