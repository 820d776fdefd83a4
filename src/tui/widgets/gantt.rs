// src/tui/widgets/gantt.rs — Character-cell Gantt chart (Tab 4).
//
// Bars come from the same pixel layout the SVG exporter uses, scaled down
// to the columns available in the terminal.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{alert, truncate};
use crate::gantt::layout::Bar;
use crate::gantt::GanttChart;
use crate::tui::data::ProjectData;
use crate::tui::theme::Theme;

const LABEL_WIDTH: usize = 28;

pub fn render(f: &mut Frame, area: Rect, data: Option<&ProjectData>, scroll: u16) {
    let Some(data) = data else {
        super::no_project(f, area, "Gantt");
        return;
    };
    let chart = match &data.chart {
        Ok(c) => c,
        Err(e) => return alert(f, area, "Gantt", e),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(format!(
            " Gantt {}  {} scale ",
            chart.project_id, chart.layout.scale
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner_cols = usize::from(chunks[0].width.saturating_sub(2));
    let cols = inner_cols.saturating_sub(LABEL_WIDTH + 1);

    let lines = if chart.activities.is_empty() {
        vec![Line::from(Span::styled(
            "  No activities scheduled.",
            Theme::text_dim(),
        ))]
    } else {
        chart_lines(chart, cols)
    };

    let p = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(p, chunks[0]);

    let critical = chart.activities.iter().filter(|a| a.is_critical).count();
    let legend = Line::from(vec![
        Span::styled(" \u{2588}", Theme::bar(false)),
        Span::styled(" activity  ", Theme::key_desc()),
        Span::styled("\u{2588}", Theme::bar(true)),
        Span::styled(format!(" critical ({critical})  "), Theme::key_desc()),
        Span::styled("\u{25c6}", Theme::warning()),
        Span::styled(" milestone  ", Theme::key_desc()),
        Span::styled("+/-", Theme::key_hint()),
        Span::styled(" zoom", Theme::key_desc()),
    ]);
    f.render_widget(Paragraph::new(legend), chunks[1]);
}

fn chart_lines(chart: &GanttChart, cols: usize) -> Vec<Line<'static>> {
    let total = chart.layout.width;
    let mut lines = Vec::with_capacity(chart.activities.len() + 1);

    let mut axis = vec![b' '; cols];
    for tick in &chart.layout.ticks {
        let (start, _) = cells(tick.x, 0.0, total, cols);
        for (i, b) in tick.label.bytes().enumerate() {
            if let Some(slot) = axis.get_mut(start + i) {
                *slot = b;
            }
        }
    }
    lines.push(Line::from(vec![
        Span::styled(format!("{:<w$} ", "", w = LABEL_WIDTH), Theme::text_dim()),
        Span::styled(String::from_utf8_lossy(&axis).into_owned(), Theme::text_dim()),
    ]));

    for (activity, bar) in chart.activities.iter().zip(&chart.layout.bars) {
        let label = truncate(
            &format!("{} {}", activity.activity_id, activity.name),
            LABEL_WIDTH,
        );
        let mut spans = vec![Span::styled(
            format!("{label:<w$} ", w = LABEL_WIDTH),
            Theme::text(),
        )];
        spans.extend(bar_spans(bar, total, cols));
        lines.push(Line::from(spans));
    }
    lines
}

fn bar_spans(bar: &Bar, total: f64, cols: usize) -> Vec<Span<'static>> {
    let (start, len) = cells(bar.x, bar.width, total, cols);
    let lead = " ".repeat(start);
    if bar.is_milestone {
        return vec![Span::raw(lead), Span::styled("\u{25c6}", Theme::warning())];
    }
    let (_, done) = cells(bar.x, bar.progress_width, total, cols);
    let done = done.min(len);
    vec![
        Span::raw(lead),
        Span::styled("\u{2588}".repeat(done), Theme::bar(bar.is_critical)),
        Span::styled("\u{2591}".repeat(len - done), Theme::bar(bar.is_critical)),
    ]
}

/// Map a pixel span onto `cols` character cells: (first cell, cell count).
/// Any non-empty span keeps at least one cell.
pub fn cells(x: f64, width: f64, total_width: f64, cols: usize) -> (usize, usize) {
    if cols == 0 || total_width <= 0.0 {
        return (0, 0);
    }
    let per_col = total_width / cols as f64;
    let start = ((x / per_col).floor().max(0.0) as usize).min(cols - 1);
    let mut len = (width / per_col).round().max(0.0) as usize;
    if width > 0.0 {
        len = len.max(1);
    }
    (start, len.min(cols - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_scale_down() {
        // 1000px into 100 columns: 10px per cell.
        assert_eq!(cells(0.0, 240.0, 1000.0, 100), (0, 24));
        assert_eq!(cells(505.0, 100.0, 1000.0, 100), (50, 10));
    }

    #[test]
    fn test_cells_keep_short_bars_visible() {
        assert_eq!(cells(100.0, 2.0, 1000.0, 100), (10, 1));
        assert_eq!(cells(100.0, 0.0, 1000.0, 100), (10, 0));
    }

    #[test]
    fn test_cells_clamped_to_width() {
        assert_eq!(cells(990.0, 300.0, 1000.0, 100), (99, 1));
        assert_eq!(cells(10.0, 10.0, 1000.0, 0), (0, 0));
    }
}
