// src/tui/widgets/wbs.rs — Collapsible WBS tree with cost rollup (Tab 3).

use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{alert, truncate};
use crate::metrics::format::{format_currency, format_percent};
use crate::tui::data::ProjectData;
use crate::tui::theme::Theme;
use crate::wbs::{flatten, WbsNode};

pub fn render(
    f: &mut Frame,
    area: Rect,
    data: Option<&ProjectData>,
    collapsed: &HashSet<i64>,
    state: &mut TableState,
) {
    let Some(data) = data else {
        super::no_project(f, area, "WBS");
        return;
    };
    let tree = match &data.wbs {
        Ok(t) => t,
        Err(e) => return alert(f, area, "WBS", e),
    };

    let header = Row::new(vec![
        Cell::from("Code").style(Theme::table_header()),
        Cell::from("Element").style(Theme::table_header()),
        Cell::from("Budget").style(Theme::table_header()),
        Cell::from("Actual").style(Theme::table_header()),
        Cell::from("Variance").style(Theme::table_header()),
        Cell::from("Done").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = flatten(&tree.nodes, collapsed)
        .into_iter()
        .map(|n| {
            let variance = n.variance();
            let variance_style = if variance < 0.0 {
                Theme::error()
            } else {
                Theme::text()
            };
            Row::new(vec![
                Cell::from(n.wbs_code.clone()).style(Theme::text_dim()),
                Cell::from(tree_label(n, collapsed)).style(Theme::text()),
                Cell::from(format_currency(n.total_budget)).style(Theme::text()),
                Cell::from(format_currency(n.total_actual)).style(Theme::text()),
                Cell::from(format_currency(variance)).style(variance_style),
                Cell::from(format_percent(n.percent_complete)).style(Theme::text_dim()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(24),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " WBS {}  budget {}  actual {} ",
                    data.project_id,
                    format_currency(tree.total_budget),
                    format_currency(tree.total_actual)
                ))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .row_highlight_style(Theme::table_selected())
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, state);
}

/// Indented name with an expand marker for branches.
pub fn tree_label(node: &WbsNode, collapsed: &HashSet<i64>) -> String {
    let marker = if node.is_leaf() {
        "  "
    } else if collapsed.contains(&node.object_id) {
        "\u{25b8} "
    } else {
        "\u{25be} "
    };
    format!(
        "{}{}{}",
        "  ".repeat(node.depth),
        marker,
        truncate(&node.name, 40)
    )
}
