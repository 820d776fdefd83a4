// src/tui/widgets/projects.rs — Project picker and detail header (Tab 2).

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{alert, truncate};
use crate::metrics::format::{format_currency, format_index, format_percent};
use crate::model::{Project, ProjectDetail};
use crate::tui::data::{ProjectData, Slice};
use crate::tui::theme::Theme;

pub fn render(
    f: &mut Frame,
    area: Rect,
    projects: &Slice<Vec<Project>>,
    selected: Option<&ProjectData>,
    state: &mut TableState,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    match projects {
        Ok(list) => render_list(f, chunks[0], list, state),
        Err(e) => alert(f, chunks[0], "Projects", e),
    }

    match selected {
        None => super::no_project(f, chunks[1], "Detail"),
        Some(data) => match &data.detail {
            Ok(Some(detail)) => render_detail(f, chunks[1], detail),
            Ok(None) => {
                let msg = format!("{} was not found.", data.project_id);
                let p = Paragraph::new(Line::from(Span::styled(msg, Theme::text_dim())))
                    .block(detail_block(&data.project_id));
                f.render_widget(p, chunks[1]);
            }
            Err(e) => alert(f, chunks[1], &data.project_id, e),
        },
    }
}

fn render_list(f: &mut Frame, area: Rect, list: &[Project], state: &mut TableState) {
    let header = Row::new(vec![
        Cell::from("ID").style(Theme::table_header()),
        Cell::from("Name").style(Theme::table_header()),
        Cell::from("Status").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = list
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.id.clone()).style(Theme::text_dim()),
                Cell::from(truncate(&p.name, 32)).style(Theme::text()),
                Cell::from(p.status.label()).style(Theme::health(p.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(16),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Projects ({}) ", list.len()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .row_highlight_style(Theme::table_selected())
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, state);
}

fn detail_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Theme::border())
}

fn render_detail(f: &mut Frame, area: Rect, d: &ProjectDetail) {
    let date = |v: Option<NaiveDate>| v.map(|d| d.to_string()).unwrap_or_else(|| "-".into());

    let field = |label: &'static str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), Theme::text_dim()),
            Span::styled(value, style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(format!("  {}", d.name), Theme::highlight())),
        Line::from(""),
        field("Code", d.code.clone(), Theme::text()),
        field("Status", d.status.label().to_string(), Theme::health(d.status)),
        field("Health score", format!("{}/100", d.health_score), Theme::health(d.status)),
        field("Complete", format_percent(d.percent_complete), Theme::text()),
        field("SPI", format_index(d.spi), Theme::index(d.spi)),
        field("CPI", format_index(d.cpi), Theme::index(d.cpi)),
        field("BAC", format_currency(d.budget_at_completion), Theme::text()),
        Line::from(""),
        field("Planned start", date(d.planned_start), Theme::text()),
        field("Planned finish", date(d.planned_finish), Theme::text()),
        field("Data date", date(d.data_date), Theme::text_dim()),
    ];

    let p = Paragraph::new(lines).block(detail_block(&d.id));
    f.render_widget(p, area);
}
