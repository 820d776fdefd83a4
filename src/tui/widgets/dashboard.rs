// src/tui/widgets/dashboard.rs — Portfolio KPIs, sync state and health table (Tab 1).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::{alert, truncate};
use crate::metrics::format::{format_index, format_percent};
use crate::model::{PortfolioSummary, Project, SyncStatus, SystemSync};
use crate::tui::data::DashboardData;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, data: &DashboardData) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    match &data.summary {
        Ok(s) => render_summary(f, top[0], s),
        Err(e) => alert(f, top[0], "Portfolio", e),
    }
    match &data.sync {
        Ok(s) => render_sync(f, top[1], s),
        Err(e) => alert(f, top[1], "Sync", e),
    }
    match &data.projects {
        Ok(p) => render_health(f, rows[1], p),
        Err(e) => alert(f, rows[1], "Project Health", e),
    }
}

fn render_summary(f: &mut Frame, area: Rect, s: &PortfolioSummary) {
    let block = Block::default()
        .title(" Portfolio ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = vec![
        Line::from(vec![
            Span::styled("  Status:    ", Theme::text_dim()),
            Span::styled(s.portfolio_status.as_str(), Theme::portfolio(s.portfolio_status)),
        ]),
        Line::from(vec![
            Span::styled("  Projects:  ", Theme::text_dim()),
            Span::styled(s.total_projects.to_string(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("  On track:  ", Theme::text_dim()),
            Span::styled(format!("{:<4}", s.on_track), Theme::success()),
            Span::styled("At risk: ", Theme::text_dim()),
            Span::styled(format!("{:<4}", s.at_risk), Theme::warning()),
            Span::styled("Critical: ", Theme::text_dim()),
            Span::styled(s.critical.to_string(), Theme::error()),
        ]),
        Line::from(vec![
            Span::styled("  Avg SPI:   ", Theme::text_dim()),
            Span::styled(format_index(s.average_spi), Theme::index(s.average_spi)),
            Span::styled("    Avg CPI: ", Theme::text_dim()),
            Span::styled(format_index(s.average_cpi), Theme::index(s.average_cpi)),
        ]),
    ];

    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn render_sync(f: &mut Frame, area: Rect, s: &SyncStatus) {
    let block = Block::default()
        .title(" Sync ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let next = s
        .next_scheduled
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".into());

    let lines = vec![
        system_line("Primavera P6", &s.p6),
        system_line("SAP", &s.sap),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Next run:     ", Theme::text_dim()),
            Span::styled(next, Theme::text()),
        ]),
    ];

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn system_line<'a>(label: &'a str, s: &SystemSync) -> Line<'a> {
    let link = if s.connected {
        Span::styled("\u{25cf} ", Theme::success())
    } else {
        Span::styled("\u{25cb} ", Theme::text_dim())
    };
    let last = s
        .last_sync
        .map(|t| t.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".into());
    Line::from(vec![
        Span::raw("  "),
        link,
        Span::styled(format!("{label:<13}"), Theme::text()),
        Span::styled(format!("{:<8}", sync_word(s)), Theme::sync_state(s.status)),
        Span::styled(last, Theme::text_dim()),
    ])
}

fn sync_word(s: &SystemSync) -> &'static str {
    use crate::model::SyncState;
    match s.status {
        SyncState::Success => "ok",
        SyncState::Failed => "failed",
        SyncState::Running => "running",
        SyncState::Never => "never",
    }
}

fn render_health(f: &mut Frame, area: Rect, projects: &[Project]) {
    let header = Row::new(vec![
        Cell::from("ID").style(Theme::table_header()),
        Cell::from("Project").style(Theme::table_header()),
        Cell::from("Done").style(Theme::table_header()),
        Cell::from("SPI").style(Theme::table_header()),
        Cell::from("CPI").style(Theme::table_header()),
        Cell::from("Status").style(Theme::table_header()),
        Cell::from("Finish").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = projects
        .iter()
        .map(|p| {
            let finish = p
                .planned_finish
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into());
            Row::new(vec![
                Cell::from(p.id.clone()).style(Theme::text_dim()),
                Cell::from(truncate(&p.name, 36)).style(Theme::text()),
                Cell::from(format_percent(p.percent_complete)).style(Theme::text()),
                Cell::from(format_index(p.spi)).style(Theme::index(p.spi)),
                Cell::from(format_index(p.cpi)).style(Theme::index(p.cpi)),
                Cell::from(p.status.label()).style(Theme::health(p.status)),
                Cell::from(finish).style(Theme::text_dim()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Project Health ({}) ", projects.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(table, area);
}
