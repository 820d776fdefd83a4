// src/tui/widgets/settings.rs — Stored connections, sync schedule and selection (Tab 5).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::alert;
use crate::data::{DataMode, DataSource};
use crate::settings::{ConnectionConfig, SourceSystem, SyncSettings};
use crate::tui::data::SettingsData;
use crate::tui::theme::Theme;

pub struct Context<'a> {
    pub tenant: &'a str,
    pub mode: DataMode,
    pub source: DataSource,
}

pub fn render(f: &mut Frame, area: Rect, data: &SettingsData, ctx: &Context<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_session(f, rows[0], data, ctx);
    match &data.connections {
        Ok(list) => render_connections(f, bottom[0], list),
        Err(e) => alert(f, bottom[0], "Connections", e),
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(bottom[1]);
    match &data.sync {
        Ok(s) => render_sync(f, right[0], s),
        Err(e) => alert(f, right[0], "Sync Schedule", e),
    }
    match &data.selected_projects {
        Ok(ids) => render_selection(f, right[1], ids),
        Err(e) => alert(f, right[1], "Selected Projects", e),
    }
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Theme::border())
}

fn render_session(f: &mut Frame, area: Rect, data: &SettingsData, ctx: &Context<'_>) {
    let lines = vec![
        Line::from(vec![
            Span::styled("  Tenant:     ", Theme::text_dim()),
            Span::styled(ctx.tenant.to_string(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Data mode:  ", Theme::text_dim()),
            Span::styled(ctx.mode.to_string(), Theme::highlight()),
            Span::styled("   source ", Theme::text_dim()),
            Span::styled(ctx.source.to_string(), Theme::info()),
        ]),
        Line::from(vec![
            Span::styled("  Settings:   ", Theme::text_dim()),
            Span::styled(data.db_path.display().to_string(), Theme::text_dim()),
        ]),
    ];
    let p = Paragraph::new(lines).block(panel("Session"));
    f.render_widget(p, area);
}

fn render_connections(f: &mut Frame, area: Rect, list: &[ConnectionConfig]) {
    let mut lines = Vec::new();
    for system in SourceSystem::ALL {
        lines.push(Line::from(Span::styled(
            format!("  {}", system.label()),
            Theme::highlight(),
        )));
        match list.iter().find(|c| c.system == system) {
            None => lines.push(Line::from(Span::styled(
                "    not configured",
                Theme::text_dim(),
            ))),
            Some(c) => {
                lines.push(Line::from(vec![
                    Span::styled("    Host:    ", Theme::text_dim()),
                    Span::styled(c.host.clone(), Theme::text()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("    User:    ", Theme::text_dim()),
                    Span::styled(c.username.clone(), Theme::text()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("    Status:  ", Theme::text_dim()),
                    Span::styled(c.status.as_str(), Theme::connection(c.status)),
                ]));
                if let Some(msg) = &c.last_message {
                    lines.push(Line::from(Span::styled(
                        format!("    {msg}"),
                        Theme::text_dim(),
                    )));
                }
            }
        }
        lines.push(Line::from(""));
    }

    let p = Paragraph::new(lines)
        .block(panel("Connections"))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn on_off(flag: bool) -> Span<'static> {
    if flag {
        Span::styled("on", Theme::success())
    } else {
        Span::styled("off", Theme::text_dim())
    }
}

fn render_sync(f: &mut Frame, area: Rect, s: &SyncSettings) {
    let lines = vec![
        Line::from(vec![Span::styled("  Scheduled:  ", Theme::text_dim()), on_off(s.enabled)]),
        Line::from(vec![
            Span::styled("  Interval:   ", Theme::text_dim()),
            Span::styled(format!("{} min", s.interval_minutes), Theme::text()),
        ]),
        Line::from(vec![Span::styled("  P6:         ", Theme::text_dim()), on_off(s.p6_enabled)]),
        Line::from(vec![Span::styled("  SAP:        ", Theme::text_dim()), on_off(s.sap_enabled)]),
    ];
    let p = Paragraph::new(lines).block(panel("Sync Schedule"));
    f.render_widget(p, area);
}

fn render_selection(f: &mut Frame, area: Rect, ids: &[String]) {
    let lines: Vec<Line> = if ids.is_empty() {
        vec![Line::from(Span::styled("  all projects", Theme::text_dim()))]
    } else {
        ids.iter()
            .map(|id| Line::from(Span::styled(format!("  {id}"), Theme::text())))
            .collect()
    };
    let p = Paragraph::new(lines).block(panel(&format!("Selected Projects ({})", ids.len())));
    f.render_widget(p, area);
}
