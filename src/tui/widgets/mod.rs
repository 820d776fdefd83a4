// src/tui/widgets/mod.rs — Widget sub-modules for each tab panel.

pub mod dashboard;
pub mod gantt;
pub mod projects;
pub mod settings;
pub mod wbs;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;

/// Inline alert drawn in place of a panel whose load failed.
pub fn alert(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Theme::border_alert());

    let lines = vec![
        Line::from(Span::styled(" Failed to load", Theme::error())),
        Line::from(""),
        Line::from(Span::styled(format!(" {message}"), Theme::text_dim())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" r", Theme::key_hint()),
            Span::styled(" retry", Theme::key_desc()),
        ]),
    ];
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

/// Placeholder for tabs that need a selected project.
pub fn no_project(f: &mut Frame, area: Rect, title: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let p = Paragraph::new(Line::from(Span::styled(
        "  Select a project on the Projects tab (Enter).",
        Theme::text_dim(),
    )))
    .block(block);
    f.render_widget(p, area);
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Gulf Coast LNG", 20), "Gulf Coast LNG");
        assert_eq!(truncate("Permian Gas Processing Plant", 10), "Permian...");
    }
}
