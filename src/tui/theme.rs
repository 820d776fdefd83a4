// src/tui/theme.rs — Color scheme and style definitions for the TUI dashboard.

use ratatui::style::{Color, Modifier, Style};

use crate::metrics::health::{HealthStatus, PortfolioStatus, CRITICAL_THRESHOLD, ON_TRACK_THRESHOLD};
use crate::model::SyncState;
use crate::settings::ConnectionStatus;

/// Control-room palette: navy ground, amber accents.
pub struct Theme;

impl Theme {
    // ── Brand colors ─────────────────────────────────────────────
    pub const AMBER: Color = Color::Rgb(245, 166, 35);
    pub const WHITE: Color = Color::Rgb(236, 239, 244);
    pub const NAVY: Color = Color::Rgb(16, 24, 40);
    pub const BLUE: Color = Color::Rgb(59, 130, 246);
    pub const GREEN: Color = Color::Rgb(34, 197, 94);
    pub const RED: Color = Color::Rgb(239, 68, 68);
    pub const YELLOW: Color = Color::Rgb(234, 179, 8);
    pub const GRAY: Color = Color::Rgb(125, 133, 151);
    pub const DIM: Color = Color::Rgb(71, 80, 100);
    pub const CYAN: Color = Color::Rgb(34, 211, 238);

    // ── Semantic styles ──────────────────────────────────────────

    pub fn tab_active() -> Style {
        Style::default().fg(Theme::AMBER).add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn header() -> Style {
        Style::default().fg(Theme::AMBER).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    /// Border of a panel showing a load error.
    pub fn border_alert() -> Style {
        Style::default().fg(Theme::RED)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::WHITE)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn success() -> Style {
        Style::default().fg(Theme::GREEN)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::RED)
    }

    pub fn info() -> Style {
        Style::default().fg(Theme::BLUE)
    }

    pub fn highlight() -> Style {
        Style::default().fg(Theme::CYAN).add_modifier(Modifier::BOLD)
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::AMBER)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn table_selected() -> Style {
        Style::default().bg(Color::Rgb(30, 41, 64)).fg(Theme::WHITE)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Theme::AMBER)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    // ── Domain styles ────────────────────────────────────────────

    pub fn health(status: HealthStatus) -> Style {
        match status {
            HealthStatus::OnTrack => Theme::success(),
            HealthStatus::AtRisk => Theme::warning(),
            HealthStatus::Critical => Theme::error(),
        }
    }

    pub fn portfolio(status: PortfolioStatus) -> Style {
        let base = match status {
            PortfolioStatus::OnTrack => Theme::success(),
            PortfolioStatus::AtRisk => Theme::warning(),
            PortfolioStatus::Critical => Theme::error(),
        };
        base.add_modifier(Modifier::BOLD)
    }

    /// SPI/CPI colored by the same bands as the health classifier.
    pub fn index(value: f64) -> Style {
        if value >= ON_TRACK_THRESHOLD {
            Theme::success()
        } else if value >= CRITICAL_THRESHOLD {
            Theme::warning()
        } else {
            Theme::error()
        }
    }

    pub fn sync_state(state: SyncState) -> Style {
        match state {
            SyncState::Success => Theme::success(),
            SyncState::Running => Theme::info(),
            SyncState::Failed => Theme::error(),
            SyncState::Never => Theme::text_dim(),
        }
    }

    pub fn connection(status: ConnectionStatus) -> Style {
        match status {
            ConnectionStatus::Connected => Theme::success(),
            ConnectionStatus::Failed => Theme::error(),
            ConnectionStatus::Untested => Theme::text_dim(),
        }
    }

    /// Gantt bar fill.
    pub fn bar(critical: bool) -> Style {
        if critical {
            Style::default().fg(Theme::RED)
        } else {
            Style::default().fg(Theme::BLUE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bands_follow_classifier() {
        assert_eq!(Theme::index(0.95).fg, Some(Theme::GREEN));
        assert_eq!(Theme::index(0.90).fg, Some(Theme::YELLOW));
        assert_eq!(Theme::index(0.85).fg, Some(Theme::YELLOW));
        assert_eq!(Theme::index(0.84).fg, Some(Theme::RED));
    }

    #[test]
    fn test_health_colors() {
        assert_eq!(Theme::health(HealthStatus::OnTrack).fg, Some(Theme::GREEN));
        assert_eq!(Theme::health(HealthStatus::AtRisk).fg, Some(Theme::YELLOW));
        assert_eq!(Theme::health(HealthStatus::Critical).fg, Some(Theme::RED));
    }

    #[test]
    fn test_portfolio_is_bold() {
        let s = Theme::portfolio(PortfolioStatus::Critical);
        assert_eq!(s.fg, Some(Theme::RED));
        assert!(s.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_sync_never_is_dim() {
        assert_eq!(Theme::sync_state(SyncState::Never), Theme::text_dim());
    }

    #[test]
    fn test_tab_active_is_amber_bold() {
        let s = Theme::tab_active();
        assert_eq!(s.fg, Some(Theme::AMBER));
        assert!(s.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_table_header_style() {
        let s = Theme::table_header();
        assert!(s.add_modifier.contains(Modifier::BOLD));
        assert!(s.add_modifier.contains(Modifier::UNDERLINED));
    }
}
