// src/tui/app.rs — TUI application state, event loop, and rendering.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, TableState, Tabs},
    Frame, Terminal,
};

use crate::cli::repository;
use crate::data::{DataMode, PortfolioRepository, Scope};
use crate::gantt::TimelineScale;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::wbs::flatten;

use super::data::{self, DashboardData, ProjectData, SettingsData};
use super::theme::Theme;
use super::widgets;

const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

// ── Tab enum ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Projects,
    Wbs,
    Gantt,
    Settings,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Dashboard, Tab::Projects, Tab::Wbs, Tab::Gantt, Tab::Settings];

    fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Projects => "Projects",
            Tab::Wbs => "WBS",
            Tab::Gantt => "Gantt",
            Tab::Settings => "Settings",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn from_index(i: usize) -> Tab {
        *Tab::ALL.get(i).unwrap_or(&Tab::Dashboard)
    }
}

// ── App state ────────────────────────────────────────────────────

struct App {
    repo: Arc<dyn PortfolioRepository>,
    scope: Scope,
    limit: usize,
    scale: TimelineScale,
    padding_days: i64,
    db_path: PathBuf,

    active_tab: Tab,
    dashboard: DashboardData,
    project: Option<ProjectData>,
    settings: SettingsData,
    last_refresh: Instant,

    // Per-tab interactive state
    project_table_state: TableState,
    wbs_table_state: TableState,
    collapsed: HashSet<i64>,
    gantt_scroll: u16,
}

impl App {
    async fn load(
        repo: Arc<dyn PortfolioRepository>,
        scope: Scope,
        config: &Config,
        db_path: PathBuf,
    ) -> Self {
        let limit = config.data.max_limit;
        let dashboard = data::load_dashboard(repo.as_ref(), &scope, limit).await;
        let settings = data::load_settings(&db_path, &scope.tenant);
        let mut app = Self {
            repo,
            scope,
            limit,
            scale: config.gantt.default_scale,
            padding_days: config.gantt.padding_days,
            db_path,
            active_tab: Tab::Dashboard,
            dashboard,
            project: None,
            settings,
            last_refresh: Instant::now(),
            project_table_state: TableState::default(),
            wbs_table_state: TableState::default(),
            collapsed: HashSet::new(),
            gantt_scroll: 0,
        };
        if !app.dashboard.project_ids().is_empty() {
            app.project_table_state.select(Some(0));
            app.open_selected().await;
        }
        app
    }

    fn next_tab(&mut self) {
        let idx = self.active_tab.index();
        self.active_tab = Tab::from_index((idx + 1) % Tab::ALL.len());
    }

    fn prev_tab(&mut self) {
        let idx = self.active_tab.index();
        self.active_tab = Tab::from_index((idx + Tab::ALL.len() - 1) % Tab::ALL.len());
    }

    fn wbs_rows(&self) -> usize {
        match self.project.as_ref().map(|p| &p.wbs) {
            Some(Ok(tree)) => flatten(&tree.nodes, &self.collapsed).len(),
            _ => 0,
        }
    }

    fn scroll_down(&mut self) {
        match self.active_tab {
            Tab::Projects => {
                let max = self.dashboard.project_ids().len().saturating_sub(1);
                let i = self.project_table_state.selected().unwrap_or(0);
                self.project_table_state.select(Some((i + 1).min(max)));
            }
            Tab::Wbs => {
                let max = self.wbs_rows().saturating_sub(1);
                let i = self.wbs_table_state.selected().unwrap_or(0);
                self.wbs_table_state.select(Some((i + 1).min(max)));
            }
            Tab::Gantt => self.gantt_scroll = self.gantt_scroll.saturating_add(1),
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.active_tab {
            Tab::Projects => {
                let i = self.project_table_state.selected().unwrap_or(0);
                self.project_table_state.select(Some(i.saturating_sub(1)));
            }
            Tab::Wbs => {
                let i = self.wbs_table_state.selected().unwrap_or(0);
                self.wbs_table_state.select(Some(i.saturating_sub(1)));
            }
            Tab::Gantt => self.gantt_scroll = self.gantt_scroll.saturating_sub(1),
            _ => {}
        }
    }

    /// Load detail, WBS and schedule for the highlighted project.
    async fn open_selected(&mut self) {
        let ids = self.dashboard.project_ids();
        let Some(id) = self
            .project_table_state
            .selected()
            .and_then(|i| ids.get(i))
        else {
            return;
        };
        self.project = Some(
            data::load_project(
                self.repo.as_ref(),
                &self.scope,
                id,
                self.scale,
                self.padding_days,
            )
            .await,
        );
        self.collapsed.clear();
        self.wbs_table_state.select(Some(0));
        self.gantt_scroll = 0;
    }

    /// Collapse or expand the highlighted WBS branch.
    fn toggle_wbs(&mut self) {
        let Some(Ok(tree)) = self.project.as_ref().map(|p| &p.wbs) else {
            return;
        };
        let rows = flatten(&tree.nodes, &self.collapsed);
        let Some(node) = self.wbs_table_state.selected().and_then(|i| rows.get(i)) else {
            return;
        };
        if node.is_leaf() {
            return;
        }
        let id = node.object_id;
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    fn zoom(&mut self, scale: TimelineScale) {
        if scale == self.scale {
            return;
        }
        self.scale = scale;
        if let Some(p) = self.project.as_mut() {
            p.rescale(scale, self.padding_days);
        }
    }

    /// On the Dashboard, re-run only the panels that failed (or all of them
    /// when none did). Elsewhere, reload what the tab shows.
    async fn retry(&mut self) {
        match self.active_tab {
            Tab::Dashboard => {
                let mut panels = self.dashboard.failed();
                if panels.is_empty() {
                    panels = vec![data::Panel::Summary, data::Panel::Projects, data::Panel::Sync];
                }
                data::retry(
                    &mut self.dashboard,
                    &panels,
                    self.repo.as_ref(),
                    &self.scope,
                    self.limit,
                )
                .await;
            }
            Tab::Settings => {
                self.settings = data::load_settings(&self.db_path, &self.scope.tenant);
            }
            Tab::Projects | Tab::Wbs | Tab::Gantt => {
                if self.dashboard.projects.is_err() {
                    data::retry(
                        &mut self.dashboard,
                        &[data::Panel::Projects],
                        self.repo.as_ref(),
                        &self.scope,
                        self.limit,
                    )
                    .await;
                }
                self.open_selected().await;
            }
        }
        self.last_refresh = Instant::now();
    }

    async fn refresh(&mut self) {
        self.dashboard = data::load_dashboard(self.repo.as_ref(), &self.scope, self.limit).await;
        self.last_refresh = Instant::now();
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the TUI dashboard. Blocks until the user quits (q / Esc / Ctrl-C).
pub async fn run_dashboard(config: &Config, tenant: &str, mode: DataMode) -> anyhow::Result<()> {
    let repo = repository(config)?;
    tracing::debug!(source = %repo.source(), tenant, %mode, "Opening dashboard");
    let mut app = App::load(repo, Scope::new(tenant, mode), config, paths::db_path()).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if app.last_refresh.elapsed() >= REFRESH_INTERVAL {
            app.refresh().await;
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q')
                    || key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Tab | KeyCode::Right => app.next_tab(),
                    KeyCode::BackTab | KeyCode::Left => app.prev_tab(),

                    KeyCode::Char('1') => app.active_tab = Tab::Dashboard,
                    KeyCode::Char('2') => app.active_tab = Tab::Projects,
                    KeyCode::Char('3') => app.active_tab = Tab::Wbs,
                    KeyCode::Char('4') => app.active_tab = Tab::Gantt,
                    KeyCode::Char('5') => app.active_tab = Tab::Settings,

                    KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                    KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),

                    KeyCode::Enter if app.active_tab == Tab::Projects => {
                        app.open_selected().await
                    }
                    KeyCode::Enter | KeyCode::Char(' ') if app.active_tab == Tab::Wbs => {
                        app.toggle_wbs()
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') if app.active_tab == Tab::Gantt => {
                        app.zoom(app.scale.zoom_in())
                    }
                    KeyCode::Char('-') if app.active_tab == Tab::Gantt => {
                        app.zoom(app.scale.zoom_out())
                    }

                    KeyCode::Char('r') => app.retry().await,

                    _ => {}
                }
            }
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Footer / key hints
        ])
        .split(size);

    render_header(f, chunks[0], app);
    render_tab_content(f, chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let label = format!(" {} {} ", i + 1, tab.label());
            if *tab == app.active_tab {
                Line::from(Span::styled(label, Theme::tab_active()))
            } else {
                Line::from(Span::styled(label, Theme::tab_inactive()))
            }
        })
        .collect();

    let title = format!(
        " ORION  {}  {} / {} ",
        app.scope.tenant, app.scope.mode, app.dashboard.source
    );
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(Span::styled(title, Theme::header()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .select(app.active_tab.index())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled(" | ", Theme::text_dim()));

    f.render_widget(tabs, area);
}

fn render_tab_content(f: &mut Frame, area: Rect, app: &mut App) {
    match app.active_tab {
        Tab::Dashboard => widgets::dashboard::render(f, area, &app.dashboard),
        Tab::Projects => widgets::projects::render(
            f,
            area,
            &app.dashboard.projects,
            app.project.as_ref(),
            &mut app.project_table_state,
        ),
        Tab::Wbs => widgets::wbs::render(
            f,
            area,
            app.project.as_ref(),
            &app.collapsed,
            &mut app.wbs_table_state,
        ),
        Tab::Gantt => widgets::gantt::render(f, area, app.project.as_ref(), app.gantt_scroll),
        Tab::Settings => {
            let ctx = widgets::settings::Context {
                tenant: &app.scope.tenant,
                mode: app.scope.mode,
                source: app.dashboard.source,
            };
            widgets::settings::render(f, area, &app.settings, &ctx)
        }
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut hints = vec![
        Span::styled(" q", Theme::key_hint()),
        Span::styled(" quit  ", Theme::key_desc()),
        Span::styled("Tab/\u{2190}\u{2192}", Theme::key_hint()),
        Span::styled(" switch  ", Theme::key_desc()),
        Span::styled("1-5", Theme::key_hint()),
        Span::styled(" jump  ", Theme::key_desc()),
        Span::styled("j/k", Theme::key_hint()),
        Span::styled(" scroll  ", Theme::key_desc()),
    ];
    match app.active_tab {
        Tab::Projects => {
            hints.push(Span::styled("Enter", Theme::key_hint()));
            hints.push(Span::styled(" open  ", Theme::key_desc()));
        }
        Tab::Wbs => {
            hints.push(Span::styled("Space", Theme::key_hint()));
            hints.push(Span::styled(" fold  ", Theme::key_desc()));
        }
        Tab::Gantt => {
            hints.push(Span::styled("+/-", Theme::key_hint()));
            hints.push(Span::styled(" zoom  ", Theme::key_desc()));
        }
        _ => {}
    }
    hints.push(Span::styled("r", Theme::key_hint()));
    hints.push(Span::styled(" retry", Theme::key_desc()));

    f.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MockRepository;

    async fn app() -> App {
        let dir = tempfile::tempdir().unwrap();
        App::load(
            Arc::new(MockRepository::new()),
            Scope::new("demo", DataMode::Mock),
            &Config::default(),
            dir.path().join("orion.db"),
        )
        .await
    }

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::from_index(4), Tab::Settings);
        assert_eq!(Tab::from_index(9), Tab::Dashboard);
        assert_eq!(Tab::Gantt.index(), 3);
    }

    #[tokio::test]
    async fn test_load_opens_first_project() {
        let mut app = app().await;
        assert_eq!(app.project.as_ref().unwrap().project_id, "PRJ-001");

        app.active_tab = Tab::Projects;
        app.scroll_down();
        app.open_selected().await;
        assert_eq!(app.project.as_ref().unwrap().project_id, "PRJ-002");
    }

    #[tokio::test]
    async fn test_wbs_collapse_hides_children() {
        let mut app = app().await;
        app.active_tab = Tab::Wbs;
        let expanded = app.wbs_rows();
        app.wbs_table_state.select(Some(0));
        app.toggle_wbs();
        assert!(app.wbs_rows() < expanded);
        app.toggle_wbs();
        assert_eq!(app.wbs_rows(), expanded);
    }

    #[tokio::test]
    async fn test_zoom_relayouts_chart() {
        let mut app = app().await;
        let start = app.scale;
        app.zoom(start.zoom_in());
        let chart = app.project.as_ref().unwrap().chart.as_ref().unwrap();
        assert_eq!(chart.layout.scale, app.scale);
    }
}
