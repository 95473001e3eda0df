//! App: dashboard event loop.
//!
//! Architecture:
//! - `App` owns the components and `AppState`.
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks (terminal input, manual refresh results).
//! - A 250 ms redraw tick pulls a fresh `DashboardSnapshot` from the
//!   scheduler so the countdown stays live.
//! - Keys map to `Action`s; App applies each one to the scheduler, then
//!   hands it to every component once.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use ecboard_proto::photos::PhotoDirectory;
use ecboard_proto::protocol::{DashboardSnapshot, ViewState};
use ecboard_proto::scheduler::{FetchOutcome, Scheduler, TimerHandles};

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::{CandidateGrid, Header, Sidebar};
use crate::widgets::status_bar;

const REDRAW_PERIOD: Duration = Duration::from_millis(250);

/// Messages from background tasks into the event loop.
enum AppMessage {
    Event(Event),
    Refreshed(FetchOutcome),
}

pub struct App {
    scheduler: Arc<Scheduler>,
    state: AppState,

    header: Header,
    sidebar: Sidebar,
    grid: CandidateGrid,

    should_quit: bool,
    tx: Option<mpsc::Sender<AppMessage>>,
}

/// Global key map.
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('1') => Some(Action::SelectView(ViewState::Leaders)),
        KeyCode::Char('2') => Some(Action::SelectView(ViewState::Remaining)),
        KeyCode::Tab => Some(Action::ToggleView),
        KeyCode::Char('s') => Some(Action::ToggleSidebar),
        _ => None,
    }
}

/// Log-strip lines describing what changed between two snapshots.
pub fn snapshot_changes(old: &DashboardSnapshot, new: &DashboardSnapshot) -> Vec<String> {
    let mut out = Vec::new();
    if new.refresh_count > old.refresh_count {
        out.push(format!("scheduled refresh #{}", new.refresh_count));
    }
    if new.last_refresh.is_some() && new.last_refresh != old.last_refresh {
        out.push(format!("loaded {} candidates", new.candidates.len()));
    }
    if let Some(err) = &new.last_error {
        if old.last_error.as_ref() != Some(err) {
            out.push(format!("{}; showing fallback data", err));
        }
    }
    out
}

impl App {
    pub async fn new(
        scheduler: Arc<Scheduler>,
        photos: PhotoDirectory,
        source_label: String,
    ) -> Self {
        let snapshot = scheduler.snapshot().await;
        let state = AppState::new(
            snapshot,
            photos,
            scheduler.rotation_period(),
            scheduler.refresh_period(),
            source_label,
        );
        Self {
            scheduler,
            state,
            header: Header::new(),
            sidebar: Sidebar::new(),
            grid: CandidateGrid::new(),
            should_quit: false,
            tx: None,
        }
    }

    pub async fn run(mut self, timers: TimerHandles) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());
        self.state.push_log("ecboard started");

        // ── Background task: keyboard events ──────────────────────────────────
        // Polls so the thread notices the loop has exited and the channel closed.
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        let mut redraw = tokio::time::interval(REDRAW_PERIOD);
        redraw.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg).await;
                }
                _ = redraw.tick() => {
                    self.sync().await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("shutting down timers");
        timers.shutdown();
        self.tx = None;
        drop(rx);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if let Some(action) = key_to_action(key) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::Refreshed(FetchOutcome::Superseded) => {
                self.state.push_log("refresh superseded by a newer one");
            }
            AppMessage::Refreshed(_) => self.sync().await,
        }
    }

    async fn dispatch(&mut self, action: Action) {
        debug!("dispatch {:?}", action);
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => self.spawn_manual_refresh(),
            Action::SelectView(view) => self.scheduler.set_view(view).await,
            Action::ToggleView => {
                self.scheduler.toggle_view().await;
            }
            Action::ToggleSidebar => {}
        }

        let components: [&mut dyn Component; 3] =
            [&mut self.header, &mut self.sidebar, &mut self.grid];
        for component in components {
            component.on_action(&action, &self.state);
        }
        self.sync().await;
    }

    fn spawn_manual_refresh(&mut self) {
        self.state.push_log("manual refresh");
        let scheduler = Arc::clone(&self.scheduler);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = scheduler.manual_refresh().await;
            if let Some(tx) = tx {
                let _ = tx.send(AppMessage::Refreshed(outcome)).await;
            }
        });
    }

    /// Pull the scheduler's current state and log what changed.
    async fn sync(&mut self) {
        let snapshot = self.scheduler.snapshot().await;
        for line in snapshot_changes(&self.state.snapshot, &snapshot) {
            self.state.push_log(line);
        }
        self.state.snapshot = snapshot;
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | body | separator | log | keys ─────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], &self.state);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(self.sidebar.width()), Constraint::Min(0)])
            .split(outer[1]);
        self.sidebar.draw(frame, body[0], &self.state);
        self.grid.draw(frame, body[1], &self.state);

        status_bar::draw_separator(frame, outer[2]);
        status_bar::draw_log_bar(
            frame,
            outer[3],
            self.state.last_log(),
            &self.state.snapshot.status(),
        );
        status_bar::draw_keys_bar(frame, outer[4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::{candidate, snapshot};
    use ecboard_proto::source::MisconfiguredSource;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_map() {
        assert_eq!(key_to_action(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(key_to_action(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(key_to_action(press(KeyCode::Char('r'))), Some(Action::Refresh));
        assert_eq!(
            key_to_action(press(KeyCode::Char('2'))),
            Some(Action::SelectView(ViewState::Remaining))
        );
        assert_eq!(key_to_action(press(KeyCode::Tab)), Some(Action::ToggleView));
        assert_eq!(key_to_action(press(KeyCode::Char('s'))), Some(Action::ToggleSidebar));
        assert_eq!(key_to_action(press(KeyCode::Char('x'))), None);

        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(release), None);
    }

    #[test]
    fn test_snapshot_changes() {
        let old = snapshot(Vec::new());
        assert!(snapshot_changes(&old, &old).is_empty());

        let mut new = snapshot(vec![candidate(1, "A"), candidate(2, "B")]);
        new.refresh_count = 1;
        new.last_refresh = Some(chrono::Local::now());
        assert_eq!(
            snapshot_changes(&old, &new),
            vec!["scheduled refresh #1", "loaded 2 candidates"]
        );

        let mut failed = new.clone();
        failed.last_error = Some("Failed to load data from Google Sheets: boom".into());
        let lines = snapshot_changes(&new, &failed);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("showing fallback data"));
        // the same error is not repeated on every tick
        assert!(snapshot_changes(&failed, &failed).is_empty());
    }

    async fn app() -> (App, Arc<Scheduler>) {
        let scheduler = Arc::new(Scheduler::with_periods(
            Arc::new(MisconfiguredSource::new("test")),
            Duration::from_secs(10),
            Duration::from_secs(60),
        ));
        let app = App::new(Arc::clone(&scheduler), PhotoDirectory::default(), "test".into()).await;
        (app, scheduler)
    }

    #[tokio::test]
    async fn test_tab_flips_the_view_after_an_unseen_rotation() {
        let (mut app, scheduler) = app().await;
        assert_eq!(app.state.snapshot.view, ViewState::Leaders);

        // rotation fires between redraws; the app still holds the old view
        scheduler.rotate_view().await;
        assert_eq!(app.state.snapshot.view, ViewState::Leaders);

        app.dispatch(Action::ToggleView).await;
        assert_eq!(scheduler.snapshot().await.view, ViewState::Leaders);
        assert_eq!(app.state.snapshot.view, ViewState::Leaders);

        app.dispatch(Action::ToggleView).await;
        assert_eq!(app.state.snapshot.view, ViewState::Remaining);
    }

    #[tokio::test]
    async fn test_dispatch_reaches_components() {
        let (mut app, _scheduler) = app().await;
        assert!(app.sidebar.expanded);
        app.dispatch(Action::ToggleSidebar).await;
        assert!(!app.sidebar.expanded);
        app.dispatch(Action::SelectView(ViewState::Remaining)).await;
        assert_eq!(app.state.snapshot.view, ViewState::Remaining);
        assert!(!app.sidebar.expanded);
        app.dispatch(Action::Quit).await;
        assert!(app.should_quit);
    }
}
