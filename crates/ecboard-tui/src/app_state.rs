//! AppState: shared read-only data passed to all components during render.
//!
//! The App event-loop is the only thing that writes to AppState.

use std::collections::VecDeque;
use std::time::Duration;

use ecboard_proto::photos::PhotoDirectory;
use ecboard_proto::protocol::DashboardSnapshot;

/// Lines kept for the log strip.
const MAX_LOG_LINES: usize = 200;

pub struct AppState {
    /// Latest scheduler snapshot, refreshed every redraw tick.
    pub snapshot: DashboardSnapshot,
    pub photos: PhotoDirectory,
    pub rotation_period: Duration,
    pub refresh_period: Duration,
    /// Where candidates come from, for the sidebar.
    pub source_label: String,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(
        snapshot: DashboardSnapshot,
        photos: PhotoDirectory,
        rotation_period: Duration,
        refresh_period: Duration,
        source_label: String,
    ) -> Self {
        Self {
            snapshot,
            photos,
            rotation_period,
            refresh_period,
            source_label,
            logs: VecDeque::new(),
        }
    }

    /// Append a timestamped line to the log strip.
    pub fn push_log(&mut self, msg: impl AsRef<str>) {
        let line = format!("{} {}", chrono::Local::now().format("%H:%M:%S"), msg.as_ref());
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }
}
