//! Scheduler: owns the dashboard state and the two timers that drive it.
//!
//! The rotation timer flips the visible view; the refresh timer re-runs the
//! fetch → transform pipeline and swaps in the new candidate list. Both write
//! into one `RwLock<DashboardState>`; every mutation is a single write-lock
//! critical section and readers take a cloned `DashboardSnapshot`, so a
//! half-replaced list or half-applied flip is never observable.
//!
//! Overlapping fetches (manual refresh while a scheduled one is in flight)
//! are allowed to run. Each takes a ticket when it starts and only the holder
//! of the newest ticket may publish; older responses are dropped.
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::fallback::fallback_candidates;
use crate::protocol::{countdown_secs, CandidateRecord, DashboardSnapshot, ViewState};
use crate::source::CandidateSource;

/// Prefix of `last_error` for failed fetches.
pub const FETCH_ERROR_PREFIX: &str = "Failed to load data from Google Sheets";

#[derive(Debug)]
struct DashboardState {
    /// Monotonic revision counter, incremented on every change.
    rev: u64,
    candidates: Arc<[CandidateRecord]>,
    view: ViewState,
    last_switch: Instant,
    refresh_count: u64,
    loading: bool,
    last_error: Option<String>,
    last_refresh: Option<DateTime<Local>>,
    /// Newest fetch ticket handed out.
    issued: u64,
}

/// What happened to one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied { count: usize },
    /// The source failed; the fallback list is showing.
    Fallback { reason: String },
    /// A newer fetch started before this one finished; result dropped.
    Superseded,
}

pub struct Scheduler {
    state: RwLock<DashboardState>,
    source: Arc<dyn CandidateSource>,
    rotation_period: Duration,
    refresh_period: Duration,
}

impl Scheduler {
    pub fn new(source: Arc<dyn CandidateSource>, schedule: &ScheduleConfig) -> Self {
        Self::with_periods(source, schedule.rotation_period(), schedule.refresh_period())
    }

    pub fn with_periods(
        source: Arc<dyn CandidateSource>,
        rotation_period: Duration,
        refresh_period: Duration,
    ) -> Self {
        let state = DashboardState {
            rev: 1,
            candidates: Arc::from(Vec::new()),
            view: ViewState::Leaders,
            last_switch: Instant::now(),
            refresh_count: 0,
            loading: true,
            last_error: None,
            last_refresh: None,
            issued: 0,
        };
        Self {
            state: RwLock::new(state),
            source,
            rotation_period,
            refresh_period,
        }
    }

    pub fn rotation_period(&self) -> Duration {
        self.rotation_period
    }

    pub fn refresh_period(&self) -> Duration {
        self.refresh_period
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let state = self.state.read().await;
        DashboardSnapshot {
            rev: state.rev,
            candidates: Arc::clone(&state.candidates),
            view: state.view,
            countdown_secs: countdown_secs(self.rotation_period, state.last_switch.elapsed()),
            refresh_count: state.refresh_count,
            loading: state.loading,
            last_error: state.last_error.clone(),
            last_refresh: state.last_refresh,
        }
    }

    /// Fetch from the source, validate, and publish. Never fails: source
    /// errors publish the fallback list instead.
    pub async fn fetch_and_transform(&self) -> FetchOutcome {
        let ticket = {
            let mut state = self.state.write().await;
            state.issued += 1;
            state.loading = true;
            state.last_error = None;
            state.rev += 1;
            state.issued
        };
        debug!("fetch #{}: requesting {}", ticket, self.source.describe());

        let result = self
            .source
            .fetch()
            .await
            .map(|payload| payload.into_candidates());

        let mut state = self.state.write().await;
        if ticket != state.issued {
            warn!(
                "fetch #{}: superseded by #{}, dropping response",
                ticket, state.issued
            );
            return FetchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(candidates) => {
                info!("fetch #{}: {} candidates", ticket, candidates.len());
                let count = candidates.len();
                state.candidates = Arc::from(candidates);
                state.last_refresh = Some(Local::now());
                state.last_error = None;
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                warn!("fetch #{}: {}; showing fallback data", ticket, e);
                let reason = format!("{}: {}", FETCH_ERROR_PREFIX, e);
                state.candidates = Arc::from(fallback_candidates());
                state.last_error = Some(reason.clone());
                FetchOutcome::Fallback { reason }
            }
        };
        state.loading = false;
        state.rev += 1;
        outcome
    }

    /// Rotation-timer body: flip the view and restart the countdown.
    pub async fn rotate_view(&self) -> ViewState {
        let mut state = self.state.write().await;
        state.view = state.view.next();
        state.last_switch = Instant::now();
        state.rev += 1;
        debug!("rotation: now showing {:?}", state.view);
        state.view
    }

    /// Show a specific view. The rotation cadence is left alone.
    pub async fn set_view(&self, view: ViewState) {
        let mut state = self.state.write().await;
        if state.view != view {
            state.view = view;
            state.rev += 1;
        }
    }

    /// Flip to the other view from whatever is showing now. Like `set_view`,
    /// the rotation cadence is left alone.
    pub async fn toggle_view(&self) -> ViewState {
        let mut state = self.state.write().await;
        state.view = state.view.next();
        state.rev += 1;
        state.view
    }

    /// Refresh-timer body.
    pub async fn scheduled_refresh(&self) -> FetchOutcome {
        {
            let mut state = self.state.write().await;
            state.refresh_count += 1;
            state.rev += 1;
            debug!("refresh tick #{}", state.refresh_count);
        }
        self.fetch_and_transform().await
    }

    /// On-demand refresh (retry key). Does not count as a scheduled refresh.
    pub async fn manual_refresh(&self) -> FetchOutcome {
        info!("manual refresh requested");
        self.fetch_and_transform().await
    }

    /// Run the startup fetch and both timers. The first rotation and the
    /// first scheduled refresh fire one period after start.
    ///
    /// A refresh tick that falls due while the previous scheduled refresh is
    /// still running is skipped.
    pub fn start(self: &Arc<Self>) -> TimerHandles {
        info!(
            "scheduler: rotation every {:?}, refresh every {:?}",
            self.rotation_period, self.refresh_period
        );

        let startup = {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move {
                scheduler.fetch_and_transform().await;
            })
        };

        let rotation = {
            let scheduler = Arc::clone(self);
            let period = self.rotation_period;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    scheduler.rotate_view().await;
                }
            })
        };

        let refresh = {
            let scheduler = Arc::clone(self);
            let period = self.refresh_period;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    scheduler.scheduled_refresh().await;
                }
            })
        };

        TimerHandles {
            startup,
            rotation,
            refresh,
        }
    }
}

/// Owns the scheduler's background tasks. Dropping it stops them.
pub struct TimerHandles {
    startup: JoinHandle<()>,
    rotation: JoinHandle<()>,
    refresh: JoinHandle<()>,
}

impl TimerHandles {
    pub fn shutdown(&self) {
        self.startup.abort();
        self.rotation.abort();
        self.refresh.abort();
    }
}

impl Drop for TimerHandles {
    fn drop(&mut self) {
        self.shutdown();
    }
}
