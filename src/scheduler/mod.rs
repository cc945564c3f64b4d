//! Timed execution modes
//!
//! `SessionDriver` owns a [`ClusteringSession`] behind an async mutex and
//! runs at most one periodic stepping task at a time. Each tick holds the
//! lock for exactly one `step()`, so steps never overlap.


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at, Instant};
use tracing::{debug, error, info, warn};

use crate::clusterer::{ClusterError, InitStrategy, Point};
use crate::session::{ClusteringSession, SessionSnapshot, SessionState, StepOutcome};

/// Which periodic mode is driving the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    AutoStep,
    RunToConvergence,
}

impl ScheduleMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AutoStep => "auto-step",
            Self::RunToConvergence => "run-to-convergence",
        }
    }
}

/// How a schedule ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleExit {
    Converged { steps: usize },
    Cancelled,
}

struct ActiveSchedule {
    mode: ScheduleMode,
    handle: JoinHandle<Result<ScheduleExit, ClusterError>>,
}

pub struct SessionDriver {
    session: Arc<Mutex<ClusteringSession>>,
    schedule: Option<ActiveSchedule>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionDriver {
    pub fn new(session: ClusteringSession) -> Self {
        let (tx, _rx) = watch::channel(session.snapshot());
        Self {
            session: Arc::new(Mutex::new(session)),
            schedule: None,
            snapshots: Arc::new(tx),
        }
    }

    /// Receiver updated after every operation and every tick
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Single-step mode
    pub async fn step(&self) -> Result<StepOutcome, ClusterError> {
        let mut session = self.session.lock().await;
        let outcome = session.step();
        self.snapshots.send_replace(session.snapshot());
        outcome
    }

    pub async fn initialize(&self) -> Result<StepOutcome, ClusterError> {
        let mut session = self.session.lock().await;
        let outcome = session.initialize();
        self.snapshots.send_replace(session.snapshot());
        outcome
    }

    pub async fn offer_point(&self, p: Point) -> bool {
        let mut session = self.session.lock().await;
        let taken = session.offer_point(p);
        if taken {
            self.snapshots.send_replace(session.snapshot());
        }
        taken
    }

    pub async fn set_k(&mut self, k: usize) -> Result<(), ClusterError> {
        let mut session = self.session.lock().await;
        let changed = session.k() != k;
        session.set_k(k)?;
        if changed {
            Self::abort(&mut self.schedule);
        }
        self.snapshots.send_replace(session.snapshot());
        Ok(())
    }

    pub async fn set_strategy(&mut self, strategy: InitStrategy) {
        let mut session = self.session.lock().await;
        if session.strategy() != strategy {
            Self::abort(&mut self.schedule);
            session.set_strategy(strategy);
            self.snapshots.send_replace(session.snapshot());
        }
    }

    pub async fn set_points(&mut self, points: Vec<Point>) {
        Self::abort(&mut self.schedule);
        let mut session = self.session.lock().await;
        session.set_points(points);
        self.snapshots.send_replace(session.snapshot());
    }

    /// Cancel any schedule and return the session to `Idle`
    pub async fn reset(&mut self) {
        Self::abort(&mut self.schedule);
        let mut session = self.session.lock().await;
        session.reset();
        self.snapshots.send_replace(session.snapshot());
    }

    /// Step once per auto-step period until converged or cancelled
    pub async fn start_auto_step(&mut self) {
        self.start(ScheduleMode::AutoStep).await;
    }

    /// Step once per run period until converged or cancelled
    pub async fn run_to_convergence(&mut self) {
        self.start(ScheduleMode::RunToConvergence).await;
    }

    /// Stop the active schedule, if any. Safe to call repeatedly.
    pub fn cancel_schedule(&mut self) {
        Self::abort(&mut self.schedule);
    }

    /// Mode of the schedule still running, if any
    pub fn active_mode(&self) -> Option<ScheduleMode> {
        self.schedule
            .as_ref()
            .filter(|s| !s.handle.is_finished())
            .map(|s| s.mode)
    }

    /// Wait for the active schedule to end on its own.
    ///
    /// Returns `Cancelled` immediately when nothing is scheduled. A panic in
    /// the stepping task is resumed on the caller.
    pub async fn wait(&mut self) -> Result<ScheduleExit, ClusterError> {
        let Some(active) = self.schedule.take() else {
            return Ok(ScheduleExit::Cancelled);
        };

        match active.handle.await {
            Ok(exit) => exit,
            Err(e) if e.is_panic() => {
                error!("{} task panicked", active.mode.name());
                std::panic::resume_unwind(e.into_panic())
            }
            Err(_) => Ok(ScheduleExit::Cancelled),
        }
    }

    async fn start(&mut self, mode: ScheduleMode) {
        Self::abort(&mut self.schedule);

        let period = {
            let session = self.session.lock().await;
            match mode {
                ScheduleMode::AutoStep => session.config().auto_step_period(),
                ScheduleMode::RunToConvergence => session.config().run_period(),
            }
        };

        info!("Starting {} (period={:?})", mode.name(), period);
        let handle = tokio::spawn(run_schedule(
            Arc::clone(&self.session),
            Arc::clone(&self.snapshots),
            mode,
            period,
        ));

        self.schedule = Some(ActiveSchedule { mode, handle });
    }

    fn abort(schedule: &mut Option<ActiveSchedule>) {
        if let Some(active) = schedule.take() {
            active.handle.abort();
            debug!("Cancelled {}", active.mode.name());
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        Self::abort(&mut self.schedule);
    }
}

async fn run_schedule(
    session: Arc<Mutex<ClusteringSession>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    mode: ScheduleMode,
    period: Duration,
) -> Result<ScheduleExit, ClusterError> {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut session = session.lock().await;
        if session.state() == SessionState::Converged {
            return Ok(ScheduleExit::Converged {
                steps: session.step_count(),
            });
        }

        let outcome = match session.step() {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{} tick failed: {}", mode.name(), e);
                return Err(e);
            }
        };
        snapshots.send_replace(session.snapshot());

        if outcome.converged {
            info!("{} finished after {} steps", mode.name(), outcome.step);
            return Ok(ScheduleExit::Converged {
                steps: outcome.step,
            });
        }
    }
}
