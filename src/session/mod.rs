//! Step-through clustering session
//!
//! Owns the point set, centroids, assignment and manual selection buffer,
//! and moves between `Idle`, `Initialized`, `Stepping` and `Converged`
//! only through `initialize`, `step`, `offer_point` and `reset`.

mod config;
mod manual;
mod state;


pub use config::{
    DEFAULT_AUTO_STEP_PERIOD_MS, DEFAULT_K, DEFAULT_RUN_PERIOD_MS, SessionConfig,
};
pub use manual::ManualCentroidCollector;
pub use state::{SessionSnapshot, SessionState, StepOutcome};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clusterer::{
    ClusterError, InitStrategy, Point, assign, generate_points, has_converged, initialize, update,
};

pub struct ClusteringSession {
    id: Uuid,
    config: SessionConfig,
    rng: ChaCha8Rng,
    points: Vec<Point>,
    /// Exactly `k` entries once initialized, empty while idle
    centroids: Vec<Point>,
    assignment: Vec<usize>,
    state: SessionState,
    step: usize,
    manual: ManualCentroidCollector,
    just_converged: bool,
    converged_at: Option<DateTime<Utc>>,
}

impl ClusteringSession {
    /// Create an idle session with no points
    pub fn new(config: SessionConfig) -> Result<Self, ClusterError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            rng,
            points: Vec::new(),
            centroids: Vec::new(),
            assignment: Vec::new(),
            state: SessionState::Idle,
            step: 0,
            manual: ManualCentroidCollector::new(),
            just_converged: false,
            converged_at: None,
        })
    }

    /// Create a session already holding `points`
    pub fn with_points(config: SessionConfig, points: Vec<Point>) -> Result<Self, ClusterError> {
        let mut session = Self::new(config)?;
        session.points = points;
        Ok(session)
    }

    /// Replace the point set. Any run in progress is discarded.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.reset();
    }

    /// Replace the point set with `count` random points over the configured domain
    pub fn generate_points(&mut self, count: usize) {
        let points = generate_points(count, &self.config.domain, &mut self.rng);
        debug!(session = %self.id, count, "Generated point set");
        self.set_points(points);
    }

    pub fn set_k(&mut self, k: usize) -> Result<(), ClusterError> {
        if k == 0 {
            warn!(session = %self.id, "Rejected cluster count 0");
            return Err(ClusterError::InvalidClusterCount(k));
        }

        if k != self.config.k {
            self.config.k = k;
            self.reset();
        }

        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: InitStrategy) {
        if strategy != self.config.strategy {
            self.config.strategy = strategy;
            self.reset();
        }
    }

    /// Choose the starting centroids, discarding any previous run.
    ///
    /// For the manual strategy this only returns the session to `Idle`;
    /// centroids arrive through [`offer_point`](Self::offer_point).
    pub fn initialize(&mut self) -> Result<StepOutcome, ClusterError> {
        if self.config.strategy == InitStrategy::Manual {
            if self.state != SessionState::Idle {
                self.reset();
            }
            return Ok(self.outcome());
        }

        let centroids = initialize(
            &self.points,
            self.config.k,
            self.config.strategy,
            &mut self.rng,
        )?;

        self.adopt_centroids(centroids);
        Ok(self.outcome())
    }

    /// Advance the run by one iteration.
    ///
    /// An idle session is initialized instead; a converged one is left as is.
    pub fn step(&mut self) -> Result<StepOutcome, ClusterError> {
        match self.state {
            SessionState::Idle => return self.initialize(),
            SessionState::Converged => {
                self.just_converged = false;
                return Ok(self.outcome());
            }
            SessionState::Initialized | SessionState::Stepping => {}
        }

        let k = self.config.k;
        let current = assign(&self.points, &self.centroids);
        let candidate = update(&self.points, &current, k, &self.config.domain, &mut self.rng);
        let assignment = assign(&self.points, &candidate);

        let converged = has_converged(&self.centroids, &candidate, self.config.tolerance);

        self.centroids = candidate;
        self.assignment = assignment;
        self.step += 1;
        self.just_converged = converged;

        if converged {
            self.transition(SessionState::Converged);
            self.converged_at = Some(Utc::now());
            info!(session = %self.id, steps = self.step, "Clustering converged");
        } else {
            self.transition(SessionState::Stepping);
            debug!(session = %self.id, step = self.step, "Centroids moved");
        }

        Ok(self.outcome())
    }

    /// Offer a caller-picked centroid while waiting on manual selection.
    ///
    /// Ignored unless the strategy is manual and the session is idle.
    /// Returns whether the pick was taken.
    pub fn offer_point(&mut self, p: Point) -> bool {
        if self.config.strategy != InitStrategy::Manual || self.state != SessionState::Idle {
            return false;
        }

        let k = self.config.k;
        if !self.manual.offer(p, k) {
            return false;
        }

        debug!(
            session = %self.id,
            remaining = self.manual.remaining(k),
            "Manual centroid picked"
        );

        if self.manual.is_complete(k) {
            let centroids = self.manual.selection().to_vec();
            self.adopt_centroids(centroids);
        }

        true
    }

    /// Drop the current run. Points, `k` and strategy are kept.
    pub fn reset(&mut self) {
        self.centroids.clear();
        self.assignment.clear();
        self.step = 0;
        self.manual.clear();
        self.just_converged = false;
        self.converged_at = None;
        self.transition(SessionState::Idle);
    }

    fn adopt_centroids(&mut self, centroids: Vec<Point>) {
        self.centroids = centroids;
        self.assignment.clear();
        self.step = 1;
        self.just_converged = false;
        self.converged_at = None;
        self.transition(SessionState::Initialized);
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            info!(
                session = %self.id,
                "State transition: {} → {} (strategy={}, k={})",
                self.state,
                to,
                self.config.strategy,
                self.config.k
            );
            self.state = to;
        }
    }

    fn outcome(&self) -> StepOutcome {
        StepOutcome {
            state: self.state,
            step: self.step,
            converged: self.just_converged,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.step
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    pub fn strategy(&self) -> InitStrategy {
        self.config.strategy
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn manual_selection(&self) -> &[Point] {
        self.manual.selection()
    }

    pub fn just_converged(&self) -> bool {
        self.just_converged
    }

    pub fn converged_at(&self) -> Option<DateTime<Utc>> {
        self.converged_at
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state,
            step: self.step,
            k: self.config.k,
            strategy: self.config.strategy,
            points: self.points.clone(),
            centroids: self.centroids.clone(),
            assignment: self.assignment.clone(),
            manual_selection: self.manual.selection().to_vec(),
            just_converged: self.just_converged,
            converged_at: self.converged_at,
        }
    }
}
