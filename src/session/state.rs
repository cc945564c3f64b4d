use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clusterer::{InitStrategy, Point};

/// Lifecycle of a clustering run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No centroids yet
    #[default]
    Idle,
    Initialized,
    Stepping,
    /// Terminal until reset or re-initialization
    Converged,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Initialized => "INITIALIZED",
            Self::Stepping => "STEPPING",
            Self::Converged => "CONVERGED",
        }
    }

    pub fn has_centroids(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single `initialize()` or `step()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub state: SessionState,
    pub step: usize,
    /// Set only by the call that reached convergence
    pub converged: bool,
}

/// Everything a display needs about a session at one moment
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: SessionState,
    pub step: usize,
    pub k: usize,
    pub strategy: InitStrategy,
    pub points: Vec<Point>,
    pub centroids: Vec<Point>,
    pub assignment: Vec<usize>,
    pub manual_selection: Vec<Point>,
    pub just_converged: bool,
    pub converged_at: Option<DateTime<Utc>>,
}
