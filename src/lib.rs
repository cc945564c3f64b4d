// Public API exports
pub mod clusterer;
pub mod scheduler;
pub mod session;

// Re-export main types for convenience
pub use clusterer::{
    Cluster, ClusterError, ClusterResult, Domain, InitStrategy, Point, assign, distance,
    generate_points, has_converged, initialize, kmeans, update,
};

pub use session::{
    ClusteringSession, ManualCentroidCollector, SessionConfig, SessionSnapshot, SessionState,
    StepOutcome,
};

pub use scheduler::{ScheduleExit, ScheduleMode, SessionDriver};
