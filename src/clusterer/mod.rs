mod centroid;
mod data;
mod distance;
mod error;
mod init;
mod kmeans;
mod types;

#[cfg(test)]
mod tests;

pub use centroid::compute_centroid;
pub use data::{DEFAULT_POINT_COUNT, generate_points};
pub use distance::{distance, nearest_distance, squared_distance};
pub use error::ClusterError;
pub use init::{farthest_first_centroids, initialize, kmeans_plus_plus_centroids, prefix_centroids};
pub use kmeans::{DEFAULT_TOLERANCE, assign, has_converged, kmeans, nearest_centroid, update};
pub use types::{Cluster, ClusterResult, Domain, InitStrategy, Point};
