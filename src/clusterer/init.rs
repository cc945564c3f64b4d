use rand::Rng;

use crate::clusterer::{
    distance::{distance, squared_distance},
    error::ClusterError,
    types::{InitStrategy, Point},
};

/// Produce the starting centroid set for `strategy`.
///
/// Manual centroids never come from here; the session collects them from
/// the caller instead.
pub fn initialize<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    strategy: InitStrategy,
    rng: &mut R,
) -> Result<Vec<Point>, ClusterError> {
    if k == 0 {
        return Err(ClusterError::InvalidClusterCount(k));
    }

    if strategy != InitStrategy::Manual && points.len() < k {
        return Err(ClusterError::InsufficientData {
            points: points.len(),
            k,
        });
    }

    let centroids = match strategy {
        InitStrategy::Manual => return Err(ClusterError::ManualSelectionRequired),
        InitStrategy::Random => prefix_centroids(points, k),
        InitStrategy::FarthestFirst => farthest_first_centroids(points, k, rng),
        InitStrategy::KMeansPlusPlus => kmeans_plus_plus_centroids(points, k, rng),
    };

    Ok(centroids)
}

/// The "random" strategy: take the first `k` points as they come.
pub fn prefix_centroids(points: &[Point], k: usize) -> Vec<Point> {
    points.iter().take(k).copied().collect()
}

/// Greedy farthest-point traversal from a random first pick.
///
/// Each round picks the point whose distance to its nearest chosen centroid
/// is largest. The first point reaching the maximum wins.
pub fn farthest_first_centroids<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    rng: &mut R,
) -> Vec<Point> {
    let first = points[rng.gen_range(0..points.len())];
    let mut centroids = vec![first];
    let mut nearest: Vec<f64> = points.iter().map(|p| distance(p, &first)).collect();

    while centroids.len() < k {
        let mut best = 0;
        let mut best_distance = f64::NEG_INFINITY;

        for (i, &d) in nearest.iter().enumerate() {
            if d > best_distance {
                best_distance = d;
                best = i;
            }
        }

        let chosen = points[best];
        centroids.push(chosen);

        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(distance(p, &chosen));
        }
    }

    centroids
}

/// kmeans++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen centroid.
pub fn kmeans_plus_plus_centroids<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    rng: &mut R,
) -> Vec<Point> {
    let first = points[rng.gen_range(0..points.len())];
    let mut centroids = vec![first];
    let mut weights: Vec<f64> = points.iter().map(|p| squared_distance(p, &first)).collect();

    while centroids.len() < k {
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for w in &weights {
            total += w;
            cumulative.push(total);
        }

        let draw = rng.gen::<f64>() * total;
        let index = weighted_index(&cumulative, draw);

        let chosen = points[index];
        centroids.push(chosen);

        for (w, p) in weights.iter_mut().zip(points) {
            *w = w.min(squared_distance(p, &chosen));
        }
    }

    centroids
}

/// First index whose cumulative weight reaches `draw`, clamped to the last
/// index when rounding leaves the draw above every entry.
pub(crate) fn weighted_index(cumulative: &[f64], draw: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| c >= draw)
        .unwrap_or(cumulative.len().saturating_sub(1))
}
