use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::clusterer::{
    centroid::compute_centroid,
    distance::distance,
    error::ClusterError,
    init::initialize,
    types::{Cluster, ClusterResult, Domain, InitStrategy, Point},
};

/// Movement below which a centroid counts as settled
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Index of the centroid closest to `p`; the earliest wins on exact ties.
pub fn nearest_centroid(p: &Point, centroids: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, c) in centroids.iter().enumerate() {
        let d = distance(p, c);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }

    best.map(|(i, _)| i)
}

/// Label every point with its nearest centroid. Empty when there are no centroids.
pub fn assign(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    if centroids.is_empty() {
        return Vec::new();
    }

    points
        .iter()
        .filter_map(|p| nearest_centroid(p, centroids))
        .collect()
}

/// Recompute each of the `k` centroids as the mean of its members.
///
/// A cluster left with no members is reseeded to a random point of `domain`
/// so it can pick up members on the next assignment.
pub fn update<R: Rng + ?Sized>(
    points: &[Point],
    assignment: &[usize],
    k: usize,
    domain: &Domain,
    rng: &mut R,
) -> Vec<Point> {
    let mut members: Vec<Vec<&Point>> = vec![Vec::new(); k];

    for (p, &label) in points.iter().zip(assignment) {
        if let Some(group) = members.get_mut(label) {
            group.push(p);
        }
    }

    members
        .iter()
        .map(|group| compute_centroid(group).unwrap_or_else(|| domain.sample(rng)))
        .collect()
}

/// True when every centroid moved less than `tolerance`.
pub fn has_converged(old: &[Point], new: &[Point], tolerance: f64) -> bool {
    old.len() == new.len()
        && old
            .iter()
            .zip(new)
            .all(|(a, b)| distance(a, b) < tolerance)
}

/// Run k-means to convergence (or `max_iters`) without any interactive state.
pub fn kmeans(
    points: &[Point],
    k: usize,
    strategy: InitStrategy,
    max_iters: usize,
    seed: u64,
) -> Result<ClusterResult, ClusterError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let domain = bounding_domain(points);

    let mut centroids = initialize(points, k, strategy, &mut rng)?;
    let mut assignments = assign(points, &centroids);
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..max_iters {
        iterations += 1;

        let next = update(points, &assignments, k, &domain, &mut rng);
        assignments = assign(points, &next);
        converged = has_converged(&centroids, &next, DEFAULT_TOLERANCE);
        centroids = next;

        if converged {
            break;
        }
    }

    let mut clusters: Vec<Cluster> = centroids
        .iter()
        .enumerate()
        .map(|(i, c)| Cluster {
            id: i as u32,
            point_ids: vec![],
            centroid: *c,
        })
        .collect();

    for (point_id, &cluster_idx) in assignments.iter().enumerate() {
        clusters[cluster_idx].point_ids.push(point_id);
    }

    Ok(ClusterResult {
        clusters,
        assignment: assignments,
        iterations,
        converged,
    })
}

/// Smallest square domain covering every point, used for reseeding when no
/// generation range is known.
fn bounding_domain(points: &[Point]) -> Domain {
    let (min, max) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), p| (lo.min(p.x).min(p.y), hi.max(p.x).max(p.y)),
    );

    if min < max {
        Domain { min, max }
    } else {
        Domain::default()
    }
}
