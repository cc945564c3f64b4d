use rand::Rng;

use super::types::{Domain, Point};

/// Number of points a fresh data set gets unless configured otherwise
pub const DEFAULT_POINT_COUNT: usize = 100;

/// Uniformly scattered points over `domain`
pub fn generate_points<R: Rng + ?Sized>(count: usize, domain: &Domain, rng: &mut R) -> Vec<Point> {
    (0..count).map(|_| domain.sample(rng)).collect()
}
