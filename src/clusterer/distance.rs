use super::types::Point;

pub fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points
pub fn distance(a: &Point, b: &Point) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Distance from `p` to the closest of `centers`, or infinity when there are none
pub fn nearest_distance(p: &Point, centers: &[Point]) -> f64 {
    centers
        .iter()
        .map(|c| distance(p, c))
        .fold(f64::INFINITY, f64::min)
}
