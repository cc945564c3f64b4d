use super::types::Point;

/// Arithmetic mean of a group of points. `None` for an empty group.
pub fn compute_centroid(members: &[&Point]) -> Option<Point> {
    if members.is_empty() {
        return None;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for p in members {
        sum_x += p.x;
        sum_y += p.y;
    }

    let n = members.len() as f64;
    Some(Point::new(sum_x / n, sum_y / n))
}
