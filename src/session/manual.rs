use crate::clusterer::Point;

/// Buffer of caller-picked centroids for the manual strategy
#[derive(Debug, Clone, Default)]
pub struct ManualCentroidCollector {
    picks: Vec<Point>,
}

impl ManualCentroidCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `p` when there is room for it and it was not picked already.
    /// Returns whether the pick was taken.
    pub fn offer(&mut self, p: Point, k: usize) -> bool {
        if self.picks.len() >= k || self.picks.contains(&p) {
            return false;
        }

        self.picks.push(p);
        true
    }

    pub fn is_complete(&self, k: usize) -> bool {
        self.picks.len() == k
    }

    pub fn remaining(&self, k: usize) -> usize {
        k.saturating_sub(self.picks.len())
    }

    pub fn selection(&self) -> &[Point] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }
}
