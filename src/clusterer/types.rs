use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point in the plane. Centroids share this shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Square coordinate range used for data generation and for reseeding
/// centroids of empty clusters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// [-10, 10] on both axes
    pub const SYMMETRIC: Domain = Domain {
        min: -10.0,
        max: 10.0,
    };

    /// [0, 10] on both axes
    pub const POSITIVE: Domain = Domain {
        min: 0.0,
        max: 10.0,
    };

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// Draw a uniformly distributed point inside the domain
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let span = self.max - self.min;
        Point::new(
            self.min + rng.gen::<f64>() * span,
            self.min + rng.gen::<f64>() * span,
        )
    }

    pub fn contains(&self, p: &Point) -> bool {
        (self.min..=self.max).contains(&p.x) && (self.min..=self.max).contains(&p.y)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::SYMMETRIC
    }
}

/// How the starting centroids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InitStrategy {
    /// First `k` points in input order
    #[default]
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "farthest")]
    FarthestFirst,
    #[serde(rename = "kmeans++")]
    KMeansPlusPlus,
    /// Centroids picked by the caller through the manual selection buffer
    #[serde(rename = "manual")]
    Manual,
}

impl InitStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::FarthestFirst => "farthest",
            Self::KMeansPlusPlus => "kmeans++",
            Self::Manual => "manual",
        }
    }

    pub fn all() -> [InitStrategy; 4] {
        [
            Self::Random,
            Self::FarthestFirst,
            Self::KMeansPlusPlus,
            Self::Manual,
        ]
    }
}

impl std::fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for InitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "farthest" | "farthest-first" => Ok(Self::FarthestFirst),
            "kmeans++" | "kmeanspp" => Ok(Self::KMeansPlusPlus),
            "manual" => Ok(Self::Manual),
            other => Err(format!("Unknown init strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub id: u32,
    /// Indices into the clustered point set
    pub point_ids: Vec<usize>,
    pub centroid: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterResult {
    pub clusters: Vec<Cluster>,
    pub assignment: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}
