use super::init::weighted_index;
use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn four_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 1.0),
    ]
}

fn scattered(seed: u64, n: usize) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_points(n, &Domain::SYMMETRIC, &mut rng)
}

#[test]
fn test_distance() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert_eq!(distance(&a, &b), 5.0);
    assert_eq!(squared_distance(&a, &b), 25.0);
    assert_eq!(distance(&b, &b), 0.0);
}

#[test]
fn test_nearest_distance_without_centers() {
    let p = Point::new(1.0, 1.0);
    assert!(nearest_distance(&p, &[]).is_infinite());
}

#[test]
fn test_compute_centroid_mean() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(2.0, 5.0);
    let c = Point::new(-0.3, 0.7);

    let mean = compute_centroid(&[&a, &b, &c]).unwrap();
    assert!((mean.x - (1.0 + 2.0 - 0.3) / 3.0).abs() < 1e-9);
    assert!((mean.y - (2.0 + 5.0 + 0.7) / 3.0).abs() < 1e-9);

    assert!(compute_centroid(&[]).is_none());
}

// The "random" strategy is a deterministic prefix of the input, not a sample.
#[test]
fn test_random_strategy_takes_prefix() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let centroids = initialize(&four_points(), 2, InitStrategy::Random, &mut rng).unwrap();
    assert_eq!(centroids, vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]);
}

#[test]
fn test_insufficient_data() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];

    let result = initialize(&points, 5, InitStrategy::FarthestFirst, &mut rng);
    assert_eq!(
        result.unwrap_err(),
        ClusterError::InsufficientData { points: 2, k: 5 }
    );
}

#[test]
fn test_zero_k_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let result = initialize(&four_points(), 0, InitStrategy::Random, &mut rng);
    assert_eq!(result.unwrap_err(), ClusterError::InvalidClusterCount(0));
}

#[test]
fn test_manual_not_computed_by_initializer() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let result = initialize(&[], 3, InitStrategy::Manual, &mut rng);
    assert_eq!(result.unwrap_err(), ClusterError::ManualSelectionRequired);
}

#[test]
fn test_farthest_first_monotonicity() {
    let points = scattered(3, 60);

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let centroids = farthest_first_centroids(&points, 6, &mut rng);
        assert_eq!(centroids.len(), 6);

        for i in 1..centroids.len() {
            let chosen = nearest_distance(&centroids[i], &centroids[..i]);
            for p in &points {
                assert!(chosen >= nearest_distance(p, &centroids[..i]));
            }
        }
    }
}

#[test]
fn test_farthest_first_picks_opposite_corner() {
    let points = four_points();

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let centroids = farthest_first_centroids(&points, 2, &mut rng);
        assert!((centroids[0].x - centroids[1].x).abs() == 10.0);
        assert!((centroids[0].y - centroids[1].y).abs() == 1.0);
    }
}

#[test]
fn test_seeded_centroids_are_distinct() {
    let points = scattered(11, 40);

    for seed in 0..10 {
        for strategy in [InitStrategy::FarthestFirst, InitStrategy::KMeansPlusPlus] {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let centroids = initialize(&points, 5, strategy, &mut rng).unwrap();

            for i in 0..centroids.len() {
                for j in (i + 1)..centroids.len() {
                    assert_ne!(centroids[i], centroids[j], "{} seed {}", strategy, seed);
                }
            }
        }
    }
}

#[test]
fn test_degenerate_points_repeat_same_centroid() {
    let points = vec![Point::new(2.0, 2.0); 5];

    for strategy in [InitStrategy::FarthestFirst, InitStrategy::KMeansPlusPlus] {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let centroids = initialize(&points, 3, strategy, &mut rng).unwrap();
        assert_eq!(centroids, vec![Point::new(2.0, 2.0); 3]);
    }
}

#[test]
fn test_weighted_index_clamps_to_last() {
    let cumulative = [1.0, 2.0, 3.0];
    assert_eq!(weighted_index(&cumulative, 0.5), 0);
    assert_eq!(weighted_index(&cumulative, 2.0), 1);
    assert_eq!(weighted_index(&cumulative, 3.0 + 1e-12), 2);
}

#[test]
fn test_assign_first_minimum_wins() {
    let points = vec![Point::new(0.0, 0.0)];
    let centroids = vec![Point::new(1.0, 0.0), Point::new(-1.0, 0.0)];
    assert_eq!(assign(&points, &centroids), vec![0]);
}

#[test]
fn test_assign_without_centroids() {
    assert!(assign(&four_points(), &[]).is_empty());
    assert_eq!(nearest_centroid(&Point::new(0.0, 0.0), &[]), None);
}

#[test]
fn test_assignment_coherence() {
    let points = scattered(21, 50);
    let centroids = scattered(22, 4);
    let assignment = assign(&points, &centroids);

    assert_eq!(assignment.len(), points.len());
    for (p, &label) in points.iter().zip(&assignment) {
        let own = distance(p, &centroids[label]);
        for c in &centroids {
            assert!(own <= distance(p, c));
        }
    }
}

#[test]
fn test_update_means() {
    let points = four_points();
    let assignment = vec![0, 0, 1, 1];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let centroids = update(&points, &assignment, 2, &Domain::SYMMETRIC, &mut rng);
    assert!((centroids[0].x - 0.0).abs() < 1e-9);
    assert!((centroids[0].y - 0.5).abs() < 1e-9);
    assert!((centroids[1].x - 10.0).abs() < 1e-9);
    assert!((centroids[1].y - 0.5).abs() < 1e-9);
}

#[test]
fn test_update_reseeds_empty_cluster() {
    let points = four_points();
    let assignment = vec![0, 0, 0, 0];
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let centroids = update(&points, &assignment, 3, &Domain::POSITIVE, &mut rng);
    assert_eq!(centroids.len(), 3);
    assert!((centroids[0].x - 5.0).abs() < 1e-9);
    assert!(Domain::POSITIVE.contains(&centroids[1]));
    assert!(Domain::POSITIVE.contains(&centroids[2]));
}

#[test]
fn test_has_converged() {
    let old = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
    let close = vec![Point::new(0.005, 0.0), Point::new(5.0, 5.009)];
    let far = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.02)];

    assert!(has_converged(&old, &old, DEFAULT_TOLERANCE));
    assert!(has_converged(&old, &close, DEFAULT_TOLERANCE));
    assert!(!has_converged(&old, &far, DEFAULT_TOLERANCE));
    assert!(!has_converged(&old, &close[..1], DEFAULT_TOLERANCE));
}

#[test]
fn test_simple_kmeans() {
    let res = kmeans(&four_points(), 2, InitStrategy::FarthestFirst, 20, 42).unwrap();

    assert_eq!(res.clusters.len(), 2);
    assert!(res.converged);

    let mut groups: Vec<Vec<usize>> = res.clusters.iter().map(|c| c.point_ids.clone()).collect();
    groups.sort();
    assert_eq!(groups, vec![vec![0, 1], vec![2, 3]]);

    for cluster in &res.clusters {
        assert!((cluster.centroid.y - 0.5).abs() < 1e-9);
    }
}

// Prefix seeding on this layout splits the points by y rather than x.
#[test]
fn test_kmeans_random_prefix_converges_in_two_iterations() {
    let res = kmeans(&four_points(), 2, InitStrategy::Random, 20, 42).unwrap();

    assert!(res.converged);
    assert_eq!(res.iterations, 2);
    assert_eq!(res.assignment, vec![0, 1, 0, 1]);
    assert_eq!(res.clusters[0].centroid, Point::new(5.0, 0.0));
    assert_eq!(res.clusters[1].centroid, Point::new(5.0, 1.0));
}

#[test]
fn test_generate_points_within_domain() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let points = generate_points(DEFAULT_POINT_COUNT, &Domain::POSITIVE, &mut rng);

    assert_eq!(points.len(), DEFAULT_POINT_COUNT);
    assert!(points.iter().all(|p| Domain::POSITIVE.contains(p)));
}

#[test]
fn test_domain_validity() {
    assert!(Domain::SYMMETRIC.is_valid());
    assert!(!Domain { min: 1.0, max: 1.0 }.is_valid());
    assert!(!Domain { min: f64::NAN, max: 1.0 }.is_valid());
}

#[test]
fn test_strategy_names() {
    for strategy in InitStrategy::all() {
        assert_eq!(strategy.name().parse::<InitStrategy>().unwrap(), strategy);
    }

    assert_eq!(
        serde_json::to_string(&InitStrategy::KMeansPlusPlus).unwrap(),
        "\"kmeans++\""
    );
    assert!("gaussian".parse::<InitStrategy>().is_err());
}

#[test]
fn test_kmeans_plus_plus_favors_heavy_point() {
    let mut points: Vec<Point> = (0..10).map(|i| Point::new(0.1 * i as f64, 0.0)).collect();
    let far = Point::new(100.0, 100.0);
    points.push(far);

    let mut eligible = 0;
    let mut picked_far = 0;
    for seed in 0..60 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let centroids = kmeans_plus_plus_centroids(&points, 2, &mut rng);
        if centroids[0] == far {
            continue;
        }
        eligible += 1;
        if centroids[1] == far {
            picked_far += 1;
        }
    }

    assert!(eligible > 0);
    assert!(picked_far * 10 >= eligible * 9, "{} of {}", picked_far, eligible);
}

#[test]
fn test_kmeans_plus_plus_never_repicks_zero_weight() {
    let points = scattered(31, 8);

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let centroids = kmeans_plus_plus_centroids(&points, points.len(), &mut rng);

        // Every point must be used exactly once
        for p in &points {
            assert_eq!(centroids.iter().filter(|c| *c == p).count(), 1, "seed {}", seed);
        }
    }
}
