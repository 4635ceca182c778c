#[cfg(test)]
mod tests {
    use crate::cluster::search::{SearchConfig, partition, top_clusters};
    use crate::cluster::{Point, PointList};
    use crate::error::AnalysisError;
    use quickcheck::{QuickCheck, TestResult};

    /// `clumps` groups of ten points on a line, 0.0001 apart inside a group
    /// and 0.005 between group starts, so groups link until eps < 0.0041
    fn clumped_line(lon: f64, lat: f64, clumps: usize) -> PointList {
        let mut points = Vec::new();
        for c in 0..clumps {
            for m in 0..10 {
                points.push(Point::new(lon + c as f64 * 0.005 + m as f64 * 0.0001, lat));
            }
        }
        points
    }

    /// Two tight groups of 60 and 40 dropoffs far apart
    fn sixty_forty() -> PointList {
        let mut points = clumped_line(-73.99, 40.75, 6);
        points.extend(clumped_line(-73.90, 40.80, 4));
        points
    }

    fn sizes(points: &[Point], k: usize) -> Vec<usize> {
        top_clusters(points, k, &SearchConfig::default())
            .unwrap()
            .iter()
            .map(|c| c.members)
            .collect()
    }

    #[test]
    fn test_keeps_shrinking_until_every_group_fits() {
        let points = sixty_forty();
        let config = SearchConfig::default();
        assert_eq!(config.threshold(points.len()), 15);

        let partition = partition(&points, &config).unwrap();
        assert_eq!(partition.iterations, 3);
        assert!((partition.eps - 0.004).abs() < 1e-12);
        assert_eq!(partition.clusters.len(), 10);
        assert!(partition.clusters.iter().all(|c| c.len() == 10));
    }

    #[test]
    fn test_top_clusters_centroid_and_radius() {
        let points = sixty_forty();
        let clusters = top_clusters(&points, 3, &SearchConfig::default()).unwrap();

        assert_eq!(clusters.len(), 3);
        for c in &clusters {
            assert_eq!(c.members, 10);
            // ten points 0.0001 apart: centre in the middle, ends 0.00045 away
            assert!((c.radius - 0.00045).abs() < 1e-9, "radius {}", c.radius);
            assert!((c.latitude - 40.75).abs() < 1e-9 || (c.latitude - 40.80).abs() < 1e-9);
        }
    }

    #[test]
    fn test_k_larger_than_cluster_count_returns_all() {
        let points = sixty_forty();
        assert_eq!(sizes(&points, 50), vec![10; 10]);
    }

    #[test]
    fn test_first_pass_can_converge() {
        // 20 isolated points, 0.01 apart
        let points: PointList = (0..20).map(|i| Point::new(-74.0 + i as f64 * 0.01, 40.7)).collect();
        let partition = partition(&points, &SearchConfig::default()).unwrap();
        assert_eq!(partition.iterations, 1);
        assert_eq!(partition.eps, 0.005);
        assert_eq!(sizes(&points, 5), vec![1; 5]);
    }

    #[test]
    fn test_single_location_does_not_converge() {
        let points = vec![Point::new(-73.98, 40.75); 20];
        let err = top_clusters(&points, 5, &SearchConfig::default()).unwrap_err();
        match err {
            AnalysisError::ClusteringDidNotConverge {
                largest, threshold, ..
            } => {
                assert_eq!(largest, 20);
                assert_eq!(threshold, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_tiny_dataset_has_zero_threshold() {
        let points = vec![Point::new(-73.98, 40.75)];
        assert!(matches!(
            top_clusters(&points, 1, &SearchConfig::default()),
            Err(AnalysisError::ClusteringDidNotConverge { threshold: 0, .. })
        ));
    }

    #[test]
    fn test_iteration_cap() {
        let config = SearchConfig {
            max_iterations: 2,
            ..SearchConfig::default()
        };
        match partition(&sixty_forty(), &config) {
            Err(AnalysisError::ClusteringDidNotConverge {
                iterations,
                largest,
                ..
            }) => {
                assert_eq!(iterations, 2);
                assert_eq!(largest, 60);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let config = SearchConfig::default();
        assert!(matches!(
            top_clusters(&[], 3, &config),
            Err(AnalysisError::EmptyInput { .. })
        ));
        assert!(matches!(
            top_clusters(&sixty_forty(), 0, &config),
            Err(AnalysisError::InvalidConfig(_))
        ));

        let mut points = sixty_forty();
        points[7] = Point::new(f64::NAN, 40.75);
        assert!(matches!(
            top_clusters(&points, 3, &config),
            Err(AnalysisError::InvalidCoordinate { index: 7 })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        let bad = [
            SearchConfig {
                eps_start: 0.0,
                ..SearchConfig::default()
            },
            SearchConfig {
                eps_step: -0.0005,
                ..SearchConfig::default()
            },
            SearchConfig {
                max_share: 1.5,
                ..SearchConfig::default()
            },
            SearchConfig {
                max_share: f64::NAN,
                ..SearchConfig::default()
            },
            SearchConfig {
                max_iterations: 0,
                ..SearchConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_repeated_runs_agree_on_sizes() {
        let mut points = sixty_forty();
        points.extend(clumped_line(-73.80, 40.70, 1).into_iter().take(7));
        assert_eq!(sizes(&points, 8), sizes(&points, 8));
    }

    fn grid_points(raw: &[(u8, u8)]) -> PointList {
        raw.iter()
            .map(|&(x, y)| Point::new(-74.0 + x as f64 * 0.001, 40.7 + y as f64 * 0.001))
            .collect()
    }

    fn prop_partition_respects_threshold(raw: Vec<(u8, u8)>) -> TestResult {
        if raw.is_empty() {
            return TestResult::discard();
        }
        let points = grid_points(&raw);
        let config = SearchConfig::default();

        match partition(&points, &config) {
            Ok(p) => {
                let sizes: Vec<usize> = p.clusters.iter().map(|c| c.len()).collect();
                let ordered = sizes.windows(2).all(|w| w[0] >= w[1]);
                let total: usize = sizes.iter().sum();
                TestResult::from_bool(
                    ordered && sizes[0] <= config.threshold(points.len()) && total == points.len(),
                )
            }
            Err(AnalysisError::ClusteringDidNotConverge { .. }) => TestResult::passed(),
            Err(_) => TestResult::failed(),
        }
    }

    fn prop_top_clusters_sorted_and_bounded(raw: Vec<(u8, u8)>, k: u8) -> TestResult {
        if raw.is_empty() || k == 0 {
            return TestResult::discard();
        }
        let points = grid_points(&raw);

        match top_clusters(&points, k as usize, &SearchConfig::default()) {
            Ok(clusters) => {
                let ordered = clusters.windows(2).all(|w| w[0].members >= w[1].members);
                let total: usize = clusters.iter().map(|c| c.members).sum();
                TestResult::from_bool(
                    ordered
                        && clusters.len() <= k as usize
                        && total <= points.len()
                        && clusters.iter().all(|c| c.radius >= 0.0),
                )
            }
            Err(AnalysisError::ClusteringDidNotConverge { .. }) => TestResult::passed(),
            Err(_) => TestResult::failed(),
        }
    }

    #[test]
    fn quickcheck_partition_respects_threshold() {
        QuickCheck::new()
            .tests(50)
            .quickcheck(prop_partition_respects_threshold as fn(Vec<(u8, u8)>) -> TestResult);
    }

    #[test]
    fn quickcheck_top_clusters_sorted_and_bounded() {
        QuickCheck::new()
            .tests(50)
            .quickcheck(prop_top_clusters_sorted_and_bounded as fn(Vec<(u8, u8)>, u8) -> TestResult);
    }
}
