#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_point_accessors() {
        let p = Point::new(-73.9855, 40.758);
        assert_eq!(p.longitude(), -73.9855);
        assert_eq!(p.latitude(), 40.758);
        assert_eq!(p, Point([-73.9855, 40.758]));
    }

    #[test]
    fn test_is_finite() {
        assert!(Point::new(-73.9, 40.7).is_finite());
        assert!(!Point::new(f64::NAN, 40.7).is_finite());
        assert!(!Point::new(-73.9, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_cluster_members() {
        let points = vec![
            Point([30.244759, 59.955982]),
            Point([30.24472, 59.955975]),
            Point([30.244358, 59.96698]),
        ];
        let c1 = Cluster {
            c: 0,
            points: vec![2, 0],
        };

        assert_eq!(c1.len(), 2);
        assert!(!c1.is_empty());
        assert_eq!(c1.members(&points), vec![points[2], points[0]]);

        let c2 = Cluster { c: 1, points: vec![] };
        assert!(c2.is_empty());
        assert!(c2.members(&points).is_empty());
    }
}
