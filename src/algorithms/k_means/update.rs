use crate::geometry::Centroids;
use crate::geometry::Point;
use crate::geometry::Sum;

/// Computes the mean of each of the `cluster_count` clusters.
///
/// Clusters without members have no centroid in the returned table.
pub(crate) fn update(points: &[Point], cluster_count: usize) -> Centroids {
    let mut sums = vec![Sum::default(); cluster_count];
    for point in points {
        debug_assert!(
            (1..=cluster_count).contains(&point.cluster),
            "point {point} has no valid cluster",
        );
        let sum = point
            .cluster
            .checked_sub(1)
            .and_then(|slot| sums.get_mut(slot));
        if let Some(sum) = sum {
            sum.add(point);
        }
    }

    let mut centroids = Centroids::new(cluster_count);
    for (cluster, sum) in (1..).zip(&sums) {
        if let Some(centroid) = sum.mean(cluster) {
            centroids.insert(centroid);
        }
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Centroid;

    fn labeled(x: i32, y: i32, cluster: usize) -> Point {
        Point { x, y, cluster }
    }

    #[test]
    fn test_means() {
        let points = [
            labeled(0, 0, 2),
            labeled(0, 2, 1),
            labeled(1, 3, 1),
            labeled(10, -5, 2),
        ];

        let centroids = update(&points, 2);

        assert_eq!(centroids.get(1), Some(&Centroid { x: 0, y: 2, cluster: 1 }));
        assert_eq!(centroids.get(2), Some(&Centroid { x: 5, y: -2, cluster: 2 }));
    }

    #[test]
    fn test_empty_cluster_is_absent() {
        let points = [labeled(5, 5, 1), labeled(5, 5, 3)];

        let centroids = update(&points, 3);

        assert_eq!(centroids.len(), 2);
        assert_eq!(centroids.cluster_count(), 3);
        assert_eq!(centroids.get(2), None);
        assert_eq!(centroids.get(3), Some(&Centroid { x: 5, y: 5, cluster: 3 }));
    }
}
