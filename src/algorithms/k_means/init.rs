use crate::Error;
use crate::geometry::Centroids;
use crate::geometry::Point;
use crate::geometry::Sum;

/// Splits `points`, in their original order, into contiguous groups of
/// `len / cluster_count + 1` points (the last group may be smaller), labels
/// each point with the 1-based index of its group and returns the mean of
/// each group.
///
/// The walk may close fewer groups than there are clusters, in which case the
/// trailing slots of the table are left absent.  Fails without touching the
/// points when there are fewer points than clusters.
pub(crate) fn contiguous_partition(
    points: &mut [Point],
    cluster_count: usize,
) -> Result<Centroids, Error> {
    debug_assert!(cluster_count > 0);

    let point_count = points.len();
    if point_count < cluster_count {
        return Err(Error::InvalidPartition {
            cluster: point_count + 1,
            point_count,
            cluster_count,
        });
    }

    let group_size = point_count / cluster_count + 1;
    let mut centroids = Centroids::new(cluster_count);

    for (cluster, group) in (1..).zip(points.chunks_mut(group_size)) {
        let mut sum = Sum::default();
        for point in group {
            point.cluster = cluster;
            sum.add(point);
        }
        if let Some(centroid) = sum.mean(cluster) {
            centroids.insert(centroid);
        }
    }

    Ok(centroids)
}
