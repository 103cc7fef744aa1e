use crate::geometry::truncated_distance;
use crate::geometry::Centroid;
use crate::geometry::Centroids;
use crate::geometry::Point;
use crate::Error;

/// The centroid closest to `point`, by truncated distance.
///
/// On ties, the centroid with the lowest cluster id wins.
pub(crate) fn nearest<'a>(point: &Point, centroids: &'a Centroids) -> Option<&'a Centroid> {
    // min_by_key returns the first of several equal minimums.
    centroids
        .iter()
        .min_by_key(|centroid| truncated_distance(point, centroid))
}

/// Moves each point to the cluster of its nearest centroid.
pub(crate) fn assign(points: &mut [Point], centroids: &Centroids) -> Result<(), Error> {
    if centroids.is_empty() {
        return Err(Error::EmptyCentroidSet);
    }
    for point in points {
        if let Some(centroid) = nearest(point, centroids) {
            point.cluster = centroid.cluster;
        }
    }
    Ok(())
}
