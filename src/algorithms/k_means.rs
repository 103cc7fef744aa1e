//! An integer-only variant of Lloyd's k-means algorithm.
//!
//! Initial clusters are contiguous groups of the input, in input order, so
//! that a run only depends on the order of the points and on the number of
//! clusters.  Means are truncated toward zero and distances toward
//! negative infinity, which keeps every intermediate value an integer.

use super::Error;
use crate::geometry::Centroids;
use crate::geometry::Point;
use std::fmt;
use std::mem;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

mod assign;
mod init;
mod update;

/// Why a k-means run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// Two consecutive iterations ended with the same centroids.
    Converged,

    /// There were more iterations than points.
    IterationCap,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stop::Converged => write!(f, "centroids did not change"),
            Stop::IterationCap => write!(f, "iteration cap reached"),
        }
    }
}

/// Diagnostic data returned by [`KMeans`].
#[derive(Clone, Debug)]
pub struct RunInfo {
    /// Number of assign/update rounds.
    pub iterations: usize,
    pub stop: Stop,
    /// The centroids computed by the last round.
    pub centroids: Centroids,
}

fn should_stop(
    iteration: usize,
    max_iter: usize,
    previous: Option<&Centroids>,
    current: &Centroids,
) -> Option<Stop> {
    if iteration > max_iter {
        return Some(Stop::IterationCap);
    }
    if previous == Some(current) {
        return Some(Stop::Converged);
    }
    None
}

fn k_means(
    points: &mut [Point],
    cluster_count: usize,
    cancel: Option<&AtomicBool>,
) -> Result<RunInfo, Error> {
    // Safety net in case centroids keep moving.
    let max_iter = points.len();
    k_means_with_cap(points, cluster_count, max_iter, cancel)
}

fn k_means_with_cap(
    points: &mut [Point],
    cluster_count: usize,
    max_iter: usize,
    cancel: Option<&AtomicBool>,
) -> Result<RunInfo, Error> {
    if cluster_count < 2 {
        return Err(Error::InvalidClusterCount { cluster_count });
    }

    let point_count = points.len();
    let span = tracing::info_span!("k_means", point_count, cluster_count, max_iter);
    let _enter = span.enter();

    let mut centroids = init::contiguous_partition(points, cluster_count)?;
    tracing::info!(%centroids, "initial centroids computed from contiguous groups");

    let mut previous: Option<Centroids> = None;
    let mut iterations = 0;
    let stop = loop {
        if let Some(stop) = should_stop(iterations, max_iter, previous.as_ref(), &centroids) {
            break stop;
        }
        if cancel.is_some_and(|cancel| cancel.load(Ordering::Relaxed)) {
            return Err(Error::Cancelled);
        }

        tracing::debug!(run = iterations + 1, %centroids);
        for point in points.iter() {
            tracing::trace!(x = point.x, y = point.y, cluster = point.cluster);
        }

        assign::assign(points, &centroids)?;
        let new_centroids = update::update(points, cluster_count);
        previous = Some(mem::replace(&mut centroids, new_centroids));
        iterations += 1;
    };

    tracing::info!(iterations, %stop, %centroids, "done");

    Ok(RunInfo {
        iterations,
        stop,
        centroids,
    })
}

/// K-means clustering of 2D integer points.
///
/// Points are split into `cluster_count` contiguous groups, then
/// alternatively moved to the cluster of their nearest centroid and used to
/// recompute centroids, until centroids stop moving or there have been more
/// rounds than points.
///
/// The `cluster` field of each point is overwritten with a cluster id in
/// `1..=cluster_count`.  A cluster may end up empty, and when the initial
/// groups are larger than `len / cluster_count` the last clusters start
/// empty.  The run fails with [`Error::InvalidPartition`] only when there
/// are fewer points than clusters.
///
/// Convergence is checked against the centroids of the previous round, so at
/// least one round always runs, even when all initial centroids lie at the
/// origin.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), grappe::Error> {
/// use grappe::Cluster as _;
/// use grappe::Point;
///
/// let mut points = [(0, 0), (0, 2), (10, 0), (10, 2)].map(Point::from);
///
/// let info = grappe::KMeans { cluster_count: 2, ..Default::default() }
///     .cluster(&mut points)?;
///
/// assert_eq!(points[0].cluster, points[1].cluster);
/// assert_eq!(points[2].cluster, points[3].cluster);
/// assert_ne!(points[0].cluster, points[2].cluster);
/// assert_eq!(info.stop, grappe::Stop::Converged);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct KMeans<'a> {
    pub cluster_count: usize,

    /// Checked between iterations, the run fails with [`Error::Cancelled`]
    /// once it is set.
    pub cancel: Option<&'a AtomicBool>,
}

impl Default for KMeans<'_> {
    fn default() -> Self {
        Self {
            cluster_count: 2,
            cancel: None,
        }
    }
}

impl crate::Cluster for KMeans<'_> {
    type Metadata = RunInfo;
    type Error = Error;

    fn cluster(&mut self, points: &mut [Point]) -> Result<Self::Metadata, Self::Error> {
        k_means(points, self.cluster_count, self.cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Centroid;
    use proptest::prelude::*;

    fn points(coordinates: &[(i32, i32)]) -> Vec<Point> {
        coordinates.iter().copied().map(Point::from).collect()
    }

    fn labels(points: &[Point]) -> Vec<usize> {
        points.iter().map(|p| p.cluster).collect()
    }

    #[test]
    fn test_two_natural_clusters() {
        let mut points = points(&[(0, 0), (0, 2), (10, 0), (10, 2)]);

        let info = k_means(&mut points, 2, None).unwrap();

        assert_eq!(labels(&points), [1, 1, 2, 2]);
        assert_eq!(info.stop, Stop::Converged);
        assert_eq!(info.iterations, 2);
        assert_eq!(
            info.centroids.get(1),
            Some(&Centroid { x: 0, y: 1, cluster: 1 }),
        );
        assert_eq!(
            info.centroids.get(2),
            Some(&Centroid { x: 10, y: 1, cluster: 2 }),
        );
    }

    #[test]
    fn test_identical_points() {
        let mut points = points(&[(5, 5); 4]);

        let info = k_means(&mut points, 2, None).unwrap();

        assert_eq!(labels(&points), [1, 1, 1, 1]);
        assert_eq!(info.stop, Stop::Converged);
        assert_eq!(info.centroids.len(), 1);
        assert_eq!(info.centroids.get(2), None);
    }

    #[test]
    fn test_points_at_origin() {
        let mut points = points(&[(0, 0); 4]);

        let info = k_means(&mut points, 2, None).unwrap();

        // Initial groups are [1, 1, 1, 2]; the first round moves the last
        // point to cluster 1 on a tie.
        assert_eq!(labels(&points), [1, 1, 1, 1]);
        assert_eq!(info.iterations, 2);
        assert_eq!(info.stop, Stop::Converged);
    }

    #[test]
    fn test_fewer_groups_than_clusters() {
        let mut points = points(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (50, 0),
            (50, 1),
            (50, 2),
            (100, 0),
            (100, 1),
            (100, 2),
        ]);

        let info = k_means(&mut points, 4, None).unwrap();

        assert_eq!(labels(&points), [1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(info.stop, Stop::Converged);
        assert_eq!(info.iterations, 1);
        assert_eq!(info.centroids.len(), 3);
        assert_eq!(info.centroids.get(4), None);
    }

    #[test]
    fn test_iteration_cap() {
        let mut points = points(&[(0, 0), (0, 2), (10, 0), (10, 2)]);

        // Two rounds are needed to see the centroids stop moving.
        let info = k_means_with_cap(&mut points, 2, 1, None).unwrap();

        assert_eq!(info.stop, Stop::IterationCap);
        assert_eq!(info.iterations, 2);
        assert_eq!(labels(&points), [1, 1, 2, 2]);
    }

    #[test]
    fn test_invalid_cluster_count() {
        for cluster_count in [0, 1] {
            let mut points = points(&[(1, 2), (3, 4)]);
            assert_eq!(
                k_means(&mut points, cluster_count, None).unwrap_err(),
                Error::InvalidClusterCount { cluster_count },
            );
            assert_eq!(labels(&points), [0, 0]);
        }
    }

    #[test]
    fn test_too_many_clusters() {
        let mut points = points(&[(1, 2), (3, 4)]);
        assert!(matches!(
            k_means(&mut points, 3, None),
            Err(Error::InvalidPartition { cluster: 3, .. }),
        ));
        assert_eq!(labels(&points), [0, 0]);
    }

    #[test]
    fn test_cancelled() {
        let cancel = AtomicBool::new(true);
        let mut points = points(&[(0, 0), (0, 2), (10, 0), (10, 2)]);
        let mut algo = KMeans {
            cluster_count: 2,
            cancel: Some(&cancel),
        };
        assert_eq!(
            crate::Cluster::cluster(&mut algo, &mut points).unwrap_err(),
            Error::Cancelled,
        );
    }

    #[test]
    fn test_stop_before_first_iteration() {
        let current = Centroids::new(2);
        assert_eq!(should_stop(0, 4, None, &current), None);
        assert_eq!(should_stop(5, 4, None, &current), Some(Stop::IterationCap));
        assert_eq!(should_stop(4, 4, Some(&current), &current), Some(Stop::Converged));
    }

    #[test]
    fn test_trace_events() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
        let mut points = points(&[(1, 1), (2, 1), (1, 2), (8, 8), (9, 8), (8, 9)]);
        let info = k_means(&mut points, 2, None).unwrap();
        assert_eq!(labels(&points), [1, 1, 1, 2, 2, 2]);
        assert_eq!(info.stop, Stop::Converged);
    }

    /// Sets of at least as many points as clusters.
    fn points_and_cluster_count() -> impl Strategy<Value = (Vec<Point>, usize)> {
        (2..6_usize).prop_flat_map(|cluster_count| {
            (
                prop::collection::vec(
                    (-1000..1000_i32, -1000..1000_i32).prop_map(Point::from),
                    cluster_count..200,
                ),
                Just(cluster_count),
            )
        })
    }

    proptest!(
        #![proptest_config(ProptestConfig { timeout: 10000, ..ProptestConfig::default() })]

        #[test]
        fn terminates_within_cap((mut points, cluster_count) in points_and_cluster_count()) {
            let info = k_means(&mut points, cluster_count, None).unwrap();
            prop_assert!(info.iterations <= points.len() + 1);
        }

        #[test]
        fn coordinates_unchanged((mut points, cluster_count) in points_and_cluster_count()) {
            let input = points.clone();
            k_means(&mut points, cluster_count, None).unwrap();
            prop_assert_eq!(points.len(), input.len());
            for (before, after) in input.iter().zip(&points) {
                prop_assert_eq!((before.x, before.y), (after.x, after.y));
                prop_assert!((1..=cluster_count).contains(&after.cluster));
            }
        }

        #[test]
        fn converged_labels_are_nearest((mut points, cluster_count) in points_and_cluster_count()) {
            let info = k_means(&mut points, cluster_count, None).unwrap();
            prop_assume!(info.stop == Stop::Converged);
            for point in &points {
                let nearest = assign::nearest(point, &info.centroids).unwrap();
                prop_assert_eq!(point.cluster, nearest.cluster);
            }
        }

        #[test]
        fn fixed_point_is_stable((mut points, cluster_count) in points_and_cluster_count()) {
            let info = k_means(&mut points, cluster_count, None).unwrap();
            prop_assume!(info.stop == Stop::Converged);
            assign::assign(&mut points, &info.centroids).unwrap();
            let centroids = update::update(&points, cluster_count);
            prop_assert_eq!(centroids, info.centroids);
        }
    );
}
