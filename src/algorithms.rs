use std::fmt;

mod k_means;

pub use k_means::KMeans;
pub use k_means::RunInfo;
pub use k_means::Stop;

/// Errors thrown by the clustering algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Less than two clusters were asked for.
    InvalidClusterCount { cluster_count: usize },

    /// There are fewer points than clusters, so the initial groups of one
    /// point each leave `cluster` without any point.
    InvalidPartition {
        cluster: usize,
        point_count: usize,
        cluster_count: usize,
    },

    /// Points were to be assigned to clusters, but all clusters are empty.
    EmptyCentroidSet,

    /// The run has been interrupted from another thread.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidClusterCount { cluster_count } => write!(
                f,
                "invalid cluster count {cluster_count}, expected at least 2",
            ),
            Error::InvalidPartition {
                cluster,
                point_count,
                cluster_count,
            } => write!(
                f,
                "cluster {cluster} is empty after initialization \
                 ({point_count} points are too few for {cluster_count} clusters)",
            ),
            Error::EmptyCentroidSet => write!(f, "no centroid to assign points to"),
            Error::Cancelled => write!(f, "clustering has been cancelled"),
        }
    }
}

impl std::error::Error for Error {}
