//! A clustering library for 2D integer points.
//!
//! # Crate Layout
//!
//! Grappe exposes a [`Cluster`] trait, which is implemented by clustering
//! algorithms.  Algorithms are plain structs holding their settings; they
//! label the points they are given in place and return diagnostic data.
//!
//! # Available algorithms
//!
//! - [K-means][KMeans], with a deterministic initialization and integer
//!   arithmetic.
//!
//! # Logging
//!
//! Algorithms report their progress through [`tracing`] events.  No
//! subscriber is installed by this crate.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod algorithms;
mod geometry;

pub use crate::algorithms::*;
pub use crate::geometry::truncated_distance;
pub use crate::geometry::{Centroid, Centroids, Point};

/// The `Cluster` trait allows for grouping points.
///
/// Clustering algorithms implement this trait.
///
/// On success, the `cluster` field of every point holds the 1-based id of
/// the cluster it belongs to.  Coordinates are left untouched.
pub trait Cluster {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Group the given points and write the cluster id of each point in its
    /// `cluster` field.
    fn cluster(&mut self, points: &mut [Point]) -> Result<Self::Metadata, Self::Error>;
}
