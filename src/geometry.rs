use num_integer::Roots as _;
use std::fmt;

/// A 2D point with integer coordinates and the cluster it belongs to.
///
/// `cluster` is a 1-based cluster id.  It is zero until the point has been
/// through an initialization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub cluster: usize,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, cluster: 0 }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) in {}", self.x, self.y, self.cluster)
    }
}

/// The mean position of the members of a cluster.
///
/// Unlike [`Point::cluster`], [`Centroid::cluster`] is the identity of the
/// cluster this centroid represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
    pub cluster: usize,
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ({}, {})", self.cluster, self.x, self.y)
    }
}

/// Accumulates the coordinates of cluster members to compute their mean.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Sum {
    x: i64,
    y: i64,
    count: i64,
}

impl Sum {
    pub fn add(&mut self, point: &Point) {
        self.x += i64::from(point.x);
        self.y += i64::from(point.y);
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Truncating mean of the accumulated points, `None` if no point has been
    /// added.
    pub fn mean(&self, cluster: usize) -> Option<Centroid> {
        if self.count == 0 {
            return None;
        }
        // The mean of i32 values is always within i32 bounds.
        Some(Centroid {
            x: (self.x / self.count) as i32,
            y: (self.y / self.count) as i32,
            cluster,
        })
    }
}

/// `floor(sqrt(dx² + dy²))` between a point and a centroid.
///
/// The square root is computed on integers, so the result is exact for any
/// pair of `i32` coordinates.
pub fn truncated_distance(point: &Point, centroid: &Centroid) -> u64 {
    let dx = u128::from(point.x.abs_diff(centroid.x));
    let dy = u128::from(point.y.abs_diff(centroid.y));
    (dx * dx + dy * dy).sqrt() as u64
}

/// The centroids of a fixed number of clusters, indexed by cluster id.
///
/// A cluster without members has no centroid.  Two tables are equal when
/// they have the same clusters and each cluster has the same centroid, no
/// matter how many clusters are empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Centroids {
    slots: Vec<Option<Centroid>>,
}

impl Centroids {
    /// A table of `cluster_count` empty clusters.
    pub fn new(cluster_count: usize) -> Self {
        Self {
            slots: vec![None; cluster_count],
        }
    }

    /// The number of clusters, empty or not.
    pub fn cluster_count(&self) -> usize {
        self.slots.len()
    }

    /// The number of non-empty clusters.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The centroid of the given 1-based cluster, if any.
    pub fn get(&self, cluster: usize) -> Option<&Centroid> {
        let slot = cluster.checked_sub(1)?;
        self.slots.get(slot)?.as_ref()
    }

    /// Sets the centroid of `centroid.cluster`.
    ///
    /// # Panics
    ///
    /// Panics if the cluster id is not in `1..=cluster_count`.
    pub fn insert(&mut self, centroid: Centroid) {
        assert!(
            (1..=self.slots.len()).contains(&centroid.cluster),
            "cluster id {} out of range 1..={}",
            centroid.cluster,
            self.slots.len(),
        );
        self.slots[centroid.cluster - 1] = Some(centroid);
    }

    /// Iterates over the centroids of non-empty clusters, by increasing
    /// cluster id.
    pub fn iter(&self) -> impl Iterator<Item = &Centroid> + '_ {
        self.slots.iter().flatten()
    }
}

impl fmt::Display for Centroids {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use itertools::Itertools as _;
        write!(f, "[{}]", self.iter().format(", "))
    }
}
