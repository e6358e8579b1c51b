//! The neighbor index: every pairwise wrapped distance, precomputed and
//! sorted, so that radius queries during clustering are a prefix scan.

use geo_traits::{CoordTrait, RectTrait};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::distance::{DistanceMetric, WrappedDistance};
use crate::error::{ClusterError, Result};
use crate::types::{Point, Rectangle};

/// The index of a point and its wrapped distance from an anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEntry {
    /// Position of the point in the originating array.
    pub index: usize,
    /// Wrapped distance from the anchor.
    pub distance: f64,
}

/// A precomputed all-pairs distance index over a set of planar points.
///
/// Each unordered pair is measured once with the wrapped metric and mirrored,
/// then every row is sorted ascending by distance, ties broken by ascending
/// index. Construction is `O(n²)`; [`within`][DistanceMatrix::within] is then
/// a prefix of a sorted row and [`range`][DistanceMatrix::range] a linear
/// scan of the stored points.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    points: Vec<Point>,
    rows: Vec<Vec<DistanceEntry>>,
}

impl DistanceMatrix {
    /// Build the index for `points` over the wrap extent `rectangle`.
    ///
    /// `node_size` batches rows during parallel construction and has no
    /// effect on results. Errors if the rectangle has a non-finite or
    /// non-positive dimension, since the wrap adjustment would otherwise
    /// poison every distance with `NaN`.
    pub fn try_new(
        points: Vec<Point>,
        rectangle: &Rectangle,
        metric: &dyn DistanceMetric,
        node_size: usize,
    ) -> Result<Self> {
        assert!(node_size >= 1);
        if !(rectangle.width.is_finite() && rectangle.width > 0.0)
            || !(rectangle.height.is_finite() && rectangle.height > 0.0)
        {
            return Err(ClusterError::DegenerateBounds {
                width: rectangle.width,
                height: rectangle.height,
            });
        }

        let n = points.len();
        let wrapped = WrappedDistance::new(metric, rectangle);

        // Upper triangle only: the wrap adjustment is symmetric, so the pair
        // (i, j) is measured once and mirrored into both rows.
        let triangle_row = |i: usize| -> Vec<f64> {
            let anchor = points[i];
            ((i + 1)..n)
                .map(|j| wrapped.distance(anchor, points[j]))
                .collect()
        };

        #[cfg(feature = "rayon")]
        let triangle: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .with_min_len(node_size)
            .map(triangle_row)
            .collect();
        #[cfg(not(feature = "rayon"))]
        let triangle: Vec<Vec<f64>> = (0..n).map(triangle_row).collect();

        let sorted_row = |i: usize| -> Vec<DistanceEntry> {
            let mut row: Vec<DistanceEntry> = (0..n)
                .map(|j| DistanceEntry {
                    index: j,
                    distance: pair_distance(&triangle, i, j),
                })
                .collect();
            // Stable sort over index-ordered entries: equal distances keep
            // ascending index order.
            row.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            row
        };

        #[cfg(feature = "rayon")]
        let rows: Vec<Vec<DistanceEntry>> = (0..n)
            .into_par_iter()
            .with_min_len(node_size)
            .map(sorted_row)
            .collect();
        #[cfg(not(feature = "rayon"))]
        let rows: Vec<Vec<DistanceEntry>> = (0..n).map(sorted_row).collect();

        Ok(Self { points, rows })
    }

    /// The number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed points, in their original order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Entries within `max_distance` of the point at `index`, sorted
    /// ascending by distance. The anchor itself is never returned.
    ///
    /// Indexing past the number of points is a caller error and panics.
    pub fn within(&self, index: usize, max_distance: f64) -> Vec<DistanceEntry> {
        self.rows[index]
            .iter()
            .take_while(|entry| entry.distance <= max_distance)
            .filter(|entry| entry.index != index)
            .copied()
            .collect()
    }

    /// Indices of points inside the axis-aligned box, inclusive of its
    /// edges. No wrap is applied; this is the viewport query.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y)
            .map(|(index, _)| index)
            .collect()
    }

    /// Search the index for points within a given bounding box.
    ///
    /// Returns indices of found points
    pub fn range_rect(&self, rect: &impl RectTrait<T = f64>) -> Vec<usize> {
        self.range(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }
}

#[inline]
fn pair_distance(triangle: &[Vec<f64>], i: usize, j: usize) -> f64 {
    if i == j {
        0.0
    } else if i < j {
        triangle[i][j - i - 1]
    } else {
        triangle[j][i - j - 1]
    }
}
