//! Construction of the full cluster pyramid and the viewport query over it.

use crate::distance::{DistanceMetric, Euclidean};
use crate::error::{ClusterError, Result};
use crate::matrix::DistanceMatrix;
use crate::node::{Node, NodeArena, NodeId};
use crate::projection::{coordinate_to_point, coordinate_to_point_bounds, planar_radius};
use crate::pyramid::build_level;
use crate::types::{Coordinate, CoordinateBounds, Rectangle, WORLD_BOUNDS};

/// Options controlling cluster generation.
#[derive(Debug)]
pub struct ClusterOptions {
    /// The minimum zoom level to generate clusters on.
    pub min_zoom: u8,
    /// The maximum zoom level to generate clusters on.
    pub max_zoom: u8,
    /// The minimum number of points required to form a cluster.
    pub min_points: usize,
    /// The cluster radius in pixels.
    pub radius: f64,
    /// The tile size the radius is measured against.
    pub tile_size: f64,
    /// Internal batching granularity of the neighbor index. Tunes
    /// construction only; never affects results.
    pub node_size: usize,
    /// The metric applied to wrapped planar distances.
    pub metric: Box<dyn DistanceMetric>,
    /// The geographic extent the world wraps around at.
    pub bounds: CoordinateBounds,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 16,
            min_points: 2,
            radius: 40.0,
            tile_size: 512.0,
            node_size: 64,
            metric: Box::new(Euclidean),
            bounds: WORLD_BOUNDS,
        }
    }
}

struct Level {
    nodes: Vec<NodeId>,
    index: DistanceMatrix,
}

/// A multi-zoom hierarchy of point clusters.
///
/// Construction greedily merges nearby nodes once per zoom level, from
/// `max_zoom` down to `min_zoom`; level `max_zoom + 1` holds the raw,
/// unclustered input. The result is immutable: [`get_cluster`]
/// [ClusterManager::get_cluster] is a read-only lookup against the
/// precomputed per-level indexes.
pub struct ClusterManager<T> {
    arena: NodeArena<T>,
    /// One entry per zoom from `min_zoom` to `max_zoom + 1`, coarsest first.
    levels: Vec<Level>,
    min_zoom: u8,
    max_zoom: u8,
}

impl<T> ClusterManager<T> {
    /// Build the pyramid for `data`.
    ///
    /// `get_coordinate` extracts each datum's geographic position and
    /// `data_factory` synthesizes the datum for a merged cluster from its
    /// coordinate and the nodes it contains.
    pub fn new<G, F>(
        data: Vec<T>,
        get_coordinate: G,
        data_factory: F,
        options: ClusterOptions,
    ) -> Result<Self>
    where
        G: Fn(&T) -> Coordinate,
        F: Fn(Coordinate, &[Node<'_, T>]) -> T,
    {
        let ClusterOptions {
            min_zoom,
            max_zoom,
            min_points,
            radius,
            tile_size,
            node_size,
            metric,
            bounds,
        } = options;

        if min_zoom > max_zoom {
            return Err(ClusterError::InvalidZoomRange { min_zoom, max_zoom });
        }
        let rectangle = Rectangle::from_point_bounds(&coordinate_to_point_bounds(&bounds));

        let mut arena = NodeArena::with_capacity(data.len());
        let mut nodes: Vec<NodeId> = data
            .into_iter()
            .map(|datum| {
                let coordinate = get_coordinate(&datum);
                arena.push_leaf(coordinate_to_point(coordinate), coordinate, datum)
            })
            .collect();

        let level_count = (max_zoom - min_zoom) as usize + 2;
        let mut levels = Vec::with_capacity(level_count);

        // Seed level max_zoom + 1: one leaf per input datum.
        let mut index = DistanceMatrix::try_new(
            nodes.iter().map(|&id| arena.node(id).point()).collect(),
            &rectangle,
            metric.as_ref(),
            node_size,
        )?;

        // Each coarser level consumes the finer level's nodes and index.
        for zoom in (min_zoom..=max_zoom).rev() {
            let merged = build_level(
                &mut arena,
                &nodes,
                &index,
                planar_radius(radius, tile_size, zoom),
                min_points,
                &data_factory,
            );
            let merged_index = DistanceMatrix::try_new(
                merged.iter().map(|&id| arena.node(id).point()).collect(),
                &rectangle,
                metric.as_ref(),
                node_size,
            )?;

            levels.push(Level { nodes, index });
            nodes = merged;
            index = merged_index;
        }
        levels.push(Level { nodes, index });

        // Built finest to coarsest; stored coarsest (min_zoom) first.
        levels.reverse();

        Ok(Self {
            arena,
            levels,
            min_zoom,
            max_zoom,
        })
    }

    /// The nodes visible in `bounds` at `zoom`.
    ///
    /// Fractional zooms floor down and out-of-range zooms clamp into
    /// `[min_zoom, max_zoom + 1]`; the query itself never fails.
    pub fn get_cluster(&self, bounds: &CoordinateBounds, zoom: f64) -> Vec<Node<'_, T>> {
        let level = &self.levels[self.level_position(zoom)];
        let planar = coordinate_to_point_bounds(bounds);
        level
            .index
            .range(
                planar.top_left.x,
                planar.top_left.y,
                planar.bottom_right.x,
                planar.bottom_right.y,
            )
            .into_iter()
            .map(|position| self.arena.node(level.nodes[position]))
            .collect()
    }

    /// The lowest zoom level clusters are generated on.
    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    /// The highest zoom level clusters are generated on. Level
    /// `max_zoom + 1` holds the raw input points.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn level_position(&self, zoom: f64) -> usize {
        let floored = zoom.floor();
        if !(floored >= self.min_zoom as f64) {
            // Below range, or NaN.
            return 0;
        }
        let max_level = self.max_zoom as f64 + 1.0;
        let clamped = if floored > max_level { max_level } else { floored };
        (clamped - self.min_zoom as f64) as usize
    }
}
