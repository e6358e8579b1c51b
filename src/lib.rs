#![doc = include_str!("../README.md")]

mod distance;
mod error;
mod manager;
mod matrix;
mod node;
mod projection;
mod pyramid;
mod types;

pub use distance::{DistanceMetric, Euclidean, Manhattan, WrappedDistance};
pub use error::{ClusterError, Result};
pub use manager::{ClusterManager, ClusterOptions};
pub use matrix::{DistanceEntry, DistanceMatrix};
pub use node::{Node, NodeArena, NodeId};
pub use projection::{
    coordinate_to_point, coordinate_to_point_bounds, fround, planar_radius, point_to_coordinate,
};
pub use types::{
    Coordinate, CoordinateBounds, Point, PointBounds, Rectangle, Size, WORLD_BOUNDS,
};

#[cfg(test)]
pub(crate) mod test;
