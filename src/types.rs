//! Plain-data value types shared across the crate: geographic coordinates,
//! planar points, sizes, rectangles, and their bounding-box pairs.

/// A geographic world coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// The latitude from 90 to -90, north to south.
    pub latitude: f64,
    /// The longitude from 180 to -180, east to west.
    pub longitude: f64,
}

/// A cartesian point on the planar projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// The position on the horizontal axis.
    pub x: f64,
    /// The position on the vertical axis.
    pub y: f64,
}

/// A width/height extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle: an origin point plus a [`Size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    /// The rectangle's extent.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Build the rectangle spanning a [`PointBounds`]: the origin is the
    /// top-left corner and the extent reaches the bottom-right corner.
    pub fn from_point_bounds(bounds: &PointBounds) -> Rectangle {
        Rectangle {
            x: bounds.top_left.x,
            y: bounds.top_left.y,
            width: bounds.bottom_right.x - bounds.top_left.x,
            height: bounds.bottom_right.y - bounds.top_left.y,
        }
    }
}

/// The bounds of the world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBounds {
    /// The world coordinate at the most north west point.
    pub north_west: Coordinate,
    /// The world coordinate at the most south east point.
    pub south_east: Coordinate,
}

/// The bounds of the cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointBounds {
    /// The point at the top left.
    pub top_left: Point,
    /// The point at the bottom right.
    pub bottom_right: Point,
}

/// The full geographic extent of the world: north-west at the north pole and
/// the antimeridian's west edge, south-east at the south pole and east edge.
pub const WORLD_BOUNDS: CoordinateBounds = CoordinateBounds {
    north_west: Coordinate {
        latitude: 90.0,
        longitude: -180.0,
    },
    south_east: Coordinate {
        latitude: -90.0,
        longitude: 180.0,
    },
};
