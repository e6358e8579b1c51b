//! Spherical Web Mercator projection into the `[0, 1] × [0, 1]` square.
//!
//! Projected outputs are rounded to single precision with [`fround`].
//! Clustering decisions are made on the rounded values; skipping the
//! rounding step lets implementations drift apart near distance thresholds.

use std::f64::consts::PI;

use crate::types::{Coordinate, CoordinateBounds, Point, PointBounds};

/// Round to the nearest single-precision float, returned as an `f64`.
#[inline]
pub fn fround(value: f64) -> f64 {
    value as f32 as f64
}

// longitude/latitude to spherical mercator in [0..1] range
fn longitude_to_x(longitude: f64) -> f64 {
    longitude / 360.0 + 0.5
}

fn latitude_to_y(latitude: f64) -> f64 {
    let sin = (latitude * PI / 180.0).sin();
    let y = 0.5 - (0.25 * ((1.0 + sin) / (1.0 - sin)).ln()) / PI;
    // Latitudes past the mercator limit produce y outside [0, 1]; they
    // collapse onto the edge.
    y.clamp(0.0, 1.0)
}

// spherical mercator to longitude/latitude
fn x_to_longitude(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

fn y_to_latitude(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Project a geographic coordinate onto the unit square.
pub fn coordinate_to_point(coordinate: Coordinate) -> Point {
    Point {
        x: fround(longitude_to_x(coordinate.longitude)),
        y: fround(latitude_to_y(coordinate.latitude)),
    }
}

/// The exact inverse of [`coordinate_to_point`], up to single-precision
/// rounding. Inputs that were clamped on the way in stay collapsed.
pub fn point_to_coordinate(point: Point) -> Coordinate {
    Coordinate {
        latitude: y_to_latitude(point.y),
        longitude: x_to_longitude(point.x),
    }
}

/// Project both corners of a geographic bounding box.
pub fn coordinate_to_point_bounds(bounds: &CoordinateBounds) -> PointBounds {
    PointBounds {
        top_left: coordinate_to_point(bounds.north_west),
        bottom_right: coordinate_to_point(bounds.south_east),
    }
}

/// Convert a pixel radius at `tile_size` scale into planar units at a zoom
/// level: one planar unit spans `tile_size * 2^zoom` pixels.
pub fn planar_radius(radius: f64, tile_size: f64, zoom: u8) -> f64 {
    radius / (tile_size * f64::powi(2.0, zoom as i32))
}
