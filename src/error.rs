use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// The wrap extent derived from the configured bounds has a non-finite or
    /// non-positive dimension, so wrapped distances would be meaningless.
    #[error("Degenerate wrap extent: width {width}, height {height}.")]
    DegenerateBounds { width: f64, height: f64 },

    /// `min_zoom` must not exceed `max_zoom`.
    #[error("Invalid zoom range: min_zoom {min_zoom} > max_zoom {max_zoom}.")]
    InvalidZoomRange { min_zoom: u8, max_zoom: u8 },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
