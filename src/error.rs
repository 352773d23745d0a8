use std::fmt;

use thiserror::Error;

/// Which side of a correspondence set a point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Errors produced while estimating or applying a homography
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HomographyError {
    /// Fewer than 4 correspondences on either side
    #[error("need at least 4 source and 4 destination points, got {src} and {dst}")]
    InsufficientPoints { src: usize, dst: usize },

    /// Source and destination sides hold different numbers of points
    #[error("source and destination point counts differ: {src} != {dst}")]
    CountMismatch { src: usize, dst: usize },

    /// A generic vector did not carry exactly an x and a y
    #[error("{side} point {index} has {dims} coordinates, expected 2")]
    InvalidDimension { side: Side, index: usize, dims: usize },

    /// The exact 4-point system is numerically singular (collinear or repeated points)
    #[error("coefficient matrix is singular; the point configuration is degenerate")]
    SingularSystem,

    /// The linear-algebra backend rejected the decomposition request
    #[error("matrix decomposition failed: {0}")]
    Decomposition(String),

    /// A warp was requested through a homography with no usable inverse
    #[error("homography has no inverse and cannot be used to warp an image")]
    DegenerateProjection,
}

pub type Result<T> = std::result::Result<T, HomographyError>;
