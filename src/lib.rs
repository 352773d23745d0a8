pub mod cli;
pub mod error;
pub mod estimation;
pub mod geometry;
pub mod linalg;
pub mod warp;

pub use cli::Cli;
pub use error::{HomographyError, Side};
pub use estimation::{estimate_homography, estimate_homography_from_vectors, SolveMode};
pub use geometry::{
    apply_homography, apply_homography_to_points, centroid, rms_reprojection_error, Homography,
    Point2D,
};
pub use warp::warp_perspective;
