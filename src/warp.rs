use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use nalgebra::Matrix3;
use tracing::{debug, warn};

use crate::error::{HomographyError, Result};
use crate::geometry::{compute_output_bounds, Homography};

/// Output canvas may grow to at most this multiple of the input in each axis
const MAX_GROWTH: u32 = 3;

/// Warp an image through a homography.
///
/// The output canvas covers the mapped input rectangle, shifted so its top-left
/// corner lands at the origin, and is clamped to `MAX_GROWTH` times the input
/// size. Pixels with no pre-image in the input are fully transparent.
pub fn warp_perspective(img: &RgbaImage, h: &Homography) -> Result<RgbaImage> {
    let (src_width, src_height) = img.dimensions();

    let (new_width, new_height, offset_x, offset_y) =
        compute_output_bounds(h, src_width, src_height)
            .ok_or(HomographyError::DegenerateProjection)?;

    let width = new_width.min(src_width.saturating_mul(MAX_GROWTH)).max(1);
    let height = new_height.min(src_height.saturating_mul(MAX_GROWTH)).max(1);
    if (width, height) != (new_width, new_height) {
        warn!(
            "warped canvas {}x{} clamped to {}x{}",
            new_width, new_height, width, height
        );
    }

    debug!(
        "warp: {}x{} -> {}x{} (offset: {:.1}, {:.1})",
        src_width, src_height, width, height, offset_x, offset_y
    );

    let shift = Matrix3::new(
        1.0, 0.0, -offset_x,
        0.0, 1.0, -offset_y,
        0.0, 0.0, 1.0,
    );
    let projection = to_projection(&(shift * h)).ok_or(HomographyError::DegenerateProjection)?;

    let mut output = RgbaImage::new(width, height);
    warp_into(
        img,
        &projection,
        Interpolation::Bicubic,
        Rgba([0, 0, 0, 0]),
        &mut output,
    );

    Ok(output)
}

/// Row-major single-precision copy of `h`, `None` if it has no inverse
fn to_projection(h: &Homography) -> Option<Projection> {
    let mut m = [0.0f32; 9];
    for r in 0..3 {
        for c in 0..3 {
            m[3 * r + c] = h[(r, c)] as f32;
        }
    }
    Projection::from_matrix(m)
}
