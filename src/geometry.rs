use nalgebra::{Matrix3, Point2};

/// A point on either plane of a correspondence
pub type Point2D = Point2<f64>;

/// 3×3 projective transform, normalized so that `H[(2, 2)] == 1` when produced
/// by the estimator
pub type Homography = Matrix3<f64>;

/// Map `(x, y)` through `h` with a perspective divide.
///
/// Works for any 3×3 matrix. When the homogeneous divisor is exactly zero the
/// point lies on the line at infinity and the result follows IEEE-754:
/// `±inf` for a nonzero numerator, `NaN` for a zero one. No error is raised.
pub fn apply_homography(h: &Homography, x: f64, y: f64) -> (f64, f64) {
    let wx = h[(0, 0)] * x + h[(0, 1)] * y + h[(0, 2)];
    let wy = h[(1, 0)] * x + h[(1, 1)] * y + h[(1, 2)];
    let w = h[(2, 0)] * x + h[(2, 1)] * y + h[(2, 2)];
    (wx / w, wy / w)
}

/// Map every point in `points` through `h`
pub fn apply_homography_to_points(h: &Homography, points: &[Point2D]) -> Vec<Point2D> {
    points
        .iter()
        .map(|p| {
            let (x, y) = apply_homography(h, p.x, p.y);
            Point2D::new(x, y)
        })
        .collect()
}

/// Mean position of a point set, `None` when empty
pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point2D::new(sx / n, sy / n))
}

/// Euclidean distance between `H·src` and `dst`
pub fn reprojection_error(h: &Homography, src: &Point2D, dst: &Point2D) -> f64 {
    let (x, y) = apply_homography(h, src.x, src.y);
    let dx = x - dst.x;
    let dy = y - dst.y;
    (dx * dx + dy * dy).sqrt()
}

/// Root-mean-square reprojection error over paired points.
///
/// `src` and `dst` must have the same length; an empty set gives 0.
pub fn rms_reprojection_error(h: &Homography, src: &[Point2D], dst: &[Point2D]) -> f64 {
    debug_assert_eq!(src.len(), dst.len(), "unpaired points");
    let n = src.len();
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = src
        .iter()
        .zip(dst)
        .map(|(s, d)| reprojection_error(h, s, d).powi(2))
        .sum();
    (sum_sq / n as f64).sqrt()
}

/// Bounding box of a `width × height` rectangle mapped through `h`.
///
/// Returns `(width, height, min_x, min_y)` of the mapped box, or `None` when a
/// corner maps to infinity.
pub fn compute_output_bounds(
    h: &Homography,
    width: u32,
    height: u32,
) -> Option<(u32, u32, f64, f64)> {
    let corners = [
        (0.0, 0.0),
        (width as f64, 0.0),
        (0.0, height as f64),
        (width as f64, height as f64),
    ];

    let mapped: Vec<(f64, f64)> = corners
        .iter()
        .map(|&(x, y)| apply_homography(h, x, y))
        .collect();

    if mapped.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
        return None;
    }

    let min_x = mapped.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = mapped.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = mapped.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = mapped.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let new_width = (max_x - min_x).ceil() as u32;
    let new_height = (max_y - min_y).ceil() as u32;

    Some((new_width, new_height, min_x, min_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn perspective() -> Homography {
        Matrix3::new(
            1.2, 0.1, 5.0,
            -0.2, 0.9, 3.0,
            0.001, 0.002, 1.0,
        )
    }

    #[test]
    fn test_uniform_scale() {
        let h = Matrix3::new(
            2.0, 0.0, 0.0,
            0.0, 2.0, 0.0,
            0.0, 0.0, 1.0,
        );
        assert_eq!(apply_homography(&h, 0.5, 0.5), (1.0, 1.0));
    }

    #[test]
    fn test_scale_invariance() {
        // H and k·H describe the same transform
        let h = perspective();
        let (x1, y1) = apply_homography(&h, 3.0, -7.0);
        let (x2, y2) = apply_homography(&(h * 4.5), 3.0, -7.0);
        assert_relative_eq!(x1, x2, epsilon = 1e-12);
        assert_relative_eq!(y1, y2, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_through_inverse() {
        let h = perspective();
        let inv = h.try_inverse().unwrap();
        for &(x, y) in &[(0.0, 0.0), (12.5, -3.0), (-40.0, 71.25), (100.0, 100.0)] {
            let (u, v) = apply_homography(&h, x, y);
            let (bx, by) = apply_homography(&inv, u, v);
            assert_relative_eq!(bx, x, epsilon = 1e-9);
            assert_relative_eq!(by, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_divisor_propagates_ieee() {
        // w = x, so every point on x = 0 maps to infinity
        let h = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
        );
        let (x, y) = apply_homography(&h, 0.0, 1.0);
        assert!(x.is_nan());
        assert_eq!(y, f64::INFINITY);

        let (x, y) = apply_homography(&h, 0.0, -2.0);
        assert!(x.is_nan());
        assert_eq!(y, f64::NEG_INFINITY);
    }

    #[test]
    fn test_batch_matches_single() {
        let h = perspective();
        let points = [Point2D::new(1.0, 2.0), Point2D::new(-5.0, 8.0)];
        let mapped = apply_homography_to_points(&h, &points);
        assert_eq!(mapped.len(), 2);
        for (p, m) in points.iter().zip(&mapped) {
            let (x, y) = apply_homography(&h, p.x, p.y);
            assert_eq!((m.x, m.y), (x, y));
        }
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());
        let c = centroid(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 2.0),
            Point2D::new(0.0, 2.0),
        ])
        .unwrap();
        assert_eq!(c, Point2D::new(2.0, 1.0));
    }

    #[test]
    fn test_reprojection_error() {
        let h = Homography::identity();
        let e = reprojection_error(&h, &Point2D::new(1.0, 1.0), &Point2D::new(4.0, 5.0));
        assert_relative_eq!(e, 5.0);

        let src = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)];
        let dst = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 3.0)];
        assert_relative_eq!(rms_reprojection_error(&h, &src, &dst), 2.0_f64.sqrt());
        assert_eq!(rms_reprojection_error(&h, &[], &[]), 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unpaired points")]
    fn test_rms_rejects_unpaired_points() {
        let src = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)];
        let dst = [Point2D::new(0.0, 0.0)];
        rms_reprojection_error(&Homography::identity(), &src, &dst);
    }

    #[test]
    fn test_output_bounds() {
        let h = Matrix3::new(
            2.0, 0.0, -10.0,
            0.0, 0.5, 4.0,
            0.0, 0.0, 1.0,
        );
        let (w, hgt, min_x, min_y) = compute_output_bounds(&h, 10, 20).unwrap();
        assert_eq!((w, hgt), (20, 10));
        assert_relative_eq!(min_x, -10.0);
        assert_relative_eq!(min_y, 4.0);
    }

    #[test]
    fn test_output_bounds_at_infinity() {
        let h = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
        );
        assert!(compute_output_bounds(&h, 10, 10).is_none());
    }
}
