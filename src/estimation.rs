//! Homography estimation from point correspondences by the Direct Linear
//! Transform with `H[(2, 2)]` fixed to 1.
//!
//! Each correspondence `(sx, sy) -> (dx, dy)` contributes two rows:
//!
//! ```text
//! [sx, sy, 1, 0,  0,  0, -dx*sx, -dx*sy] · p = dx
//! [0,  0,  0, sx, sy, 1, -dy*sx, -dy*sy] · p = dy
//! ```
//!
//! With exactly 4 correspondences the 8×8 system is inverted. With more, the
//! pseudo-inverse gives the least-squares parameters. The overdetermined path
//! does not check conditioning: nearly degenerate inputs return a poor
//! homography rather than an error.

use nalgebra::{DMatrix, DVector, Matrix3};
use tracing::debug;

use crate::error::{HomographyError, Result, Side};
use crate::geometry::{Homography, Point2D};
use crate::linalg::{invert, pseudo_invert};

/// Smallest number of correspondences that determines a homography
pub const MIN_CORRESPONDENCES: usize = 4;

/// How the parameter vector is obtained for a given number of points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Square system, exact inverse
    Exact,
    /// Overdetermined system, pseudo-inverse
    LeastSquares,
}

impl SolveMode {
    /// Solve mode for `n` correspondences, `None` below the minimum
    pub fn for_points(n: usize) -> Option<Self> {
        match n {
            n if n < MIN_CORRESPONDENCES => None,
            MIN_CORRESPONDENCES => Some(SolveMode::Exact),
            _ => Some(SolveMode::LeastSquares),
        }
    }
}

/// Estimate `H` such that `dst[i] ~ H · [src[i], 1]`.
///
/// Checks, in order: both sides have at least 4 points, then both sides have
/// the same length. Four points are solved exactly and fail with
/// [`HomographyError::SingularSystem`] on a degenerate configuration; more
/// points are solved in the least-squares sense.
pub fn estimate_homography(src: &[Point2D], dst: &[Point2D]) -> Result<Homography> {
    check_counts(src.len(), dst.len())?;

    let pairs = src.iter().zip(dst).map(|(s, d)| ((s.x, s.y), (d.x, d.y)));
    solve(pairs, src.len())
}

/// Estimate `H` from points stored as generic numeric vectors.
///
/// Same as [`estimate_homography`], with a third check after the counts: every
/// vector must hold exactly two coordinates.
pub fn estimate_homography_from_vectors(
    src: &[DVector<f64>],
    dst: &[DVector<f64>],
) -> Result<Homography> {
    check_counts(src.len(), dst.len())?;
    check_dimensions(src, Side::Source)?;
    check_dimensions(dst, Side::Destination)?;

    let pairs = src
        .iter()
        .zip(dst)
        .map(|(s, d)| ((s[0], s[1]), (d[0], d[1])));
    solve(pairs, src.len())
}

fn check_counts(src: usize, dst: usize) -> Result<()> {
    if src < MIN_CORRESPONDENCES || dst < MIN_CORRESPONDENCES {
        return Err(HomographyError::InsufficientPoints { src, dst });
    }
    if src != dst {
        return Err(HomographyError::CountMismatch { src, dst });
    }
    Ok(())
}

fn check_dimensions(points: &[DVector<f64>], side: Side) -> Result<()> {
    match points.iter().position(|p| p.len() != 2) {
        Some(index) => Err(HomographyError::InvalidDimension {
            side,
            index,
            dims: points[index].len(),
        }),
        None => Ok(()),
    }
}

type Pair = ((f64, f64), (f64, f64));

/// Build the `2n × 8` coefficient matrix and the length-`2n` right-hand side
fn build_system(pairs: impl Iterator<Item = Pair>, n: usize) -> (DMatrix<f64>, DVector<f64>) {
    let mut a = DMatrix::<f64>::zeros(2 * n, 8);
    let mut b = DVector::<f64>::zeros(2 * n);

    for (i, ((sx, sy), (dx, dy))) in pairs.enumerate() {
        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        a[(r0, 0)] = sx;
        a[(r0, 1)] = sy;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -dx * sx;
        a[(r0, 7)] = -dx * sy;
        b[r0] = dx;

        a[(r1, 3)] = sx;
        a[(r1, 4)] = sy;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -dy * sx;
        a[(r1, 7)] = -dy * sy;
        b[r1] = dy;
    }

    (a, b)
}

fn solve(pairs: impl Iterator<Item = Pair>, n: usize) -> Result<Homography> {
    let (a, b) = build_system(pairs, n);

    let inverse = match SolveMode::for_points(n) {
        Some(SolveMode::Exact) => {
            debug!("solving exact 8x8 system");
            invert(&a)?
        }
        Some(SolveMode::LeastSquares) => {
            debug!("solving {}x8 system by least squares", 2 * n);
            pseudo_invert(&a)?
        }
        None => {
            return Err(HomographyError::InsufficientPoints { src: n, dst: n });
        }
    };

    let p = inverse * b;
    Ok(assemble(&p))
}

/// Unpack the 8 parameters row-major into `H`, with the bottom-right entry 1
fn assemble(p: &DVector<f64>) -> Homography {
    Matrix3::new(
        p[0], p[1], p[2],
        p[3], p[4], p[5],
        p[6], p[7], 1.0,
    )
}
