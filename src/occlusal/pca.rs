//! Principal horizontal axes of a point set.

use crate::float_types::Real;
use nalgebra::{Matrix2, Point3, SymmetricEigen, Vector2};

/// The two principal directions of the XY projection of a point set,
/// ordered by variance explained (`axes[0]` has the greatest variance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    /// Unit eigenvectors of the XY covariance, sign-normalized
    pub axes: [Vector2<Real>; 2],
    /// Matching eigenvalues, descending
    pub variances: [Real; 2],
}

/// Flip `v` so that its component of largest magnitude is positive.
/// Ties between |x| and |y| resolve to x.
///
/// Eigensolvers only determine eigenvectors up to sign; this pins the sign so
/// the quadrant split order is reproducible.
pub fn normalize_sign(v: Vector2<Real>) -> Vector2<Real> {
    let dominant = if v.x.abs() >= v.y.abs() { v.x } else { v.y };
    if dominant < 0.0 { -v } else { v }
}

/// 2×2 sample covariance (`n - 1` denominator) of the XY coordinates of `points`,
/// centered on their mean. `None` with fewer than two points.
pub fn xy_covariance<'a, I>(points: I) -> Option<Matrix2<Real>>
where
    I: IntoIterator<Item = &'a Point3<Real>>,
    I::IntoIter: Clone,
{
    let iter = points.into_iter();
    let n = iter.clone().count();
    if n < 2 {
        return None;
    }

    let sum = iter
        .clone()
        .fold(Vector2::zeros(), |acc, p| acc + p.xy().coords);
    let mean = sum / n as Real;

    let mut cov = Matrix2::zeros();
    for p in iter {
        let d = p.xy().coords - mean;
        cov += d * d.transpose();
    }
    Some(cov / (n - 1) as Real)
}

/// Principal horizontal axes of `points` via symmetric eigendecomposition of
/// the XY covariance. `None` with fewer than two points.
pub fn principal_axes<'a, I>(points: I) -> Option<PrincipalAxes>
where
    I: IntoIterator<Item = &'a Point3<Real>>,
    I::IntoIter: Clone,
{
    let cov = xy_covariance(points)?;
    let eigen = SymmetricEigen::new(cov);

    let (major, minor) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };

    let axis = |k: usize| -> Vector2<Real> {
        let v: Vector2<Real> = eigen.eigenvectors.column(k).into_owned();
        normalize_sign(v.try_normalize(Real::EPSILON).unwrap_or_else(Vector2::x))
    };

    Some(PrincipalAxes {
        axes: [axis(major), axis(minor)],
        variances: [eigen.eigenvalues[major], eigen.eigenvalues[minor]],
    })
}
