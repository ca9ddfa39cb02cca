//! Planes given by a point and a unit normal, and least-squares plane fitting.

use crate::float_types::{Real, tolerance};
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector2, Vector3};

/// A plane through `point` with unit `normal`.
///
/// The plane equation is `normal · p = w`, where `w` is [`Plane::offset`].
/// The half-space the normal points into is the *front* side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane; for fitted planes this is the centroid of the samples
    pub point: Point3<Real>,
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
}

impl Plane {
    /// Create a plane through `point`. The normal is normalized; a zero normal
    /// falls back to +Z.
    pub fn from_normal(point: Point3<Real>, normal: Vector3<Real>) -> Self {
        let normal = normal
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::z);
        Plane { point, normal }
    }

    /// The horizontal plane through `point` (normal = +Z).
    pub fn horizontal(point: Point3<Real>) -> Self {
        Plane {
            point,
            normal: Vector3::z(),
        }
    }

    /// A vertical plane through `point` whose normal is the horizontal `axis`.
    pub fn vertical(point: Point3<Real>, axis: &Vector2<Real>) -> Self {
        Self::from_normal(point, Vector3::new(axis.x, axis.y, 0.0))
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Distance from the origin along the normal (`w` in `n · p = w`).
    pub fn offset(&self) -> Real {
        self.normal.dot(&self.point.coords)
    }

    /// Reverse the normal; the point set of the plane is unchanged.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    #[inline]
    pub fn signed_distance(&self, p: &Point3<Real>) -> Real {
        self.normal.dot(&(p - self.point))
    }

    /// `true` for points on the plane or on the side the normal points to.
    #[inline]
    pub fn is_front(&self, p: &Point3<Real>) -> bool {
        self.signed_distance(p) >= 0.0
    }

    /// Mirror image of `p` across this plane.
    #[inline]
    pub fn reflect(&self, p: &Point3<Real>) -> Point3<Real> {
        p - self.normal * (2.0 * self.signed_distance(p))
    }

    /// Unsigned angle in radians between the plane normals, ignoring orientation.
    pub fn angle_to(&self, other: &Vector3<Real>) -> Real {
        let Some(other) = other.try_normalize(Real::EPSILON) else {
            return 0.0;
        };
        self.normal.dot(&other).abs().clamp(0.0, 1.0).acos()
    }

    /// **Least-squares plane fit**
    ///
    /// Minimizes the sum of squared orthogonal point-to-plane distances:
    /// the plane passes through the centroid and its normal is the eigenvector
    /// of the smallest eigenvalue of the scatter matrix
    /// `Σ (pᵢ - c)(pᵢ - c)ᵀ`.
    ///
    /// The normal is oriented to have a non-negative Z component.
    ///
    /// Returns `None` for fewer than 3 points, or when the points are
    /// (numerically) collinear or coincident.
    pub fn fit_points(points: &[Point3<Real>]) -> Option<Plane> {
        if points.len() < 3 {
            return None;
        }

        let sum: Vector3<Real> = points.iter().map(|p| p.coords).sum();
        let centroid = Point3::from(sum / points.len() as Real);

        let mut scatter = Matrix3::zeros();
        for p in points {
            let d = p - centroid;
            scatter += d * d.transpose();
        }

        let eigen = SymmetricEigen::new(scatter);
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
        let [smallest, middle, largest] = order;

        // A plane needs two independent in-plane directions
        let spread = eigen.eigenvalues[largest].max(Real::EPSILON);
        if eigen.eigenvalues[middle] <= tolerance() * spread {
            return None;
        }

        let mut normal: Vector3<Real> = eigen.eigenvectors.column(smallest).into_owned();
        normal = normal.try_normalize(Real::EPSILON)?;
        if normal.z < 0.0 {
            normal = -normal;
        }

        Some(Plane {
            point: centroid,
            normal,
        })
    }
}
