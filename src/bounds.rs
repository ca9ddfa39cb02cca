use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use nalgebra::Point3;

/// Axis-aligned bounds of a vertex set, laid out as
/// `(xmin, xmax, ymin, ymax, zmin, zmax)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub xmin: Real,
    pub xmax: Real,
    pub ymin: Real,
    pub ymax: Real,
    pub zmin: Real,
    pub zmax: Real,
}

impl Bounds {
    #[inline]
    pub const fn new(xmin: Real, xmax: Real, ymin: Real, ymax: Real, zmin: Real, zmax: Real) -> Self {
        Self { xmin, xmax, ymin, ymax, zmin, zmax }
    }

    /// Tight bounds of `points`, or `None` when there are none.
    pub fn from_points(points: &[Point3<Real>]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self::new(first.x, first.x, first.y, first.y, first.z, first.z);
        for p in &points[1..] {
            b.xmin = b.xmin.min(p.x);
            b.xmax = b.xmax.max(p.x);
            b.ymin = b.ymin.min(p.y);
            b.ymax = b.ymax.max(p.y);
            b.zmin = b.zmin.min(p.z);
            b.zmax = b.zmax.max(p.z);
        }
        Some(b)
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn depth(&self) -> Real {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.zmax - self.zmin
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        Point3::new(
            (self.xmin + self.xmax) * 0.5,
            (self.ymin + self.ymax) * 0.5,
            (self.zmin + self.zmax) * 0.5,
        )
    }

    /// Closed containment test on the XY footprint.
    #[inline]
    pub fn contains_xy(&self, x: Real, y: Real) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

impl From<Aabb> for Bounds {
    fn from(aabb: Aabb) -> Self {
        Self::new(aabb.mins.x, aabb.maxs.x, aabb.mins.y, aabb.maxs.y, aabb.mins.z, aabb.maxs.z)
    }
}

impl From<Bounds> for Aabb {
    fn from(b: Bounds) -> Self {
        Aabb::new(
            Point3::new(b.xmin, b.ymin, b.zmin),
            Point3::new(b.xmax, b.ymax, b.zmax),
        )
    }
}
