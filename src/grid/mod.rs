//! Grid partitioning of the mesh footprint with per-cell height statistics.
//!
//! The XY bounding rectangle is tiled with square cells of `cell_size`
//! (the last row and column are truncated to the bounds). Every vertex lands
//! in exactly one cell. Heights are measured along the occlusal normal, so
//! for a vertical normal they are plain Z values.

pub mod cell;

pub use cell::{GridCell, GridShape, axis_edges, axis_index};

use crate::bounds::Bounds;
use crate::errors::{CleanError, CleanResult};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The member vertex of a cell with the greatest height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighestPoint {
    /// Index into the partitioned vertex list
    pub vertex: usize,
    pub position: Point3<Real>,
    /// `position · normal`
    pub height: Real,
}

/// Minimum and maximum vertex height over the whole mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightRange {
    pub min: Real,
    pub max: Real,
}

impl HeightRange {
    #[inline]
    pub fn span(&self) -> Real {
        self.max - self.min
    }
}

/// Output of [`GridPartitioner::partition`].
///
/// Empty cells appear in `cells` but have no entry in `highest_points`,
/// `points_in_cells` or `inclusion_thresholds`.
#[derive(Clone, Debug)]
pub struct GridPartition {
    pub bounds: Bounds,
    pub cell_size: Real,
    /// Unit normal heights are measured along
    pub normal: Vector3<Real>,
    pub shape: GridShape,
    /// Cell rectangles, row-major
    pub cells: Vec<GridCell>,
    /// Cell id of every vertex
    pub vertex_cells: Vec<usize>,
    /// Height of every vertex along `normal`
    pub heights: Vec<Real>,
    pub height_range: HeightRange,
    pub highest_points: BTreeMap<usize, HighestPoint>,
    /// Member vertices of each non-empty cell, in vertex order
    pub points_in_cells: BTreeMap<usize, Vec<usize>>,
    pub inclusion_thresholds: BTreeMap<usize, Real>,
    x_edges: Vec<Real>,
    y_edges: Vec<Real>,
}

impl GridPartition {
    /// Cell holding the projected point `(x, y)`, `None` outside the bounds.
    pub fn locate(&self, x: Real, y: Real) -> Option<usize> {
        if !self.bounds.contains_xy(x, y) {
            return None;
        }
        Some(self.shape.linearize([
            axis_index(&self.x_edges, x),
            axis_index(&self.y_edges, y),
        ]))
    }

    /// Height of an arbitrary point along this partition's normal.
    #[inline]
    pub fn height_of(&self, p: &Point3<Real>) -> Real {
        p.coords.dot(&self.normal)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn non_empty_cell_count(&self) -> usize {
        self.points_in_cells.len()
    }

    pub fn is_empty_cell(&self, id: usize) -> bool {
        !self.points_in_cells.contains_key(&id)
    }
}

/// Splits the footprint into cells and derives each cell's cusp and
/// inclusion threshold.
///
/// **Inclusion threshold**: `highest.height - inclusion_criterion`, with the
/// criterion an absolute, non-negative offset in mesh units. A point of the
/// cell survives the fine cut when its height is within that distance of the
/// cell's cusp, so raising the criterion only ever keeps more points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPartitioner {
    cell_size: Real,
    inclusion_criterion: Real,
}

impl GridPartitioner {
    pub fn new(cell_size: Real, inclusion_criterion: Real) -> CleanResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(CleanError::invalid("cell_size", cell_size, "a finite value > 0"));
        }
        if !(inclusion_criterion.is_finite() && inclusion_criterion >= 0.0) {
            return Err(CleanError::invalid(
                "inclusion_criterion",
                inclusion_criterion,
                "a finite offset >= 0",
            ));
        }
        Ok(Self {
            cell_size,
            inclusion_criterion,
        })
    }

    pub const fn cell_size(&self) -> Real {
        self.cell_size
    }

    pub const fn inclusion_criterion(&self) -> Real {
        self.inclusion_criterion
    }

    #[inline]
    pub fn inclusion_threshold(&self, highest_height: Real) -> Real {
        highest_height - self.inclusion_criterion
    }

    /// Partition `vertices` over the XY footprint of `bounds`.
    ///
    /// Vertices outside `bounds` are clamped into the border cells.
    pub fn partition(
        &self,
        bounds: &Bounds,
        normal: &Vector3<Real>,
        vertices: &[Point3<Real>],
    ) -> CleanResult<GridPartition> {
        let normal = normal
            .try_normalize(Real::EPSILON)
            .ok_or_else(|| CleanError::invalid("normal", normal.norm(), "a non-zero vector"))?;

        let x_edges = axis_edges(bounds.xmin, bounds.xmax, self.cell_size);
        let y_edges = axis_edges(bounds.ymin, bounds.ymax, self.cell_size);
        let shape = GridShape {
            nx: x_edges.len() - 1,
            ny: y_edges.len() - 1,
        };

        let mut cells = Vec::with_capacity(shape.size());
        for row in 0..shape.ny {
            for col in 0..shape.nx {
                cells.push(GridCell::new(
                    x_edges[col],
                    x_edges[col + 1],
                    y_edges[row],
                    y_edges[row + 1],
                ));
            }
        }

        let outside = vertices
            .iter()
            .filter(|p| !bounds.contains_xy(p.x, p.y))
            .count();
        if outside > 0 {
            warn!("{} vertices lie outside the grid bounds and were clamped", outside);
        }

        let locate = |p: &Point3<Real>| {
            shape.linearize([axis_index(&x_edges, p.x), axis_index(&y_edges, p.y)])
        };
        #[cfg(not(feature = "parallel"))]
        let vertex_cells: Vec<usize> = vertices.iter().map(locate).collect();
        #[cfg(feature = "parallel")]
        let vertex_cells: Vec<usize> = vertices.par_iter().map(locate).collect();

        #[cfg(not(feature = "parallel"))]
        let heights: Vec<Real> = vertices.iter().map(|p| p.coords.dot(&normal)).collect();
        #[cfg(feature = "parallel")]
        let heights: Vec<Real> = vertices.par_iter().map(|p| p.coords.dot(&normal)).collect();

        let height_range = heights
            .iter()
            .fold(None, |acc: Option<HeightRange>, &h| {
                Some(match acc {
                    None => HeightRange { min: h, max: h },
                    Some(r) => HeightRange {
                        min: r.min.min(h),
                        max: r.max.max(h),
                    },
                })
            })
            .unwrap_or_default();

        let mut points_in_cells: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &c) in vertex_cells.iter().enumerate() {
            points_in_cells.entry(c).or_default().push(i);
        }

        let mut highest_points = BTreeMap::new();
        let mut inclusion_thresholds = BTreeMap::new();
        for (&c, members) in &points_in_cells {
            // members is never empty; first vertex wins ties
            let top = members
                .iter()
                .copied()
                .reduce(|best, i| if heights[i] > heights[best] { i } else { best });
            if let Some(top) = top {
                highest_points.insert(
                    c,
                    HighestPoint {
                        vertex: top,
                        position: vertices[top],
                        height: heights[top],
                    },
                );
                inclusion_thresholds.insert(c, self.inclusion_threshold(heights[top]));
            }
        }

        debug!(
            "Grid {}x{} ({} cells, {} non-empty), cell size {:.3}",
            shape.nx,
            shape.ny,
            cells.len(),
            points_in_cells.len(),
            self.cell_size
        );

        Ok(GridPartition {
            bounds: *bounds,
            cell_size: self.cell_size,
            normal,
            shape,
            cells,
            vertex_cells,
            heights,
            height_range,
            highest_points,
            points_in_cells,
            inclusion_thresholds,
            x_edges,
            y_edges,
        })
    }
}

/// One-shot form of [`GridPartitioner::partition`].
pub fn partition(
    bounds: &Bounds,
    cell_size: Real,
    normal: &Vector3<Real>,
    inclusion_criterion: Real,
    vertices: &[Point3<Real>],
) -> CleanResult<GridPartition> {
    GridPartitioner::new(cell_size, inclusion_criterion)?.partition(bounds, normal, vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_bounds() -> Bounds {
        Bounds::new(0.0, 100.0, 0.0, 100.0, 0.0, 10.0)
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        for bad in [0.0, -1.0, Real::NAN, Real::INFINITY] {
            let err = GridPartitioner::new(bad, 1.0).unwrap_err();
            assert!(matches!(
                err,
                CleanError::InvalidConfiguration { parameter: "cell_size", .. }
            ));
        }
        assert!(GridPartitioner::new(1.0, -0.5).is_err());
    }

    #[test]
    fn locate_agrees_with_assignment() {
        let verts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 1.0),
            Point3::new(100.0, 100.0, 2.0),
            Point3::new(55.0, 55.0, 10.0),
        ];
        let g = partition(&square_bounds(), 10.0, &Vector3::z(), 1.0, &verts).expect("grid");
        for (i, p) in verts.iter().enumerate() {
            assert_eq!(g.locate(p.x, p.y), Some(g.vertex_cells[i]));
        }
        assert_eq!(g.vertex_cells, vec![0, 1, 99, 55]);
        assert_eq!(g.locate(-0.1, 5.0), None);
    }

    #[test]
    fn threshold_is_offset_below_cusp() {
        let verts = vec![
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(2.0, 2.0, 7.0),
            Point3::new(3.0, 3.0, 4.0),
        ];
        let bounds = Bounds::from_points(&verts).expect("bounds");
        let g = partition(&bounds, 10.0, &Vector3::z(), 2.5, &verts).expect("grid");
        assert_eq!(g.cell_count(), 1);
        assert_eq!(g.highest_points[&0].vertex, 1);
        assert_eq!(g.inclusion_thresholds[&0], 4.5);
        assert_eq!(g.height_range, HeightRange { min: 2.0, max: 7.0 });
    }

    #[test]
    fn heights_follow_a_tilted_normal() {
        let verts = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 0.0)];
        let bounds = Bounds::from_points(&verts).expect("bounds");
        let g = partition(&bounds, 5.0, &Vector3::new(2.0, 0.0, 0.0), 0.0, &verts).expect("grid");
        assert_eq!(g.normal, Vector3::x());
        assert_eq!(g.heights, vec![0.0, 1.0]);
        assert_eq!(g.highest_points[&0].vertex, 1);
        assert!(partition(&bounds, 5.0, &Vector3::zeros(), 0.0, &verts).is_err());
    }
}
