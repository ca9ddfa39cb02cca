//! Grid cell rectangles and the grid's index layout

use crate::float_types::Real;

/// An axis-aligned rectangle of the XY footprint.
///
/// Membership is decided by the owning grid's edges (half-open, closed on the
/// outer edge), not by [`GridCell::contains`] alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub xmin: Real,
    pub xmax: Real,
    pub ymin: Real,
    pub ymax: Real,
}

impl GridCell {
    pub const fn new(xmin: Real, xmax: Real, ymin: Real, ymax: Real) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// Closed containment test.
    #[inline]
    pub fn contains(&self, x: Real, y: Real) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    #[inline]
    pub fn area(&self) -> Real {
        (self.xmax - self.xmin) * (self.ymax - self.ymin)
    }

    /// `true` when the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &GridCell) -> bool {
        self.xmin < other.xmax
            && other.xmin < self.xmax
            && self.ymin < other.ymax
            && other.ymin < self.ymax
    }
}

/// Row-major layout of an `nx × ny` grid: cell id = `row * nx + col`,
/// where `col` indexes X and `row` indexes Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
}

impl GridShape {
    #[inline]
    pub const fn size(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub const fn linearize(&self, coords: [usize; 2]) -> usize {
        let [col, row] = coords;
        row * self.nx + col
    }

    #[inline]
    pub const fn delinearize(&self, id: usize) -> [usize; 2] {
        [id % self.nx, id / self.nx]
    }
}

/// Cell edges along one axis: `n + 1` monotone values from `min` to exactly `max`.
///
/// `n = ceil((max - min) / cell_size)`, at least 1. A trailing cell that
/// rounding would leave with zero width is folded into its neighbour.
pub fn axis_edges(min: Real, max: Real, cell_size: Real) -> Vec<Real> {
    let extent = (max - min).max(0.0);
    let mut n = ((extent / cell_size).ceil() as usize).max(1);
    while n > 1 && min + (n - 1) as Real * cell_size >= max {
        n -= 1;
    }

    let mut edges: Vec<Real> = (0..n).map(|k| min + k as Real * cell_size).collect();
    edges.push(max);
    edges
}

/// Index of the interval of `edges` holding `v`: `[e_k, e_{k+1})`, with the
/// last interval closed. Values outside the range clamp to the first/last cell.
#[inline]
pub fn axis_index(edges: &[Real], v: Real) -> usize {
    let interior = &edges[1..edges.len() - 1];
    interior.partition_point(|&e| e <= v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_cover_the_range_exactly() {
        assert_eq!(axis_edges(0.0, 100.0, 10.0).len(), 11);
        let e = axis_edges(0.0, 25.0, 10.0);
        assert_eq!(e, vec![0.0, 10.0, 20.0, 25.0]);
        // degenerate extent still yields one cell
        assert_eq!(axis_edges(3.0, 3.0, 1.0), vec![3.0, 3.0]);
    }

    #[test]
    fn rounding_never_creates_an_empty_trailing_cell() {
        let e = axis_edges(0.0, 0.3, 0.1);
        assert_eq!(*e.last().expect("edges"), 0.3);
        for w in e.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn half_open_intervals_with_closed_last_edge() {
        let e = axis_edges(0.0, 30.0, 10.0);
        assert_eq!(axis_index(&e, 0.0), 0);
        assert_eq!(axis_index(&e, 9.999), 0);
        assert_eq!(axis_index(&e, 10.0), 1);
        assert_eq!(axis_index(&e, 29.0), 2);
        assert_eq!(axis_index(&e, 30.0), 2);
        // clamped
        assert_eq!(axis_index(&e, -1.0), 0);
        assert_eq!(axis_index(&e, 31.0), 2);
    }

    #[test]
    fn shape_round_trips_ids() {
        let shape = GridShape { nx: 4, ny: 3 };
        assert_eq!(shape.size(), 12);
        assert_eq!(shape.linearize([1, 2]), 9);
        assert_eq!(shape.delinearize(9), [1, 2]);
    }

    #[test]
    fn touching_cells_do_not_overlap() {
        let a = GridCell::new(0.0, 1.0, 0.0, 1.0);
        let b = GridCell::new(1.0, 2.0, 0.0, 1.0);
        let c = GridCell::new(0.5, 1.5, 0.5, 1.5);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.contains(1.0, 1.0));
        assert_eq!(a.area(), 1.0);
    }
}
