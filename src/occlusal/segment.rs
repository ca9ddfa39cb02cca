//! Quadrant segmentation of the cusp-bearing region by successive plane splits.

use crate::float_types::Real;
use crate::plane::Plane;
use nalgebra::Point3;
use std::collections::VecDeque;

/// Final segments (vertex indices) and how many empty halves were pruned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub segments: Vec<Vec<usize>>,
    pub pruned: usize,
}

/// Split `initial` by every plane in `planes`, in order.
///
/// Works through an explicit FIFO worklist of `(segment, remaining planes)`:
/// each entry is split into its front half (signed distance ≥ 0) and back
/// half, empty halves are dropped, and non-empty halves are queued with the
/// remaining planes. Entries with no planes left are final.
///
/// With two planes this yields up to four segments, ordered
/// front/front, front/back, back/front, back/back.
pub fn split_by_planes(
    points: &[Point3<Real>],
    initial: Vec<usize>,
    planes: &[Plane],
) -> Segmentation {
    let mut out = Segmentation::default();
    if initial.is_empty() {
        return out;
    }

    let mut worklist: VecDeque<(Vec<usize>, &[Plane])> = VecDeque::new();
    worklist.push_back((initial, planes));

    while let Some((segment, remaining)) = worklist.pop_front() {
        let Some((plane, rest)) = remaining.split_first() else {
            out.segments.push(segment);
            continue;
        };

        let (front, back): (Vec<usize>, Vec<usize>) =
            segment.into_iter().partition(|&i| plane.is_front(&points[i]));

        for half in [front, back] {
            if half.is_empty() {
                out.pruned += 1;
            } else {
                worklist.push_back((half, rest));
            }
        }
    }

    out
}

/// Index of the highest (max Z) vertex of `segment`; the first wins on ties.
pub fn highest_vertex(points: &[Point3<Real>], segment: &[usize]) -> Option<usize> {
    segment
        .iter()
        .copied()
        .reduce(|best, i| if points[i].z > points[best].z { i } else { best })
}
