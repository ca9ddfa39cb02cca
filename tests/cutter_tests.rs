mod support;

use dentclean::cutter::{CombinePolicy, ThresholdCutter, cut};
use dentclean::float_types::Real;
use dentclean::grid::{GridPartition, partition};
use dentclean::mesh::Mesh;
use nalgebra::Vector3;
use support::{CROWN_HEIGHT, arch_with_teeth};

fn arch_and_grid() -> (Mesh, GridPartition) {
    let mesh = arch_with_teeth();
    let g = partition(&mesh.bounds(), 2.0, &Vector3::z(), 1.0, &mesh.vertices).expect("grid");
    (mesh, g)
}

const RATIOS: [Real; 6] = [0.0, 0.1, 0.25, 0.5, 0.75, 1.0];

#[test]
fn gum_goes_crowns_stay() {
    let (mesh, g) = arch_and_grid();
    let out = cut(&mesh, &g, 0.5, CombinePolicy::Union).expect("cut");

    // range 2.0..8.0, halfway down
    assert!((out.z_threshold - 5.0).abs() < 1e-12);
    assert_eq!(out.removed + out.mesh.vertex_count(), mesh.vertex_count());
    assert_eq!(out.mesh.vertex_count(), 172);

    for p in &out.mesh.vertices {
        assert!(p.z > 5.0, "{p:?} survived");
    }
    let crowns = |m: &Mesh| m.vertices.iter().filter(|p| p.z == CROWN_HEIGHT).count();
    assert_eq!(crowns(&out.mesh), crowns(&mesh));

    // faces are re-indexed onto the surviving vertices
    for f in &out.mesh.faces {
        assert!(f.iter().all(|&i| i < out.mesh.vertex_count()));
    }
    assert!(out.mesh.face_count() > 0);
}

#[test]
fn cutting_twice_removes_nothing_more() {
    let (mesh, g) = arch_and_grid();
    for policy in [CombinePolicy::Union, CombinePolicy::InclusionOnly] {
        for ratio in RATIOS {
            let cutter = ThresholdCutter::new(ratio, policy).expect("cutter");
            let once = cutter.cut(&mesh, &g);
            let twice = cutter.cut(&once.mesh, &g);
            assert_eq!(twice.removed, 0, "ratio {ratio}, {policy:?}");
            assert_eq!(twice.mesh.faces, once.mesh.faces);
        }
    }
}

#[test]
fn coarse_removals_shrink_as_the_ratio_grows() {
    let (mesh, g) = arch_and_grid();
    let counts: Vec<usize> = RATIOS
        .iter()
        .map(|&r| {
            ThresholdCutter::new(r, CombinePolicy::Union)
                .expect("cutter")
                .classify(&mesh, &g)
                .coarse_count()
        })
        .collect();
    for w in counts.windows(2) {
        assert!(w[1] <= w[0], "{counts:?}");
    }
}

#[test]
fn ratio_extremes() {
    let (mesh, g) = arch_and_grid();

    // threshold at the bottom of the range: no populated cell is below it
    let all = ThresholdCutter::new(1.0, CombinePolicy::Union).expect("cutter");
    let c = all.classify(&mesh, &g);
    assert_eq!(c.coarse_count(), 0);
    assert!(c.rejected_cells.is_empty());

    // threshold at the very top: only cells holding a crown survive
    let none = ThresholdCutter::new(0.0, CombinePolicy::Union).expect("cutter");
    let c = none.classify(&mesh, &g);
    for (i, &flagged) in c.coarse.iter().enumerate() {
        let top = g.highest_points[&g.vertex_cells[i]].height;
        assert_eq!(flagged, top < CROWN_HEIGHT);
    }
}

#[test]
fn inclusion_only_keeps_rejected_cells() {
    let (mesh, g) = arch_and_grid();
    let union = ThresholdCutter::new(0.5, CombinePolicy::Union)
        .expect("cutter")
        .cut(&mesh, &g);
    let fine_only = ThresholdCutter::new(0.5, CombinePolicy::InclusionOnly)
        .expect("cutter")
        .cut(&mesh, &g);

    assert_eq!(fine_only.coarse_flagged, union.coarse_flagged);
    assert_eq!(fine_only.removed, fine_only.fine_flagged);
    assert!(fine_only.mesh.vertex_count() > union.mesh.vertex_count());
    // gum-only cells keep their flat top
    assert!(fine_only.mesh.vertices.iter().any(|p| p.z < 2.5));
}

#[test]
fn input_mesh_is_never_modified() {
    let (mesh, g) = arch_and_grid();
    let before = mesh.clone();
    let _ = cut(&mesh, &g, 0.3, CombinePolicy::Union).expect("cut");
    assert_eq!(mesh.vertices, before.vertices);
    assert_eq!(mesh.faces, before.faces);
}

#[test]
fn out_of_range_ratio_is_rejected() {
    let (mesh, g) = arch_and_grid();
    assert!(cut(&mesh, &g, 1.01, CombinePolicy::Union).is_err());
    assert!(cut(&mesh, &g, -0.01, CombinePolicy::Union).is_err());
}

#[test]
fn full_ratio_keeps_a_cell_sitting_at_the_minimum() {
    // bounds that do not round-trip through `max - span`
    let (lo, hi) = (-2.170122498673437, 5.87736870323122);
    let mesh = Mesh::from_coords(
        &[
            [0.0, 0.0, lo],
            [5.0, 5.0, lo],
            [8.0, 2.0, lo],
            [15.0, 5.0, hi],
            [20.0, 10.0, hi],
        ],
        vec![[0, 1, 2], [2, 3, 4]],
    );
    let g = partition(&mesh.bounds(), 10.0, &Vector3::z(), 1.0, &mesh.vertices).expect("grid");
    assert_eq!(g.non_empty_cell_count(), 2);

    let c = ThresholdCutter::new(1.0, CombinePolicy::Union)
        .expect("cutter")
        .classify(&mesh, &g);
    assert_eq!(c.z_threshold, lo);
    assert_eq!(c.coarse_count(), 0);
    assert!(c.rejected_cells.is_empty());

    let top = ThresholdCutter::new(0.0, CombinePolicy::Union).expect("cutter");
    assert_eq!(top.z_threshold(&g.height_range), hi);
}

#[test]
fn wider_inclusion_band_flags_fewer_points() {
    let mesh = arch_with_teeth();
    let cutter = ThresholdCutter::new(0.5, CombinePolicy::Union).expect("cutter");
    let counts: Vec<usize> = [0.0, 0.5, 1.0, 3.0]
        .iter()
        .map(|&criterion| {
            let g = partition(&mesh.bounds(), 2.0, &Vector3::z(), criterion, &mesh.vertices)
                .expect("grid");
            cutter.classify(&mesh, &g).fine_count()
        })
        .collect();
    for w in counts.windows(2) {
        assert!(w[1] <= w[0], "{counts:?}");
    }
    assert!(counts[3] < counts[0], "{counts:?}");
}
