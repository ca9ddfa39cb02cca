//! Test support library
//! Synthetic scans with known geometry.
#![allow(dead_code)]

use dentclean::{float_types::Real, mesh::Mesh};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// A triangulated height field: `nx × ny` samples spaced `step` apart from
/// `origin`, with `z = height(x, y)`. Vertices are row-major in X.
pub fn height_field(
    nx: usize,
    ny: usize,
    step: Real,
    origin: [Real; 2],
    height: impl Fn(Real, Real) -> Real,
) -> Mesh {
    let mut coords = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let x = origin[0] + i as Real * step;
            let y = origin[1] + j as Real * step;
            coords.push([x, y, height(x, y)]);
        }
    }

    let mut faces = Vec::with_capacity(2 * (nx - 1) * (ny - 1));
    for j in 0..ny - 1 {
        for i in 0..nx - 1 {
            let a = j * nx + i;
            let b = a + 1;
            let c = a + nx + 1;
            let d = a + nx;
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    Mesh::from_coords(&coords, faces)
}

/// Centers of the four teeth of [`arch_with_teeth`].
pub const TOOTH_CENTERS: [[Real; 2]; 4] = [[5.0, 10.0], [15.0, 10.0], [25.0, 10.0], [35.0, 10.0]];

/// Height of the flat crown of every tooth.
pub const CROWN_HEIGHT: Real = 8.0;

/// A 40 × 20 mm strip of gum (z from 2.0 to 2.4, rising with y) carrying
/// four flat-topped teeth: crown radius 1.5 at z = 8, flanks down to the gum
/// at radius 3. Sampled every 0.5 mm.
pub fn arch_with_teeth() -> Mesh {
    height_field(81, 41, 0.5, [0.0, 0.0], |x, y| {
        let gum = 2.0 + 0.02 * y;
        TOOTH_CENTERS.iter().fold(gum, |z, [cx, cy]| {
            let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            let tooth = 2.0 + 6.0 * ((3.0 - r) / 1.5).clamp(0.0, 1.0);
            z.max(tooth)
        })
    })
}

/// An elongated dome (semi-axes 30 × 15, peak 20) cut flat at z = 15.
pub fn mesa() -> Mesh {
    height_field(61, 31, 1.0, [-30.0, -15.0], |x, y| {
        let s = 1.0 - (x / 30.0).powi(2) - (y / 15.0).powi(2);
        (20.0 * s.max(0.0).sqrt()).min(15.0)
    })
}

/// A 100 × 100 flat square sampled every 5 with one spike of height 10 at (55, 55).
pub fn flat_square_with_spike() -> Mesh {
    height_field(21, 21, 5.0, [0.0, 0.0], |x, y| {
        if x == 55.0 && y == 55.0 { 10.0 } else { 0.0 }
    })
}

/// A ring of low points around the origin plus a small high cluster far off
/// to one side: everything above the center of mass sits in one quadrant.
pub fn lopsided_cluster() -> Mesh {
    let mut coords: Vec<[Real; 3]> = (0..40)
        .map(|k| {
            let a = k as Real / 40.0 * 2.0 * std::f64::consts::PI as Real;
            [10.0 * a.cos(), 10.0 * a.sin(), 0.0]
        })
        .collect();
    coords.extend([
        [30.0, 30.0, 10.0],
        [32.0, 30.0, 10.0],
        [34.0, 30.0, 10.0],
        [36.0, 30.5, 10.0],
    ]);
    Mesh::from_coords(&coords, Vec::new())
}
