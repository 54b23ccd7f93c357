//! Rasterization of the packed population into an instance-label grid.
//!
//! Lattice points `(i, j, k)` are tested against each ellipsoid in arena
//! order; the last writer wins where ellipsoids still overlap numerically.
//! `pack_labels` then renames the surviving labels to a contiguous range.

use std::collections::BTreeSet;

use ndarray::Array3;

use crate::simulation::states::{Ellipsoid, NVec3, Population};

/// True if the lattice point `p` lies inside or on the ellipsoid surface.
pub fn point_inside(e: &Ellipsoid, p: &NVec3) -> bool {
    let rotated = e.orientation * (p - e.center);
    let scaled = rotated.component_div(&e.semi_axes);
    scaled.norm_squared() <= 1.0
}

/// Rasterize every ellipsoid into a `volume_size`^3 label grid.
///
/// Only lattice points inside the axis-aligned bounding box of each
/// ellipsoid are tested. Voxels covered by no ellipsoid stay 0.
pub fn rasterize(pop: &Population, volume_size: usize) -> Array3<u16> {
    let mut labels = Array3::<u16>::zeros((volume_size, volume_size, volume_size));
    let hi = volume_size as i64 - 1;
    for e in &pop.ellipsoids {
        let reach = e.max_semi_axis();
        let bound = |v: f64, round_up: bool| -> i64 {
            let r = if round_up { v.ceil() } else { v.floor() };
            (r as i64).clamp(0, hi)
        };
        let x0 = bound(e.center.x - reach, true);
        let x1 = bound(e.center.x + reach, false);
        let y0 = bound(e.center.y - reach, true);
        let y1 = bound(e.center.y + reach, false);
        let z0 = bound(e.center.z - reach, true);
        let z1 = bound(e.center.z + reach, false);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    let p = NVec3::new(x as f64, y as f64, z as f64);
                    if point_inside(e, &p) {
                        labels[[x as usize, y as usize, z as usize]] = e.label;
                    }
                }
            }
        }
    }
    labels
}

/// Rename the labels present in `labels` to `1..=n`, keeping their order.
///
/// Returns the number of distinct instances left after rasterization.
pub fn pack_labels(labels: &mut Array3<u16>) -> usize {
    let mut present: BTreeSet<u16> = BTreeSet::new();
    for &v in labels.iter() {
        if v != 0 {
            present.insert(v);
        }
    }
    let largest = present.iter().next_back().copied().unwrap_or(0);
    let mut rename = vec![0u16; largest as usize + 1];
    for (new, &old) in present.iter().enumerate() {
        rename[old as usize] = new as u16 + 1;
    }
    for v in labels.iter_mut() {
        if *v != 0 {
            *v = rename[*v as usize];
        }
    }
    present.len()
}
