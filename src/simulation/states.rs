//! Core state types for the packing simulation.
//!
//! Defines the ellipsoid arena and domain geometry:
//! - `Ellipsoid` holding center/velocity/semi-axes/orientation as `NVec3`/`NMat3`
//! - `Domain` the bounded packing cube with its clamping margin
//! - `Population` the ellipsoid list plus the current growth step
//!
//! Ellipsoids are addressed by arena index; `label` is index + 1, assigned at
//! creation and never reused.

use nalgebra::{Matrix3, Vector3};
pub type NVec3 = Vector3<f64>;
pub type NMat3 = Matrix3<f64>;

#[derive(Debug, Clone)]
pub struct Ellipsoid {
    pub label: u16, // instance id
    pub center: NVec3, // position
    pub velocity: NVec3, // velocity
    pub semi_axes: NVec3, // per-axis half-lengths, non-decreasing over a run
    pub orientation: NMat3, // rotation, fixed at creation
}

impl Ellipsoid {
    /// Largest semi-axis; bounding-sphere radius for the broad phase.
    pub fn max_semi_axis(&self) -> f64 {
        self.semi_axes.x.max(self.semi_axes.y).max(self.semi_axes.z)
    }

    /// Sum of the three semi-axes; conservative contact distance for the resolver.
    pub fn semi_axis_sum(&self) -> f64 {
        self.semi_axes.x + self.semi_axes.y + self.semi_axes.z
    }

    /// Ellipsoid volume 4/3 pi abc.
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.semi_axes.x * self.semi_axes.y * self.semi_axes.z
    }
}

#[derive(Debug, Clone)]
pub struct Domain {
    pub size: f64, // edge length of the packing cube
    pub margin: f64, // slack beyond [0, size] before clamping kicks in
}

impl Domain {
    /// Centroid of the cube, the target of the centering bias.
    pub fn center(&self) -> NVec3 {
        NVec3::new(self.size / 2.0, self.size / 2.0, self.size / 2.0)
    }

    /// Lower clamping bound, identical for all three coordinates.
    pub fn lower(&self) -> f64 {
        -self.margin
    }

    /// Upper clamping bound, identical for all three coordinates.
    pub fn upper(&self) -> f64 {
        self.size + self.margin
    }

    /// True if every coordinate of `p` lies within the clamping bounds.
    pub fn contains(&self, p: &NVec3) -> bool {
        let (lo, hi) = (self.lower(), self.upper());
        (0..3).all(|k| p[k] >= lo && p[k] <= hi)
    }

    pub fn volume(&self) -> f64 {
        self.size * self.size * self.size
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    pub ellipsoids: Vec<Ellipsoid>, // arena, indexed by id
    pub step: usize, // growth steps completed
    pub domain: Domain,
}

impl Population {
    pub fn len(&self) -> usize {
        self.ellipsoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ellipsoids.is_empty()
    }

    /// Disjoint mutable borrows of ellipsoids `i` and `j`. Requires `i < j`.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Ellipsoid, &mut Ellipsoid) {
        debug_assert!(i < j, "pair_mut expects i < j, got ({i}, {j})");
        let (head, tail) = self.ellipsoids.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    }
}
