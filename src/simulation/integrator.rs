//! Per-step updates of the ellipsoid population
//!
//! Provides the three in-place updates of the packing loop, all driven by
//! `Population` and `Parameters`:
//! - `grow_semi_axes`: jittered growth toward the per-axis caps
//! - `broad_phase`: bounding-sphere prefilter over the candidate pairs
//! - `step_positions`: centering bias, position update, boundary clamping

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use super::params::Parameters;
use super::sampler::CandidatePairs;
use super::states::{Domain, Ellipsoid, Population};

/// Relative spread of the per-axis growth jitter.
pub const GROWTH_JITTER: f64 = 0.7;

/// Grow every semi-axis by a jittered increment, clamped to its cap.
/// The jitter scales the nominal rate by a factor in (0.3, 1.7), so
/// semi-axes never shrink.
pub fn grow_semi_axes(pop: &mut Population, params: &Parameters, rng: &mut StdRng) {
    for e in pop.ellipsoids.iter_mut() {
        for k in 0..3 {
            // s_k = min(s_k + rate_k * (1 + u), cap_k), u ~ U(-0.7, 0.7)
            let jitter = rng.random_range(-GROWTH_JITTER..GROWTH_JITTER);
            let grown = e.semi_axes[k] + params.growth_rate[k] * (1.0 + jitter);
            e.semi_axes[k] = grown.min(params.max_semi_axes[k]);
        }
    }
}

/// Filter the candidate pairs down to those whose bounding spheres overlap.
/// Pure per-pair work fanned out with rayon; the output keeps the input
/// order, so downstream resolution stays deterministic.
pub fn broad_phase(pop: &Population, pairs: &CandidatePairs) -> Vec<(usize, usize)> {
    pairs
        .pairs
        .par_iter()
        .with_min_len(256)
        .filter(|&&(i, j)| {
            let a = &pop.ellipsoids[i];
            let b = &pop.ellipsoids[j];
            let reach = a.max_semi_axis() + b.max_semi_axis();
            (a.center - b.center).norm_squared() < reach * reach
        })
        .copied()
        .collect()
}

/// Advance every center by one step and confine it to the domain.
/// With `with_center_pull` each velocity is first biased toward the domain
/// center; relaxation passes skip the bias. Returns true if any coordinate
/// was clamped.
pub fn step_positions(pop: &mut Population, params: &Parameters, with_center_pull: bool) -> bool {
    let domain = pop.domain.clone();
    let center = domain.center();
    let mut any_clamped = false;
    for e in pop.ellipsoids.iter_mut() {
        if with_center_pull {
            // v += pull * unit(center - x), skipped exactly at the center
            let to_center = center - e.center;
            let norm = to_center.norm();
            if norm > 0.0 {
                e.velocity += to_center / norm * params.center_pull;
            }
        }

        // x_n+1 = x_n + scale * v
        e.center += e.velocity * params.step_scale;

        if clamp_to_domain(e, &domain) {
            any_clamped = true;
        }
    }
    any_clamped
}

/// Clamp escaped coordinates and re-aim the velocity at the domain center.
/// The redirect is computed per violated coordinate from the partially
/// clamped position. Returns true if anything was clamped.
fn clamp_to_domain(e: &mut Ellipsoid, domain: &Domain) -> bool {
    let lo = domain.lower();
    let hi = domain.upper();
    let center = domain.center();
    let mut clamped = false;
    for k in 0..3 {
        if e.center[k] < lo || e.center[k] > hi {
            e.center[k] = e.center[k].clamp(lo, hi);
            let to_center = center - e.center;
            let norm = to_center.norm();
            if norm > 0.0 {
                e.velocity = to_center / norm;
            }
            clamped = true;
        }
    }
    clamped
}
