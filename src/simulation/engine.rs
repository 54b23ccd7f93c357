//! Growth and relaxation drivers for a packing run
//!
//! `run_growth` advances the fixed-length growth loop; `relax` is the
//! post-growth fixed point that forces full pairwise separation before the
//! population is rasterized.

use log::{debug, info, warn};
use rand::rngs::StdRng;

use super::integrator::{broad_phase, grow_semi_axes, step_positions};
use super::params::Parameters;
use super::resolver::CollisionResolver;
use super::sampler::CandidatePairs;
use super::separation::separation_state;
use super::states::Population;
use crate::error::{PackError, PackResult};

/// Advance the population through the full growth schedule.
///
/// Each step grows the semi-axes on the configured interval, resolves the
/// contacts found among the candidate pairs in ascending pair order, then
/// moves every ellipsoid with the centering bias. Pairs whose separation
/// test fails numerically are skipped with a warning.
pub fn run_growth(
    pop: &mut Population,
    pairs: &CandidatePairs,
    params: &Parameters,
    rng: &mut StdRng,
) {
    let resolver = CollisionResolver::from_params(params);
    for step in 0..params.max_steps {
        if step % params.growth_interval == 0 {
            grow_semi_axes(pop, params, rng);
        }

        let colliding = broad_phase(pop, pairs);
        for &(i, j) in &colliding {
            let state =
                separation_state(&pop.ellipsoids[i], &pop.ellipsoids[j], params.root_tolerance);
            match state {
                Ok(state) if state.needs_resolution() => {
                    let (a, b) = pop.pair_mut(i, j);
                    resolver.resolve(a, b, false, rng);
                }
                Ok(_) => {}
                Err(err) => warn!("skipping pair ({i}, {j}) at step {step}: {err}"),
            }
        }

        step_positions(pop, params, true);
        pop.step += 1;
    }
    info!(
        "growth finished: {} ellipsoids after {} steps, packing fraction {:.3}",
        pop.len(),
        pop.step,
        packing_fraction(pop)
    );
}

/// Drive the population to a fully separated, in-bounds configuration.
///
/// Every pass sweeps all pairs (gated by the bounding-sphere test), forces
/// resolution on any contact, then advances positions without the centering
/// bias. The loop exits once a pass finds no contact and the previous move
/// clamped nothing, so the returned configuration is exactly the one that
/// passed the sweep. Returns the number of passes used.
pub fn relax(pop: &mut Population, params: &Parameters, rng: &mut StdRng) -> PackResult<usize> {
    let resolver = CollisionResolver::from_params(params);
    let n = pop.len();
    let mut clamped_last = true;
    for pass in 0..params.max_relax_passes {
        let mut any_contact = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &pop.ellipsoids[i];
                let b = &pop.ellipsoids[j];
                let reach = a.max_semi_axis() + b.max_semi_axis();
                if (a.center - b.center).norm() >= reach {
                    continue;
                }
                match separation_state(a, b, params.root_tolerance) {
                    Ok(state) if state.needs_resolution() => {
                        let (a, b) = pop.pair_mut(i, j);
                        resolver.resolve(a, b, true, rng);
                        any_contact = true;
                    }
                    Ok(_) => {}
                    Err(err) => warn!("skipping pair ({i}, {j}) in relaxation: {err}"),
                }
            }
        }

        if !any_contact && !clamped_last {
            debug!("relaxation converged after {} passes", pass + 1);
            return Ok(pass + 1);
        }
        clamped_last = step_positions(pop, params, false);
    }
    Err(PackError::Convergence {
        passes: params.max_relax_passes,
    })
}

/// Total ellipsoid volume over domain volume.
pub fn packing_fraction(pop: &Population) -> f64 {
    let total: f64 = pop.ellipsoids.iter().map(|e| e.volume()).sum();
    total / pop.domain.volume()
}
