//! Build fully-initialized packing scenarios from configuration
//!
//! Takes a `GenerationConfig` (YAML-facing) and a run seed and produces the
//! runtime bundle consumed by the growth and relaxation drivers:
//! - numerical parameters (`Parameters`)
//! - initial population (`Population` with seeded ellipsoids at step 0)
//! - static candidate-pair graph (`CandidatePairs`)
//! - the run RNG, which every random draw of the run flows through

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nalgebra::Rotation3;

use crate::configuration::config::GenerationConfig;
use crate::error::{PackError, PackResult};
use crate::simulation::params::Parameters;
use crate::simulation::sampler::{candidate_pairs, sample_seed_points, CandidatePairs};
use crate::simulation::states::{Domain, Ellipsoid, NVec3, Population};

/// Smallest initial semi-axis.
pub const INITIAL_AXIS_MIN: f64 = 1.0;
/// Width of the uniform initial semi-axis distribution.
pub const INITIAL_AXIS_SPAN: f64 = 1.8;

/// Fully-initialized runtime bundle for one packing run.
///
/// Constructed from a [`GenerationConfig`] by [`Scenario::build_scenario`];
/// the same seed always yields the same bundle.
pub struct Scenario {
    pub parameters: Parameters,
    pub population: Population,
    pub pairs: CandidatePairs,
    pub rng: StdRng,
}

impl Scenario {
    pub fn build_scenario(cfg: &GenerationConfig, seed: u64) -> PackResult<Self> {
        cfg.validate()?;
        let p_cfg = &cfg.packing;
        let mut rng = StdRng::seed_from_u64(seed);

        // Seed centers: Poisson-disk samples scaled up to the domain,
        // then the pair graph at the interaction cutoff
        let mut points = sample_seed_points(p_cfg.seed_separation, &mut rng)?;
        for p in points.iter_mut() {
            *p *= p_cfg.domain_size;
        }
        if points.len() >= u16::MAX as usize {
            return Err(PackError::Sampling(format!(
                "{} seed points exceed the label range",
                points.len()
            )));
        }
        let pairs = candidate_pairs(&points, p_cfg.pair_cutoff);

        let domain = Domain {
            size: p_cfg.domain_size,
            margin: p_cfg.margin,
        };
        let center = domain.center();
        let max_angle = p_cfg.max_orientation_angle.to_radians();

        // Ellipsoids: inward unit velocity, a random tilt about the x or y
        // axis, uniform initial semi-axes
        let mut ellipsoids: Vec<Ellipsoid> = Vec::with_capacity(points.len());
        for (idx, position) in points.iter().enumerate() {
            let to_center = center - position;
            let norm = to_center.norm();
            let velocity = if norm > 0.0 {
                to_center / norm
            } else {
                // a seed exactly at the center gets a random direction
                NVec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
            };

            let about_x = rng.random_range(0..2) == 0;
            let angle = if max_angle > 0.0 {
                rng.random_range(0.0..max_angle)
            } else {
                0.0
            };
            let orientation = if about_x {
                Rotation3::from_axis_angle(&NVec3::x_axis(), angle)
            } else {
                Rotation3::from_axis_angle(&NVec3::y_axis(), angle)
            }
            .into_inner();

            let semi_axes = NVec3::new(
                rng.random::<f64>() * INITIAL_AXIS_SPAN + INITIAL_AXIS_MIN,
                rng.random::<f64>() * INITIAL_AXIS_SPAN + INITIAL_AXIS_MIN,
                rng.random::<f64>() * INITIAL_AXIS_SPAN + INITIAL_AXIS_MIN,
            );

            ellipsoids.push(Ellipsoid {
                label: (idx + 1) as u16,
                center: *position,
                velocity,
                semi_axes,
                orientation,
            });
        }

        let population = Population {
            ellipsoids,
            step: 0,
            domain,
        };

        // Parameters (runtime) from PackingConfig
        let parameters = Parameters {
            max_steps: p_cfg.max_steps,
            growth_interval: p_cfg.growth_interval,
            growth_rate: NVec3::new(
                p_cfg.growth_rate[0],
                p_cfg.growth_rate[1],
                p_cfg.growth_rate[2],
            ),
            max_semi_axes: NVec3::new(
                p_cfg.max_semi_axes[0],
                p_cfg.max_semi_axes[1],
                p_cfg.max_semi_axes[2],
            ),
            overlap_correction: p_cfg.overlap_correction,
            damping: p_cfg.damping,
            center_pull: p_cfg.center_pull,
            step_scale: p_cfg.step_scale,
            root_tolerance: p_cfg.root_tolerance,
            max_relax_passes: p_cfg.max_relax_passes,
        };

        Ok(Self {
            parameters,
            population,
            pairs,
            rng,
        })
    }
}
