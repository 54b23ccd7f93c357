//! Pairwise contact response.
//!
//! `CollisionResolver` applies the position correction and velocity impulse
//! to a contacting pair. The response is symmetric: both ellipsoids move by
//! half of the correction and receive half of the impulse.

use rand::rngs::StdRng;
use rand::Rng;

use crate::simulation::params::Parameters;
use crate::simulation::states::{Ellipsoid, NVec3};

/// Coordinate span of the substitute direction for coincident centers.
const DEGENERATE_NUDGE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    pub overlap_correction: f64, // fraction of the overlap corrected per call
    pub damping: f64, // impulse restitution factor
}

impl CollisionResolver {
    pub fn from_params(params: &Parameters) -> Self {
        CollisionResolver {
            overlap_correction: params.overlap_correction,
            damping: params.damping,
        }
    }

    /// Pushes a contacting pair apart and applies a damped velocity impulse.
    ///
    /// The contact normal is the center-to-center direction; the overlap is
    /// measured against the sum of all six semi-axes, which overestimates
    /// the true contact distance and so separates pairs over several calls.
    /// With `always_resolve` the impulse fires regardless of the sign of the
    /// relative normal velocity, which relaxation uses to shake off residual
    /// contacts.
    pub fn resolve(
        &self,
        first: &mut Ellipsoid,
        second: &mut Ellipsoid,
        always_resolve: bool,
        rng: &mut StdRng,
    ) {
        let mut normal = second.center - first.center;
        let distance = normal.norm();
        if distance == 0.0 {
            // coincident centers have no normal direction, substitute a
            // small random vector so the pair still drifts apart
            normal = NVec3::new(
                rng.random_range(-DEGENERATE_NUDGE..DEGENERATE_NUDGE),
                rng.random_range(-DEGENERATE_NUDGE..DEGENERATE_NUDGE),
                rng.random_range(-DEGENERATE_NUDGE..DEGENERATE_NUDGE),
            );
        } else {
            normal /= distance;
        }

        let min_distance = first.semi_axis_sum() + second.semi_axis_sum();
        let overlap = min_distance - distance;
        if overlap > 0.0 {
            let correction = self.overlap_correction * overlap * normal;
            first.center -= correction * 0.5;
            second.center += correction * 0.5;
        }

        let relative_velocity = first.velocity - second.velocity;
        let normal_speed = relative_velocity.dot(&normal);
        if normal_speed < 0.0 || always_resolve {
            let impulse = (1.0 + self.damping) * normal_speed * normal;
            first.velocity -= impulse * 0.5;
            second.velocity += impulse * 0.5;
        }
    }
}
