//! Numerical parameters for the packing loop
//!
//! `Parameters` holds runtime settings:
//! - growth schedule (step count, interval, per-axis rates and caps),
//! - contact response factors (`overlap_correction`, `damping`),
//! - integration scales (`center_pull`, `step_scale`),
//! - separation-test tolerance and the relaxation pass cap

use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub max_steps: usize, // growth steps per run
    pub growth_interval: usize, // steps between semi-axis updates
    pub growth_rate: NVec3, // nominal per-axis growth per update
    pub max_semi_axes: NVec3, // per-axis semi-axis caps
    pub overlap_correction: f64, // fraction of the overlap corrected per contact
    pub damping: f64, // impulse restitution factor
    pub center_pull: f64, // strength of the centering bias
    pub step_scale: f64, // position update scale per step
    pub root_tolerance: f64, // root tolerance of the separation test
    pub max_relax_passes: usize, // relaxation pass cap before giving up
}
