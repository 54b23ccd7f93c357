//! Configuration types for loading volume-generation runs from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! generation run. A run consists of:
//!
//! - [`PackingConfig`]    – packing domain, seeding and growth-loop settings
//! - [`VolumeConfig`]     – voxel grid and intensity-synthesis settings
//! - [`GenerationConfig`] – top-level wrapper used to load a run from YAML
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock run; a YAML file only needs the fields it wants to override.
//!
//! # YAML format
//! A full run YAML matching these types:
//!
//! ```yaml
//! seed: 7                      # base RNG seed
//!
//! packing:
//!   domain_size: 63.0          # edge length of the packing cube
//!   margin: 3.0                # clamping slack beyond the cube
//!   seed_separation: 0.14      # Poisson-disk radius in the unit cube
//!   pair_cutoff: 13.0          # candidate-pair distance after scaling
//!   max_steps: 650             # growth steps per run
//!   growth_interval: 2         # steps between semi-axis updates
//!   growth_rate: [0.01, 0.01, 0.01]
//!   max_semi_axes: [12.0, 12.0, 12.0]
//!   max_orientation_angle: 360.0   # degrees
//!   overlap_correction: 0.1
//!   damping: 0.9
//!   center_pull: 0.01
//!   step_scale: 0.01
//!   root_tolerance: 1.0e-3     # separation-test tolerance
//!   max_relax_passes: 20000
//!
//! volume:
//!   size: 64                   # voxels per edge
//!   min_instance_voxels: 40    # smaller instances render as background
//!   blur_sigma: 1.0
//!   foreground_range: [-2.0, 20.0]
//!   background_range: [-5.0, -3.5]
//!   distance_constant: 0.1
//! ```
//!
//! `build_scenario` then maps this configuration into the runtime scenario
//! representation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PackError, PackResult};

/// Packing domain, seeding and growth-loop settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PackingConfig {
    pub domain_size: f64, // edge length of the packing cube
    pub margin: f64, // clamping slack beyond [0, domain_size]
    pub seed_separation: f64, // Poisson-disk radius in the unit cube
    pub pair_cutoff: f64, // candidate-pair distance after scaling to the domain
    pub max_steps: usize, // growth steps per run
    pub growth_interval: usize, // steps between semi-axis updates
    pub growth_rate: [f64; 3], // nominal per-axis growth per update
    pub max_semi_axes: [f64; 3], // per-axis semi-axis caps
    pub max_orientation_angle: f64, // tilt range in degrees
    pub overlap_correction: f64, // fraction of the overlap corrected per contact
    pub damping: f64, // impulse restitution factor
    pub center_pull: f64, // strength of the centering bias
    pub step_scale: f64, // position update scale per step
    pub root_tolerance: f64, // root tolerance of the separation test
    pub max_relax_passes: usize, // relaxation pass cap before giving up
}

impl Default for PackingConfig {
    fn default() -> Self {
        PackingConfig {
            domain_size: 63.0,
            margin: 3.0,
            seed_separation: 0.14,
            pair_cutoff: 13.0,
            max_steps: 650,
            growth_interval: 2,
            growth_rate: [0.01; 3],
            max_semi_axes: [12.0; 3],
            max_orientation_angle: 360.0,
            overlap_correction: 0.1,
            damping: 0.9,
            center_pull: 0.01,
            step_scale: 0.01,
            root_tolerance: 1.0e-3,
            max_relax_passes: 20_000,
        }
    }
}

/// Voxel grid and intensity-synthesis settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VolumeConfig {
    pub size: usize, // voxels per edge of the output grid
    pub min_instance_voxels: usize, // smaller instances render as background
    pub blur_sigma: f64, // Gaussian blur width in voxels
    pub foreground_range: [f64; 2], // instance values before rescaling
    pub background_range: [f64; 2], // background values before rescaling
    pub distance_constant: f64, // falloff constant of the background field
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            size: 64,
            min_instance_voxels: 40,
            blur_sigma: 1.0,
            foreground_range: [-2.0, 20.0],
            background_range: [-5.0, -3.5],
            distance_constant: 0.1,
        }
    }
}

/// Top-level run configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GenerationConfig {
    pub seed: u64, // base RNG seed, offset per run in batch mode
    pub packing: PackingConfig, // domain, seeding and growth-loop settings
    pub volume: VolumeConfig, // voxel grid and intensity settings
}

impl GenerationConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> PackResult<GenerationConfig> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|e| PackError::Config(e.to_string()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> PackResult<()> {
        let p = &self.packing;
        if !p.domain_size.is_finite() || p.domain_size <= 0.0 {
            return Err(config_err("packing.domain_size must be positive"));
        }
        if !p.margin.is_finite() || p.margin < 0.0 {
            return Err(config_err("packing.margin must be non-negative"));
        }
        if !p.seed_separation.is_finite() || p.seed_separation <= 0.0 || p.seed_separation >= 1.0 {
            return Err(config_err("packing.seed_separation must lie in (0, 1)"));
        }
        if !p.pair_cutoff.is_finite() || p.pair_cutoff <= 0.0 {
            return Err(config_err("packing.pair_cutoff must be positive"));
        }
        if p.growth_interval == 0 {
            return Err(config_err("packing.growth_interval must be at least 1"));
        }
        if p.growth_rate.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(config_err("packing.growth_rate must be non-negative"));
        }
        if p.max_semi_axes.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(config_err("packing.max_semi_axes must be positive"));
        }
        if !p.max_orientation_angle.is_finite() || p.max_orientation_angle < 0.0 {
            return Err(config_err("packing.max_orientation_angle must be non-negative"));
        }
        if !p.overlap_correction.is_finite() || p.overlap_correction <= 0.0 {
            return Err(config_err("packing.overlap_correction must be positive"));
        }
        if !p.damping.is_finite() || p.damping < 0.0 {
            return Err(config_err("packing.damping must be non-negative"));
        }
        if !p.center_pull.is_finite() || p.center_pull < 0.0 {
            return Err(config_err("packing.center_pull must be non-negative"));
        }
        if !p.step_scale.is_finite() || p.step_scale <= 0.0 {
            return Err(config_err("packing.step_scale must be positive"));
        }
        if !p.root_tolerance.is_finite() || p.root_tolerance <= 0.0 {
            return Err(config_err("packing.root_tolerance must be positive"));
        }
        if p.max_relax_passes == 0 {
            return Err(config_err("packing.max_relax_passes must be at least 1"));
        }

        let v = &self.volume;
        if v.size == 0 {
            return Err(config_err("volume.size must be at least 1"));
        }
        if v.min_instance_voxels < 2 {
            return Err(config_err("volume.min_instance_voxels must be at least 2"));
        }
        if !v.blur_sigma.is_finite() || v.blur_sigma <= 0.0 {
            return Err(config_err("volume.blur_sigma must be positive"));
        }
        if v.foreground_range[0] >= v.foreground_range[1] {
            return Err(config_err("volume.foreground_range must be ordered"));
        }
        if v.background_range[0] >= v.background_range[1] {
            return Err(config_err("volume.background_range must be ordered"));
        }
        if !v.distance_constant.is_finite() || v.distance_constant <= 0.0 {
            return Err(config_err("volume.distance_constant must be positive"));
        }
        Ok(())
    }
}

fn config_err(msg: &str) -> PackError {
    PackError::Config(msg.to_string())
}
