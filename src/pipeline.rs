//! End-to-end generation of one labeled training volume.
//!
//! A run is: build the scenario from configuration and seed, pack the
//! ellipsoids (growth then relaxation), rasterize the labels, synthesize
//! the intensity field. `GeneratedVolume::save` writes both arrays.

use std::path::Path;

use log::info;
use ndarray::Array3;

use crate::configuration::config::GenerationConfig;
use crate::error::PackResult;
use crate::simulation::engine::{packing_fraction, relax, run_growth};
use crate::simulation::scenario::Scenario;
use crate::volume::intensity::{synthesize, IntensityProfile};
use crate::volume::io::{write_intensity_tiff, write_labels_npy};
use crate::volume::voxelize::{pack_labels, rasterize};

/// One finished run: the intensity field, the label grid and run stats.
pub struct GeneratedVolume {
    pub intensity: Array3<f64>, // blurred field rescaled to [0, 1]
    pub labels: Array3<u16>, // contiguous instance labels, 0 = background
    pub instances: usize, // distinct labels after rasterization
    pub relax_passes: usize, // relaxation passes until full separation
}

impl GeneratedVolume {
    /// Write `image<index>.tif` and `label<index>.npy` into `dir`.
    pub fn save(&self, dir: &Path, index: usize) -> PackResult<()> {
        write_intensity_tiff(&dir.join(format!("image{index}.tif")), &self.intensity)?;
        write_labels_npy(&dir.join(format!("label{index}.npy")), &self.labels)?;
        Ok(())
    }
}

/// Run the whole pipeline for one seed.
pub fn generate(cfg: &GenerationConfig, seed: u64) -> PackResult<GeneratedVolume> {
    let mut scenario = Scenario::build_scenario(cfg, seed)?;
    info!(
        "seed {seed}: packing {} ellipsoids over {} candidate pairs",
        scenario.population.len(),
        scenario.pairs.len()
    );

    run_growth(
        &mut scenario.population,
        &scenario.pairs,
        &scenario.parameters,
        &mut scenario.rng,
    );
    let relax_passes = relax(&mut scenario.population, &scenario.parameters, &mut scenario.rng)?;

    let mut labels = rasterize(&scenario.population, cfg.volume.size);
    let instances = pack_labels(&mut labels);
    info!(
        "seed {seed}: {} passes to separate, {} instances rasterized, packing fraction {:.3}",
        relax_passes,
        instances,
        packing_fraction(&scenario.population)
    );

    let profile = IntensityProfile::from_config(cfg);
    let intensity = synthesize(&labels, &profile, &mut scenario.rng);

    Ok(GeneratedVolume {
        intensity,
        labels,
        instances,
        relax_passes,
    })
}
