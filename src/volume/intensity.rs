//! Synthetic intensity field derived from the label grid.
//!
//! Instances get a smooth interior profile: voxel coordinates are
//! standardized along the principal axes of the instance, and a per-instance
//! decay base is fitted so the profile hits a fixed anchor value at a fixed
//! distance rank. The background falls off with the Euclidean distance to
//! the nearest instance voxel. The combined field is blurred and rescaled
//! to `[0, 1]`.
//!
//! Instances below the voxel-count threshold, and instances whose decay fit
//! fails, keep their labels but render as background.

use log::warn;
use nalgebra::SymmetricEigen;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::configuration::config::GenerationConfig;
use crate::error::{PackError, PackResult};
use crate::simulation::states::{NMat3, NVec3};
use crate::volume::filters::{distance_transform, gaussian_blur};

/// Output value the anchor distance is pinned to, inside the foreground band.
const ANCHOR_VALUE: f64 = 3.0;
/// Distance rank (ascending) used as the anchor, clamped for tiny instances.
const ANCHOR_RANK: usize = 30;
/// Relative spread of the per-instance brightness factor.
const BRIGHTNESS_JITTER: f64 = 0.3;
/// Principal axes with variance at or below this are treated as flat.
const VARIANCE_EPS: f64 = 1.0e-12;
/// Search bracket for the decay base.
const DECAY_BRACKET: (f64, f64) = (1.0e-3, 1.0e5);

/// Intensity-synthesis settings, lifted out of the volume configuration.
#[derive(Debug, Clone)]
pub struct IntensityProfile {
    pub min_instance_voxels: usize, // smaller instances render as background
    pub blur_sigma: f64, // Gaussian blur width in voxels
    pub foreground_min: f64, // lower edge of the instance band
    pub foreground_max: f64, // upper edge of the instance band
    pub background_floor: f64, // background value at an instance surface
    pub background_ceiling: f64, // background value far from any instance
    pub distance_constant: f64, // falloff constant of the background field
}

impl IntensityProfile {
    pub fn from_config(cfg: &GenerationConfig) -> Self {
        let v = &cfg.volume;
        IntensityProfile {
            min_instance_voxels: v.min_instance_voxels,
            blur_sigma: v.blur_sigma,
            foreground_min: v.foreground_range[0],
            foreground_max: v.foreground_range[1],
            background_floor: v.background_range[0],
            background_ceiling: v.background_range[1],
            distance_constant: v.distance_constant,
        }
    }
}

/// Render the intensity field for a packed label grid.
///
/// Labels are expected contiguous from 1. One brightness factor is drawn
/// per successfully rendered instance, in label order.
pub fn synthesize(
    labels: &Array3<u16>,
    profile: &IntensityProfile,
    rng: &mut StdRng,
) -> Array3<f64> {
    let dims = labels.dim();
    let mut field = Array3::<f64>::zeros(dims);

    // voxel coordinates per instance, in raster order
    let count = labels.iter().copied().max().unwrap_or(0) as usize;
    let mut instances: Vec<Vec<[usize; 3]>> = vec![Vec::new(); count];
    for ((x, y, z), &v) in labels.indexed_iter() {
        if v != 0 {
            instances[v as usize - 1].push([x, y, z]);
        }
    }

    // per-instance decay profiles; failures fall back to background
    let mut rendered = vec![false; count];
    for (idx, coords) in instances.iter().enumerate() {
        if coords.len() <= profile.min_instance_voxels {
            continue;
        }
        match decay_values(coords, profile.foreground_min, profile.foreground_max) {
            Ok(values) => {
                let jitter = 1.0 + (rng.random::<f64>() - 0.5) * BRIGHTNESS_JITTER;
                for (c, value) in coords.iter().zip(values) {
                    field[*c] = value * jitter;
                }
                rendered[idx] = true;
            }
            Err(err) => warn!("instance {} renders as background: {err}", idx + 1),
        }
    }

    // background: normalized falloff of the distance to the nearest
    // instance voxel, scaled into the background band
    let occupied = labels.mapv(|v| v != 0);
    if occupied.iter().any(|&m| m) {
        let distance = distance_transform(&occupied);
        let falloff = distance
            .mapv(|d| (profile.distance_constant + 1.0) / (profile.distance_constant + d));
        let (lo, hi) = min_max(falloff.iter().copied());
        for ((x, y, z), &v) in labels.indexed_iter() {
            let background = v == 0 || !rendered[v as usize - 1];
            if background {
                let norm = if hi > lo {
                    (falloff[[x, y, z]] - lo) / (hi - lo)
                } else {
                    1.0
                };
                field[[x, y, z]] = (norm * profile.background_floor)
                    .clamp(profile.background_floor, profile.background_ceiling);
            }
        }
    }

    let blurred = gaussian_blur(&field, profile.blur_sigma);
    rescale_unit(blurred)
}

/// Foreground values for one instance, in the order of `coords`.
///
/// Coordinates are standardized along the principal axes of the voxel
/// cloud; the decay base is fitted so the anchor distance maps to
/// `ANCHOR_VALUE` once the profile is rescaled into `[low, high]`.
fn decay_values(coords: &[[usize; 3]], low: f64, high: f64) -> PackResult<Vec<f64>> {
    let n = coords.len();
    let nf = n as f64;
    let mut mean = NVec3::zeros();
    for c in coords {
        mean += coord_vec(c);
    }
    mean /= nf;

    // sample covariance of the voxel cloud
    let mut cov = NMat3::zeros();
    for c in coords {
        let d = coord_vec(c) - mean;
        cov += d * d.transpose();
    }
    cov /= nf - 1.0;

    // standardized squared distance along the principal axes; axes with
    // no spread are skipped
    let eigen = SymmetricEigen::new(cov);
    let mut d2 = vec![0.0f64; n];
    for k in 0..3 {
        let variance = eigen.eigenvalues[k];
        if variance <= VARIANCE_EPS {
            continue;
        }
        let sd = variance.sqrt();
        let axis: NVec3 = eigen.eigenvectors.column(k).into_owned();
        for (i, c) in coords.iter().enumerate() {
            let t = axis.dot(&(coord_vec(c) - mean)) / sd;
            d2[i] += t * t;
        }
    }

    let mut sorted = d2.clone();
    sorted.sort_by(f64::total_cmp);
    let d_min = sorted[0];
    let d_max = sorted[n - 1];
    if d_max <= d_min {
        return Err(PackError::Volume("flat distance profile".into()));
    }

    let rank = ANCHOR_RANK.min(n - 2);
    let anchor = 0.5 * (sorted[rank] + sorted[rank + 1]);
    let target = (ANCHOR_VALUE - low) / (high - low);
    let objective = |base: f64| {
        (base.powf(-anchor) - base.powf(-d_max)) / (base.powf(-d_min) - base.powf(-d_max)) - target
    };
    let base = brent_root(objective, DECAY_BRACKET.0, DECAY_BRACKET.1, 1.0e-12, 200)
        .ok_or_else(|| PackError::Volume("decay base not bracketed".into()))?;

    let decay: Vec<f64> = d2.iter().map(|d| base.powf(-d)).collect();
    let (g_min, g_max) = min_max(decay.iter().copied());
    if g_max <= g_min {
        return Err(PackError::Volume("flat decay profile".into()));
    }
    Ok(decay
        .iter()
        .map(|g| low + (high - low) * (g - g_min) / (g_max - g_min))
        .collect())
}

/// Brent's method on `[a, b]`. Returns `None` unless `f` changes sign.
pub fn brent_root<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    xtol: f64,
    max_iter: usize,
) -> Option<f64> {
    let (mut a, mut b) = (a, b);
    let mut fa = f(a);
    let mut fb = f(b);
    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa * fb > 0.0 {
        return None;
    }
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut c = a;
    let mut fc = fa;
    let mut d = a;
    let mut bisected = true;
    for _ in 0..max_iter {
        if fb == 0.0 || (b - a).abs() < xtol {
            return Some(b);
        }
        let mut s = if fa != fc && fb != fc {
            // inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // secant step
            b - fb * (b - a) / (fb - fa)
        };

        let lo = (3.0 * a + b) / 4.0;
        let out_of_range = !((lo < s && s < b) || (b < s && s < lo));
        let slow = if bisected {
            (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < xtol
        } else {
            (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < xtol
        };
        if out_of_range || slow {
            s = (a + b) / 2.0;
            bisected = true;
        } else {
            bisected = false;
        }

        let fs = f(s);
        d = c;
        c = b;
        fc = fb;
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }
    Some(b)
}

fn coord_vec(c: &[usize; 3]) -> NVec3 {
    NVec3::new(c[0] as f64, c[1] as f64, c[2] as f64)
}

fn min_max<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn rescale_unit(mut vol: Array3<f64>) -> Array3<f64> {
    let (lo, hi) = min_max(vol.iter().copied());
    if hi > lo {
        vol.mapv_inplace(|v| (v - lo) / (hi - lo));
    } else {
        vol.fill(0.0);
    }
    vol
}
