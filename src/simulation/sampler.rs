//! Seed-point sampling and the candidate-pair graph.
//!
//! Packing runs start from a blue-noise set of seed centers in the unit cube
//! (Bridson's Poisson-disk algorithm) and a fixed list of index pairs close
//! enough to ever interact. Both structures are built once per run:
//! - `sample_seed_points` fills the unit cube with points at least `radius`
//!   apart, using a background grid with one point per cell
//! - `candidate_pairs` bins the scaled centers at the cutoff distance and
//!   collects every pair within it, ascending by `(i, j)`
//!
//! The pair list is not rebuilt as ellipsoids drift. Seed spacing and the
//! cutoff are chosen so that pairs which could ever collide are already
//! neighbours at sampling time.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{PackError, PackResult};
use crate::simulation::states::NVec3;

/// Bridson candidate attempts per active point before it is retired.
const CANDIDATES_PER_POINT: usize = 30;

/// Index pairs eligible for collision checks, `i < j`, ascending.
#[derive(Debug, Clone, Default)]
pub struct CandidatePairs {
    pub pairs: Vec<(usize, usize)>,
}

impl CandidatePairs {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Fills the unit cube with Poisson-disk samples at least `radius` apart.
///
/// The grid cell edge is `radius / sqrt(3)` so a cell never holds two
/// samples; new candidates are drawn from the spherical annulus
/// `[radius, 2 radius)` around a randomly chosen active point.
pub fn sample_seed_points(radius: f64, rng: &mut StdRng) -> PackResult<Vec<NVec3>> {
    if !radius.is_finite() || radius <= 0.0 || radius >= 1.0 {
        return Err(PackError::Sampling(format!(
            "separation radius must lie in (0, 1), got {radius}"
        )));
    }

    let cell = radius / 3f64.sqrt();
    let dims = (1.0 / cell).ceil() as usize;
    let mut grid: Vec<Option<usize>> = vec![None; dims * dims * dims];
    let mut points: Vec<NVec3> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = NVec3::new(rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>());
    grid[cell_index(&first, cell, dims)] = Some(0);
    points.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.random_range(0..active.len());
        let seed = points[active[slot]];
        let mut placed = false;
        for _ in 0..CANDIDATES_PER_POINT {
            let candidate = seed + annulus_offset(radius, rng);
            if !in_unit_cube(&candidate) {
                continue;
            }
            if has_close_neighbor(&candidate, radius, cell, dims, &grid, &points) {
                continue;
            }
            let idx = points.len();
            grid[cell_index(&candidate, cell, dims)] = Some(idx);
            points.push(candidate);
            active.push(idx);
            placed = true;
            break;
        }
        if !placed {
            // every candidate failed, this point stops spawning
            active.swap_remove(slot);
        }
    }
    Ok(points)
}

/// Collects every index pair with center distance at most `cutoff`.
///
/// Centers are binned at the cutoff so only adjacent bins are compared.
/// Pairs come out with `i < j` in ascending order.
pub fn candidate_pairs(points: &[NVec3], cutoff: f64) -> CandidatePairs {
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    if points.len() < 2 || cutoff <= 0.0 {
        return CandidatePairs { pairs };
    }

    let mut max_coord: f64 = 0.0;
    for p in points {
        for k in 0..3 {
            max_coord = max_coord.max(p[k]);
        }
    }
    let dims = (max_coord / cutoff) as usize + 1;
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); dims * dims * dims];
    for (idx, p) in points.iter().enumerate() {
        bins[bin_index(p, cutoff, dims)].push(idx);
    }

    let cutoff2 = cutoff * cutoff;
    for (i, p) in points.iter().enumerate() {
        let (cx, cy, cz) = bin_coords(p, cutoff, dims);
        for x in cx.saturating_sub(1)..(cx + 2).min(dims) {
            for y in cy.saturating_sub(1)..(cy + 2).min(dims) {
                for z in cz.saturating_sub(1)..(cz + 2).min(dims) {
                    for &j in &bins[(x * dims + y) * dims + z] {
                        if j > i && (points[j] - p).norm_squared() <= cutoff2 {
                            pairs.push((i, j));
                        }
                    }
                }
            }
        }
    }
    pairs.sort_unstable();
    CandidatePairs { pairs }
}

/// Uniform direction by rejection from the unit ball, scaled into the annulus.
fn annulus_offset(radius: f64, rng: &mut StdRng) -> NVec3 {
    let direction = loop {
        let v = NVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let norm = v.norm();
        if norm > 0.0 && norm <= 1.0 {
            break v / norm;
        }
    };
    direction * rng.random_range(radius..2.0 * radius)
}

fn in_unit_cube(p: &NVec3) -> bool {
    (0..3).all(|k| p[k] >= 0.0 && p[k] < 1.0)
}

fn cell_coords(p: &NVec3, cell: f64, dims: usize) -> (usize, usize, usize) {
    let clamp = |v: f64| ((v / cell) as usize).min(dims - 1);
    (clamp(p.x), clamp(p.y), clamp(p.z))
}

fn cell_index(p: &NVec3, cell: f64, dims: usize) -> usize {
    let (x, y, z) = cell_coords(p, cell, dims);
    (x * dims + y) * dims + z
}

/// True if any existing sample lies within `radius` of `p`.
///
/// With cell edge `radius / sqrt(3)` a conflicting sample is at most two
/// cells away along each axis.
fn has_close_neighbor(
    p: &NVec3,
    radius: f64,
    cell: f64,
    dims: usize,
    grid: &[Option<usize>],
    points: &[NVec3],
) -> bool {
    let (cx, cy, cz) = cell_coords(p, cell, dims);
    let r2 = radius * radius;
    for x in cx.saturating_sub(2)..(cx + 3).min(dims) {
        for y in cy.saturating_sub(2)..(cy + 3).min(dims) {
            for z in cz.saturating_sub(2)..(cz + 3).min(dims) {
                if let Some(idx) = grid[(x * dims + y) * dims + z] {
                    if (points[idx] - p).norm_squared() < r2 {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn bin_coords(p: &NVec3, cutoff: f64, dims: usize) -> (usize, usize, usize) {
    let clamp = |v: f64| ((v.max(0.0) / cutoff) as usize).min(dims - 1);
    (clamp(p.x), clamp(p.y), clamp(p.z))
}

fn bin_index(p: &NVec3, cutoff: f64, dims: usize) -> usize {
    let (x, y, z) = bin_coords(p, cutoff, dims);
    (x * dims + y) * dims + z
}
