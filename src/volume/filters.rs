//! Separable lattice filters for the synthesized volumes.
//!
//! - `gaussian_blur`: truncated separable Gaussian with reflecting borders
//! - `distance_transform`: exact Euclidean distance to the nearest marked
//!   voxel, via the lower-envelope squared-distance transform run once per
//!   axis

use ndarray::Array3;

/// Kernel truncation in standard deviations.
const GAUSS_TRUNCATE: f64 = 4.0;

/// Seed value for unmarked voxels, large enough to lose against any
/// parabola on the grid while keeping every intermediate finite.
const FAR: f64 = 1.0e20;

/// Smooth `vol` with an isotropic Gaussian of width `sigma` voxels.
///
/// The kernel is cut at `4 sigma + 0.5` and renormalized; borders reflect
/// about the edge between the outermost samples.
pub fn gaussian_blur(vol: &Array3<f64>, sigma: f64) -> Array3<f64> {
    let kernel = gaussian_kernel(sigma);
    let mut out = vol.clone();
    for axis in 0..3 {
        out = blur_axis(&out, &kernel, axis);
    }
    out
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSS_TRUNCATE * sigma + 0.5) as isize;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

fn blur_axis(src: &Array3<f64>, kernel: &[f64], axis: usize) -> Array3<f64> {
    let (nx, ny, nz) = src.dim();
    let n = [nx, ny, nz][axis] as isize;
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array3::<f64>::zeros((nx, ny, nz));
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let mut acc = 0.0;
                for (t, w) in kernel.iter().enumerate() {
                    let mut idx = [x, y, z];
                    idx[axis] = reflect(idx[axis] as isize + t as isize - radius, n);
                    acc += w * src[idx];
                }
                out[[x, y, z]] = acc;
            }
        }
    }
    out
}

/// Reflect an out-of-range index about the array edges (d c b a | a b c d).
fn reflect(mut i: isize, n: isize) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - 1 - i;
        } else {
            return i as usize;
        }
    }
}

/// Euclidean distance from every voxel to the nearest marked voxel.
///
/// Squared distances are propagated along each axis in turn as the lower
/// envelope of the parabolas rooted at the previous pass, then square-rooted.
/// A grid with no marked voxel comes back saturated at `sqrt(FAR)`.
pub fn distance_transform(marked: &Array3<bool>) -> Array3<f64> {
    let (nx, ny, nz) = marked.dim();
    let mut sq = Array3::<f64>::from_elem((nx, ny, nz), FAR);
    for ((x, y, z), &m) in marked.indexed_iter() {
        if m {
            sq[[x, y, z]] = 0.0;
        }
    }
    for axis in 0..3 {
        envelope_axis(&mut sq, axis);
    }
    sq.mapv_into(f64::sqrt)
}

fn envelope_axis(sq: &mut Array3<f64>, axis: usize) {
    let (nx, ny, nz) = sq.dim();
    let n = [nx, ny, nz][axis];
    let mut line = vec![0.0f64; n];
    let mut out = vec![0.0f64; n];
    let mut roots = vec![0usize; n];
    let mut bounds = vec![0.0f64; n + 1];

    let (nu, nv) = match axis {
        0 => (ny, nz),
        1 => (nx, nz),
        _ => (nx, ny),
    };
    for u in 0..nu {
        for v in 0..nv {
            let at = |w: usize| -> [usize; 3] {
                match axis {
                    0 => [w, u, v],
                    1 => [u, w, v],
                    _ => [u, v, w],
                }
            };
            for w in 0..n {
                line[w] = sq[at(w)];
            }
            envelope_line(&line, &mut out, &mut roots, &mut bounds);
            for w in 0..n {
                sq[at(w)] = out[w];
            }
        }
    }
}

/// One-dimensional squared-distance transform of a sampled function.
///
/// `roots` holds the parabola sites of the lower envelope, `bounds` the
/// abscissae where consecutive parabolas exchange the minimum.
fn envelope_line(f: &[f64], out: &mut [f64], roots: &mut [usize], bounds: &mut [f64]) {
    let n = f.len();
    let mut k = 0usize;
    roots[0] = 0;
    bounds[0] = f64::NEG_INFINITY;
    bounds[1] = f64::INFINITY;
    for q in 1..n {
        let fq = f[q] + (q * q) as f64;
        loop {
            let p = roots[k];
            let s = (fq - (f[p] + (p * p) as f64)) / (2 * (q - p)) as f64;
            if s <= bounds[k] {
                // the new parabola buries the previous envelope segment
                k -= 1;
            } else {
                k += 1;
                roots[k] = q;
                bounds[k] = s;
                bounds[k + 1] = f64::INFINITY;
                break;
            }
        }
    }
    k = 0;
    for (x, o) in out.iter_mut().enumerate() {
        while bounds[k + 1] < x as f64 {
            k += 1;
        }
        let p = roots[k];
        let d = x as isize - p as isize;
        *o = f[p] + (d * d) as f64;
    }
}
