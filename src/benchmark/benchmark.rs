use std::time::Instant;

use crate::simulation::integrator::broad_phase;
use crate::simulation::sampler::candidate_pairs;
use crate::simulation::separation::{separation_state, Separation};
use crate::simulation::states::{Domain, Ellipsoid, NMat3, NVec3, Population};

/// Helper to build a deterministic population of size `n`, no rand needed
fn make_population(n: usize) -> Population {
    let mut ellipsoids = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic centers spread over the domain
        let center = NVec3::new(
            ((i_f * 0.37).sin() * 0.5 + 0.5) * 63.0,
            ((i_f * 0.13).cos() * 0.5 + 0.5) * 63.0,
            ((i_f * 0.07).sin() * 0.5 + 0.5) * 63.0,
        );
        let semi_axes = NVec3::new(
            2.0 + (i_f * 0.11).sin().abs(),
            2.0 + (i_f * 0.19).cos().abs(),
            2.0 + (i_f * 0.23).sin().abs(),
        );

        ellipsoids.push(Ellipsoid {
            label: (i % u16::MAX as usize) as u16 + 1,
            center,
            velocity: NVec3::zeros(),
            semi_axes,
            orientation: NMat3::identity(),
        });
    }

    Population {
        ellipsoids,
        step: 0,
        domain: Domain {
            size: 63.0,
            margin: 3.0,
        },
    }
}

/// Benchmark the two collision phases over a range of population sizes.
pub fn bench_pair_phase() {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let tolerance = 1.0e-3;

    for n in ns {
        let pop = make_population(n);
        let centers: Vec<NVec3> = pop.ellipsoids.iter().map(|e| e.center).collect();
        let pairs = candidate_pairs(&centers, 13.0);

        // Warm up
        let _ = broad_phase(&pop, &pairs);

        // Time broad phase
        let t0 = Instant::now();
        let survivors = broad_phase(&pop, &pairs);
        let dt_broad = t0.elapsed().as_secs_f64();

        // Time the narrow sweep over the survivors
        let t1 = Instant::now();
        let mut contacts = 0usize;
        for &(i, j) in &survivors {
            if let Ok(state) = separation_state(&pop.ellipsoids[i], &pop.ellipsoids[j], tolerance) {
                if state != Separation::Separated {
                    contacts += 1;
                }
            }
        }
        let dt_narrow = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, pairs = {:7}, broad = {:8.6} s, narrow = {:8.6} s, contacts = {contacts}",
            pairs.len(),
            dt_broad,
            dt_narrow
        );
    }
}

/// Benchmark the narrow phase for a curve of pair counts
/// Paste output directly into a spreadsheet to graph
pub fn bench_separation_curve() {
    println!("N,pairs,broad_ms,narrow_ms");

    let tolerance = 1.0e-3;
    for n in (200..=6400).step_by(200) {
        let pop = make_population(n);
        let centers: Vec<NVec3> = pop.ellipsoids.iter().map(|e| e.center).collect();
        let pairs = candidate_pairs(&centers, 13.0);

        let t0 = Instant::now();
        let survivors = broad_phase(&pop, &pairs);
        let broad_ms = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        for &(i, j) in &survivors {
            let _ = separation_state(&pop.ellipsoids[i], &pop.ellipsoids[j], tolerance);
        }
        let narrow_ms = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{},{},{:.6},{:.6}", n, pairs.len(), broad_ms, narrow_ms);
    }
}
