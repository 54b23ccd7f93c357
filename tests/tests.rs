use ellipack::configuration::config::GenerationConfig;
use ellipack::error::PackError;
use ellipack::simulation::engine::{relax, run_growth};
use ellipack::simulation::integrator::{broad_phase, grow_semi_axes};
use ellipack::simulation::params::Parameters;
use ellipack::simulation::resolver::CollisionResolver;
use ellipack::simulation::sampler::{candidate_pairs, sample_seed_points};
use ellipack::simulation::scenario::Scenario;
use ellipack::simulation::separation::{
    pencil_coefficients, quartic_roots, separation_state, Separation,
};
use ellipack::simulation::states::{Domain, Ellipsoid, NMat3, NVec3, Population};
use ellipack::volume::filters::{distance_transform, gaussian_blur};
use ellipack::volume::intensity::{brent_root, synthesize, IntensityProfile};
use ellipack::volume::voxelize::{pack_labels, point_inside, rasterize};

use nalgebra::Rotation3;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build an axis-aligned ellipsoid at rest
pub fn ellipsoid(label: u16, center: [f64; 3], semi_axes: [f64; 3]) -> Ellipsoid {
    Ellipsoid {
        label,
        center: center.into(),
        velocity: NVec3::zeros(),
        semi_axes: semi_axes.into(),
        orientation: NMat3::identity(),
    }
}

/// Build a unit sphere at `center`
pub fn unit_sphere(label: u16, center: [f64; 3]) -> Ellipsoid {
    ellipsoid(label, center, [1.0, 1.0, 1.0])
}

/// Default packing parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        max_steps: 650,
        growth_interval: 2,
        growth_rate: [0.01, 0.01, 0.01].into(),
        max_semi_axes: [12.0, 12.0, 12.0].into(),
        overlap_correction: 0.1,
        damping: 0.9,
        center_pull: 0.01,
        step_scale: 0.01,
        root_tolerance: 1.0e-3,
        max_relax_passes: 20_000,
    }
}

/// Default packing domain for tests
pub fn test_domain() -> Domain {
    Domain {
        size: 63.0,
        margin: 3.0,
    }
}

/// Wrap ellipsoids into a population at step 0
pub fn population(ellipsoids: Vec<Ellipsoid>) -> Population {
    Population {
        ellipsoids,
        step: 0,
        domain: test_domain(),
    }
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ==================================================================================
// Separation tests
// ==================================================================================

#[test]
fn sphere_pencil_coefficients_match_closed_form() {
    // unit spheres a distance t apart give [-1, 4-t^2, 2t^2-6, 4-t^2, -1]
    let a = unit_sphere(1, [0.0, 0.0, 0.0]);
    let b = unit_sphere(2, [4.0, 0.0, 0.0]);

    let coeffs = pencil_coefficients(&a, &b).unwrap();
    let expected = [-1.0, -12.0, 26.0, -12.0, -1.0];
    for (got, want) in coeffs.iter().zip(expected) {
        assert!(
            (got - want).abs() < 1e-9,
            "coefficients {:?}, expected {:?}",
            coeffs,
            expected
        );
    }
}

#[test]
fn spheres_far_apart_are_separated() {
    let a = unit_sphere(1, [10.0, 10.0, 10.0]);
    let b = unit_sphere(2, [14.0, 10.0, 10.0]);

    let state = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(state, Separation::Separated);
    assert!(!state.needs_resolution());
}

#[test]
fn spheres_at_contact_are_touching() {
    let a = unit_sphere(1, [10.0, 10.0, 10.0]);
    let b = unit_sphere(2, [12.0, 10.0, 10.0]);

    let state = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(state, Separation::Touching);
    assert!(state.needs_resolution());
}

#[test]
fn overlapping_spheres_are_detected() {
    let a = unit_sphere(1, [10.0, 10.0, 10.0]);
    let b = unit_sphere(2, [11.0, 10.0, 10.0]);

    let state = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(state, Separation::Overlapping);
}

#[test]
fn quartic_roots_recover_factored_polynomial() {
    // (x-1)(x-2)(x-3)(x-4) = x^4 - 10x^3 + 35x^2 - 50x + 24
    let roots = quartic_roots(&[1.0, -10.0, 35.0, -50.0, 24.0]);

    for want in [1.0, 2.0, 3.0, 4.0] {
        let hit = roots
            .iter()
            .any(|r| (r.re - want).abs() < 1e-8 && r.im.abs() < 1e-8);
        assert!(hit, "no root near {}: {:?}", want, roots);
    }
}

#[test]
fn rotation_changes_the_outcome() {
    // long axes collide head-on, but turning one aside clears the gap
    let a = ellipsoid(1, [10.0, 10.0, 10.0], [3.0, 1.0, 1.0]);
    let mut b = ellipsoid(2, [15.0, 10.0, 10.0], [3.0, 1.0, 1.0]);

    let head_on = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(head_on, Separation::Overlapping);

    b.orientation = Rotation3::from_axis_angle(&NVec3::y_axis(), std::f64::consts::FRAC_PI_2)
        .into_inner();
    let turned = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(turned, Separation::Separated);
}

#[test]
fn coincident_ellipsoids_overlap() {
    let a = unit_sphere(1, [20.0, 20.0, 20.0]);
    let b = unit_sphere(2, [20.0, 20.0, 20.0]);

    let state = separation_state(&a, &b, 1.0e-3).unwrap();
    assert_eq!(state, Separation::Overlapping);
}

// ==================================================================================
// Resolver tests
// ==================================================================================

#[test]
fn resolution_pushes_overlapping_pair_apart() {
    let mut a = ellipsoid(1, [10.0, 10.0, 10.0], [2.0, 2.0, 2.0]);
    let mut b = ellipsoid(2, [10.0, 10.0, 11.0], [2.0, 2.0, 2.0]);
    let state = separation_state(&a, &b, 1.0e-3).unwrap();
    assert!(state.needs_resolution(), "expected contact, got {:?}", state);

    let resolver = CollisionResolver::from_params(&test_params());
    let mut r = rng(1);

    let before = (b.center - a.center).norm();
    resolver.resolve(&mut a, &mut b, false, &mut r);
    let after = (b.center - a.center).norm();

    assert!(after > before, "pair not pushed apart: {} -> {}", before, after);
    assert_eq!(a.velocity, NVec3::zeros());
    assert_eq!(b.velocity, NVec3::zeros());
}

#[test]
fn resolution_preserves_pair_sums() {
    let mut a = unit_sphere(1, [20.0, 20.0, 20.0]);
    let mut b = unit_sphere(2, [21.0, 20.0, 20.0]);
    a.velocity = NVec3::new(1.0, 0.5, 0.0);
    b.velocity = NVec3::new(-1.0, 0.0, 0.2);
    let resolver = CollisionResolver::from_params(&test_params());
    let mut r = rng(2);

    let center_sum = a.center + b.center;
    let velocity_sum = a.velocity + b.velocity;
    resolver.resolve(&mut a, &mut b, true, &mut r);

    let center_drift = (a.center + b.center - center_sum).norm();
    let velocity_drift = (a.velocity + b.velocity - velocity_sum).norm();
    assert!(center_drift < 1e-12, "center sum drifted: {}", center_drift);
    assert!(velocity_drift < 1e-12, "velocity sum drifted: {}", velocity_drift);
}

#[test]
fn no_impulse_for_positive_normal_speed() {
    let mut a = unit_sphere(1, [10.0, 10.0, 10.0]);
    let mut b = unit_sphere(2, [12.0, 10.0, 10.0]);
    a.velocity = NVec3::new(1.0, 0.0, 0.0);
    b.velocity = NVec3::new(-1.0, 0.0, 0.0);
    let resolver = CollisionResolver::from_params(&test_params());
    let mut r = rng(3);

    let before = (b.center - a.center).norm();
    resolver.resolve(&mut a, &mut b, false, &mut r);

    // the position correction still runs, the impulse does not
    assert!((b.center - a.center).norm() > before);
    assert_eq!(a.velocity, NVec3::new(1.0, 0.0, 0.0));
    assert_eq!(b.velocity, NVec3::new(-1.0, 0.0, 0.0));
}

#[test]
fn coincident_centers_get_nudged_apart() {
    let mut a = unit_sphere(1, [20.0, 20.0, 20.0]);
    let mut b = unit_sphere(2, [20.0, 20.0, 20.0]);
    let resolver = CollisionResolver::from_params(&test_params());
    let mut r = rng(4);

    resolver.resolve(&mut a, &mut b, false, &mut r);

    assert_ne!(a.center, b.center, "coincident pair was not nudged");
    for k in 0..3 {
        assert!(a.center[k].is_finite() && b.center[k].is_finite());
    }
}

// ==================================================================================
// Growth tests
// ==================================================================================

#[test]
fn growth_is_monotone_and_capped() {
    let mut pop = population(vec![
        ellipsoid(1, [20.0, 20.0, 20.0], [1.5, 1.5, 1.5]),
        ellipsoid(2, [40.0, 40.0, 40.0], [1.5, 1.5, 1.5]),
    ]);
    let mut params = test_params();
    params.max_semi_axes = [2.0, 2.0, 2.0].into();
    let mut r = rng(5);

    for _ in 0..2000 {
        let before: Vec<NVec3> = pop.ellipsoids.iter().map(|e| e.semi_axes).collect();
        grow_semi_axes(&mut pop, &params, &mut r);
        for (e, prev) in pop.ellipsoids.iter().zip(&before) {
            for k in 0..3 {
                assert!(
                    e.semi_axes[k] >= prev[k],
                    "semi-axis shrank: {} -> {}",
                    prev[k],
                    e.semi_axes[k]
                );
            }
        }
    }
    for e in &pop.ellipsoids {
        assert_eq!(e.semi_axes, params.max_semi_axes, "cap not reached exactly");
    }
}

#[test]
fn zero_growth_rate_keeps_semi_axes() {
    let mut pop = population(vec![ellipsoid(1, [20.0, 20.0, 20.0], [1.4, 2.1, 1.9])]);
    let mut params = test_params();
    params.growth_rate = NVec3::zeros();
    let mut r = rng(6);

    let before = pop.ellipsoids[0].semi_axes;
    for _ in 0..10 {
        grow_semi_axes(&mut pop, &params, &mut r);
    }
    assert_eq!(pop.ellipsoids[0].semi_axes, before);
}

// ==================================================================================
// Broad phase and candidate pair tests
// ==================================================================================

#[test]
fn broad_phase_keeps_only_bounding_overlaps() {
    let pop = population(vec![
        ellipsoid(1, [10.0, 10.0, 10.0], [2.0, 2.0, 2.0]),
        ellipsoid(2, [13.0, 10.0, 10.0], [2.0, 2.0, 2.0]),
        ellipsoid(3, [30.0, 30.0, 30.0], [2.0, 2.0, 2.0]),
    ]);
    let centers: Vec<NVec3> = pop.ellipsoids.iter().map(|e| e.center).collect();
    let pairs = candidate_pairs(&centers, 100.0);
    assert_eq!(pairs.pairs, vec![(0, 1), (0, 2), (1, 2)]);

    let colliding = broad_phase(&pop, &pairs);
    assert_eq!(colliding, vec![(0, 1)]);
}

#[test]
fn candidate_pairs_respect_cutoff() {
    let points = vec![
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(5.0, 0.0, 0.0),
        NVec3::new(10.1, 0.0, 0.0),
    ];
    let pairs = candidate_pairs(&points, 6.0);
    assert_eq!(pairs.pairs, vec![(0, 1), (1, 2)]);
}

// ==================================================================================
// Sampler tests
// ==================================================================================

#[test]
fn seed_points_respect_minimum_separation() {
    let radius = 0.2;
    let mut r = rng(7);
    let points = sample_seed_points(radius, &mut r).unwrap();

    assert!(points.len() > 1, "unit cube yielded {} points", points.len());
    for p in &points {
        for k in 0..3 {
            assert!(p[k] >= 0.0 && p[k] < 1.0, "point outside unit cube: {:?}", p);
        }
    }
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = (points[i] - points[j]).norm();
            assert!(d >= radius - 1e-9, "points {} and {} too close: {}", i, j, d);
        }
    }
}

#[test]
fn sampling_rejects_bad_radius() {
    let mut r = rng(8);
    for radius in [0.0, 1.0, -0.3, f64::NAN] {
        let err = sample_seed_points(radius, &mut r).unwrap_err();
        assert!(matches!(err, PackError::Sampling(_)), "unexpected error: {err}");
    }
}

// ==================================================================================
// Engine tests
// ==================================================================================

#[test]
fn relaxation_reaches_full_separation() {
    let mut pop = population(vec![
        ellipsoid(1, [29.0, 30.0, 30.0], [2.0, 2.0, 2.0]),
        ellipsoid(2, [32.0, 30.0, 30.0], [2.0, 2.0, 2.0]),
        ellipsoid(3, [30.5, 32.0, 30.0], [2.0, 2.0, 2.0]),
        ellipsoid(4, [30.5, 30.0, 28.5], [2.0, 2.0, 2.0]),
    ]);
    let params = test_params();
    let mut r = rng(9);

    let passes = relax(&mut pop, &params, &mut r).unwrap();
    assert!(passes >= 1);

    for i in 0..pop.len() {
        for j in (i + 1)..pop.len() {
            let a = &pop.ellipsoids[i];
            let b = &pop.ellipsoids[j];
            if (a.center - b.center).norm() >= a.max_semi_axis() + b.max_semi_axis() {
                continue;
            }
            let state = separation_state(a, b, params.root_tolerance).unwrap();
            assert!(
                !state.needs_resolution(),
                "pair ({}, {}) still in contact: {:?}",
                i,
                j,
                state
            );
        }
    }
    for e in &pop.ellipsoids {
        assert!(pop.domain.contains(&e.center), "escaped: {:?}", e.center);
    }
}

#[test]
fn relaxation_respects_pass_cap() {
    let mut pop = population(vec![
        unit_sphere(1, [30.0, 30.0, 30.0]),
        unit_sphere(2, [31.0, 30.0, 30.0]),
    ]);
    let mut params = test_params();
    params.overlap_correction = 1.0e-9;
    params.max_relax_passes = 3;
    let mut r = rng(10);

    let err = relax(&mut pop, &params, &mut r).unwrap_err();
    assert!(
        matches!(err, PackError::Convergence { passes: 3 }),
        "unexpected error: {err}"
    );
}

#[test]
fn growth_run_stays_in_domain() {
    let mut pop = population(vec![
        ellipsoid(1, [20.0, 20.0, 20.0], [1.5, 1.5, 1.5]),
        ellipsoid(2, [40.0, 20.0, 25.0], [1.5, 1.5, 1.5]),
        ellipsoid(3, [25.0, 45.0, 30.0], [1.5, 1.5, 1.5]),
        ellipsoid(4, [50.0, 50.0, 50.0], [1.5, 1.5, 1.5]),
        ellipsoid(5, [10.0, 35.0, 55.0], [1.5, 1.5, 1.5]),
    ]);
    let centers: Vec<NVec3> = pop.ellipsoids.iter().map(|e| e.center).collect();
    let pairs = candidate_pairs(&centers, 13.0);
    let mut params = test_params();
    params.max_steps = 50;
    let mut r = rng(11);

    run_growth(&mut pop, &pairs, &params, &mut r);

    assert_eq!(pop.step, 50);
    for e in &pop.ellipsoids {
        assert!(pop.domain.contains(&e.center), "escaped: {:?}", e.center);
        for k in 0..3 {
            assert!(e.semi_axes[k] <= params.max_semi_axes[k]);
        }
    }
}

// ==================================================================================
// Voxelizer tests
// ==================================================================================

#[test]
fn rasterized_sphere_matches_inside_test() {
    let sphere = ellipsoid(1, [8.0, 8.0, 8.0], [3.0, 3.0, 3.0]);
    let pop = Population {
        ellipsoids: vec![sphere.clone()],
        step: 0,
        domain: test_domain(),
    };

    let labels = rasterize(&pop, 16);
    for ((x, y, z), &v) in labels.indexed_iter() {
        let p = NVec3::new(x as f64, y as f64, z as f64);
        let inside = (p - sphere.center).norm() <= 3.0;
        assert_eq!(v == 1, inside, "voxel ({}, {}, {}) labeled {}", x, y, z, v);
        assert_eq!(v == 1, point_inside(&sphere, &p));
    }
}

#[test]
fn later_ellipsoids_overwrite_shared_voxels() {
    let pop = Population {
        ellipsoids: vec![
            ellipsoid(1, [5.0, 5.0, 5.0], [2.0, 2.0, 2.0]),
            ellipsoid(2, [6.0, 5.0, 5.0], [2.0, 2.0, 2.0]),
        ],
        step: 0,
        domain: test_domain(),
    };

    let labels = rasterize(&pop, 12);
    // the second center lies inside both ellipsoids
    assert_eq!(labels[[6, 5, 5]], 2);
    // a voxel only the first covers keeps its label
    assert_eq!(labels[[3, 5, 5]], 1);
}

#[test]
fn rotated_ellipsoid_fills_mapped_axis() {
    let mut e = ellipsoid(1, [8.0, 8.0, 8.0], [4.0, 1.0, 1.0]);
    e.orientation =
        Rotation3::from_axis_angle(&NVec3::y_axis(), std::f64::consts::FRAC_PI_2).into_inner();
    let pop = Population {
        ellipsoids: vec![e],
        step: 0,
        domain: test_domain(),
    };

    let labels = rasterize(&pop, 16);
    assert_eq!(labels[[8, 8, 8]], 1);
    assert_eq!(labels[[8, 8, 11]], 1, "long axis not mapped onto z");
    assert_eq!(labels[[11, 8, 8]], 0, "long axis left on x");
}

#[test]
fn labels_pack_to_contiguous_range() {
    let mut labels = Array3::<u16>::zeros((12, 12, 12));
    labels[[1, 1, 1]] = 3;
    labels[[2, 2, 2]] = 3;
    labels[[5, 5, 5]] = 7;

    let count = pack_labels(&mut labels);

    assert_eq!(count, 2);
    assert_eq!(labels[[1, 1, 1]], 1);
    assert_eq!(labels[[2, 2, 2]], 1);
    assert_eq!(labels[[5, 5, 5]], 2);
    assert_eq!(labels[[0, 0, 0]], 0);
}

// ==================================================================================
// Filter tests
// ==================================================================================

#[test]
fn distance_transform_single_seed_is_exact() {
    let mut marked = Array3::<bool>::from_elem((8, 8, 8), false);
    marked[[2, 3, 4]] = true;

    let dist = distance_transform(&marked);

    assert!((dist[[2, 3, 4]] - 0.0).abs() < 1e-12);
    assert!((dist[[5, 3, 4]] - 3.0).abs() < 1e-9);
    assert!((dist[[2, 0, 4]] - 3.0).abs() < 1e-9);
    let corner = (25.0_f64 + 16.0 + 9.0).sqrt();
    assert!(
        (dist[[7, 7, 7]] - corner).abs() < 1e-9,
        "corner distance {} expected {}",
        dist[[7, 7, 7]],
        corner
    );
}

#[test]
fn blur_preserves_constant_field() {
    let vol = Array3::<f64>::from_elem((9, 9, 9), 2.5);
    let blurred = gaussian_blur(&vol, 1.0);
    for &v in blurred.iter() {
        assert!((v - 2.5).abs() < 1e-12, "constant field changed: {}", v);
    }
}

#[test]
fn blur_spreads_an_impulse() {
    let mut vol = Array3::<f64>::zeros((9, 9, 9));
    vol[[4, 4, 4]] = 1.0;
    let blurred = gaussian_blur(&vol, 1.0);

    assert!(blurred[[4, 4, 4]] < 1.0);
    assert!(blurred[[3, 4, 4]] > 0.0);
    assert!(blurred[[4, 4, 4]] > blurred[[3, 4, 4]]);

    // the 9-tap kernel exactly spans the grid from the center
    let total: f64 = blurred.iter().sum();
    assert!((total - 1.0).abs() < 1e-9, "mass not conserved: {}", total);
}

// ==================================================================================
// Intensity tests
// ==================================================================================

#[test]
fn brent_finds_bracketed_root() {
    let root = brent_root(|x| x * x - 4.0, 0.0, 10.0, 1e-12, 200).unwrap();
    assert!((root - 2.0).abs() < 1e-9, "root off: {}", root);

    assert!(brent_root(|x| x * x - 4.0, 3.0, 10.0, 1e-12, 200).is_none());
}

#[test]
fn intensity_field_is_normalized() {
    let sphere = ellipsoid(1, [8.0, 8.0, 8.0], [3.0, 3.0, 3.0]);
    let pop = Population {
        ellipsoids: vec![sphere],
        step: 0,
        domain: test_domain(),
    };
    let labels = rasterize(&pop, 16);
    let profile = IntensityProfile::from_config(&GenerationConfig::default());
    let mut r = rng(12);

    let field = synthesize(&labels, &profile, &mut r);

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in field.iter() {
        assert!(v.is_finite());
        lo = lo.min(v);
        hi = hi.max(v);
    }
    assert!((lo - 0.0).abs() < 1e-12, "minimum not rescaled: {}", lo);
    assert!((hi - 1.0).abs() < 1e-12, "maximum not rescaled: {}", hi);
}

#[test]
fn empty_label_grid_renders_zero() {
    let labels = Array3::<u16>::zeros((12, 12, 12));
    let profile = IntensityProfile::from_config(&GenerationConfig::default());
    let mut r = rng(13);

    let field = synthesize(&labels, &profile, &mut r);
    for &v in field.iter() {
        assert_eq!(v, 0.0);
    }
}

#[test]
fn undersized_instances_render_as_background() {
    let mut labels = Array3::<u16>::zeros((12, 12, 12));
    for c in [[2, 2, 2], [2, 2, 3], [2, 3, 2], [3, 2, 2], [2, 3, 3]] {
        labels[c] = 1;
    }
    let profile = IntensityProfile::from_config(&GenerationConfig::default());
    let mut r = rng(14);

    let field = synthesize(&labels, &profile, &mut r);

    // the tiny instance sits at the dark end of the background falloff
    assert!(
        field[[2, 2, 2]] < field[[11, 11, 11]],
        "instance voxel {} not below far background {}",
        field[[2, 2, 2]],
        field[[11, 11, 11]]
    );
}

// ==================================================================================
// Configuration and determinism tests
// ==================================================================================

#[test]
fn yaml_overrides_merge_with_defaults() {
    let yaml = "packing:\n  max_steps: 7\nvolume:\n  size: 32\n";
    let cfg: GenerationConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(cfg.packing.max_steps, 7);
    assert_eq!(cfg.packing.growth_interval, 2);
    assert_eq!(cfg.volume.size, 32);
    assert_eq!(cfg.volume.min_instance_voxels, 40);
    assert_eq!(cfg.seed, 0);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = GenerationConfig::default();
    cfg.packing.growth_interval = 0;
    assert!(matches!(cfg.validate(), Err(PackError::Config(_))));

    let mut cfg = GenerationConfig::default();
    cfg.volume.foreground_range = [5.0, -1.0];
    assert!(matches!(cfg.validate(), Err(PackError::Config(_))));
}

#[test]
fn same_seed_reproduces_the_run() {
    let mut cfg = GenerationConfig::default();
    cfg.packing.max_steps = 10;
    cfg.packing.seed_separation = 0.2;
    cfg.volume.size = 32;

    let mut first = Scenario::build_scenario(&cfg, 11).unwrap();
    let mut second = Scenario::build_scenario(&cfg, 11).unwrap();
    assert_eq!(first.population.len(), second.population.len());
    assert_eq!(first.pairs.pairs, second.pairs.pairs);

    run_growth(
        &mut first.population,
        &first.pairs,
        &first.parameters,
        &mut first.rng,
    );
    run_growth(
        &mut second.population,
        &second.pairs,
        &second.parameters,
        &mut second.rng,
    );

    for (a, b) in first
        .population
        .ellipsoids
        .iter()
        .zip(&second.population.ellipsoids)
    {
        assert_eq!(a.center, b.center);
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.semi_axes, b.semi_axes);
        assert_eq!(a.orientation, b.orientation);
    }

    let labels_first = rasterize(&first.population, cfg.volume.size);
    let labels_second = rasterize(&second.population, cfg.volume.size);
    assert_eq!(labels_first, labels_second);

    let profile = IntensityProfile::from_config(&cfg);
    let field_first = synthesize(&labels_first, &profile, &mut rng(5));
    let field_second = synthesize(&labels_second, &profile, &mut rng(5));
    assert_eq!(field_first, field_second);
}
