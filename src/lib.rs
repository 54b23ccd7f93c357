pub mod error;
pub mod simulation;
pub mod configuration;
pub mod volume;
pub mod pipeline;
pub mod benchmark;

pub use error::{PackError, PackResult};

pub use simulation::states::{Domain, Ellipsoid, NMat3, NVec3, Population};
pub use simulation::params::Parameters;
pub use simulation::sampler::{candidate_pairs, sample_seed_points, CandidatePairs};
pub use simulation::separation::{pencil_coefficients, quartic_roots, separation_state, Separation};
pub use simulation::resolver::CollisionResolver;
pub use simulation::integrator::{broad_phase, grow_semi_axes, step_positions};
pub use simulation::engine::{packing_fraction, relax, run_growth};
pub use simulation::scenario::Scenario;

pub use configuration::config::{GenerationConfig, PackingConfig, VolumeConfig};

pub use volume::voxelize::{pack_labels, point_inside, rasterize};
pub use volume::filters::{distance_transform, gaussian_blur};
pub use volume::intensity::{brent_root, synthesize, IntensityProfile};
pub use volume::io::{write_intensity_tiff, write_labels_npy};

pub use pipeline::{generate, GeneratedVolume};

pub use benchmark::benchmark::{bench_pair_phase, bench_separation_curve};
