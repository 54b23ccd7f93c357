pub mod states;
pub mod params;
pub mod engine;
pub mod sampler;
pub mod separation;
pub mod resolver;
pub mod integrator;
pub mod scenario;
