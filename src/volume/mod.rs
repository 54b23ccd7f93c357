pub mod voxelize;
pub mod filters;
pub mod intensity;
pub mod io;
