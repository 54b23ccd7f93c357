//! Error types shared across the crate.

use thiserror::Error;

/// Unified error for sampling, simulation and volume synthesis.
#[derive(Error, Debug)]
pub enum PackError {
    /// Seed sampling could not run with the requested geometry.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// The separation test hit a singular or non-finite intermediate.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Relaxation still found contacts or escapes after the pass cap.
    #[error("relaxation did not converge within {passes} passes")]
    Convergence { passes: usize },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Volume synthesis failed for the current label field.
    #[error("volume synthesis error: {0}")]
    Volume(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tiff error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
}

pub type PackResult<T> = Result<T, PackError>;
