//! Writers for the generated volumes.
//!
//! The intensity field goes out as a multipage 32-bit float TIFF, one page
//! per x-slice; the label grid goes out as a `u16` npy array.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::{s, Array3};
use ndarray_npy::write_npy;
use tiff::encoder::{colortype, TiffEncoder};

use crate::error::PackResult;

/// Write the intensity field as a multipage Gray32Float TIFF.
pub fn write_intensity_tiff(path: &Path, vol: &Array3<f64>) -> PackResult<()> {
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    let (nx, ny, nz) = vol.dim();
    for x in 0..nx {
        let page: Vec<f32> = vol.slice(s![x, .., ..]).iter().map(|&v| v as f32).collect();
        encoder.write_image::<colortype::Gray32Float>(nz as u32, ny as u32, &page)?;
    }
    Ok(())
}

/// Write the label grid as a `u16` npy array.
pub fn write_labels_npy(path: &Path, labels: &Array3<u16>) -> PackResult<()> {
    write_npy(path, labels)?;
    Ok(())
}
