use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use jotter_core::mandelbrot::fill_row;
use jotter_core::{ReferenceField, ReferenceGeometry};

use crate::npy::read_npy;

/// Compute the Mandelbrot reference raster, one row per rayon task.
pub fn generate_reference(
    geometry: &ReferenceGeometry,
    max_iterations: u32,
) -> crate::Result<ReferenceField> {
    let start = Instant::now();
    let width = geometry.width as usize;
    let mut values = vec![0.0; width * geometry.height as usize];

    values
        .par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| fill_row(geometry, y as u32, max_iterations, row));

    let field = ReferenceField::new(geometry.width, geometry.height, values)?;
    info!(
        width = geometry.width,
        height = geometry.height,
        max_iterations,
        elapsed_ms = start.elapsed().as_millis(),
        "Generated reference field"
    );
    Ok(field)
}

/// Load the reference asset from `path`, regenerating it when the file is
/// missing, unreadable, or the wrong size for `geometry`.
pub fn load_or_generate(
    path: &Path,
    geometry: &ReferenceGeometry,
    max_iterations: u32,
) -> crate::Result<ReferenceField> {
    match read_npy(path) {
        Ok(field) if field.matches(geometry) => return Ok(field),
        Ok(field) => warn!(
            width = field.width(),
            height = field.height(),
            "Reference asset {} has the wrong size; regenerating",
            path.display()
        ),
        Err(e) => warn!("Could not load reference asset {}: {e}; regenerating", path.display()),
    }
    generate_reference(geometry, max_iterations)
}
