use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use jotter_core::{
    compute_cancellable, CancelToken, ComplexGrid, EscapeParameters, Extent, IterationField,
    ResolutionSpec,
};

use crate::band::build_bands;
use crate::error::RenderError;

/// Everything needed to render one Julia image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaRequest {
    pub resolution: ResolutionSpec,
    pub extent: Extent,
    pub params: EscapeParameters,
}

impl JuliaRequest {
    /// A request over the default extent.
    pub fn new(resolution: ResolutionSpec, params: EscapeParameters) -> Self {
        Self {
            resolution,
            extent: Extent::default(),
            params,
        }
    }

    /// Parse the dashboard's text inputs once, at the boundary.
    pub fn from_text(
        resolution: &str,
        creal: &str,
        cimag: &str,
        max_iterations: u32,
    ) -> jotter_core::Result<Self> {
        Ok(Self::new(
            ResolutionSpec::parse(resolution)?,
            EscapeParameters::from_text(creal, cimag, max_iterations)?,
        ))
    }

    pub fn with_extent(self, extent: Extent) -> Self {
        Self { extent, ..self }
    }
}

/// The outcome of a full Julia render: raw iteration data, no coloring.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub field: IterationField,
    pub elapsed: Duration,
    pub bands: usize,
}

/// Render a Julia set as row bands in parallel.
///
/// Each band runs the core engine on its own slice of the grid; cells are
/// independent, so the stacked result is identical to a single-threaded
/// run. All bands share `cancel`, which also receives progress in units of
/// band-iterations.
pub fn render_julia(request: &JuliaRequest, cancel: &CancelToken) -> crate::Result<RenderResult> {
    let start = Instant::now();
    let grid = ComplexGrid::build(request.resolution, &request.extent);
    let max_iterations = request.params.max_iterations;
    let bands = build_bands(grid.height());

    cancel.reset_progress(bands.len() as u64 * u64::from(max_iterations));
    debug!(
        width = grid.width(),
        height = grid.height(),
        bands = bands.len(),
        max_iterations,
        c = %request.params.c,
        "Starting banded Julia render"
    );

    let fields = bands
        .par_iter()
        .map(|band| {
            compute_cancellable(
                &grid.band(band.first_row, band.rows),
                &request.params,
                cancel,
            )
        })
        .collect::<jotter_core::Result<Vec<_>>>()?;

    let field = IterationField::concat_rows(grid.width(), max_iterations, fields).ok_or(
        RenderError::InvalidDimensions {
            width: grid.width(),
            height: grid.height(),
        },
    )?;

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        bands = bands.len(),
        escaped = field.escaped_count(),
        "Julia render complete"
    );

    Ok(RenderResult {
        field,
        elapsed,
        bands: bands.len(),
    })
}
