//! Escape-time iteration of `z ↦ z² + c` over a [`ComplexGrid`].
//!
//! Every cell is a two-state machine. An `Active` cell carries its running
//! `z`; once `|z|²` exceeds [`ESCAPE_THRESHOLD_SQ`] the cell becomes
//! `Escaped { at }` in the same step and is never touched again. Escaped
//! cells keep no `z` at all, so a diverging orbit cannot be squared on into
//! infinity or NaN.
//!
//! Cells are independent, so the result does not depend on the order they
//! are visited in or on how a grid is split into bands.

use tracing::debug;

use crate::cancel::CancelToken;
use crate::complex::Complex;
use crate::error::CoreError;
use crate::field::IterationField;
use crate::grid::ComplexGrid;
use crate::params::{EscapeParameters, ESCAPE_THRESHOLD_SQ};

/// Iterations between cancellation checks in [`compute_cancellable`].
pub const CANCEL_CHECK_INTERVAL: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CellState {
    Active(Complex),
    Escaped { at: u32 },
}

impl CellState {
    /// Advance one iteration. Escaped is absorbing.
    #[inline]
    fn step(self, c: Complex, n: u32) -> Self {
        match self {
            Self::Active(z) => {
                let z = z.square() + c;
                if z.norm_sq() > ESCAPE_THRESHOLD_SQ {
                    Self::Escaped { at: n }
                } else {
                    Self::Active(z)
                }
            }
            escaped @ Self::Escaped { .. } => escaped,
        }
    }

    #[inline]
    fn value(self, max_iterations: u32) -> u32 {
        match self {
            Self::Active(_) => max_iterations,
            Self::Escaped { at } => at,
        }
    }
}

/// Compute the iteration field for `grid` under `params`.
///
/// With `max_iterations = 0` no step runs and every cell reports `0`.
pub fn compute(grid: &ComplexGrid, params: &EscapeParameters) -> IterationField {
    let mut states = initial_states(grid);
    let mut active = states.len();
    for n in 0..params.max_iterations {
        if active == 0 {
            break;
        }
        active = advance(&mut states, params.c, n);
    }
    collect(grid, params.max_iterations, &states)
}

/// Like [`compute`], but polls `cancel` every [`CANCEL_CHECK_INTERVAL`]
/// iterations and gives up with [`CoreError::Cancelled`] once it is set.
///
/// Progress is reported to `cancel` as one unit per completed iteration
/// (unused iterations are credited when every cell has escaped early).
pub fn compute_cancellable(
    grid: &ComplexGrid,
    params: &EscapeParameters,
    cancel: &CancelToken,
) -> crate::Result<IterationField> {
    let mut states = initial_states(grid);
    let mut active = states.len();
    for n in 0..params.max_iterations {
        if n % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            debug!(iteration = n, rows = grid.height(), "Escape-time computation cancelled");
            return Err(CoreError::Cancelled);
        }
        if active == 0 {
            cancel.add_progress(u64::from(params.max_iterations - n));
            break;
        }
        active = advance(&mut states, params.c, n);
        cancel.add_progress(1);
    }
    Ok(collect(grid, params.max_iterations, &states))
}

fn initial_states(grid: &ComplexGrid) -> Vec<CellState> {
    grid.samples().iter().map(|&z| CellState::Active(z)).collect()
}

/// Step every cell once; returns how many are still active.
fn advance(states: &mut [CellState], c: Complex, n: u32) -> usize {
    let mut active = 0;
    for state in states.iter_mut() {
        *state = state.step(c, n);
        if matches!(state, CellState::Active(_)) {
            active += 1;
        }
    }
    active
}

fn collect(grid: &ComplexGrid, max_iterations: u32, states: &[CellState]) -> IterationField {
    let data = states.iter().map(|s| s.value(max_iterations)).collect();
    IterationField::from_grid_data(grid.width(), grid.height(), max_iterations, data)
}
