use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// A point has escaped once `|z|²` exceeds this.
pub const ESCAPE_THRESHOLD_SQ: f64 = 4.0;

/// The constant `c` and iteration budget for one Julia computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeParameters {
    pub c: Complex,
    pub max_iterations: u32,
}

impl EscapeParameters {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

    /// Upper bound offered by the dashboard input. The engine itself accepts
    /// any `u32`.
    pub const UI_MAX_ITERATIONS: u32 = 1000;

    pub fn new(c: Complex, max_iterations: u32) -> Self {
        Self { c, max_iterations }
    }

    /// Build from the text of the two `c` inputs.
    pub fn from_text(creal: &str, cimag: &str, max_iterations: u32) -> crate::Result<Self> {
        let re = parse_component("real part of c", creal)?;
        let im = parse_component("imaginary part of c", cimag)?;
        Ok(Self::new(Complex::new(re, im), max_iterations))
    }

    /// `c = -0.744 + 0.148i`, a seahorse-valley Julia set.
    pub fn default_c() -> Complex {
        Complex::new(-0.744, 0.148)
    }

    /// Return a copy with a different `max_iterations` value.
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

impl Default for EscapeParameters {
    fn default() -> Self {
        Self::new(Self::default_c(), Self::DEFAULT_MAX_ITERATIONS)
    }
}

/// Parse one decimal component, rejecting empty, non-numeric and
/// non-finite text.
pub fn parse_component(field: &'static str, text: &str) -> crate::Result<f64> {
    let invalid = || CoreError::InvalidNumber {
        field,
        value: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}
