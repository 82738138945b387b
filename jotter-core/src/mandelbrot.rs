//! Mandelbrot escape counts used to build the reference raster.
//!
//! Here the sample point is `c` and the orbit starts at `z₀ = 0`. The
//! result is only ever a static backdrop for point location.

use crate::complex::Complex;
use crate::params::ESCAPE_THRESHOLD_SQ;
use crate::reference::ReferenceGeometry;

/// Iteration budget used when the reference asset has to be regenerated.
pub const DEFAULT_REFERENCE_ITERATIONS: u32 = 100;

/// Returns `true` if `c` lies inside the main cardioid.
#[inline]
fn in_cardioid(re: f64, im: f64) -> bool {
    let im2 = im * im;
    let q = (re - 0.25) * (re - 0.25) + im2;
    q * (q + (re - 0.25)) <= 0.25 * im2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(re: f64, im: f64) -> bool {
    (re + 1.0) * (re + 1.0) + im * im <= 0.0625
}

/// Iteration index at which the orbit of `0` under `z² + c` escapes, or
/// `max_iterations` if it never does. Same convention as the Julia engine.
pub fn escape_count(c: Complex, max_iterations: u32) -> u32 {
    if in_cardioid(c.re, c.im) || in_period2_bulb(c.re, c.im) {
        return max_iterations;
    }
    let mut z = Complex::ZERO;
    for n in 0..max_iterations {
        z = z.square() + c;
        if z.norm_sq() > ESCAPE_THRESHOLD_SQ {
            return n;
        }
    }
    max_iterations
}

/// Fill one raster row (`out.len() == geometry.width`) with escape counts.
pub fn fill_row(geometry: &ReferenceGeometry, y: u32, max_iterations: u32, out: &mut [f64]) {
    for (x, value) in (0u32..).zip(out.iter_mut()) {
        *value = f64::from(escape_count(geometry.pixel_center(x, y), max_iterations));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_interior() {
        assert_eq!(escape_count(Complex::ZERO, 50), 50);
    }

    #[test]
    fn bulb_is_interior() {
        assert_eq!(escape_count(Complex::new(-1.0, 0.0), 50), 50);
    }

    #[test]
    fn far_point_escapes_at_once() {
        assert_eq!(escape_count(Complex::new(3.0, 0.0), 50), 0);
    }

    #[test]
    fn shortcut_agrees_with_iteration() {
        // c = -0.1 is inside the cardioid; plain iteration must agree.
        let c = Complex::new(-0.1, 0.05);
        let mut z = Complex::ZERO;
        let mut escaped = false;
        for _ in 0..500 {
            z = z.square() + c;
            if z.norm_sq() > ESCAPE_THRESHOLD_SQ {
                escaped = true;
                break;
            }
        }
        assert!(!escaped);
        assert_eq!(escape_count(c, 500), 500);
    }

    #[test]
    fn row_has_interior_and_exterior() {
        let g = ReferenceGeometry::MANDELBROT;
        let mut row = vec![0.0; g.width as usize];
        fill_row(&g, g.height / 2, 64, &mut row);
        assert!(row.iter().any(|&v| v == 64.0));
        assert!(row.iter().any(|&v| v < 64.0));
    }
}
