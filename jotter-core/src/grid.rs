use tracing::debug;

use crate::complex::Complex;
use crate::extent::Extent;
use crate::resolution::ResolutionSpec;

/// Immutable row-major grid of complex sample points.
///
/// Row 0 samples `extent.im_start` and the last row `extent.im_end`; column 0
/// samples `extent.re_start` and the last column `extent.re_end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexGrid {
    width: u32,
    height: u32,
    samples: Vec<Complex>,
}

impl ComplexGrid {
    /// Evenly sample `extent` at the given resolution.
    ///
    /// Deterministic: the same inputs always yield a bit-identical grid.
    pub fn build(resolution: ResolutionSpec, extent: &Extent) -> Self {
        let width = resolution.width();
        let height = resolution.height();
        let res = linspace(extent.re_start, extent.re_end, width);
        let ims = linspace(extent.im_start, extent.im_end, height);

        let mut samples = Vec::with_capacity(resolution.cell_count());
        for &im in &ims {
            samples.extend(res.iter().map(|&re| Complex::new(re, im)));
        }

        debug!(width, height, "Built sampling grid");
        Self {
            width,
            height,
            samples,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All samples in row-major order.
    #[inline]
    pub fn samples(&self) -> &[Complex] {
        &self.samples
    }

    /// Sample at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Option<Complex> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.samples
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// A copy of rows `first_row..first_row + rows`, clipped to the grid.
    ///
    /// Used to split one request into independent row bands.
    pub fn band(&self, first_row: u32, rows: u32) -> Self {
        let start = first_row.min(self.height);
        let end = start.saturating_add(rows).min(self.height);
        let w = self.width as usize;
        Self {
            width: self.width,
            height: end - start,
            samples: self.samples[start as usize * w..end as usize * w].to_vec(),
        }
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// A single value sits at `start`. The last value is pinned to `end`
/// exactly so rounding in `step` never moves the far edge.
pub(crate) fn linspace(start: f64, end: f64, n: u32) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n as usize - 1] = end;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(w: u32, h: u32) -> ResolutionSpec {
        ResolutionSpec::new(w, h).unwrap()
    }

    #[test]
    fn linspace_includes_both_ends() {
        let v = linspace(-1.7, 1.7, 4);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], -1.7);
        assert_eq!(v[3], 1.7);
        assert!(v.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn linspace_single_value_is_start() {
        assert_eq!(linspace(1.4, -1.4, 1), vec![1.4]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn dimensions_are_height_by_width() {
        let g = ComplexGrid::build(res(4, 3), &Extent::WIDE);
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.samples().len(), 12);
    }

    #[test]
    fn corners_match_extent() {
        let e = Extent::WIDE;
        let g = ComplexGrid::build(res(5, 7), &e);
        assert_eq!(g.get(0, 0), Some(Complex::new(e.re_start, e.im_start)));
        assert_eq!(g.get(0, 4), Some(Complex::new(e.re_end, e.im_start)));
        assert_eq!(g.get(6, 0), Some(Complex::new(e.re_start, e.im_end)));
        assert_eq!(g.get(6, 4), Some(Complex::new(e.re_end, e.im_end)));
        assert_eq!(g.get(7, 0), None);
        assert_eq!(g.get(0, 5), None);
    }

    #[test]
    fn rows_descend_columns_ascend() {
        let g = ComplexGrid::build(res(6, 5), &Extent::NARROW);
        for row in 0..5 {
            for col in 1..6 {
                let a = g.get(row, col - 1).unwrap();
                let b = g.get(row, col).unwrap();
                assert!(b.re > a.re);
                assert_eq!(a.im, b.im);
            }
        }
        for row in 1..5 {
            assert!(g.get(row, 0).unwrap().im < g.get(row - 1, 0).unwrap().im);
        }
    }

    #[test]
    fn odd_height_hits_real_axis() {
        let g = ComplexGrid::build(res(4, 3), &Extent::WIDE);
        assert_eq!(g.get(1, 0).unwrap().im, 0.0);
    }

    #[test]
    fn build_is_deterministic() {
        let a = ComplexGrid::build(res(33, 17), &Extent::WIDE);
        let b = ComplexGrid::build(res(33, 17), &Extent::WIDE);
        assert_eq!(a, b);
    }

    #[test]
    fn band_copies_rows() {
        let g = ComplexGrid::build(res(4, 10), &Extent::WIDE);
        let band = g.band(3, 4);
        assert_eq!(band.height(), 4);
        assert_eq!(band.width(), 4);
        assert_eq!(band.get(0, 2), g.get(3, 2));
        assert_eq!(band.get(3, 1), g.get(6, 1));
    }

    #[test]
    fn band_is_clipped() {
        let g = ComplexGrid::build(res(4, 10), &Extent::WIDE);
        assert_eq!(g.band(8, 5).height(), 2);
        assert_eq!(g.band(12, 5).height(), 0);
    }
}
