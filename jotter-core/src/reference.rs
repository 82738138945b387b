use crate::complex::Complex;
use crate::error::CoreError;

/// Where the Mandelbrot reference raster sits on the complex plane.
///
/// The domain is open on every side: a point on the boundary is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceGeometry {
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
    pub width: u32,
    pub height: u32,
}

impl ReferenceGeometry {
    /// 1000×800 pixels over real ∈ (−2.2, 1), imag ∈ (−1.3, 1.3).
    pub const MANDELBROT: Self = Self {
        re_min: -2.2,
        re_max: 1.0,
        im_min: -1.3,
        im_max: 1.3,
        width: 1000,
        height: 800,
    };

    pub fn re_span(&self) -> f64 {
        self.re_max - self.re_min
    }

    pub fn im_span(&self) -> f64 {
        self.im_max - self.im_min
    }

    /// Strict containment test. NaN components are never inside.
    pub fn contains(&self, c: Complex) -> bool {
        c.re > self.re_min && c.re < self.re_max && c.im > self.im_min && c.im < self.im_max
    }

    /// Complex value at the centre of raster pixel `(x, y)`; row 0 is the
    /// top (`im_max`).
    pub fn pixel_center(&self, x: u32, y: u32) -> Complex {
        Complex::new(
            self.re_min + (x as f64 + 0.5) * self.re_span() / self.width as f64,
            self.im_max - (y as f64 + 0.5) * self.im_span() / self.height as f64,
        )
    }
}

impl Default for ReferenceGeometry {
    fn default() -> Self {
        Self::MANDELBROT
    }
}

/// Read-only raster backing the point-location overlay.
///
/// Loaded (or generated) once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceField {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl ReferenceField {
    pub fn new(width: u32, height: u32, values: Vec<f64>) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidReference {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(CoreError::InvalidReference {
                reason: format!("expected {expected} values, got {}", values.len()),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major values, top row first.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// `true` when the raster has the pixel size `geometry` expects.
    pub fn matches(&self, geometry: &ReferenceGeometry) -> bool {
        self.width == geometry.width && self.height == geometry.height
    }
}
