use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::reference::ReferenceGeometry;

/// A pixel in the reference raster; `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: u32,
    pub y: u32,
}

impl PixelCoordinate {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Outcome of locating a user-supplied `c` on the reference raster.
///
/// Only `Mapped` carries a marker; the other three all fall back to the bare
/// reference image but stay distinct for callers that want to say why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapResult {
    /// One of the inputs was missing or empty.
    NoInput,
    /// One of the inputs was not a number.
    ParseError,
    /// Both parsed, but the point lies outside the reference domain.
    OutOfDomain,
    Mapped(PixelCoordinate),
}

impl MapResult {
    pub fn pixel(&self) -> Option<PixelCoordinate> {
        match self {
            Self::Mapped(p) => Some(*p),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoInput => "no input",
            Self::ParseError => "not a number",
            Self::OutOfDomain => "outside reference domain",
            Self::Mapped(_) => "mapped",
        }
    }
}

/// Maps complex values onto a fixed reference raster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateMapper {
    geometry: ReferenceGeometry,
}

impl CoordinateMapper {
    pub fn new(geometry: ReferenceGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ReferenceGeometry {
        &self.geometry
    }

    /// Locate the point described by the two text inputs.
    ///
    /// Emptiness is checked for both inputs before either is parsed, so a
    /// missing value wins over a malformed one.
    pub fn locate(&self, creal: Option<&str>, cimag: Option<&str>) -> MapResult {
        let (Some(re_text), Some(im_text)) = (non_empty(creal), non_empty(cimag)) else {
            return MapResult::NoInput;
        };
        let (Ok(re), Ok(im)) = (re_text.trim().parse::<f64>(), im_text.trim().parse::<f64>())
        else {
            return MapResult::ParseError;
        };
        self.map_point(Complex::new(re, im))
    }

    /// Map an already parsed point.
    ///
    /// `x = ⌊(re − re_min)·width / re_span⌋` and
    /// `y = height − ⌊(im − im_min)·height / im_span⌋`, each clamped to the
    /// last pixel so rounding at the open edges never leaves the raster.
    pub fn map_point(&self, c: Complex) -> MapResult {
        let g = &self.geometry;
        if !c.is_finite() || !g.contains(c) {
            return MapResult::OutOfDomain;
        }
        let w = g.width as f64;
        let h = g.height as f64;
        let x = ((c.re - g.re_min) * w / g.re_span()).floor();
        let y = h - ((c.im - g.im_min) * h / g.im_span()).floor();
        MapResult::Mapped(PixelCoordinate::new(
            (x as u32).min(g.width - 1),
            (y as u32).min(g.height - 1),
        ))
    }
}

/// Locate against the standard Mandelbrot reference raster.
pub fn locate(creal: Option<&str>, cimag: Option<&str>) -> MapResult {
    CoordinateMapper::default().locate(creal, cimag)
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}
