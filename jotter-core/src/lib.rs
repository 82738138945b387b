pub mod cancel;
pub mod complex;
pub mod engine;
pub mod error;
pub mod extent;
pub mod field;
pub mod grid;
pub mod locate;
pub mod mandelbrot;
pub mod params;
pub mod reference;
pub mod resolution;

// Re-export primary types for convenience.
pub use cancel::CancelToken;
pub use complex::Complex;
pub use engine::{compute, compute_cancellable};
pub use error::CoreError;
pub use extent::{Extent, ExtentProfile};
pub use field::IterationField;
pub use grid::ComplexGrid;
pub use locate::{locate, CoordinateMapper, MapResult, PixelCoordinate};
pub use params::{EscapeParameters, ESCAPE_THRESHOLD_SQ};
pub use reference::{ReferenceField, ReferenceGeometry};
pub use resolution::{ResolutionSpec, RESOLUTION_PRESETS};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
