pub mod band;
pub mod buffer;
pub mod colormap;
pub mod error;
pub mod export;
pub mod jobs;
pub mod npy;
pub mod overlay;
pub mod reference;
pub mod renderer;

pub use band::{build_bands, Band, BAND_ROWS};
pub use buffer::RenderBuffer;
pub use colormap::{builtin_colormaps, Colormap};
pub use error::RenderError;
pub use export::{encode_png, export_png, ExportMetadata};
pub use jobs::{JobHandle, JobQueue, Priority};
pub use npy::{encode_npy, parse_npy, read_npy, write_npy};
pub use overlay::render_overlay;
pub use reference::{generate_reference, load_or_generate};
pub use renderer::{render_julia, JuliaRequest, RenderResult};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
