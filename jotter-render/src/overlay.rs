use jotter_core::{MapResult, ReferenceField};

use crate::buffer::RenderBuffer;
use crate::colormap::Colormap;

pub const MARKER_COLOR: [u8; 4] = [255, 0, 0, 255];
pub const MARKER_ARM: u32 = 7;
pub const MARKER_THICKNESS: u32 = 2;

/// Colorize the reference raster and, when the point was mapped, mark it
/// with a red cross. Any other outcome yields the bare reference image.
pub fn render_overlay(
    reference: &ReferenceField,
    colormap: &Colormap,
    result: &MapResult,
) -> RenderBuffer {
    let mut buffer = colormap.colorize_reference(reference);
    if let Some(p) = result.pixel() {
        buffer.draw_cross(p.x, p.y, MARKER_ARM, MARKER_THICKNESS, MARKER_COLOR);
    }
    buffer
}
