//! PNG encoding with embedded metadata (tEXt chunks).

use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Metadata embedded in an exported PNG.
#[derive(Debug, Clone, Default)]
pub struct ExportMetadata {
    /// `"Julia"` or `"Mandelbrot reference"`.
    pub kind: String,
    pub colormap: String,
    /// The constant as typed by the user, when there is one.
    pub c_re: Option<String>,
    pub c_im: Option<String>,
    pub max_iterations: Option<u32>,
    /// Outcome label of a point-location overlay.
    pub marker: Option<String>,
}

/// Write `buffer` to `path` as an RGBA PNG with metadata.
pub fn export_png(buffer: &RenderBuffer, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    write_png(BufWriter::new(file), buffer, metadata)?;
    debug!(
        width = buffer.width,
        height = buffer.height,
        "Exported PNG to {}",
        path.display()
    );
    Ok(())
}

/// Encode `buffer` as PNG bytes in memory.
pub fn encode_png(buffer: &RenderBuffer, metadata: &ExportMetadata) -> crate::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, buffer, metadata)?;
    Ok(bytes)
}

fn write_png<W: Write>(writer: W, buffer: &RenderBuffer, metadata: &ExportMetadata) -> crate::Result<()> {
    if buffer.width == 0
        || buffer.height == 0
        || buffer.pixels.len() != buffer.width as usize * buffer.height as usize * 4
    {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    add_text(&mut encoder, "Software".to_string(), "Jotter".to_string())?;
    add_text(&mut encoder, "Description".to_string(), build_description(metadata, buffer))?;
    for (key, value) in build_metadata_pairs(metadata, buffer) {
        add_text(&mut encoder, key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;
    Ok(())
}

/// `tEXt` only holds ISO 8859-1; anything else goes into a UTF-8 `iTXt`.
fn add_text<W: Write>(
    encoder: &mut png::Encoder<'_, W>,
    keyword: String,
    text: String,
) -> Result<(), png::EncodingError> {
    if text.chars().all(|c| u32::from(c) <= 0xFF) {
        encoder.add_text_chunk(keyword, text)
    } else {
        encoder.add_itxt_chunk(keyword, text)
    }
}

fn build_description(meta: &ExportMetadata, buffer: &RenderBuffer) -> String {
    let mut desc = format!("{} - {}x{}", meta.kind, buffer.width, buffer.height);
    if let (Some(re), Some(im)) = (&meta.c_re, &meta.c_im) {
        desc.push_str(&format!(", z\u{b2} + ({re} + {im}i)"));
    }
    if let Some(n) = meta.max_iterations {
        desc.push_str(&format!(", Iterations: {n}"));
    }
    desc
}

fn build_metadata_pairs(meta: &ExportMetadata, buffer: &RenderBuffer) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("Jotter.Kind".to_string(), meta.kind.clone()),
        ("Jotter.Colormap".to_string(), meta.colormap.clone()),
        (
            "Jotter.Resolution".to_string(),
            format!("{} by {}", buffer.width, buffer.height),
        ),
    ];
    if let Some(re) = &meta.c_re {
        pairs.push(("Jotter.C_Re".to_string(), re.clone()));
    }
    if let Some(im) = &meta.c_im {
        pairs.push(("Jotter.C_Im".to_string(), im.clone()));
    }
    if let Some(n) = meta.max_iterations {
        pairs.push(("Jotter.MaxIterations".to_string(), n.to_string()));
    }
    if let Some(marker) = &meta.marker {
        pairs.push(("Jotter.Marker".to_string(), marker.clone()));
    }
    pairs
}
