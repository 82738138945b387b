use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use jotter_render::{encode_png, ExportMetadata, RenderBuffer};

const PREFIX: &str = "data:image/png;base64,";

/// Encode a rendered buffer, metadata included, as an inline
/// `data:image/png;base64,...` URI.
pub fn png_data_uri(
    buffer: &RenderBuffer,
    metadata: &ExportMetadata,
) -> jotter_render::Result<String> {
    let png_bytes = encode_png(buffer, metadata)?;
    let b64 = BASE64.encode(&png_bytes);
    debug!(
        "Encoded data URI ({}x{}, {} bytes b64)",
        buffer.width,
        buffer.height,
        b64.len()
    );
    Ok(format!("{PREFIX}{b64}"))
}
