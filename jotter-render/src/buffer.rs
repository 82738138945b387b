/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write one pixel. Coordinates outside the image are ignored, so
    /// shapes near an edge are clipped rather than wrapped.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Draw a diagonal cross (`x`) centred on `(cx, cy)`.
    ///
    /// `arm` is the distance from the centre to each tip; each stroke is
    /// `thickness` pixels wide.
    pub fn draw_cross(&mut self, cx: u32, cy: u32, arm: u32, thickness: u32, color: [u8; 4]) {
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let arm = i64::from(arm);
        let half = i64::from(thickness.max(1)) / 2;
        for d in -arm..=arm {
            for t in -half..=half {
                self.put_pixel(cx + d + t, cy + d, color);
                self.put_pixel(cx + d + t, cy - d, color);
            }
        }
    }
}
