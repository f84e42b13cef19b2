//! CPU frame compositing and PNG snapshots.
//!
//! Layers are drawn in order: sky fill, chunk blits, lighting overlay, rain,
//! fog, then the player marker. Every layer after the chunks is a
//! source-over blend of a flat color.

use std::io::Cursor;
use std::path::Path;

use wanderer_terrain::ChunkImage;

/// Errors from building or encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame must be at least 1x1, got {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// A flat color blended over the frame at `alpha` opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    pub rgb: [u8; 3],
    pub alpha: f64,
}

impl Tint {
    pub fn new(rgb: [u8; 3], alpha: f64) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// An opaque RGBA frame, row-major.
#[derive(Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// # Errors
    ///
    /// Returns [`FrameError::Empty`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Fill the whole frame with an opaque color.
    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }

    /// Copy a chunk with its top-left corner at `(x, y)`, clipped to the frame.
    pub fn blit(&mut self, chunk: &ChunkImage, x: i64, y: i64) {
        let side = chunk.side() as i64;
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + side).min(self.width as i64);
        let y1 = (y + side).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let row_bytes = (x1 - x0) as usize * 4;
        let src_stride = side as usize * 4;
        let src = chunk.pixels();
        for fy in y0..y1 {
            let src_start = (fy - y) as usize * src_stride + (x0 - x) as usize * 4;
            let dst_start = self.index(x0 as u32, fy as u32);
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }
    }

    /// Blend a tint over the whole frame.
    pub fn blend(&mut self, tint: Tint) {
        if tint.alpha <= 0.0 {
            return;
        }
        for px in self.pixels.chunks_exact_mut(4) {
            blend_into(px, tint);
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, tint: Tint) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        blend_into(&mut self.pixels[idx..idx + 4], tint);
    }

    /// Blend a filled disc centred on `(cx, cy)`.
    pub fn draw_disc(&mut self, cx: f64, cy: f64, radius: f64, tint: Tint) {
        let r2 = radius * radius;
        let (x0, x1) = ((cx - radius).floor() as i64, (cx + radius).ceil() as i64);
        let (y0, y1) = ((cy - radius).floor() as i64, (cy + radius).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, tint);
                }
            }
        }
    }

    /// Blend a one-pixel line from `(x, y)` to `(x + dx, y + dy)`.
    pub fn draw_line(&mut self, x: f64, y: f64, dx: f64, dy: f64, tint: Tint) {
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.blend_pixel(
                (x + dx * t).floor() as i64,
                (y + dy * t).floor() as i64,
                tint,
            );
        }
    }

    /// Encode the frame as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, FrameError> {
        let mut png_buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(Cursor::new(&mut png_buf), self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(png_buf)
    }

    /// Encode and write the frame, creating parent directories.
    pub fn save_png(&self, path: &Path) -> Result<(), FrameError> {
        let bytes = self.encode_png()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn blend_into(px: &mut [u8], tint: Tint) {
    let a = tint.alpha;
    for (c, t) in px.iter_mut().zip(tint.rgb) {
        *c = (*c as f64 * (1.0 - a) + t as f64 * a).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanderer_terrain::ChunkCoord;

    fn checker_chunk() -> ChunkImage {
        let mut chunk = ChunkImage::blank(ChunkCoord::new(0, 0), 4);
        chunk.fill_block(0, 0, 2, [255, 0, 0]);
        chunk.fill_block(2, 0, 2, [0, 255, 0]);
        chunk.fill_block(0, 2, 2, [0, 0, 255]);
        chunk.fill_block(2, 2, 2, [255, 255, 0]);
        chunk
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert!(matches!(
            FrameBuffer::new(0, 10),
            Err(FrameError::Empty { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_is_opaque() {
        let mut frame = FrameBuffer::new(3, 2).unwrap();
        frame.fill([1, 2, 3]);
        assert!(frame.pixels().chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    }

    #[test]
    fn test_blit_clips_negative_offsets() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        frame.fill([9, 9, 9]);
        frame.blit(&checker_chunk(), -2, -2);
        // Only the yellow quadrant lands on screen.
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 0, 255]));
        assert_eq!(frame.pixel(1, 1), Some([255, 255, 0, 255]));
        assert_eq!(frame.pixel(2, 2), Some([9, 9, 9, 255]));
    }

    #[test]
    fn test_blit_clips_far_edge() {
        let mut frame = FrameBuffer::new(5, 5).unwrap();
        frame.blit(&checker_chunk(), 3, 1);
        assert_eq!(frame.pixel(3, 1), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(4, 4), Some([0, 0, 255, 255]));
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_fully_offscreen_is_noop() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        frame.fill([5, 5, 5]);
        frame.blit(&checker_chunk(), 10, 0);
        frame.blit(&checker_chunk(), -4, 0);
        assert!(frame.pixels().chunks_exact(4).all(|p| p == [5, 5, 5, 255]));
    }

    #[test]
    fn test_blend() {
        let mut frame = FrameBuffer::new(1, 1).unwrap();
        frame.fill([200, 100, 0]);
        frame.blend(Tint::new([0, 0, 0], 0.5));
        assert_eq!(frame.pixel(0, 0), Some([100, 50, 0, 255]));
        frame.blend(Tint::new([255, 255, 255], 0.0));
        assert_eq!(frame.pixel(0, 0), Some([100, 50, 0, 255]));
    }

    #[test]
    fn test_tint_alpha_clamped() {
        assert_eq!(Tint::new([0, 0, 0], 3.0).alpha, 1.0);
        assert_eq!(Tint::new([0, 0, 0], -1.0).alpha, 0.0);
    }

    #[test]
    fn test_disc_and_line_stay_in_bounds() {
        let mut frame = FrameBuffer::new(8, 8).unwrap();
        frame.fill([0, 0, 0]);
        frame.draw_disc(4.0, 4.0, 3.0, Tint::new([255, 255, 255], 1.0));
        assert_eq!(frame.pixel(4, 4), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        frame.draw_disc(-10.0, -10.0, 3.0, Tint::new([255, 0, 0], 1.0));
        frame.draw_line(6.0, -3.0, 1.5, 20.0, Tint::new([0, 255, 0], 1.0));
        assert_eq!(frame.pixel(6, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let mut frame = FrameBuffer::new(7, 3).unwrap();
        frame.fill([10, 20, 30]);
        let bytes = frame.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 7);
        assert_eq!(reader.info().height, 3);
    }

    #[test]
    fn test_save_png_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots").join("frame.png");
        FrameBuffer::new(2, 2).unwrap().save_png(&path).unwrap();
        assert!(path.exists());
    }
}
