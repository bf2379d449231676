/// Bytes per pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
pub(crate) fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// The renderer fills it row by row; the window uploads it as a streaming
/// texture and export converts it to packed RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a `size` x `size` buffer
    pub fn square(size: u32) -> Self {
        Self::with_size(size, size)
    }

    /// Create a new pixel buffer with custom resolution, cleared to opaque black
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut buffer = Self {
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
        };
        buffer.clear(0, 0, 0);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one row
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Clear to a solid color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        for chunk in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            write_pixel(chunk, r, g, b);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to raw pixels; rows are `stride()` bytes apart
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Packed RGB bytes, row-major, for image encoders
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.pixels.chunks_exact(BYTES_PER_PIXEL) {
            // ABGR layout: [0]=A, [1]=B, [2]=G, [3]=R
            rgb.extend_from_slice(&[px[3], px[2], px[1]]);
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(buffer: &mut PixelBuffer, x: u32, y: u32, (r, g, b): (u8, u8, u8)) {
        let idx = buffer.pixel_index(x, y);
        write_pixel(&mut buffer.as_bytes_mut()[idx..idx + BYTES_PER_PIXEL], r, g, b);
    }

    #[test]
    fn test_new_buffer_is_opaque_black() {
        let buffer = PixelBuffer::square(3);
        assert_eq!(buffer.as_bytes().len(), 3 * 3 * 4);
        for px in buffer.as_bytes().chunks_exact(4) {
            assert_eq!(px, [255, 0, 0, 0]);
        }
    }

    #[test]
    fn test_get_pixel_and_layout() {
        let mut buffer = PixelBuffer::with_size(4, 2);
        paint(&mut buffer, 3, 1, (10, 20, 30));
        assert_eq!(buffer.get_pixel(3, 1), Some((10, 20, 30)));
        let idx = (4 + 3) * 4;
        assert_eq!(&buffer.as_bytes()[idx..idx + 4], &[255, 30, 20, 10]);
    }

    #[test]
    fn test_out_of_bounds_reads_none() {
        let buffer = PixelBuffer::square(2);
        assert_eq!(buffer.get_pixel(-1, 0), None);
        assert_eq!(buffer.get_pixel(0, 2), None);
        assert_eq!(buffer.get_pixel(2, 0), None);
        assert_eq!(buffer.get_pixel(1, 1), Some((0, 0, 0)));
    }

    #[test]
    fn test_clear() {
        let mut buffer = PixelBuffer::with_size(3, 2);
        buffer.clear(7, 8, 9);
        assert_eq!(buffer.get_pixel(2, 1), Some((7, 8, 9)));
        assert_eq!(buffer.to_rgb_bytes(), [7, 8, 9].repeat(6));
    }

    #[test]
    fn test_rgb_export_order() {
        let mut buffer = PixelBuffer::with_size(2, 1);
        paint(&mut buffer, 0, 0, (1, 2, 3));
        paint(&mut buffer, 1, 0, (4, 5, 6));
        assert_eq!(buffer.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_stride() {
        assert_eq!(PixelBuffer::with_size(5, 2).stride(), 20);
    }
}
