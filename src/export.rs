//! PNG export of a rendered frame

use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::info;

use crate::display::PixelBuffer;
use crate::error::ExportError;

/// Encode `buffer` as a PNG at `path`
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let (width, height) = (buffer.width(), buffer.height());
    let image = RgbImage::from_raw(width, height, buffer.to_rgb_bytes())
        .ok_or(ExportError::BufferSize { width, height })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ExportError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{write_pixel, BYTES_PER_PIXEL};
    use tempfile::tempdir;

    fn paint(buffer: &mut PixelBuffer, x: usize, y: usize, (r, g, b): (u8, u8, u8)) {
        let idx = y * buffer.stride() + x * BYTES_PER_PIXEL;
        write_pixel(&mut buffer.as_bytes_mut()[idx..idx + BYTES_PER_PIXEL], r, g, b);
    }

    #[test]
    fn test_png_roundtrip() {
        let mut buffer = PixelBuffer::with_size(3, 2);
        paint(&mut buffer, 0, 0, (255, 0, 0));
        paint(&mut buffer, 2, 1, (10, 200, 30));
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.png");

        save_png(&buffer, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(2, 1).0, [10, 200, 30]);
        assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 0]);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let buffer = PixelBuffer::square(2);
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("nested").join("out.png");
        let err = save_png(&buffer, &path).unwrap_err();
        assert!(matches!(err, ExportError::Encode { .. }));
        assert!(err.to_string().contains("out.png"));
    }
}
