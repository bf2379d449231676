mod pixel_buffer;

pub(crate) use pixel_buffer::write_pixel;
pub use pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL};

/// Edge length of the square output grid when nothing else is configured
pub const DEFAULT_SIZE: u32 = 800;
