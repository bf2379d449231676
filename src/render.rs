//! Render driver
//!
//! A render pass takes an immutable [`RenderRequest`] snapshot and fills a
//! private [`PixelBuffer`] row by row on a rayon pool. Each row is a disjoint
//! `&mut [u8]` slice, so workers never contend. A per-job counter of
//! outstanding rows reaches zero once every row is written; only then is the
//! finished [`Frame`] handed back to the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use crate::display::{write_pixel, PixelBuffer, BYTES_PER_PIXEL};
use crate::fractal::FractalVariant;
use crate::util::iteration_color;
use crate::viewport::Viewport;

/// Everything a render pass reads. Copied into the pass; never shared mutably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub variant: FractalVariant,
    pub viewport: Viewport,
    /// Edge length of the square output grid
    pub size: u32,
}

impl RenderRequest {
    pub fn new(variant: FractalVariant, viewport: Viewport, size: u32) -> Self {
        debug_assert!(size > 0, "render size must be non-zero");
        Self {
            variant,
            viewport,
            size,
        }
    }
}

/// A completed render: the request and the pixels it produced
#[derive(Debug, Clone)]
pub struct Frame {
    pub request: RenderRequest,
    pub buffer: PixelBuffer,
    pub elapsed: Duration,
}

/// Fill one row of RGBA8888 bytes for grid row `py`
fn render_row(request: &RenderRequest, py: u32, row: &mut [u8]) {
    for (px, dest) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let (x, y) = request.viewport.plane_point(px as u32, py, request.size);
        let (r, g, b) = iteration_color(request.variant.num_iterations(x, y));
        write_pixel(dest, r, g, b);
    }
}

/// Render every row of `request` into `buffer`, decrementing `rows_remaining`
/// as each row completes. Runs on the current rayon pool.
fn render_rows(request: &RenderRequest, buffer: &mut PixelBuffer, rows_remaining: &AtomicUsize) {
    let stride = buffer.stride();
    buffer
        .as_bytes_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(py, row)| {
            render_row(request, py as u32, row);
            rows_remaining.fetch_sub(1, Ordering::AcqRel);
        });
}

/// Render a whole frame synchronously on the global rayon pool
pub fn render_frame(request: &RenderRequest) -> Frame {
    let start = Instant::now();
    let mut buffer = PixelBuffer::square(request.size);
    let rows_remaining = AtomicUsize::new(request.size as usize);
    render_rows(request, &mut buffer, &rows_remaining);
    Frame {
        request: *request,
        buffer,
        elapsed: start.elapsed(),
    }
}

// ============================================================================
// Background rendering
// ============================================================================

/// Worker pool that runs render passes off the UI thread
pub struct Renderer {
    pool: rayon::ThreadPool,
}

impl Renderer {
    /// Create a renderer with `threads` workers (`None` = one per core)
    pub fn new(threads: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("render-{}", i));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        info!("Renderer: {} worker threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Start rendering `request` in the background
    pub fn submit(&self, request: RenderRequest) -> RenderJob {
        let rows = request.size as usize;
        let rows_remaining = Arc::new(AtomicUsize::new(rows));
        let (sender, receiver) = mpsc::channel();

        debug!(
            "Render start: {} {}x{} at {:?}",
            request.variant, request.size, request.size, request.viewport
        );

        let counter = Arc::clone(&rows_remaining);
        self.pool.spawn(move || {
            let start = Instant::now();
            let mut buffer = PixelBuffer::square(request.size);
            render_rows(&request, &mut buffer, &counter);
            let frame = Frame {
                request,
                buffer,
                elapsed: start.elapsed(),
            };
            // Receiver gone means the session was dropped mid-render
            let _ = sender.send(frame);
        });

        RenderJob {
            rows,
            rows_remaining,
            receiver,
            finished: false,
        }
    }
}

/// Handle to an in-flight render pass
pub struct RenderJob {
    rows: usize,
    rows_remaining: Arc<AtomicUsize>,
    receiver: Receiver<Frame>,
    finished: bool,
}

impl RenderJob {
    /// Rows not yet written
    pub fn rows_remaining(&self) -> usize {
        self.rows_remaining.load(Ordering::Acquire)
    }

    /// Fraction of rows written, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.rows == 0 {
            return 1.0;
        }
        1.0 - self.rows_remaining() as f32 / self.rows as f32
    }

    /// Take the finished frame if the pass is done (non-blocking).
    /// Returns `None` while rows are still outstanding, and after the frame
    /// has been taken once.
    pub fn try_finish(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(frame) => {
                self.finished = true;
                Some(frame)
            },
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the frame is ready
    pub fn wait(mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mandelbrot_request(size: u32) -> RenderRequest {
        RenderRequest::new(
            FractalVariant::Mandelbrot,
            FractalVariant::Mandelbrot.initial_range(),
            size,
        )
    }

    #[test]
    fn test_two_by_two_corner_is_deterministic() {
        let request = mandelbrot_request(2);
        let first = render_frame(&request);
        // Pixel (0, 0) maps to (-2, -2), outside the disk: first escape band
        let expected = iteration_color(Some(0));
        assert_eq!(first.buffer.get_pixel(0, 0), Some(expected));
        for _ in 0..5 {
            let again = render_frame(&request);
            assert_eq!(again.buffer, first.buffer);
        }
    }

    #[test]
    fn test_two_by_two_center_pixel_is_interior() {
        // Pixel (1, 1) maps to the origin, which never escapes
        let frame = render_frame(&mandelbrot_request(2));
        assert_eq!(frame.buffer.get_pixel(1, 1), Some((0, 0, 0)));
    }

    #[test]
    fn test_pixels_match_kernel() {
        let request = RenderRequest::new(
            FractalVariant::BurningShip,
            Viewport::new(-2.0, -2.5, 4.0, 4.0),
            16,
        );
        let frame = render_frame(&request);
        for py in 0..16 {
            for px in 0..16 {
                let (x, y) = request.viewport.plane_point(px, py, 16);
                let expected = iteration_color(request.variant.num_iterations(x, y));
                assert_eq!(frame.buffer.get_pixel(px as i32, py as i32), Some(expected));
            }
        }
    }

    #[test]
    fn test_background_job_matches_sync_render() {
        let renderer = Renderer::new(Some(2)).unwrap();
        let request = RenderRequest::new(
            FractalVariant::Tricorn,
            FractalVariant::Tricorn.initial_range(),
            24,
        );
        let job = renderer.submit(request);
        let frame = job.wait().unwrap();
        assert_eq!(frame.request, request);
        assert_eq!(frame.buffer, render_frame(&request).buffer);
    }

    #[test]
    fn test_completion_counter_reaches_zero() {
        let renderer = Renderer::new(Some(3)).unwrap();
        let mut job = renderer.submit(mandelbrot_request(32));
        let frame = loop {
            if let Some(frame) = job.try_finish() {
                break frame;
            }
            std::thread::yield_now();
        };
        assert_eq!(job.rows_remaining(), 0);
        assert_eq!(job.progress(), 1.0);
        assert_eq!(frame.buffer.width(), 32);
        // Frame is handed out exactly once
        assert!(job.try_finish().is_none());
    }

    #[test]
    fn test_renderer_thread_count() {
        let renderer = Renderer::new(Some(2)).unwrap();
        assert_eq!(renderer.threads(), 2);
    }
}
