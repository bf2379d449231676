//! Visible region of the fractal plane

use serde::{Deserialize, Serialize};

use crate::coords::map_coordinate;
use crate::fractal::FractalVariant;

/// Axis-aligned rectangle in plane coordinates.
/// `(x, y)` is the corner with the smallest coordinates; it maps to pixel (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "viewport extent must be positive ({} x {})",
            width,
            height
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reassign to the initial range of `variant`
    pub fn reset(&mut self, variant: FractalVariant) {
        *self = variant.initial_range();
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move the center to `(target_x, target_y)` and scale both extents by `scale`.
    ///
    /// `scale < 1` zooms in, `scale > 1` zooms out. Nothing is clamped:
    /// repeated zooming shrinks the extent until f64 precision runs out.
    pub fn recenter_and_zoom(&mut self, target_x: f64, target_y: f64, scale: f64) {
        self.width *= scale;
        self.height *= scale;
        self.x = target_x - self.width / 2.0;
        self.y = target_y - self.height / 2.0;
    }

    /// Plane point under pixel `(px, py)` of a `size` x `size` grid
    #[inline]
    pub fn plane_point(&self, px: u32, py: u32, size: u32) -> (f64, f64) {
        (
            map_coordinate(self.x, self.x + self.width, size, px),
            map_coordinate(self.y, self.y + self.height, size, py),
        )
    }

    /// Magnification relative to `reference` (1.0 = same width)
    pub fn zoom_relative_to(&self, reference: &Self) -> f64 {
        reference.width / self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        FractalVariant::default().initial_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_on_origin() {
        let mut vp = Viewport::new(-2.0, -2.0, 4.0, 4.0);
        vp.recenter_and_zoom(0.0, 0.0, 0.5);
        assert_eq!(vp, Viewport::new(-1.0, -1.0, 2.0, 2.0));
    }

    #[test]
    fn test_repeated_zoom_shrinks_without_clamping() {
        let mut vp = Viewport::new(-2.0, -2.0, 4.0, 4.0);
        for _ in 0..4 {
            vp.recenter_and_zoom(0.0, 0.0, 0.5);
        }
        assert_eq!(vp.width, 0.25);
        assert_eq!(vp.height, 0.25);

        for _ in 0..60 {
            vp.recenter_and_zoom(0.0, 0.0, 0.5);
        }
        assert!(vp.width > 0.0 && vp.width < 1e-18);
    }

    #[test]
    fn test_zoom_out() {
        let mut vp = Viewport::new(-1.0, -1.0, 2.0, 2.0);
        vp.recenter_and_zoom(1.0, -0.5, 2.0);
        assert_eq!(vp, Viewport::new(-1.0, -2.5, 4.0, 4.0));
    }

    #[test]
    fn test_recenter_moves_center_to_target() {
        let mut vp = Viewport::new(-2.0, -2.5, 4.0, 4.0);
        vp.recenter_and_zoom(-1.75, -0.03, 0.5);
        let (cx, cy) = vp.center();
        assert!((cx - -1.75).abs() < 1e-12);
        assert!((cy - -0.03).abs() < 1e-12);
        assert_eq!(vp.width, 2.0);
    }

    #[test]
    fn test_reset_restores_initial_range_after_zoom() {
        for variant in FractalVariant::ALL {
            let mut vp = variant.initial_range();
            vp.recenter_and_zoom(0.3, 0.1, 0.5);
            vp.recenter_and_zoom(0.31, 0.09, 0.5);
            vp.reset(variant);
            assert_eq!(vp, variant.initial_range());
        }
    }

    #[test]
    fn test_plane_point_corners() {
        let vp = Viewport::new(-2.0, -2.0, 4.0, 4.0);
        assert_eq!(vp.plane_point(0, 0, 800), (-2.0, -2.0));
        assert_eq!(vp.plane_point(400, 400, 800), (0.0, 0.0));
        assert_eq!(vp.plane_point(800, 800, 800), (2.0, 2.0));
    }

    #[test]
    fn test_zoom_relative() {
        let home = Viewport::default();
        let mut vp = home;
        vp.recenter_and_zoom(0.0, 0.0, 0.5);
        vp.recenter_and_zoom(0.0, 0.0, 0.5);
        assert_eq!(vp.zoom_relative_to(&home), 4.0);
    }
}
