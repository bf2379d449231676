//! Shared color utilities

/// Hue of the first escape band
const BASE_HUE: f32 = 0.7;

/// Escape counts per full trip around the color wheel
const HUE_PERIOD: f32 = 200.0;

/// Background for points that never escape
pub const INTERIOR_COLOR: (u8, u8, u8) = (0, 0, 0);

/// HSB to RGB color conversion
/// hue: any value, only the fractional part is used; saturation, brightness: 0-1
///
/// Channel rounding is `(v * 255 + 0.5)` truncated, so results match the
/// common desktop HSB pickers byte for byte.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (u8, u8, u8) {
    let channel = |v: f32| (v * 255.0 + 0.5) as u8;

    if saturation == 0.0 {
        let v = channel(brightness);
        return (v, v, v);
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as i32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };

    (channel(r), channel(g), channel(b))
}

/// Color for an escape-time result; `None` (bounded) is the background
#[inline]
pub fn iteration_color(iterations: Option<u32>) -> (u8, u8, u8) {
    match iterations {
        None => INTERIOR_COLOR,
        Some(n) => hsb_to_rgb(BASE_HUE + n as f32 / HUE_PERIOD, 1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsb_primary_hues() {
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsb_to_rgb(0.5, 1.0, 1.0), (0, 255, 255));
        assert_eq!(hsb_to_rgb(0.25, 1.0, 1.0), (128, 255, 0));
    }

    #[test]
    fn test_hsb_wraps_hue() {
        assert_eq!(hsb_to_rgb(1.25, 1.0, 1.0), hsb_to_rgb(0.25, 1.0, 1.0));
        assert_eq!(hsb_to_rgb(3.0, 1.0, 1.0), hsb_to_rgb(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_hsb_grayscale() {
        assert_eq!(hsb_to_rgb(0.3, 0.0, 1.0), (255, 255, 255));
        assert_eq!(hsb_to_rgb(0.3, 0.0, 0.0), (0, 0, 0));
        assert_eq!(hsb_to_rgb(0.3, 0.0, 0.5), (128, 128, 128));
    }

    #[test]
    fn test_first_escape_band_is_violet() {
        // hue 0.7 sits between blue and magenta
        assert_eq!(iteration_color(Some(0)), (51, 0, 255));
    }

    #[test]
    fn test_interior_is_black() {
        assert_eq!(iteration_color(None), INTERIOR_COLOR);
    }

    #[test]
    fn test_hue_period() {
        // 200 escape steps is one full turn of the wheel
        let a = iteration_color(Some(10));
        let b = iteration_color(Some(210));
        let diff = |x: u8, y: u8| (x as i32 - y as i32).abs();
        assert!(diff(a.0, b.0) <= 1 && diff(a.1, b.1) <= 1 && diff(a.2, b.2) <= 1);
    }
}
