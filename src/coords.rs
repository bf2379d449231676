//! Pixel grid to fractal plane mapping

/// Map a pixel index along one axis onto the plane range `[plane_min, plane_max)`.
///
/// Equal to `plane_min + (pixel_index / pixel_count) * (plane_max - plane_min)`,
/// evaluated in the two-sided form so index 0 and index `pixel_count` land
/// exactly on the range ends.
///
/// `pixel_count` must be non-zero. Indices outside `0..pixel_count` are not
/// rejected, they extrapolate linearly past the range ends.
#[inline]
pub fn map_coordinate(plane_min: f64, plane_max: f64, pixel_count: u32, pixel_index: u32) -> f64 {
    let t = pixel_index as f64 / pixel_count as f64;
    plane_min * (1.0 - t) + plane_max * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_exact() {
        let ranges = [
            (-2.0, 2.0),
            (-2.5, 1.5),
            (0.25, 0.375),
            (-1e-9, 1e-9),
            (-1.3, 0.9),
            (0.1, 0.7),
            (-0.743643887037151, -0.743643887037131),
        ];
        for &(min, max) in &ranges {
            for n in [1u32, 2, 7, 800] {
                assert_eq!(map_coordinate(min, max, n, 0), min);
                assert_eq!(map_coordinate(min, max, n, n), max);
            }
        }
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(map_coordinate(-2.0, 2.0, 800, 400), 0.0);
        assert_eq!(map_coordinate(-2.0, 2.0, 4, 1), -1.0);
    }

    #[test]
    fn test_monotonic_along_axis() {
        let mut prev = f64::NEG_INFINITY;
        for i in 0..100 {
            let v = map_coordinate(-1.0, 1.0, 100, i);
            assert!(v > prev, "not increasing at index {}", i);
            prev = v;
        }
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        assert_eq!(map_coordinate(0.0, 1.0, 4, 8), 2.0);
    }
}
