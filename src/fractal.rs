//! Escape-time fractal variants
//!
//! Every variant iterates a quadratic recurrence from z0 = 0 with c = x + iy
//! and reports how quickly the orbit leaves the radius-2 disk.
//! The kernels are pure functions of (x, y), so rows and pixels can be
//! computed on any thread without synchronization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Iteration cap shared by all variants
pub const MAX_ITERATION: u32 = 2000;

/// Squared escape radius
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// The supported fractal formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalVariant {
    #[default]
    Mandelbrot,
    Tricorn,
    BurningShip,
}

impl FractalVariant {
    /// All variants in selection order
    pub const ALL: [Self; 3] = [Self::Mandelbrot, Self::Tricorn, Self::BurningShip];

    /// Name shown in the selection control and the window title
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Tricorn => "Tricorn",
            Self::BurningShip => "Burning Ship",
        }
    }

    /// Plane region shown when the variant is selected or reset
    pub fn initial_range(self) -> Viewport {
        match self {
            Self::Mandelbrot | Self::Tricorn => Viewport::new(-2.0, -2.0, 4.0, 4.0),
            Self::BurningShip => Viewport::new(-2.0, -2.5, 4.0, 4.0),
        }
    }

    /// Variant after this one, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Escape time of the point (x, y).
    ///
    /// Returns `Some(i)` where `i` is the zero-based index of the step whose
    /// result first left the disk, or `None` if the orbit stayed bounded for
    /// `MAX_ITERATION` steps.
    pub fn num_iterations(self, x: f64, y: f64) -> Option<u32> {
        match self {
            Self::Mandelbrot => escape_time(x, y, |zr, zi| 2.0 * zr * zi),
            Self::Tricorn => escape_time(x, y, |zr, zi| -2.0 * zr * zi),
            Self::BurningShip => escape_time(x, y, |zr, zi| 2.0 * zr.abs() * zi.abs()),
        }
    }
}

/// Shared iteration loop. The variants differ only in the imaginary cross term.
#[inline]
fn escape_time(x: f64, y: f64, cross: impl Fn(f64, f64) -> f64) -> Option<u32> {
    let mut zr = 0.0_f64;
    let mut zi = 0.0_f64;
    let mut zr2 = 0.0_f64;
    let mut zi2 = 0.0_f64;

    for i in 0..MAX_ITERATION {
        zi = cross(zr, zi) + y;
        zr = zr2 - zi2 + x;
        zr2 = zr * zr;
        zi2 = zi * zi;
        if zr2 + zi2 >= ESCAPE_RADIUS_SQ {
            return Some(i);
        }
    }
    None
}

impl fmt::Display for FractalVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for names that match no variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fractal variant '{0}' (expected mandelbrot, tricorn or burning ship)")]
pub struct UnknownVariant(pub String);

impl FromStr for FractalVariant {
    type Err = UnknownVariant;

    /// Accepts display names case-insensitively; separators are optional
    /// ("Burning Ship", "burning_ship", "burning-ship", "burningship").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "mandelbrot" => Ok(Self::Mandelbrot),
            "tricorn" => Ok(Self::Tricorn),
            "burningship" | "ship" => Ok(Self::BurningShip),
            _ => Err(UnknownVariant(s.trim().to_string())),
        }
    }
}
