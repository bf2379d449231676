//! Escape-time fractal explorer
//!
//! Renders Mandelbrot, Tricorn and Burning Ship fractals into a square
//! pixel grid, recenters and zooms on request, and exports frames as PNG.
//! The window lives in the binary; everything here runs headless.

pub mod config;
pub mod control;
pub mod coords;
pub mod display;
pub mod error;
pub mod explorer;
pub mod export;
pub mod fractal;
pub mod input;
pub mod mqtt;
pub mod render;
pub mod util;
pub mod viewport;

pub use config::ExplorerConfig;
pub use control::{Command, Controller};
pub use coords::map_coordinate;
pub use display::PixelBuffer;
pub use error::{ConfigError, ControlError, ExplorerError, ExportError, MqttError};
pub use explorer::{Explorer, Outcome};
pub use fractal::{FractalVariant, MAX_ITERATION};
pub use input::{input_command, InputEvent, Key, MouseButtonKind};
pub use mqtt::MqttClient;
pub use render::{render_frame, Frame, RenderJob, RenderRequest, Renderer};
pub use viewport::Viewport;
