//! Explorer session
//!
//! Holds the active variant and viewport, the frame currently on screen and
//! at most one in-flight render. Commands that would change what is being
//! rendered are refused until the in-flight pass completes, so every frame
//! is computed against a single viewport and the displayed frame is only
//! replaced by a complete one.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ExplorerConfig;
use crate::control::Command;
use crate::error::{ExplorerError, ExportError};
use crate::export::save_png;
use crate::fractal::FractalVariant;
use crate::render::{Frame, RenderJob, RenderRequest, Renderer};
use crate::viewport::Viewport;

/// Result of handling one command
#[derive(Debug)]
pub enum Outcome {
    /// A new render pass was started
    Rendering,
    /// Refused because a render is in flight
    Busy,
    Exported(PathBuf),
    ExportFailed(ExportError),
    Quit,
}

pub struct Explorer {
    size: u32,
    zoom_in_scale: f64,
    zoom_out_scale: f64,
    export_path: PathBuf,
    variant: FractalVariant,
    viewport: Viewport,
    renderer: Renderer,
    job: Option<RenderJob>,
    frame: Option<Frame>,
}

impl Explorer {
    pub fn new(config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        config.validate()?;
        let renderer = Renderer::new(config.render_threads)?;
        Ok(Self {
            size: config.display_size,
            zoom_in_scale: config.zoom_in_scale,
            zoom_out_scale: config.zoom_out_scale,
            export_path: config.export_path.clone(),
            variant: config.variant,
            viewport: config.variant.initial_range(),
            renderer,
            job: None,
            frame: None,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn variant(&self) -> FractalVariant {
        self.variant
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Last completed frame
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Worker threads available to each render pass
    pub fn render_threads(&self) -> usize {
        self.renderer.threads()
    }

    pub fn is_rendering(&self) -> bool {
        self.job.is_some()
    }

    /// Fraction of the in-flight render done (1.0 when idle)
    pub fn progress(&self) -> f32 {
        self.job.as_ref().map_or(1.0, RenderJob::progress)
    }

    /// Start rendering the current variant and viewport.
    /// Returns `false` if a render is already in flight.
    pub fn start_render(&mut self) -> bool {
        if self.job.is_some() {
            return false;
        }
        let request = RenderRequest::new(self.variant, self.viewport, self.size);
        self.job = Some(self.renderer.submit(request));
        true
    }

    /// Swap in the finished frame if the in-flight render has completed.
    /// Returns `true` when a new frame became current.
    pub fn poll(&mut self) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        match job.try_finish() {
            Some(frame) => {
                self.install(frame);
                true
            },
            None => false,
        }
    }

    /// Block until the in-flight render (if any) completes
    pub fn wait(&mut self) {
        if let Some(job) = self.job.take() {
            if let Some(frame) = job.wait() {
                self.install(frame);
            }
        }
    }

    fn install(&mut self, frame: Frame) {
        info!(
            "Rendered {} {}x{} in {:.0} ms",
            frame.request.variant,
            frame.request.size,
            frame.request.size,
            frame.elapsed.as_secs_f64() * 1000.0
        );
        self.job = None;
        self.frame = Some(frame);
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        if command == Command::Quit {
            return Outcome::Quit;
        }
        if self.is_rendering() {
            debug!("Ignoring {:?}: render in progress", command);
            return Outcome::Busy;
        }

        match command {
            Command::Reset => {
                self.viewport.reset(self.variant);
            },
            Command::ZoomIn { px, py } => self.zoom_at(px, py, self.zoom_in_scale),
            Command::ZoomOut { px, py } => self.zoom_at(px, py, self.zoom_out_scale),
            Command::Select(variant) => self.select(variant),
            Command::NextVariant => self.select(self.variant.next()),
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                return match self.export(&path) {
                    Ok(()) => Outcome::Exported(path),
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        Outcome::ExportFailed(e)
                    },
                };
            },
            Command::Quit => return Outcome::Quit,
        }

        self.start_render();
        Outcome::Rendering
    }

    fn zoom_at(&mut self, px: u32, py: u32, scale: f64) {
        let (x, y) = self.viewport.plane_point(px, py, self.size);
        self.viewport.recenter_and_zoom(x, y, scale);
        debug!("Zoom x{} around ({}, {}) -> {:?}", scale, x, y, self.viewport);
    }

    fn select(&mut self, variant: FractalVariant) {
        info!("Selected {}", variant);
        self.variant = variant;
        self.viewport.reset(variant);
    }

    /// Write the current frame as PNG. Refused before the first frame and
    /// while a render is in flight.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        if self.is_rendering() {
            return Err(ExportError::Busy);
        }
        let frame = self.frame.as_ref().ok_or(ExportError::NoFrame)?;
        save_png(&frame.buffer, path)
    }

    /// Short status line for the window title
    pub fn status(&self) -> String {
        let (cx, cy) = self.viewport.center();
        let zoom = self
            .viewport
            .zoom_relative_to(&self.variant.initial_range());
        let mut status = format!(
            "{} | center ({:.6}, {:.6}) | zoom x{}",
            self.variant, cx, cy, format_zoom(zoom)
        );
        if self.is_rendering() {
            status.push_str(&format!(" | rendering {:.0}%", self.progress() * 100.0));
        }
        status
    }
}

fn format_zoom(zoom: f64) -> String {
    if zoom >= 1e6 {
        format!("{:.2e}", zoom)
    } else if zoom.fract() == 0.0 {
        format!("{}", zoom)
    } else {
        format!("{:.3}", zoom)
    }
}
