//! Displays a model file: an egui plot window, the system's registered
//! viewer, or a headless PNG snapshot.

mod app;
pub mod snapshot;

pub use app::ModelApp;
pub use snapshot::{rasterize, render_snapshot};

use proto3d_core::obj::read_obj;
use proto3d_core::project::Camera;
use proto3d_core::{Mesh, MeshError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("viewer window failed: {0}")]
    Window(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Built-in window with an equal-aspect, height-coloured render.
    #[default]
    Plot,
    /// Hand the file to the system's default application for it.
    Interactive,
    None,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub camera: Camera,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "proto3d".to_string(),
            window_size: [960.0, 720.0],
            camera: Camera::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// The plot window was shown and has been closed.
    Shown,
    /// The system viewer was launched.
    Opened,
    Skipped,
    LoadFailed { error: String },
    /// Interactive mode was unavailable; the plot window was shown instead.
    Fallback { reason: String },
    WindowFailed { error: String },
}

/// Where a loaded model ends up. `SystemDisplay` is the real desktop.
pub trait ModelDisplay {
    /// Hands the file to an external application.
    fn open_external(&self, path: &Path) -> std::io::Result<()>;

    /// Blocks until the plot window is closed.
    fn plot(&self, mesh: Mesh, path: &Path, cfg: &ViewerConfig) -> Result<(), ViewerError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDisplay;

impl ModelDisplay for SystemDisplay {
    fn open_external(&self, path: &Path) -> std::io::Result<()> {
        open::that(path)
    }

    fn plot(&self, mesh: Mesh, path: &Path, cfg: &ViewerConfig) -> Result<(), ViewerError> {
        show_plot(Some(mesh), Some(path.to_path_buf()), cfg)
    }
}

/// Shows the model at `path`. Never fails: problems are logged and reported
/// through the outcome. Plot mode blocks until the window is closed.
pub fn view_model(path: &Path, mode: ViewMode, cfg: &ViewerConfig) -> ViewOutcome {
    view_model_on(&SystemDisplay, path, mode, cfg)
}

pub fn view_model_on(display: &impl ModelDisplay, path: &Path, mode: ViewMode, cfg: &ViewerConfig) -> ViewOutcome {
    let mesh = match read_obj(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not load model for display");
            return ViewOutcome::LoadFailed { error: e.to_string() };
        }
    };

    match mode {
        ViewMode::None => ViewOutcome::Skipped,
        ViewMode::Plot => match display.plot(mesh, path, cfg) {
            Ok(()) => ViewOutcome::Shown,
            Err(e) => window_failed(e),
        },
        ViewMode::Interactive => match display.open_external(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "opened model in system viewer");
                ViewOutcome::Opened
            }
            Err(e) => {
                let reason = format!("no system viewer available: {e}");
                tracing::warn!(%reason, "falling back to plot window");
                match display.plot(mesh, path, cfg) {
                    Ok(()) => ViewOutcome::Fallback { reason },
                    Err(e) => window_failed(e),
                }
            }
        },
    }
}

fn window_failed(e: ViewerError) -> ViewOutcome {
    tracing::error!(error = %e, "viewer window failed");
    ViewOutcome::WindowFailed { error: e.to_string() }
}

/// Opens the plot window and blocks until it is closed. Without a mesh the
/// window starts empty with an "Open model" prompt.
pub fn show_plot(mesh: Option<Mesh>, path: Option<PathBuf>, cfg: &ViewerConfig) -> Result<(), ViewerError> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(cfg.title.clone())
            .with_inner_size(cfg.window_size),
        ..Default::default()
    };
    let app = ModelApp::new(mesh, path, cfg.camera);
    eframe::run_native(
        &cfg.title,
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| ViewerError::Window(e.to_string()))
}
