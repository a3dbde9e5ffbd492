//! GUI module - Figure display

mod app;
mod chart_viewer;

pub use app::FigureApp;
pub use chart_viewer::ChartViewer;

use crate::charts::{Figure, StaticChartRenderer};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Render error: {0}")]
    Render(#[from] crate::charts::RenderError),
    #[error("Window error: {0}")]
    Window(String),
    #[error("Failed to open system viewer: {0}")]
    Io(#[from] std::io::Error),
}

/// Open a native window showing `figure`; blocks until it is closed.
pub fn show_figure(figure: &Figure, title: &str) -> Result<(), ViewerError> {
    let image = StaticChartRenderer::render_rgb(figure)?;
    let (w, h) = (image.width() as f32, image.height() as f32);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w + 20.0, h + 50.0])
            .with_title(title),
        ..Default::default()
    };

    info!(width = w, height = h, "showing figure");
    eframe::run_native(
        title,
        options,
        Box::new(move |cc| Ok(Box::new(FigureApp::new(cc, image)))),
    )
    .map_err(|e| ViewerError::Window(e.to_string()))?;
    Ok(())
}

/// Write `figure` as PNG into the temp directory and open it with the
/// system default viewer.
pub fn open_in_system_viewer(figure: &Figure) -> Result<std::path::PathBuf, ViewerError> {
    let path = std::env::temp_dir().join(format!("broken-axis-{}.png", std::process::id()));
    StaticChartRenderer::save(figure, &path)?;
    open::that(&path)?;
    info!(path = %path.display(), "opened figure in system viewer");
    Ok(path)
}
