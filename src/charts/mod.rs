//! Charts module - Figure model, broken-axis layouts and rendering

mod figure;
mod histogram;
mod line;
mod palette;
mod renderer;

pub use figure::{
    joint_marks, Bar, BreakMark, Figure, FigureTexts, Legend, LegendEntry, Limits, Marker, Panel,
    PanelPair, Series, Spines, TextSpec, TickSide, XTicks,
};
pub use histogram::{draw_broken_histogram, Histogram, HistogramError};
pub use line::{break_mark_extents, draw_broken_line_plot, layout_facets};
pub use palette::{Color, ColorError, PALETTE};
pub use renderer::{clip_segment, FigureLayout, PixelRect, RenderError, StaticChartRenderer};

use crate::data::ProcessorError;
use crate::gui::{self, ViewerError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Data(#[from] ProcessorError),
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

impl Figure {
    /// Display the figure in a native window; blocks until it is closed.
    pub fn show(&self) -> Result<(), ChartError> {
        let title = self
            .texts
            .title
            .as_ref()
            .map(|t| t.text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("Broken Axis");
        Ok(gui::show_figure(self, title)?)
    }

    /// Display the figure with the operating system's image viewer.
    pub fn open_in_system_viewer(&self) -> Result<PathBuf, ChartError> {
        Ok(gui::open_in_system_viewer(self)?)
    }

    /// Write the figure as PNG or SVG, chosen by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        Ok(StaticChartRenderer::save(self, path.as_ref())?)
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ChartError> {
        Ok(StaticChartRenderer::render_png_bytes(self)?)
    }

    /// Pixel layout this figure renders with.
    pub fn layout(&self) -> FigureLayout {
        FigureLayout::compute(self)
    }
}
