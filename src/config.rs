//! Chart Options Module
//! Parameters for both broken-axis renderers, loadable from JSON documents.

use crate::charts::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DPI: f64 = 100.0;
pub const DEFAULT_BREAK_MARK_SIZE: f64 = 0.01;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Y-axis breakpoints. Expected `bottom <= broken_bottom < broken_top <= top`;
/// not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBreak {
    pub bottom: f64,
    pub broken_bottom: f64,
    pub broken_top: f64,
    pub top: f64,
}

impl AxisBreak {
    pub fn new(bottom: f64, broken_bottom: f64, broken_top: f64, top: f64) -> Self {
        Self {
            bottom,
            broken_bottom,
            broken_top,
            top,
        }
    }

    /// Limits of the upper panel.
    pub fn upper(&self) -> (f64, f64) {
        (self.broken_top, self.top)
    }

    /// Limits of the lower panel.
    pub fn lower(&self) -> (f64, f64) {
        (self.bottom, self.broken_bottom)
    }
}

fn default_dpi() -> f64 {
    DEFAULT_DPI
}

fn default_title_font_size() -> u32 {
    14
}

fn default_x_label_font_size() -> u32 {
    12
}

fn default_break_mark_size() -> f64 {
    DEFAULT_BREAK_MARK_SIZE
}

fn default_height_ratios() -> [f64; 2] {
    [1.0, 1.0]
}

/// Options for the broken histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramOptions {
    #[serde(flatten)]
    pub breaks: AxisBreak,
    pub bins: usize,
    pub color: Color,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: u32,
    #[serde(default = "default_x_label_font_size")]
    pub x_label_font_size: u32,
    #[serde(default = "default_dpi")]
    pub dpi: f64,
}

impl HistogramOptions {
    pub fn new(breaks: AxisBreak, bins: usize, color: Color) -> Self {
        Self {
            breaks,
            bins,
            color,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            title_font_size: default_title_font_size(),
            x_label_font_size: default_x_label_font_size(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn labels(
        mut self,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }
}

/// Options for the faceted broken line plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlotOptions {
    pub x: String,
    pub y: String,
    pub hue: String,
    pub col: String,
    #[serde(flatten)]
    pub breaks: AxisBreak,
    pub x_label: String,
    pub y_label: String,
    pub main_title: String,
    /// Base size of the break marks, in axis-relative units.
    #[serde(default = "default_break_mark_size")]
    pub d: f64,
    /// Relative heights of the upper and lower panel.
    #[serde(default = "default_height_ratios")]
    pub height_ratios: [f64; 2],
    #[serde(default = "default_dpi")]
    pub dpi: f64,
}

impl LinePlotOptions {
    pub fn new(
        x: impl Into<String>,
        y: impl Into<String>,
        hue: impl Into<String>,
        col: impl Into<String>,
        breaks: AxisBreak,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            hue: hue.into(),
            col: col.into(),
            breaks,
            x_label: String::new(),
            y_label: String::new(),
            main_title: String::new(),
            d: DEFAULT_BREAK_MARK_SIZE,
            height_ratios: default_height_ratios(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn labels(
        mut self,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        main_title: impl Into<String>,
    ) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self.main_title = main_title.into();
        self
    }

    pub fn height_ratios(mut self, upper: f64, lower: f64) -> Self {
        self.height_ratios = [upper, lower];
        self
    }

    pub fn break_mark_size(mut self, d: f64) -> Self {
        self.d = d;
        self
    }
}

/// Histogram chart document: samples come from one numeric CSV column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub csv: PathBuf,
    pub column: String,
    #[serde(flatten)]
    pub options: HistogramOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub csv: PathBuf,
    #[serde(flatten)]
    pub options: LinePlotOptions,
}

/// A complete chart description as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartConfig {
    #[serde(alias = "hist")]
    Histogram(HistogramChart),
    Line(LineChart),
}

impl ChartConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn csv_path(&self) -> &Path {
        match self {
            ChartConfig::Histogram(chart) => &chart.csv,
            ChartConfig::Line(chart) => &chart.csv,
        }
    }
}
