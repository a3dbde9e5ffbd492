//! Broken y-axis charts.
//!
//! Two renderers split the y-axis of a chart into an upper and a lower range
//! so a dominant region does not flatten the region of interest:
//!
//! - [`draw_broken_histogram`] bins a sample collection once and shows it in
//!   two stacked panels.
//! - [`draw_broken_line_plot`] facets a DataFrame into column pairs of line
//!   plots, one line per hue value.
//!
//! Both return a [`Figure`] describing every panel, which can then be shown
//! in a window, saved as PNG/SVG, or inspected directly.
//!
//! ```no_run
//! use broken_axis::{draw_broken_histogram, AxisBreak, HistogramOptions};
//!
//! let options = HistogramOptions::new(AxisBreak::new(0.0, 5.0, 45.0, 55.0), 10, "C0".parse()?)
//!     .labels("Latency", "ms", "count");
//! let figure = draw_broken_histogram(&[1.0, 2.0, 2.0, 3.0, 50.0, 51.0, 52.0], &options)?;
//! figure.save("latency.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod telemetry;

pub use charts::{draw_broken_histogram, draw_broken_line_plot, ChartError, Color, Figure};
pub use config::{AxisBreak, ChartConfig, HistogramOptions, LinePlotOptions};
pub use data::{DataLoader, DataProcessor};
