//! Static Chart Renderer
//! Draws a `Figure` with plotters onto bitmap or SVG backends.
//!
//! Layout:
//! 1. Title centered in a band above the grid
//! 2. Grid of panel pairs, upper panel above lower panel, one pair per column
//! 3. Shared x label below the grid, shared y label rotated at the left
//! 4. Legend band on the right when a panel carries a legend

use crate::charts::figure::{
    BreakMark, Figure, Legend, Limits, Marker, Panel, Series, TextSpec, TickSide,
};
use crate::charts::Color;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Pixel buffer does not match {0}x{1}")]
    BufferSize(u32, u32),
}

fn drawing<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

// Layout constants (pixels)
const OUTER_PAD: i32 = 10;
const Y_TICK_AREA: i32 = 45;
const X_TICK_AREA: i32 = 25;
const TOP_TICK_AREA: i32 = 6;
const COLUMN_GAP: i32 = 20;
const PANEL_GAP: i32 = 12;
const LEGEND_BAND: i32 = 130;
const LEGEND_OFFSET: i32 = 10;
const LEGEND_ROW: i32 = 18;

// Styling
const TICK_FONT_SIZE: f64 = 10.0;
const LEGEND_FONT_SIZE: f64 = 10.0;
const LINE_WIDTH: u32 = 2;
const MARKER_RADIUS: i32 = 3;
const X_TICKS: usize = 6;
const Y_TICKS: usize = 5;

/// A rectangle in backend pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// Pixel placement of every element of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    /// Plot rectangles as `[upper, lower]`, one entry per column.
    pub panels: Vec<[PixelRect; 2]>,
    pub title_anchor: Option<(i32, i32)>,
    pub x_label_anchor: Option<(i32, i32)>,
    pub y_label_anchor: Option<(i32, i32)>,
    /// Top-left corner of the legend.
    pub legend_anchor: Option<(i32, i32)>,
}

fn band(text: &Option<TextSpec>, factor: f64) -> i32 {
    match text {
        Some(t) if !t.text.is_empty() => (t.font_size * factor).ceil() as i32,
        _ => 0,
    }
}

impl FigureLayout {
    /// Compute the layout of `figure` on its own canvas size.
    pub fn compute(figure: &Figure) -> Self {
        let width = figure.width as i32;
        let height = figure.height as i32;
        let n_cols = figure.n_cols().max(1) as i32;

        let title_band = band(&figure.texts.title, 2.2);
        let x_label_band = band(&figure.texts.x_label, 2.0);
        let y_label_band = band(&figure.texts.y_label, 2.0);
        let column_title_band = figure
            .columns
            .iter()
            .map(|pair| band(&pair.top.title, 1.8))
            .max()
            .unwrap_or(0);
        let legend_band = if figure.has_legend() {
            LEGEND_BAND
        } else {
            0
        };
        let top_ticks = figure
            .columns
            .iter()
            .any(|pair| pair.top.x_ticks.side == TickSide::Top);

        let left = OUTER_PAD + y_label_band;
        let right = width - OUTER_PAD - legend_band;
        let top = OUTER_PAD
            + title_band
            + column_title_band
            + if top_ticks { TOP_TICK_AREA } else { 0 };
        let bottom = height - OUTER_PAD - x_label_band - X_TICK_AREA;

        let column_w = ((right - left - (n_cols - 1) * COLUMN_GAP) / n_cols).max(Y_TICK_AREA + 1);
        let plot_w = column_w - Y_TICK_AREA;

        let [r_top, r_bottom] = figure.height_ratios;
        let avail_h = (bottom - top - PANEL_GAP).max(2);
        let top_h = ((avail_h as f64 * r_top / (r_top + r_bottom)).round() as i32).clamp(1, avail_h - 1);
        let bottom_h = avail_h - top_h;

        let panels = (0..figure.n_cols() as i32)
            .map(|i| {
                let x = left + i * (column_w + COLUMN_GAP) + Y_TICK_AREA;
                [
                    PixelRect {
                        x,
                        y: top,
                        w: plot_w,
                        h: top_h,
                    },
                    PixelRect {
                        x,
                        y: top + top_h + PANEL_GAP,
                        w: plot_w,
                        h: bottom_h,
                    },
                ]
            })
            .collect::<Vec<_>>();

        let grid_center_x = match (panels.first(), panels.last()) {
            (Some(first), Some(last)) => (first[0].x + last[0].right()) / 2,
            _ => width / 2,
        };
        let grid_center_y = (top + bottom) / 2;

        let legend_anchor = figure
            .columns
            .iter()
            .zip(&panels)
            .filter(|(pair, _)| pair.top.legend.is_some())
            .map(|(_, rects)| (rects[0].right() + LEGEND_OFFSET, rects[0].y))
            .last();

        Self {
            title_anchor: (title_band > 0).then_some((width / 2, OUTER_PAD + title_band / 2)),
            x_label_anchor: (x_label_band > 0)
                .then_some((grid_center_x, height - OUTER_PAD - x_label_band / 2)),
            y_label_anchor: (y_label_band > 0)
                .then_some((OUTER_PAD + y_label_band / 2, grid_center_y)),
            legend_anchor,
            panels,
        }
    }
}

/// Non-degenerate coordinate range for a pair of limits.
fn axis_range((lo, hi): Limits) -> Range<f64> {
    if lo == hi {
        (lo - 0.5)..(hi + 0.5)
    } else {
        lo..hi
    }
}

fn ordered((a, b): Limits) -> Limits {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Clip the segment `p0..p1` to the box `x_lim` x `y_lim` (Liang-Barsky).
///
/// Returns `None` when the segment lies outside the box or has a
/// non-finite endpoint.
pub fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    x_lim: Limits,
    y_lim: Limits,
) -> Option<[(f64, f64); 2]> {
    if ![p0.0, p0.1, p1.0, p1.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (x_min, x_max) = ordered(x_lim);
    let (y_min, y_max) = ordered(y_lim);
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, p0.0 - x_min),
        (dx, x_max - p0.0),
        (-dy, p0.1 - y_min),
        (dy, y_max - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some([
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ])
}

fn in_box(p: (f64, f64), x_lim: Limits, y_lim: Limits) -> bool {
    let (x_min, x_max) = ordered(x_lim);
    let (y_min, y_max) = ordered(y_lim);
    p.0 >= x_min && p.0 <= x_max && p.1 >= y_min && p.1 <= y_max
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn font(spec: &TextSpec) -> FontDesc<'static> {
    let style = if spec.bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::SansSerif, spec.font_size, style)
}

/// Axis-relative mark corner to pixel coordinates of a plotting area.
fn mark_to_pixels(
    mark: &BreakMark,
    x_px: &Range<i32>,
    y_px: &Range<i32>,
) -> [(i32, i32); 2] {
    let w = (x_px.end - x_px.start) as f64;
    let h = (y_px.end - y_px.start) as f64;
    let point = |ax: f64, ay: f64| {
        (
            x_px.start + (ax * w).round() as i32,
            y_px.end - (ay * h).round() as i32,
        )
    };
    [point(mark.x[0], mark.y[0]), point(mark.x[1], mark.y[1])]
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw `figure` onto `root`, which must be at least figure-sized.
    pub fn draw<DB: DrawingBackend>(
        figure: &Figure,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing)?;

        let layout = FigureLayout::compute(figure);
        let x_limits = figure.x_limits();

        for (pair, rects) in figure.columns.iter().zip(&layout.panels) {
            for (panel, rect) in [(&pair.top, rects[0]), (&pair.bottom, rects[1])] {
                Self::draw_panel(root, panel, rect, x_limits)?;
            }
        }

        if let (Some(legend), Some(anchor)) = (
            figure.panels().find_map(|p| p.legend.as_ref()),
            layout.legend_anchor,
        ) {
            Self::draw_legend(root, legend, anchor)?;
        }

        Self::draw_figure_texts(root, figure, &layout)
    }

    fn draw_panel<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        panel: &Panel,
        rect: PixelRect,
        x_limits: Limits,
    ) -> Result<(), RenderError> {
        let top_area = match panel.x_ticks.side {
            TickSide::Top => TOP_TICK_AREA,
            _ => 0,
        };
        let bottom_area = match panel.x_ticks.side {
            TickSide::Bottom => X_TICK_AREA,
            _ => 0,
        };

        let area = root.clone().shrink(
            (rect.x - Y_TICK_AREA, rect.y - top_area),
            (rect.w + Y_TICK_AREA, rect.h + top_area + bottom_area),
        );

        let mut builder = ChartBuilder::on(&area);
        builder.set_label_area_size(LabelAreaPosition::Left, Y_TICK_AREA);
        if top_area > 0 {
            builder.set_label_area_size(LabelAreaPosition::Top, top_area);
        }
        if bottom_area > 0 {
            builder.set_label_area_size(LabelAreaPosition::Bottom, bottom_area);
        }
        let mut chart = builder
            .build_cartesian_2d(axis_range(x_limits), axis_range(panel.y_limits))
            .map_err(drawing)?;

        let blank = |_: &f64| String::new();
        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .disable_y_mesh()
                .x_labels(X_TICKS)
                .y_labels(Y_TICKS)
                .label_style(("sans-serif", TICK_FONT_SIZE))
                .axis_style(BLACK.stroke_width(1));
            if !panel.x_ticks.labels {
                mesh.x_label_formatter(&blank);
            }
            mesh.draw().map_err(drawing)?;
        }

        for series in &panel.series {
            match series {
                Series::Bars { bars, color } => {
                    let (y_min, y_max) = ordered(panel.y_limits);
                    let style = rgb(*color).filled();
                    chart
                        .draw_series(bars.iter().filter_map(|bar| {
                            let base = y_min.max(0.0);
                            let top = y_max.min(bar.height);
                            (top > base).then(|| {
                                Rectangle::new([(bar.left, base), (bar.right, top)], style)
                            })
                        }))
                        .map_err(drawing)?;
                }
                Series::Line {
                    points,
                    color,
                    marker,
                    ..
                } => {
                    let color = rgb(*color);
                    let segments: Vec<[(f64, f64); 2]> = points
                        .windows(2)
                        .filter_map(|w| clip_segment(w[0], w[1], x_limits, panel.y_limits))
                        .collect();
                    chart
                        .draw_series(segments.into_iter().map(|[a, b]| {
                            PathElement::new(vec![a, b], color.stroke_width(LINE_WIDTH))
                        }))
                        .map_err(drawing)?;

                    if *marker == Marker::Circle {
                        chart
                            .draw_series(
                                points
                                    .iter()
                                    .filter(|p| in_box(**p, x_limits, panel.y_limits))
                                    .map(|p| Circle::new(*p, MARKER_RADIUS, color.filled())),
                            )
                            .map_err(drawing)?;
                    }
                }
            }
        }

        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        Self::draw_spines(root, panel, &x_px, &y_px)?;
        for mark in &panel.break_marks {
            let pixels = mark_to_pixels(mark, &x_px, &y_px);
            root.draw(&PathElement::new(pixels.to_vec(), BLACK.stroke_width(1)))
                .map_err(drawing)?;
        }

        if let Some(title) = &panel.title {
            let style = TextStyle::from(font(title)).pos(Pos::new(HPos::Center, VPos::Bottom));
            let center = (x_px.start + x_px.end) / 2;
            root.draw(&Text::new(title.text.clone(), (center, y_px.start - 4), style))
                .map_err(drawing)?;
        }

        Ok(())
    }

    fn draw_spines<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        panel: &Panel,
        x_px: &Range<i32>,
        y_px: &Range<i32>,
    ) -> Result<(), RenderError> {
        let (x0, x1) = (x_px.start, x_px.end);
        let (y0, y1) = (y_px.start, y_px.end);
        let edges = [
            (panel.spines.top, [(x0, y0), (x1, y0)]),
            (panel.spines.bottom, [(x0, y1), (x1, y1)]),
            (panel.spines.left, [(x0, y0), (x0, y1)]),
            (panel.spines.right, [(x1, y0), (x1, y1)]),
        ];
        for (visible, line) in edges {
            if visible {
                root.draw(&PathElement::new(line.to_vec(), BLACK.stroke_width(1)))
                    .map_err(drawing)?;
            }
        }
        Ok(())
    }

    fn draw_legend<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        legend: &Legend,
        (x, y): (i32, i32),
    ) -> Result<(), RenderError> {
        let mut row_y = y + LEGEND_ROW / 2;
        let label_style = TextStyle::from(("sans-serif", LEGEND_FONT_SIZE).into_font())
            .pos(Pos::new(HPos::Left, VPos::Center));

        if let Some(title) = &legend.title {
            let title_spec = TextSpec::new(title.clone(), LEGEND_FONT_SIZE).bold();
            let style = TextStyle::from(font(&title_spec)).pos(Pos::new(HPos::Left, VPos::Center));
            root.draw(&Text::new(title.clone(), (x, row_y), style))
                .map_err(drawing)?;
            row_y += LEGEND_ROW;
        }

        for entry in &legend.entries {
            let color = rgb(entry.color);
            root.draw(&PathElement::new(
                vec![(x, row_y), (x + 20, row_y)],
                color.stroke_width(LINE_WIDTH),
            ))
            .map_err(drawing)?;
            if entry.marker == Marker::Circle {
                root.draw(&Circle::new((x + 10, row_y), MARKER_RADIUS, color.filled()))
                    .map_err(drawing)?;
            }
            root.draw(&Text::new(
                entry.label.clone(),
                (x + 26, row_y),
                label_style.clone(),
            ))
            .map_err(drawing)?;
            row_y += LEGEND_ROW;
        }
        Ok(())
    }

    fn draw_figure_texts<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
        layout: &FigureLayout,
    ) -> Result<(), RenderError> {
        let centered = Pos::new(HPos::Center, VPos::Center);
        let texts = [
            (&figure.texts.title, layout.title_anchor, false),
            (&figure.texts.x_label, layout.x_label_anchor, false),
            (&figure.texts.y_label, layout.y_label_anchor, true),
        ];

        for (spec, anchor, vertical) in texts {
            let (Some(spec), Some(anchor)) = (spec, anchor) else {
                continue;
            };
            let mut style = TextStyle::from(font(spec)).pos(centered);
            if vertical {
                style = style.transform(FontTransform::Rotate270);
            }
            root.draw(&Text::new(spec.text.clone(), anchor, style))
                .map_err(drawing)?;
        }
        Ok(())
    }

    /// Render into an in-memory RGB image.
    pub fn render_rgb(figure: &Figure) -> Result<RgbImage, RenderError> {
        let (w, h) = (figure.width, figure.height);
        let mut buffer = vec![255u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
            Self::draw(figure, &root)?;
            root.present().map_err(drawing)?;
        }
        RgbImage::from_raw(w, h, buffer).ok_or(RenderError::BufferSize(w, h))
    }

    /// Render and encode as PNG.
    pub fn render_png_bytes(figure: &Figure) -> Result<Vec<u8>, RenderError> {
        let image = Self::render_rgb(figure)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write `figure` to `path`; the extension selects PNG or SVG.
    pub fn save(figure: &Figure, path: &Path) -> Result<(), RenderError> {
        let size = (figure.width, figure.height);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw(figure, &root)?;
                root.present().map_err(drawing)?;
            }
            "svg" => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw(figure, &root)?;
                root.present().map_err(drawing)?;
            }
            other => return Err(RenderError::UnsupportedFormat(other.to_string())),
        }

        info!(path = %path.display(), width = size.0, height = size.1, "saved figure");
        Ok(())
    }
}
