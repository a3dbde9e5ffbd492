//! Figure Model
//! An explicit, inspectable description of a broken-axis figure.
//!
//! A figure is always a grid of 2 rows by K columns. Row 0 holds the upper
//! (broken-top..top) panels and row 1 the lower (bottom..broken-bottom)
//! panels. Renderers only read this model; building it never touches a
//! drawing backend.

use crate::charts::palette::Color;

/// Horizontal and vertical data range of a panel.
pub type Limits = (f64, f64);

/// Panel border visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spines {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Spines {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }
}

/// Where x tick marks are drawn on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSide {
    Top,
    Bottom,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XTicks {
    pub side: TickSide,
    pub labels: bool,
}

impl Default for XTicks {
    fn default() -> Self {
        Self {
            side: TickSide::Bottom,
            labels: true,
        }
    }
}

/// A diagonal segment in axis-relative coordinates (0..1 spans the panel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakMark {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl BreakMark {
    /// Mark centered on `(cx, cy)` reaching `dx` sideways and `dy` vertically.
    pub fn centered(cx: f64, cy: f64, dx: f64, dy: f64) -> Self {
        Self {
            x: [cx - dx, cx + dx],
            y: [cy - dy, cy + dy],
        }
    }

    /// Half of the vertical span of the mark.
    pub fn vertical_extent(&self) -> f64 {
        (self.y[1] - self.y[0]) / 2.0
    }

    pub fn horizontal_extent(&self) -> f64 {
        (self.x[1] - self.x[0]) / 2.0
    }
}

/// The two left/right marks at the joint edge of a panel.
///
/// `at_bottom` places them on the panel's lower edge (upper panel of a pair),
/// otherwise on its upper edge.
pub fn joint_marks(d: f64, dy: f64, at_bottom: bool) -> [BreakMark; 2] {
    let cy = if at_bottom { 0.0 } else { 1.0 };
    [
        BreakMark::centered(0.0, cy, d, dy),
        BreakMark::centered(1.0, cy, d, dy),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
}

/// A histogram bin: `[left, right)` with its count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub left: f64,
    pub right: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Bars {
        bars: Vec<Bar>,
        color: Color,
    },
    Line {
        label: Option<String>,
        points: Vec<(f64, f64)>,
        color: Color,
        marker: Marker,
    },
}

impl Series {
    pub fn color(&self) -> Color {
        match self {
            Series::Bars { color, .. } | Series::Line { color, .. } => *color,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Series::Line { label, .. } => label.as_deref(),
            Series::Bars { .. } => None,
        }
    }

    /// X range covered by the series' finite values.
    pub fn x_extent(&self) -> Option<Limits> {
        let xs: Box<dyn Iterator<Item = f64> + '_> = match self {
            Series::Bars { bars, .. } => Box::new(bars.iter().flat_map(|b| [b.left, b.right])),
            Series::Line { points, .. } => Box::new(points.iter().map(|p| p.0)),
        };
        xs.filter(|x| x.is_finite()).fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
}

impl TextSpec {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub marker: Marker,
}

/// Legend drawn beside its panel, right of the plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
}

/// One subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_limits: Limits,
    pub spines: Spines,
    pub x_ticks: XTicks,
    pub series: Vec<Series>,
    pub break_marks: Vec<BreakMark>,
    pub title: Option<TextSpec>,
    pub legend: Option<Legend>,
}

impl Panel {
    pub fn new(y_limits: Limits) -> Self {
        Self {
            y_limits,
            spines: Spines::default(),
            x_ticks: XTicks::default(),
            series: Vec::new(),
            break_marks: Vec::new(),
            title: None,
            legend: None,
        }
    }

    pub fn set_ylim(&mut self, bottom: f64, top: f64) -> &mut Self {
        self.y_limits = (bottom, top);
        self
    }

    pub fn add_series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    /// Labelled line series, in drawing order.
    pub fn line_labels(&self) -> Vec<&str> {
        self.series.iter().filter_map(Series::label).collect()
    }

    /// Build a legend from the labelled series of this panel.
    pub fn legend_from_series(&mut self, title: Option<String>) -> &mut Self {
        let entries = self
            .series
            .iter()
            .filter_map(|s| match s {
                Series::Line {
                    label: Some(label),
                    color,
                    marker,
                    ..
                } => Some(LegendEntry {
                    label: label.clone(),
                    color: *color,
                    marker: *marker,
                }),
                _ => None,
            })
            .collect();
        self.legend = Some(Legend { title, entries });
        self
    }
}

/// Upper and lower panel of one grid column.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPair {
    pub top: Panel,
    pub bottom: Panel,
}

impl PanelPair {
    pub fn new() -> Self {
        Self {
            top: Panel::new((0.0, 1.0)),
            bottom: Panel::new((0.0, 1.0)),
        }
    }
}

impl Default for PanelPair {
    fn default() -> Self {
        Self::new()
    }
}

/// Figure-level texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureTexts {
    pub title: Option<TextSpec>,
    pub x_label: Option<TextSpec>,
    /// Drawn rotated, vertically centered on the grid.
    pub y_label: Option<TextSpec>,
}

/// A 2 x K grid of panels sharing one x range.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub height_ratios: [f64; 2],
    pub columns: Vec<PanelPair>,
    pub texts: FigureTexts,
    x_limits: Option<Limits>,
}

impl Figure {
    /// Create a figure with `n_cols` empty panel pairs.
    pub fn subplots(n_cols: usize, width: u32, height: u32, height_ratios: [f64; 2]) -> Self {
        Self {
            width,
            height,
            height_ratios,
            columns: (0..n_cols).map(|_| PanelPair::new()).collect(),
            texts: FigureTexts::default(),
            x_limits: None,
        }
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Panel at `(row, col)`; row 0 is the upper panel.
    pub fn axes(&self, row: usize, col: usize) -> Option<&Panel> {
        let pair = self.columns.get(col)?;
        match row {
            0 => Some(&pair.top),
            1 => Some(&pair.bottom),
            _ => None,
        }
    }

    pub fn axes_mut(&mut self, row: usize, col: usize) -> Option<&mut Panel> {
        let pair = self.columns.get_mut(col)?;
        match row {
            0 => Some(&mut pair.top),
            1 => Some(&mut pair.bottom),
            _ => None,
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.columns.iter().flat_map(|p| [&p.top, &p.bottom])
    }

    pub fn set_xlim(&mut self, left: f64, right: f64) {
        self.x_limits = Some((left, right));
    }

    /// Shared x range: explicit limits, or the data extent of every panel
    /// padded by 5% on each side.
    pub fn x_limits(&self) -> Limits {
        if let Some(limits) = self.x_limits {
            return limits;
        }

        let extent = self
            .panels()
            .flat_map(|p| p.series.iter())
            .filter_map(Series::x_extent)
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));

        match extent {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some((lo, hi)) => {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
        }
    }

    /// Whether any panel carries a legend, which needs a band right of the grid.
    pub fn has_legend(&self) -> bool {
        self.panels().any(|p| p.legend.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subplot_grid_is_always_two_rows() {
        let fig = Figure::subplots(1, 500, 600, [1.0, 1.0]);
        assert!(fig.axes(0, 0).is_some());
        assert!(fig.axes(1, 0).is_some());
        assert!(fig.axes(2, 0).is_none());
        assert!(fig.axes(0, 1).is_none());
    }

    #[test]
    fn axes_mut_addresses_lower_row() {
        let mut fig = Figure::subplots(2, 100, 100, [1.0, 1.0]);
        fig.axes_mut(1, 1).unwrap().set_ylim(-1.0, 1.0);
        assert_eq!(fig.columns[1].bottom.y_limits, (-1.0, 1.0));
        assert_eq!(fig.columns[1].top.y_limits, (0.0, 1.0));
        assert!(fig.axes_mut(2, 0).is_none());
    }

    #[test]
    fn joint_marks_sit_on_requested_edge() {
        let [left, right] = joint_marks(0.01, 0.02, true);
        assert_eq!(left.x, [-0.01, 0.01]);
        assert_eq!(left.y, [-0.02, 0.02]);
        assert_eq!(right.x, [0.99, 1.01]);

        let [left, _] = joint_marks(0.01, 0.01, false);
        assert_eq!(left.y, [0.99, 1.01]);
    }

    #[test]
    fn x_limits_pad_data_extent() {
        let mut fig = Figure::subplots(1, 100, 100, [1.0, 1.0]);
        fig.columns[0].top.add_series(Series::Line {
            label: None,
            points: vec![(0.0, 1.0), (10.0, 2.0), (f64::NAN, 3.0)],
            color: Color::BLACK,
            marker: Marker::None,
        });
        assert_eq!(fig.x_limits(), (-0.5, 10.5));

        fig.set_xlim(1.0, 2.0);
        assert_eq!(fig.x_limits(), (1.0, 2.0));
    }

    #[test]
    fn empty_figure_has_unit_x_range() {
        let fig = Figure::subplots(2, 100, 100, [1.0, 1.0]);
        assert_eq!(fig.x_limits(), (0.0, 1.0));
        assert!(!fig.has_legend());
    }

    #[test]
    fn legend_collects_labelled_lines_only() {
        let mut panel = Panel::new((0.0, 1.0));
        panel
            .add_series(Series::Bars {
                bars: vec![],
                color: Color::BLACK,
            })
            .add_series(Series::Line {
                label: Some("a".into()),
                points: vec![],
                color: Color::cycle(0),
                marker: Marker::Circle,
            });
        panel.legend_from_series(Some("hue".into()));

        let legend = panel.legend.as_ref().unwrap();
        assert_eq!(legend.entries.len(), 1);
        assert_eq!(legend.entries[0].label, "a");
        assert_eq!(panel.line_labels(), vec!["a"]);
    }
}
