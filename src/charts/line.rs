//! Broken Line Plot Module
//! Facets a dataset into column pairs of broken-axis line plots.

use crate::charts::figure::{joint_marks, Figure, Marker, Series, TextSpec, TickSide, XTicks};
use crate::charts::{ChartError, Color};
use crate::config::LinePlotOptions;
use crate::data::{DataProcessor, FacetGroup};
use polars::prelude::DataFrame;
use tracing::debug;

/// Width of one column pair and height of the figure, in inches.
const COLUMN_WIDTH: f64 = 5.0;
const FIGURE_HEIGHT: f64 = 6.0;

const SUPTITLE_FONT_SIZE: f64 = 16.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const COLUMN_TITLE_FONT_SIZE: f64 = 12.0;

/// Vertical extent of the break marks as `(upper, lower)`.
///
/// Axis-relative units stretch with panel height, so the upper mark is
/// scaled by `lower / upper` height to keep the same slant in both panels.
pub fn break_mark_extents(d: f64, height_ratios: [f64; 2]) -> (f64, f64) {
    (d * (height_ratios[1] / height_ratios[0]), d)
}

/// Build a faceted broken-axis line plot from a DataFrame.
///
/// One column pair per distinct `col` value (ascending), one line per `hue`
/// value within it (first-encounter order). Points are drawn in row order.
pub fn draw_broken_line_plot(
    data: &DataFrame,
    options: &LinePlotOptions,
) -> Result<Figure, ChartError> {
    let groups =
        DataProcessor::prepare_facets(data, &options.x, &options.y, &options.hue, &options.col)?;
    Ok(layout_facets(&groups, options))
}

/// Lay out already grouped facets.
pub fn layout_facets(groups: &[FacetGroup], options: &LinePlotOptions) -> Figure {
    let n_cols = groups.len();
    let width = (COLUMN_WIDTH * n_cols as f64 * options.dpi).round() as u32;
    let height = (FIGURE_HEIGHT * options.dpi).round() as u32;
    let mut figure = Figure::subplots(n_cols, width, height, options.height_ratios);

    let (dy_top, dy_bot) = break_mark_extents(options.d, options.height_ratios);

    for (i, (group, pair)) in groups.iter().zip(figure.columns.iter_mut()).enumerate() {
        debug!(
            facet = %group.facet,
            series = group.series.len(),
            "laying out facet column"
        );

        for (index, series) in group.series.iter().enumerate() {
            if !series.is_x_monotonic() {
                debug!(
                    facet = %group.facet,
                    hue = %series.hue,
                    "series is not ordered by x; drawing in row order"
                );
            }
            let color = Color::cycle(index);
            pair.top.add_series(Series::Line {
                label: Some(series.hue.label.clone()),
                points: series.points.clone(),
                color,
                marker: Marker::Circle,
            });
            pair.bottom.add_series(Series::Line {
                label: None,
                points: series.points.clone(),
                color,
                marker: Marker::Circle,
            });
        }

        let (lo, hi) = options.breaks.upper();
        pair.top.set_ylim(lo, hi);
        let (lo, hi) = options.breaks.lower();
        pair.bottom.set_ylim(lo, hi);

        pair.top.spines.bottom = false;
        pair.bottom.spines.top = false;
        pair.top.x_ticks = XTicks {
            side: TickSide::Hidden,
            labels: false,
        };

        pair.top
            .break_marks
            .extend(joint_marks(options.d, dy_top, true));
        pair.bottom
            .break_marks
            .extend(joint_marks(options.d, dy_bot, false));

        pair.top.title = Some(
            TextSpec::new(
                format!("{}: {}", options.col, group.facet),
                COLUMN_TITLE_FONT_SIZE,
            )
            .bold(),
        );

        if i == n_cols - 1 {
            pair.top.legend_from_series(Some(options.hue.clone()));
        }
    }

    figure.texts.title = Some(TextSpec::new(&options.main_title, SUPTITLE_FONT_SIZE));
    figure.texts.x_label = Some(TextSpec::new(&options.x_label, LABEL_FONT_SIZE));
    figure.texts.y_label = Some(TextSpec::new(&options.y_label, LABEL_FONT_SIZE));

    figure
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn upper_marks_scale_with_height_ratio() {
        let (top, bottom) = break_mark_extents(0.01, [2.0, 1.0]);
        assert_relative_eq!(top, 0.005);
        assert_relative_eq!(bottom, 0.01);

        let (top, bottom) = break_mark_extents(0.02, [1.0, 3.0]);
        assert_relative_eq!(top, 0.06);
        assert_relative_eq!(bottom, 0.02);
    }

    #[test]
    fn equal_ratios_leave_marks_unscaled() {
        assert_eq!(break_mark_extents(0.01, [1.0, 1.0]), (0.01, 0.01));
    }
}
