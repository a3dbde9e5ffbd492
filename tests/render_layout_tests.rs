use broken_axis::charts::{FigureLayout, RenderError};
use broken_axis::{
    draw_broken_histogram, draw_broken_line_plot, AxisBreak, ChartError, Color, HistogramOptions,
    LinePlotOptions,
};
use polars::prelude::*;
use std::fs;

fn line_figure(height_ratios: [f64; 2], facets: &[&str]) -> broken_axis::Figure {
    let n = facets.len();
    let df = df!(
        "x" => (0..n).map(|i| i as f64).collect::<Vec<_>>(),
        "y" => vec![1.0; n],
        "h" => vec!["a"; n],
        "c" => facets.to_vec()
    )
    .unwrap();
    let opts = LinePlotOptions::new("x", "y", "h", "c", AxisBreak::new(0.0, 2.0, 8.0, 10.0))
        .labels("x", "y", "title")
        .height_ratios(height_ratios[0], height_ratios[1]);
    draw_broken_line_plot(&df, &opts).unwrap()
}

#[test]
fn panel_heights_follow_height_ratios() {
    let figure = line_figure([2.0, 1.0], &["a"]);
    let layout = FigureLayout::compute(&figure);

    let [upper, lower] = layout.panels[0];
    let ratio = upper.h as f64 / lower.h as f64;
    assert!((ratio - 2.0).abs() < 0.05, "ratio was {ratio}");
    assert!(upper.bottom() < lower.y);
    assert_eq!(upper.x, lower.x);
    assert_eq!(upper.w, lower.w);
}

#[test]
fn columns_are_laid_out_left_to_right() {
    let figure = line_figure([1.0, 1.0], &["a", "b", "c"]);
    let layout = FigureLayout::compute(&figure);

    assert_eq!(layout.panels.len(), 3);
    for pair in layout.panels.windows(2) {
        assert!(pair[0][0].right() < pair[1][0].x);
    }
    let last = layout.panels[2][0];
    assert!(last.right() <= figure.width as i32);
}

#[test]
fn legend_sits_right_of_last_column() {
    let figure = line_figure([1.0, 1.0], &["a", "b"]);
    let layout = FigureLayout::compute(&figure);

    let (legend_x, legend_y) = layout.legend_anchor.unwrap();
    assert!(legend_x > layout.panels[1][0].right());
    assert_eq!(legend_y, layout.panels[1][0].y);
    assert!(legend_x < figure.width as i32);
}

#[test]
fn histogram_layout_has_no_legend_band() {
    let opts = HistogramOptions::new(AxisBreak::new(0.0, 5.0, 45.0, 55.0), 10, Color::BLACK)
        .labels("t", "x", "y");
    let figure = draw_broken_histogram(&[1.0, 2.0, 50.0], &opts).unwrap();
    let layout = figure.layout();

    assert!(layout.legend_anchor.is_none());
    assert!(layout.title_anchor.is_some());
    assert!(layout.y_label_anchor.unwrap().0 < layout.panels[0][0].x);
    assert!(layout.x_label_anchor.unwrap().1 > layout.panels[0][1].bottom());
}

#[test]
fn empty_labels_reserve_no_text_bands() {
    let opts = HistogramOptions::new(AxisBreak::new(0.0, 5.0, 45.0, 55.0), 10, Color::BLACK);
    let figure = draw_broken_histogram(&[1.0], &opts).unwrap();
    let layout = figure.layout();

    assert!(layout.title_anchor.is_none());
    assert!(layout.x_label_anchor.is_none());
    assert!(layout.y_label_anchor.is_none());
}

fn histogram_figure() -> broken_axis::Figure {
    let opts = HistogramOptions::new(AxisBreak::new(0.0, 5.0, 45.0, 55.0), 10, Color::cycle(0))
        .labels("Latency", "ms", "count");
    draw_broken_histogram(&[1.0, 2.0, 2.0, 3.0, 50.0, 51.0, 52.0], &opts).unwrap()
}

#[test]
fn renders_png_bytes() {
    let png = histogram_figure().to_png_bytes().unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn saves_histogram_as_png_and_svg() {
    let dir = tempfile::tempdir().unwrap();
    let figure = histogram_figure();

    let png = dir.path().join("hist.png");
    figure.save(&png).unwrap();
    let decoded = image::open(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (640, 480));

    let svg = dir.path().join("hist.SVG");
    figure.save(&svg).unwrap();
    let text = fs::read_to_string(&svg).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("Latency"));
}

#[test]
fn saves_single_facet_line_plot() {
    let dir = tempfile::tempdir().unwrap();
    let figure = line_figure([2.0, 1.0], &["only"]);

    let svg = dir.path().join("line.svg");
    figure.save(&svg).unwrap();
    let text = fs::read_to_string(&svg).unwrap();
    assert!(text.contains("c: only"));

    let png = dir.path().join("line.png");
    figure.save(&png).unwrap();
    let decoded = image::open(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 600));
}

#[test]
fn inverted_breakpoints_still_render() {
    let df = df!(
        "x" => [1.0, 2.0, 3.0],
        "y" => [9.0, 1.0, 5.0],
        "h" => ["a", "b", "a"],
        "c" => ["k", "k", "k"]
    )
    .unwrap();
    let opts = LinePlotOptions::new("x", "y", "h", "c", AxisBreak::new(10.0, 8.0, 2.0, 0.0))
        .labels("x", "y", "inverted");
    let figure = draw_broken_line_plot(&df, &opts).unwrap();
    assert_eq!(figure.axes(0, 0).unwrap().y_limits, (2.0, 0.0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inverted.png");
    figure.save(&path).unwrap();
    assert!(fs::metadata(&path).unwrap().len() > 0);

    let hist = draw_broken_histogram(
        &[1.0, 50.0],
        &HistogramOptions::new(AxisBreak::new(5.0, 0.0, 55.0, 45.0), 4, Color::BLACK),
    )
    .unwrap();
    assert_eq!(&hist.to_png_bytes().unwrap()[1..4], b"PNG");
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = histogram_figure().save(dir.path().join("hist.bmp")).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Render(RenderError::UnsupportedFormat(ext)) if ext == "bmp"
    ));
}
