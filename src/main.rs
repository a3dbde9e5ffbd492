//! broken-axis - render broken y-axis charts from CSV data.
//!
//! Charts are displayed in a window unless `--output` names a PNG/SVG file.

use anyhow::{bail, Context, Result};
use broken_axis::config::{HistogramChart, LineChart};
use broken_axis::{
    draw_broken_histogram, draw_broken_line_plot, telemetry, AxisBreak, ChartConfig, Color,
    DataLoader, DataProcessor, Figure, HistogramOptions, LinePlotOptions,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "broken-axis")]
#[command(about = "Render broken y-axis histograms and line plots from CSV data")]
struct Cli {
    /// Log filter, e.g. "debug" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Histogram of one numeric column
    Hist(HistArgs),
    /// Faceted line plot
    Line(LineArgs),
    /// Chart described by a JSON file
    Render {
        /// Chart document (JSON)
        #[arg(long)]
        config: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct BreakArgs {
    #[arg(long, allow_negative_numbers = true)]
    bottom: f64,
    #[arg(long, allow_negative_numbers = true)]
    broken_bottom: f64,
    #[arg(long, allow_negative_numbers = true)]
    broken_top: f64,
    #[arg(long, allow_negative_numbers = true)]
    top: f64,
}

impl From<&BreakArgs> for AxisBreak {
    fn from(args: &BreakArgs) -> Self {
        AxisBreak::new(args.bottom, args.broken_bottom, args.broken_top, args.top)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Viewer {
    /// Native window
    Window,
    /// Operating system image viewer
    System,
}

#[derive(Args)]
struct OutputArgs {
    /// Write the chart to this PNG/SVG file instead of displaying it
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Viewer::Window)]
    viewer: Viewer,
}

#[derive(Args)]
struct HistArgs {
    /// CSV file
    #[arg(long)]
    csv: PathBuf,
    /// Numeric column holding the samples
    #[arg(long)]
    column: String,
    #[command(flatten)]
    breaks: BreakArgs,
    #[arg(long)]
    bins: usize,
    #[arg(long, default_value = "C0")]
    color: Color,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    x_label: String,
    #[arg(long, default_value = "")]
    y_label: String,
    #[arg(long, default_value_t = 14)]
    title_font_size: u32,
    #[arg(long, default_value_t = 12)]
    x_label_font_size: u32,
    #[command(flatten)]
    output: OutputArgs,
}

impl HistArgs {
    fn chart(&self) -> HistogramChart {
        let mut options = HistogramOptions::new((&self.breaks).into(), self.bins, self.color)
            .labels(&self.title, &self.x_label, &self.y_label);
        options.title_font_size = self.title_font_size;
        options.x_label_font_size = self.x_label_font_size;
        HistogramChart {
            csv: self.csv.clone(),
            column: self.column.clone(),
            options,
        }
    }
}

#[derive(Args)]
struct LineArgs {
    /// CSV file
    #[arg(long)]
    csv: PathBuf,
    #[arg(long)]
    x: String,
    #[arg(long)]
    y: String,
    /// Column whose values get one line (and color) each
    #[arg(long)]
    hue: String,
    /// Column whose values get one panel pair each
    #[arg(long)]
    col: String,
    #[command(flatten)]
    breaks: BreakArgs,
    #[arg(long, default_value = "")]
    x_label: String,
    #[arg(long, default_value = "")]
    y_label: String,
    #[arg(long, default_value = "")]
    main_title: String,
    /// Break mark size (axis fraction)
    #[arg(long, default_value_t = 0.01)]
    d: f64,
    /// Upper and lower panel height ratio, e.g. "2,1"
    #[arg(long, value_delimiter = ',', default_values_t = vec![1.0, 1.0])]
    height_ratios: Vec<f64>,
    #[command(flatten)]
    output: OutputArgs,
}

impl LineArgs {
    fn chart(&self) -> Result<LineChart> {
        let [upper, lower] = self.height_ratios.as_slice() else {
            bail!(
                "--height-ratios takes exactly two values, got {}",
                self.height_ratios.len()
            );
        };
        let options = LinePlotOptions::new(
            &self.x,
            &self.y,
            &self.hue,
            &self.col,
            (&self.breaks).into(),
        )
        .labels(&self.x_label, &self.y_label, &self.main_title)
        .height_ratios(*upper, *lower)
        .break_mark_size(self.d);
        Ok(LineChart {
            csv: self.csv.clone(),
            options,
        })
    }
}

fn build_figure(config: &ChartConfig) -> Result<Figure> {
    let path = config.csv_path();
    let df = DataLoader::load_csv(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let figure = match config {
        ChartConfig::Histogram(chart) => {
            let samples = DataProcessor::numeric_values(&df, &chart.column)
                .with_context(|| format!("Column '{}'", chart.column))?;
            draw_broken_histogram(&samples, &chart.options)?
        }
        ChartConfig::Line(chart) => draw_broken_line_plot(&df, &chart.options)?,
    };
    Ok(figure)
}

fn present(figure: &Figure, output: &OutputArgs) -> Result<()> {
    if let Some(path) = &output.output {
        figure
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "chart written");
        return Ok(());
    }

    match output.viewer {
        Viewer::Window => figure.show()?,
        Viewer::System => {
            figure.open_in_system_viewer()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_level.as_deref());

    let (config, output) = match &cli.command {
        Command::Hist(args) => (ChartConfig::Histogram(args.chart()), &args.output),
        Command::Line(args) => (ChartConfig::Line(args.chart()?), &args.output),
        Command::Render { config, output } => (
            ChartConfig::load(config)
                .with_context(|| format!("Failed to read {}", config.display()))?,
            output,
        ),
    };

    let figure = build_figure(&config)?;
    present(&figure, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hist_arguments_map_to_options() {
        let cli = Cli::try_parse_from([
            "broken-axis", "hist", "--csv", "d.csv", "--column", "v",
            "--bottom", "-1", "--broken-bottom", "5", "--broken-top", "45", "--top", "55",
            "--bins", "10", "--color", "tab:red", "--title", "T",
        ])
        .unwrap();

        let Command::Hist(args) = cli.command else {
            panic!("expected hist");
        };
        let chart = args.chart();
        assert_eq!(chart.column, "v");
        assert_eq!(chart.options.breaks, AxisBreak::new(-1.0, 5.0, 45.0, 55.0));
        assert_eq!(chart.options.color, "tab:red".parse::<Color>().unwrap());
        assert_eq!(chart.options.title_font_size, 14);
        assert!(args.output.output.is_none());
    }

    #[test]
    fn line_arguments_parse_height_ratios() {
        let cli = Cli::try_parse_from([
            "broken-axis", "line", "--csv", "d.csv", "--x", "step", "--y", "loss",
            "--hue", "model", "--col", "set",
            "--bottom", "0", "--broken-bottom", "1", "--broken-top", "9", "--top", "10",
            "--height-ratios", "2,1", "--output", "out.svg",
        ])
        .unwrap();

        let Command::Line(args) = cli.command else {
            panic!("expected line");
        };
        let chart = args.chart().unwrap();
        assert_eq!(chart.options.height_ratios, [2.0, 1.0]);
        assert_eq!(chart.options.d, 0.01);
        assert_eq!(args.output.output, Some(PathBuf::from("out.svg")));
    }

    #[test]
    fn wrong_number_of_height_ratios_is_rejected() {
        let cli = Cli::try_parse_from([
            "broken-axis", "line", "--csv", "d.csv", "--x", "a", "--y", "b",
            "--hue", "c", "--col", "e",
            "--bottom", "0", "--broken-bottom", "1", "--broken-top", "9", "--top", "10",
            "--height-ratios", "1,2,3",
        ])
        .unwrap();

        let Command::Line(args) = cli.command else {
            panic!("expected line");
        };
        assert!(args.chart().is_err());
    }
}
