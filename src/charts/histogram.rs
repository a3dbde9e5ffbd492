//! Broken Histogram Module
//! Bins a sample collection once and lays it out over a broken y-axis.

use crate::charts::figure::{joint_marks, Bar, Figure, Series, TextSpec, TickSide, XTicks};
use crate::charts::ChartError;
use crate::config::{HistogramOptions, DEFAULT_BREAK_MARK_SIZE};
use thiserror::Error;
use tracing::debug;

/// Figure size in inches (width, height).
const FIGSIZE: (f64, f64) = (6.4, 4.8);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Number of bins must be positive")]
    ZeroBins,
    #[error("Sample range is not finite: {0}")]
    NonFiniteSample(f64),
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges (length = bins + 1).
    pub edges: Vec<f64>,
    /// Bin counts (length = bins).
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `samples` into `bins` equal-width bins spanning their range.
    ///
    /// Each bin is half-open except the last one, which includes its right
    /// edge. A constant sample widens the range to `value ± 0.5`; an empty
    /// sample uses `[0, 1]`.
    pub fn compute(samples: &[f64], bins: usize) -> Result<Self, HistogramError> {
        if bins == 0 {
            return Err(HistogramError::ZeroBins);
        }
        if let Some(bad) = samples.iter().copied().find(|v| !v.is_finite()) {
            return Err(HistogramError::NonFiniteSample(bad));
        }

        let (mut lo, mut hi) = samples
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 1.0));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);

        let mut counts = vec![0u64; bins];
        for &v in samples {
            counts[bin_index(&edges, v, lo, width)] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bars(&self) -> Vec<Bar> {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| Bar {
                left: edge[0],
                right: edge[1],
                height: count as f64,
            })
            .collect()
    }
}

/// Bin holding `v`, consistent with `edges`.
///
/// The arithmetic guess can land one bin off when `v` sits on or next to an
/// edge, so it is moved until `edges[i] <= v < edges[i + 1]`.
fn bin_index(edges: &[f64], v: f64, lo: f64, width: f64) -> usize {
    let last = edges.len() - 2;
    let mut index = (((v - lo) / width) as usize).min(last);
    while index > 0 && v < edges[index] {
        index -= 1;
    }
    while index < last && v >= edges[index + 1] {
        index += 1;
    }
    index
}

/// Build a two-panel broken-axis histogram of `data`.
///
/// The upper panel shows `broken_top..top`, the lower panel
/// `bottom..broken_bottom`; both hold the same bins.
pub fn draw_broken_histogram(
    data: &[f64],
    options: &HistogramOptions,
) -> Result<Figure, ChartError> {
    let histogram = Histogram::compute(data, options.bins)?;
    debug!(
        samples = data.len(),
        bins = histogram.bins(),
        "computed histogram"
    );

    let width = (FIGSIZE.0 * options.dpi).round() as u32;
    let height = (FIGSIZE.1 * options.dpi).round() as u32;
    let mut figure = Figure::subplots(1, width, height, [1.0, 1.0]);

    let bars = Series::Bars {
        bars: histogram.bars(),
        color: options.color,
    };
    let d = DEFAULT_BREAK_MARK_SIZE;
    let pair = &mut figure.columns[0];

    let (lo, hi) = options.breaks.upper();
    pair.top.set_ylim(lo, hi).add_series(bars.clone());
    pair.top.spines.bottom = false;
    pair.top.x_ticks = XTicks {
        side: TickSide::Top,
        labels: false,
    };
    pair.top.break_marks.extend(joint_marks(d, d, true));

    let (lo, hi) = options.breaks.lower();
    pair.bottom.set_ylim(lo, hi).add_series(bars);
    pair.bottom.spines.top = false;
    pair.bottom.x_ticks = XTicks {
        side: TickSide::Bottom,
        labels: true,
    };
    pair.bottom.break_marks.extend(joint_marks(d, d, false));

    figure.texts.title = Some(TextSpec::new(
        &options.title,
        options.title_font_size as f64,
    ));
    figure.texts.y_label = Some(TextSpec::new(&options.y_label, 10.0));
    figure.texts.x_label = Some(TextSpec::new(
        &options.x_label,
        options.x_label_font_size as f64,
    ));

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_bin_includes_maximum() {
        let hist = Histogram::compute(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn constant_sample_widens_range() {
        let hist = Histogram::compute(&[3.0, 3.0], 2).unwrap();
        assert_eq!(hist.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(hist.counts, vec![0, 2]);
    }

    #[test]
    fn empty_sample_uses_unit_range() {
        let hist = Histogram::compute(&[], 2).unwrap();
        assert_eq!(hist.edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn rejects_zero_bins_and_nan() {
        assert_eq!(Histogram::compute(&[1.0], 0), Err(HistogramError::ZeroBins));
        assert!(matches!(
            Histogram::compute(&[1.0, f64::NAN], 3),
            Err(HistogramError::NonFiniteSample(_))
        ));
    }

    #[test]
    fn edge_valued_samples_open_their_bin() {
        let samples: Vec<f64> = (0..=20).map(|i| i as f64 * 0.1).collect();
        let hist = Histogram::compute(&samples, 14).unwrap();
        assert_eq!(hist.edges[7], 0.0 + (2.0 / 14.0) * 7.0);

        let v = 1.1;
        let expected = hist.edges.windows(2).position(|e| e[0] <= v && v < e[1]);
        assert_eq!(
            Some(bin_index(&hist.edges, v, hist.edges[0], 2.0 / 14.0)),
            expected
        );
        assert_eq!(bin_index(&hist.edges, hist.edges[7], 0.0, 2.0 / 14.0), 7);
        assert_eq!(bin_index(&hist.edges, 2.0, 0.0, 2.0 / 14.0), 13);
    }

    proptest! {
        #[test]
        fn every_sample_lands_in_one_bin(
            samples in prop::collection::vec(-1.0e6f64..1.0e6, 0..200),
            bins in 1usize..64,
        ) {
            let hist = Histogram::compute(&samples, bins).unwrap();
            prop_assert_eq!(hist.counts.len(), bins);
            prop_assert_eq!(hist.edges.len(), bins + 1);
            prop_assert_eq!(hist.total(), samples.len() as u64);
            prop_assert!(hist.edges.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn counts_agree_with_edges(
            steps in prop::collection::vec(0u32..40, 1..60),
            bins in 1usize..32,
        ) {
            let samples: Vec<f64> = steps.iter().map(|&s| s as f64 * 0.1).collect();
            let hist = Histogram::compute(&samples, bins).unwrap();
            let last = bins - 1;
            let mut expected = vec![0u64; bins];
            for &v in &samples {
                let index = hist
                    .edges
                    .windows(2)
                    .position(|e| e[0] <= v && v < e[1])
                    .unwrap_or(last);
                expected[index] += 1;
            }
            prop_assert_eq!(hist.counts, expected);
        }
    }
}
