//! Histograms

use anyhow::{bail, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use statrs::statistics::Statistics;
use tracing::warn;

use super::utils::colors::HISTOGRAM_FILL;
use super::utils::plot_error;
use crate::chart::{ColumnRole, ValidatedChart};

/// One histogram bin; the last bin includes its upper edge
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Summary shown in the histogram caption
#[derive(Debug, Clone, PartialEq)]
pub struct DataStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl DataStatistics {
    pub fn from_values(values: &[f64]) -> Self {
        let std_dev = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };
        Self {
            count: values.len(),
            mean: values.iter().mean(),
            std_dev,
        }
    }
}

/// Split the finite `values` into `num_bins` equal-width bins
pub fn compute_bins(values: &[f64], num_bins: usize) -> Vec<Bin> {
    let values = finite_values(values);
    if values.is_empty() {
        return Vec::new();
    }
    let num_bins = num_bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (min, max) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    // Divided first so extreme but finite spans do not overflow
    let bin_width = max / num_bins as f64 - min / num_bins as f64;

    let mut bins: Vec<Bin> = (0..num_bins)
        .map(|i| Bin {
            start: min + i as f64 * bin_width,
            end: if i + 1 == num_bins {
                max
            } else {
                min + (i + 1) as f64 * bin_width
            },
            count: 0,
        })
        .collect();

    for value in values {
        let idx = (((value - min) / bin_width) as usize).min(num_bins - 1);
        bins[idx].count += 1;
    }

    bins
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

pub fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ValidatedChart,
    values: &[f64],
    num_bins: usize,
) -> Result<()> {
    let finite = finite_values(values);
    if finite.len() < values.len() {
        warn!("Skipping {} non-finite values", values.len() - finite.len());
    }
    if finite.is_empty() {
        bail!("no finite values to plot");
    }
    let values = finite;
    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(high - low).is_finite() {
        bail!("value range {low}..{high} is too wide to plot");
    }
    root.fill(&WHITE).map_err(plot_error)?;

    let bins = compute_bins(&values, num_bins);
    let stats = DataStatistics::from_values(&values);
    let x_range = bins.first().map_or(0.0, |b| b.start)..bins.last().map_or(1.0, |b| b.end);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);

    let caption = format!(
        "{} (n={}, mean={:.2}, std={:.2})",
        chart.title, stats.count, stats.mean, stats.std_dev
    );
    let mut ctx = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..(max_count as f64 * 1.1))
        .map_err(plot_error)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.column(ColumnRole::Value).unwrap_or_default())
        .y_desc("Frequency")
        .draw()
        .map_err(plot_error)?;

    ctx.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            HISTOGRAM_FILL.mix(0.7).filled(),
        )
    }))
    .map_err(plot_error)?;
    ctx.draw_series(bins.iter().map(|bin| {
        Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLACK.stroke_width(1))
    }))
    .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}
