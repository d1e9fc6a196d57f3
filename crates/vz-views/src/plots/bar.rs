//! Bar charts

use std::collections::BTreeMap;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use super::utils::colors::categorical_color;
use super::utils::{plot_error, slot_label, Series, XySeries, AXIS_LIMIT};
use crate::chart::{ColumnRole, ValidatedChart};

/// Sum the values of rows sharing a label slot
pub fn aggregate_slots(series: &Series) -> BTreeMap<usize, f64> {
    let mut slots = BTreeMap::new();
    for &(x, y) in series.points.iter().filter(|(_, y)| y.is_finite()) {
        *slots.entry(x as usize).or_insert(0.0) += y;
    }
    // Sums can still overflow
    slots.retain(|_, total: &mut f64| total.is_finite());
    if slots.len() < series.points.len() {
        debug!(
            "Summed {} rows of series '{}' into {} bars",
            series.points.len(),
            series.name,
            slots.len()
        );
    }
    slots
}

/// Draw one bar per label, grouped side by side when there are several series
pub fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ValidatedChart,
    data: &XySeries,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let labels = data.x_labels.as_deref().unwrap_or_default();
    let groups: Vec<BTreeMap<usize, f64>> = data.series.iter().map(aggregate_slots).collect();

    let (low, high) = groups
        .iter()
        .flat_map(|g| g.values().copied())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let margin = high * 0.05 - low * 0.05;
    let margin = if margin > 0.0 { margin } else { 0.05 };
    let bottom = if low < 0.0 { (low - margin).max(-AXIS_LIMIT) } else { 0.0 };
    let y_range = bottom..(high + margin).min(AXIS_LIMIT);
    let x_range = -0.5..(labels.len().max(1) as f64 - 0.5);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    let format_x = |x: &f64| slot_label(labels, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.column(ColumnRole::X).unwrap_or_default())
        .y_desc(chart.column(ColumnRole::Y).unwrap_or_default())
        .x_labels(labels.len().clamp(2, 20))
        .x_label_formatter(&format_x)
        .draw()
        .map_err(plot_error)?;

    let width = 0.8 / groups.len().max(1) as f64;
    for (idx, (series, slots)) in data.series.iter().zip(&groups).enumerate() {
        let color = categorical_color(idx);
        let offset = -0.4 + idx as f64 * width;
        ctx.draw_series(slots.iter().map(|(&slot, &value)| {
            let left = slot as f64 + offset;
            Rectangle::new([(left, 0.0), (left + width, value)], color.filled())
        }))
        .map_err(plot_error)?
        .label(series.name.clone())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    if data.series.len() > 1 {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_error)?;
    }

    root.present().map_err(plot_error)?;
    Ok(())
}
