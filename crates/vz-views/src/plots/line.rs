//! Line charts

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::utils::colors::categorical_color;
use super::utils::{padded_range, plot_error, slot_label, XySeries};
use crate::chart::{ColumnRole, ValidatedChart};

/// Draw one line per series, with point markers
pub fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ValidatedChart,
    data: &XySeries,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let x_labels = data.x_labels.as_deref();
    let x_range = match x_labels {
        Some(labels) => -0.5..(labels.len().max(1) as f64 - 0.5),
        None => padded_range(data.series.iter().flat_map(|s| s.points.iter().map(|p| p.0))),
    };
    let y_range = padded_range(data.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    let format_x = |x: &f64| match x_labels {
        Some(labels) => slot_label(labels, *x),
        None => format!("{x}"),
    };
    {
        let mut mesh = ctx.configure_mesh();
        mesh.x_desc(chart.column(ColumnRole::X).unwrap_or_default())
            .y_desc(chart.column(ColumnRole::Y).unwrap_or_default());
        if let Some(labels) = x_labels {
            mesh.x_labels(labels.len().clamp(2, 20)).x_label_formatter(&format_x);
        }
        mesh.draw().map_err(plot_error)?;
    }

    for (idx, series) in data.series.iter().enumerate() {
        let color = categorical_color(idx);
        ctx.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(plot_error)?
        .label(series.name.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        ctx.draw_series(
            series
                .points
                .iter()
                .map(|&point| Circle::new(point, 3, color.filled())),
        )
        .map_err(plot_error)?;
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
