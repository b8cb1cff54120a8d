//! Bar chart of per-sheet totals via plotters.

use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

use crate::report::Report;

const CHART_WIDTH: u32 = 900;
const CHART_HEIGHT: u32 = 600;

/// Render one bar per sheet, labeled by sheet name; the bar height is the
/// sum of that sheet's per-column results.
pub fn write_totals_chart(report: &Report, path: &Path) -> Result<()> {
    let totals = report.sheet_totals();
    let labels: Vec<String> = totals.iter().map(|(name, _)| name.clone()).collect();
    let n = totals.len().max(1);

    let max = totals.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let min = totals.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let y_top = if max > 0.0 { max * 1.1 } else { 1.0 };
    let y_bottom = if min < 0.0 { min * 1.1 } else { 0.0 };

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Sheet totals", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), y_bottom..y_top)
        .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc("Sheet")
        .y_desc("Total")
        .draw()
        .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.6).filled())
                .margin(10)
                .data(totals.iter().enumerate().map(|(i, (_, v))| (i, *v))),
        )
        .map_err(|e| anyhow!("failed to draw chart bars: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("failed to write chart image: {e}"))?;
    Ok(())
}
