//! Drawing routines, one per chart file.

use crate::analysis::{self, Bin, CrossCell};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::Path;

type DrawResult = Result<(), Box<dyn Error>>;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 32;
const LABEL_SIZE: u32 = 22;

/// Default line and bar colour.
const BLUE_C0: RGBColor = RGBColor(31, 119, 180);
/// Bar colours of the two hue levels.
const HUE: [RGBColor; 2] = [RGBColor(76, 114, 176), RGBColor(221, 132, 82)];
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

/// Legend heading of the scatter chart, followed by one entry per outcome.
pub(crate) const SURVIVED_LEGEND_TITLE: &str = "Survived";
pub(crate) const SURVIVED_LEGEND: [(bool, &str, RGBColor); 2] =
    [(false, "No", RED), (true, "Yes", DARK_GREEN)];

fn canvas(
    path: &Path,
    size: (u32, u32),
) -> Result<DrawingArea<BitMapBackend<'_>, Shift>, Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Upper y bound with some head room.
fn headroom(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Split a series with gaps into contiguous runs.
pub(crate) fn contiguous_runs(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for &(x, y) in points {
        match y {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Line chart of the mean fare per age bin, plotted at each bin's lower edge.
pub fn fare_by_age(path: &Path, bins: &[Bin]) -> DrawResult {
    let root = canvas(path, (1200, 600))?;

    let points: Vec<(f64, Option<f64>)> = bins.iter().map(|b| (b.lower, b.mean)).collect();
    let y_max = headroom(bins.iter().filter_map(|b| b.mean).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Fare by Age Group", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..80f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(9)
        .x_desc("Age Range")
        .y_desc("Average Fare ($)")
        .axis_desc_style((FONT, LABEL_SIZE))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    for run in contiguous_runs(&points) {
        chart.draw_series(LineSeries::new(run, BLUE_C0.stroke_width(2)))?;
    }

    chart.draw_series(
        points
            .iter()
            .filter_map(|&(x, y)| y.map(|y| Circle::new((x, y), 5, BLUE_C0.filled()))),
    )?;

    root.present()?;
    Ok(())
}

/// Bar chart of survival percentage per class, labelled with the value.
pub fn survival_by_class(path: &Path, rates: &[(String, f64)]) -> DrawResult {
    let root = canvas(path, (1000, 600))?;
    let names: Vec<&str> = rates.iter().map(|(name, _)| name.as_str()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Survival Rate by Passenger Class", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..names.len() as u32).into_segmented(), 0f64..100f64)?;

    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => names.get(*i as usize).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&label)
        .x_desc("Passenger Class")
        .y_desc("Survival Rate (%)")
        .axis_desc_style((FONT, LABEL_SIZE))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(HUE[0].filled())
            .margin(30)
            .data(rates.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
    )?;

    let text_style = TextStyle::from((FONT, 18).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    chart.draw_series(rates.iter().enumerate().map(|(i, (_, v))| {
        Text::new(
            format!("{:.1}%", v),
            (SegmentValue::CenterOf(i as u32), v + 2.0),
            text_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Histogram of ages with a density curve scaled to counts.
pub fn age_distribution(
    path: &Path,
    hist: &analysis::Histogram,
    kde: &[(f64, f64)],
    n: usize,
) -> DrawResult {
    let root = canvas(path, (1200, 600))?;

    let x_lo = hist.edges.first().copied().unwrap_or(0.0);
    let x_hi = hist.edges.last().copied().unwrap_or(1.0);
    let scale = n as f64 * hist.bin_width();
    let curve: Vec<(f64, f64)> = kde.iter().map(|&(x, d)| (x, d * scale)).collect();
    let y_max = headroom(
        curve
            .iter()
            .map(|&(_, y)| y)
            .fold(hist.max_count() as f64, f64::max),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Passenger Ages", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Age")
        .y_desc("Count")
        .axis_desc_style((FONT, LABEL_SIZE))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let bars = hist.edges.windows(2).zip(&hist.counts);
    chart.draw_series(
        bars.clone()
            .map(|(w, &c)| Rectangle::new([(w[0], 0.0), (w[1], c as f64)], HUE[0].mix(0.6).filled())),
    )?;
    chart.draw_series(
        bars.map(|(w, &c)| Rectangle::new([(w[0], 0.0), (w[1], c as f64)], WHITE.stroke_width(1))),
    )?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, HUE[0].stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

/// Scatter of fare against age, coloured by survival.
pub fn fare_vs_age(path: &Path, points: &[(f64, f64, bool)]) -> DrawResult {
    let root = canvas(path, (1200, 800))?;

    let x_max = headroom(points.iter().map(|p| p.0).fold(0.0, f64::max));
    let y_max = headroom(points.iter().map(|p| p.1).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(&root)
        .caption("Fare vs. Age Colored by Survival", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Age")
        .y_desc("Fare ($)")
        .axis_desc_style((FONT, LABEL_SIZE))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    // Marker-less entry acting as the legend title.
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
        .label(SURVIVED_LEGEND_TITLE)
        .legend(|(x, y)| Circle::new((x, y), 0, TRANSPARENT.filled()));

    for (survived, label, color) in SURVIVED_LEGEND {
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| p.2 == survived)
                    .map(|&(x, y, _)| Circle::new((x, y), 6, color.mix(0.7).filled())),
            )?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 6, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 18))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Grouped bars of mean survival per class, one bar per sex, with 95%
/// confidence whiskers.
pub fn survival_by_class_sex(path: &Path, cells: &[CrossCell]) -> DrawResult {
    let root = canvas(path, (1200, 600))?;

    let mut outers: Vec<&str> = cells.iter().map(|c| c.outer.as_str()).collect();
    outers.dedup();
    let mut inners: Vec<&str> = cells.iter().map(|c| c.inner.as_str()).collect();
    inners.sort_unstable();
    inners.dedup();

    let n = outers.len().max(1);
    let y_max = cells
        .iter()
        .map(|c| c.ci.map_or(c.mean, |(_, hi)| hi))
        .fold(1.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Survival Rate by Class and Sex", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max * 1.05)?;

    let label = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 {
            outers.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label)
        .x_desc("Passenger Class")
        .y_desc("Survival Rate")
        .axis_desc_style((FONT, LABEL_SIZE))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let group_width = 0.8;
    let bar_width = group_width / inners.len().max(1) as f64;

    for (j, inner) in inners.iter().enumerate() {
        let color = HUE[j % HUE.len()];
        let bars: Vec<(f64, &CrossCell)> = cells
            .iter()
            .filter(|c| c.inner == *inner)
            .filter_map(|c| {
                let i = outers.iter().position(|o| *o == c.outer)?;
                Some((i as f64 - group_width / 2.0 + bar_width * j as f64, c))
            })
            .collect();

        chart
            .draw_series(bars.iter().map(|(left, c)| {
                Rectangle::new([(*left, 0.0), (left + bar_width, c.mean)], color.filled())
            }))?
            .label(*inner)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));

        chart.draw_series(bars.iter().filter_map(|(left, c)| {
            let (lo, hi) = c.ci?;
            Some(ErrorBar::new_vertical(
                left + bar_width / 2.0,
                lo.max(0.0),
                c.mean,
                hi,
                BLACK.stroke_width(2),
                10,
            ))
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 18))
        .draw()?;

    root.present()?;
    Ok(())
}
