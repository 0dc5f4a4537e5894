//! Plotly chart builders for the report sections.
//!
//! Builders take already-aggregated data and return a [`Plot`]; the
//! orchestration decides file names and sizes. Horizontal category charts
//! reverse their input order because plotly draws the first category at the
//! bottom while the report reads top-down.

use std::path::Path;

use plotly::common::{
    ColorScale, ColorScalePalette, DashType, Font, Line, Marker, Mode, Orientation, Position,
    Title,
};
use plotly::layout::{Annotation, Axis, Layout};
use plotly::{Bar, BoxPlot, HeatMap, ImageFormat, Plot, Scatter};

use crate::analysis::stats::LinearFit;

/// Main palette of the report, darkest first.
pub const PALETTE: [&str; 4] = ["#1B263B", "#415A77", "#778DA9", "#E0E1DD"];

/// Two-tone palette reserved for the on-time delivery charts.
pub const ON_TIME_PALETTE: [&str; 2] = ["#E69F00", "#56B4E9"];

/// Pixel size for square-ish figures.
pub const SIZE_SMALL: (usize, usize) = (1000, 800);

/// Pixel size for wide figures.
pub const SIZE_WIDE: (usize, usize) = (1200, 800);

/// Exports a plot as a PNG via the kaleido backend.
pub fn write_png(plot: &Plot, path: &Path, size: (usize, usize)) {
    plot.write_image(path, ImageFormat::PNG, size.0, size.1, 1.0);
}

/// Horizontal bar chart of category counts, largest at the top.
pub fn horizontal_count_bar(
    title: &str,
    x_label: &str,
    y_label: &str,
    counts: &[(String, usize)],
) -> Plot {
    let mut labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    let mut values: Vec<usize> = counts.iter().map(|(_, count)| *count).collect();
    labels.reverse();
    values.reverse();

    let colors = cycled_palette(&PALETTE, labels.len());
    let trace = Bar::new(values, labels)
        .orientation(Orientation::Horizontal)
        .marker(Marker::new().color_array(colors));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        base_layout(title)
            .x_axis(Axis::new().title(Title::with_text(x_label)))
            .y_axis(Axis::new().title(Title::with_text(y_label))),
    );
    plot
}

/// Vertical bar chart of category counts, label-sorted input order kept.
pub fn vertical_count_bar(
    title: &str,
    y_label: &str,
    counts: &[(String, usize)],
    palette: &[&'static str],
) -> Plot {
    let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    let values: Vec<usize> = counts.iter().map(|(_, count)| *count).collect();

    let colors = cycled_palette(palette, labels.len());
    let trace = Bar::new(labels, values).marker(Marker::new().color_array(colors));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(base_layout(title).y_axis(Axis::new().title(Title::with_text(y_label))));
    plot
}

/// Horizontal bar chart of per-category values, first entry at the top.
pub fn horizontal_value_bar(title: &str, x_label: &str, entries: &[(String, f64)]) -> Plot {
    let mut labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
    let mut values: Vec<f64> = entries.iter().map(|(_, value)| *value).collect();
    labels.reverse();
    values.reverse();

    let colors = cycled_palette(&PALETTE, labels.len());
    let trace = Bar::new(values, labels)
        .orientation(Orientation::Horizontal)
        .marker(Marker::new().color_array(colors));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(base_layout(title).x_axis(Axis::new().title(Title::with_text(x_label))));
    plot
}

/// Vertical bar chart of per-category values.
pub fn vertical_value_bar(title: &str, y_label: &str, entries: &[(String, f64)]) -> Plot {
    let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
    let values: Vec<f64> = entries.iter().map(|(_, value)| *value).collect();

    let colors = cycled_palette(&PALETTE, labels.len());
    let trace = Bar::new(labels, values).marker(Marker::new().color_array(colors));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(base_layout(title).y_axis(Axis::new().title(Title::with_text(y_label))));
    plot
}

/// Box plot of values grouped by category, one box per group.
pub fn grouped_box_plot(title: &str, y_label: &str, groups: &[String], values: &[f64]) -> Plot {
    let trace = BoxPlot::new_xy(groups.to_vec(), values.to_vec())
        .marker(Marker::new().color(PALETTE[0]));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(base_layout(title).y_axis(Axis::new().title(Title::with_text(y_label))));
    plot
}

/// Scatter of observations with a fitted least-squares line drawn across the
/// observed x range. Degenerate inputs render the markers alone.
pub fn regression_scatter(
    title: &str,
    x_label: &str,
    y_label: &str,
    x: &[f64],
    y: &[f64],
    color: &'static str,
) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(x.to_vec(), y.to_vec())
            .mode(Mode::Markers)
            .marker(Marker::new().color(color)),
    );

    if let Some(fit) = LinearFit::fit(x, y) {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for value in x {
            lo = lo.min(*value);
            hi = hi.max(*value);
        }
        plot.add_trace(
            Scatter::new(vec![lo, hi], vec![fit.predict(lo), fit.predict(hi)])
                .mode(Mode::Lines)
                .line(Line::new().color(color)),
        );
    }

    plot.set_layout(
        base_layout(title)
            .x_axis(Axis::new().title(Title::with_text(x_label)))
            .y_axis(Axis::new().title(Title::with_text(y_label)))
            .show_legend(false),
    );
    plot
}

/// Annotated correlation heatmap.
pub fn annotated_heatmap(
    title: &str,
    labels: &[String],
    values: &[Vec<f64>],
    palette: ColorScalePalette,
) -> Plot {
    let trace = HeatMap::new(labels.to_vec(), labels.to_vec(), values.to_vec())
        .color_scale(ColorScale::Palette(palette));

    let mut annotations = Vec::new();
    for (row, y_label) in values.iter().zip(labels) {
        for (value, x_label) in row.iter().zip(labels) {
            annotations.push(
                Annotation::new()
                    .x(x_label.clone())
                    .y(y_label.clone())
                    .text(format!("{value:.2}"))
                    .show_arrow(false),
            );
        }
    }

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(base_layout(title).annotations(annotations));
    plot
}

/// Actual yearly totals with markers plus a dashed forecast line.
pub fn forecast_chart(title: &str, actual: &[(i32, f64)], forecast: &[(i32, f64)]) -> Plot {
    let (actual_years, actual_totals): (Vec<i32>, Vec<f64>) = actual.iter().copied().unzip();
    let (forecast_years, forecast_totals): (Vec<i32>, Vec<f64>) =
        forecast.iter().copied().unzip();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(actual_years, actual_totals)
            .mode(Mode::LinesMarkers)
            .name("Actual")
            .marker(Marker::new().color(PALETTE[0])),
    );
    plot.add_trace(
        Scatter::new(forecast_years, forecast_totals)
            .mode(Mode::Lines)
            .name("Forecast")
            .line(Line::new().color(PALETTE[1]).dash(DashType::Dash)),
    );
    plot.set_layout(base_layout(title));
    plot
}

/// Scatter with a text label beside each point.
pub fn labelled_scatter(
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64, String)],
) -> Plot {
    let x: Vec<f64> = points.iter().map(|(x, _, _)| *x).collect();
    let y: Vec<f64> = points.iter().map(|(_, y, _)| *y).collect();
    let text: Vec<String> = points.iter().map(|(_, _, label)| label.clone()).collect();

    let trace = Scatter::new(x, y)
        .mode(Mode::MarkersText)
        .text_array(text)
        .text_position(Position::MiddleRight)
        .marker(Marker::new().color(PALETTE[1]));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        base_layout(title)
            .x_axis(Axis::new().title(Title::with_text(x_label)))
            .y_axis(Axis::new().title(Title::with_text(y_label)))
            .show_legend(false),
    );
    plot
}

fn base_layout(title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .font(Font::new().family("Times New Roman, serif").size(12))
}

fn cycled_palette(palette: &[&'static str], len: usize) -> Vec<&'static str> {
    (0..len).map(|index| palette[index % palette.len()]).collect()
}
