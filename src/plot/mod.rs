// src/plot/mod.rs
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::{fmt::Display, ops::Range, path::PathBuf};
use tracing::info;

use crate::config::Theme;
use crate::error::{PcmError, Result};

pub mod palette;

pub use palette::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One labelled line of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    /// `(elapsed seconds, value)`, already sorted by time.
    pub points: Vec<(f64, f64)>,
    pub style: LineStyle,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub theme: Theme,
    pub size: (u32, u32),
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            x_label: "Time (s)".into(),
            y_label: String::new(),
            show_legend: true,
            theme: Theme::Classic,
            size: (1280, 720),
        }
    }
}

/// Everything the renderer needs to produce one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub lines: Vec<PlotLine>,
    pub options: ChartOptions,
    pub output: PathBuf,
}

/// Integer ticks are drawn at most this often along the time axis.
const MAX_X_TICKS: usize = 30;

fn render_err<E: Display>(e: E) -> PcmError {
    PcmError::render(e.to_string())
}

/// (background, ink)
fn theme_colors(theme: Theme) -> (RGBColor, RGBColor) {
    match theme {
        Theme::Classic => (WHITE, BLACK),
        Theme::Dark => (RGBColor(24, 24, 24), RGBColor(230, 230, 230)),
    }
}

/// Time axis starts at zero (or earlier, for rows logged before the first one)
/// and ends one whole second past the last sample.
fn x_bounds(lines: &[PlotLine]) -> Range<f64> {
    let xs = lines.iter().flat_map(|l| l.points.iter().map(|p| p.0));
    let (min, max) = xs.fold((0.0_f64, 0.0_f64), |(lo, hi), x| (lo.min(x), hi.max(x)));
    min.floor()..max.floor() + 1.0
}

/// Pixel spans of the two legend key segments; a gap between them marks a dashed line.
fn legend_segments(style: LineStyle) -> [(i32, i32); 2] {
    match style {
        LineStyle::Solid => [(0, 10), (10, 20)],
        LineStyle::Dashed => [(0, 8), (12, 20)],
    }
}

fn y_bounds(lines: &[PlotLine]) -> Range<f64> {
    let ys = lines
        .iter()
        .flat_map(|l| l.points.iter().map(|p| p.1))
        .filter(|y| y.is_finite());
    let Some((min, max)) = ys.fold(None, |acc: Option<(f64, f64)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    }) else {
        return 0.0..1.0;
    };
    if max - min == 0.0 {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Draw `spec` into a PNG at `spec.output`.
#[tracing::instrument(level = "info", skip(spec), fields(output = %spec.output.display(), lines = spec.lines.len()))]
pub fn render(spec: &ChartSpec) -> Result<()> {
    let (background, ink) = theme_colors(spec.options.theme);
    let x_range = x_bounds(&spec.lines);
    let y_range = y_bounds(&spec.lines);
    let x_ticks = ((x_range.end - x_range.start) as usize + 1).min(MAX_X_TICKS);

    let root = BitMapBackend::new(&spec.output, spec.options.size).into_drawing_area();
    root.fill(&background).map_err(render_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20).x_label_area_size(50).y_label_area_size(80);
    if let Some(title) = &spec.options.title {
        builder.caption(title, ("sans-serif", 28).into_font().color(&ink));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(spec.options.x_label.as_str())
        .y_desc(spec.options.y_label.as_str())
        .x_labels(x_ticks)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .axis_style(ink.stroke_width(1))
        .bold_line_style(ink.mix(0.2).stroke_width(1))
        .light_line_style(ink.mix(0.05).stroke_width(1))
        .label_style(("sans-serif", 16).into_font().color(&ink))
        .axis_desc_style(("sans-serif", 18).into_font().color(&ink))
        .draw()
        .map_err(render_err)?;

    for line in &spec.lines {
        let color = line.color;
        let stroke = color.stroke_width(2);
        let points = line.points.iter().copied();
        let series = match line.style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points, stroke)),
            LineStyle::Dashed => {
                chart.draw_series(DashedLineSeries::new(points, 10, 6, stroke))
            }
        }
        .map_err(render_err)?;
        let [first, second] = legend_segments(line.style);
        series.label(line.label.as_str()).legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(first.0, 0), (first.1, 0)], color.stroke_width(2))
                + PathElement::new(vec![(second.0, 0), (second.1, 0)], color.stroke_width(2))
        });
    }

    if spec.options.show_legend {
        chart
            .configure_series_labels()
            .background_style(background.mix(0.8).filled())
            .border_style(ink.stroke_width(1))
            .label_font(("sans-serif", 16).into_font().color(&ink))
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    info!("chart written");
    Ok(())
}
