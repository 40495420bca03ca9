// src/pipeline.rs
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PcmError, Result};
use crate::plot::{self, palette, ChartOptions, ChartSpec, LineStyle, PlotLine};
use crate::process::{
    self,
    aggregate::aggregate_links,
    header::{DATE_COL, TIME_COL},
    ingest::{ingest_rows, SeriesTable},
    nodes::{discover_nodes, NodeId},
    rate::derive_rates,
    select::{select_series, Criteria, Selection},
    time_axis::TimeAxis,
    RawExport,
};

/// Links per socket the colour palette is sized for in separate-links mode.
const LINKS_PER_SOCKET: usize = 3;

/// Fully parsed export, ready for selection.
#[derive(Debug)]
pub struct Prepared {
    pub table: SeriesTable,
    pub nodes: Vec<NodeId>,
    pub axis: TimeAxis,
}

/// Header merge, node discovery, ingestion, aggregation, day check and time axis.
pub fn prepare(export: RawExport, config: &Config) -> Result<Prepared> {
    let RawExport { header, rows } = export;

    let nodes = discover_nodes(&config.nodes, &header.main);
    if nodes.is_empty() {
        warn!("no Socket<N> columns found in header");
    }

    let mut table = ingest_rows(header, rows)?;
    if table.row_count == 0 {
        return Err(PcmError::empty_result("export has no data rows"));
    }

    if !config.separate_links {
        let aggregates = aggregate_links(&table);
        info!(count = aggregates.len(), "built per-socket link aggregates");
        table.series.extend(aggregates);
    }

    check_single_day(&table)?;

    let time_column = table
        .column(TIME_COL)
        .ok_or_else(|| PcmError::structural("export has no time column"))?;
    let axis = TimeAxis::from_time_column(time_column)?;

    Ok(Prepared { table, nodes, axis })
}

/// The first and last value of the date column must agree.
fn check_single_day(table: &SeriesTable) -> Result<()> {
    let dates = &table
        .column(DATE_COL)
        .ok_or_else(|| PcmError::structural("export has no date column"))?
        .cells;
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if first != last => Err(PcmError::MultiDay {
            first: first.to_string(),
            last: last.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Turn the selection into drawable lines: rates unless in percentage mode.
pub fn build_lines(selection: &Selection, nodes: &[NodeId], config: &Config) -> Vec<PlotLine> {
    let mut colour_space = nodes.len();
    if config.separate_links {
        colour_space *= LINKS_PER_SOCKET;
    }
    let colours = palette(colour_space);

    selection
        .series
        .iter()
        .enumerate()
        .map(|(n, series)| {
            let values = if config.percentages {
                series.values.clone()
            } else {
                derive_rates(&series.values, &selection.times)
            };
            let points = selection
                .times
                .iter()
                .zip(values)
                .filter_map(|(&t, v)| v.map(|v| (t, v)))
                .collect();
            let style = if series.label.contains("dataIn") {
                LineStyle::Dashed
            } else {
                LineStyle::Solid
            };
            PlotLine {
                label: series.label.clone(),
                points,
                style,
                color: colours[n % colours.len()],
            }
        })
        .collect()
}

pub fn chart_options(config: &Config) -> ChartOptions {
    let y_label = if config.percentages {
        "QPI Traffic (%)"
    } else {
        "QPI Traffic (MB/s)"
    };
    ChartOptions {
        title: config.title.clone(),
        y_label: y_label.into(),
        theme: config.theme,
        ..ChartOptions::default()
    }
}

/// Everything up to, but not including, drawing.
#[tracing::instrument(level = "info", skip(config), fields(input = %config.input.display()))]
pub fn build_chart(config: &Config) -> Result<ChartSpec> {
    let export = process::load_pcm_export(&config.input)?;
    let prepared = prepare(export, config)?;

    let criteria = Criteria {
        nodes: &prepared.nodes,
        percentages: config.percentages,
        separate_links: config.separate_links,
    };
    let selection = select_series(&prepared.table, &prepared.axis, &criteria)?;

    Ok(ChartSpec {
        lines: build_lines(&selection, &prepared.nodes, config),
        options: chart_options(config),
        output: config.output.clone(),
    })
}

/// Load, transform and render one export.
pub fn run(config: &Config) -> Result<ChartSpec> {
    let start = Instant::now();
    let spec = build_chart(config)?;
    plot::render(&spec)?;
    info!(
        lines = spec.lines.len(),
        output = %spec.output.display(),
        elapsed = ?start.elapsed(),
        "done"
    );
    Ok(spec)
}
