use tracing::{debug, trace};

use crate::error::{PcmError, Result};
use crate::process::ingest::{Series, SeriesTable};
use crate::process::nodes::NodeId;
use crate::process::time_axis::TimeAxis;

const DIRECTION_TOKENS: [&str; 2] = ["dataIn", "trafficOut"];

/// What the caller wants plotted.
#[derive(Debug, Clone, Copy)]
pub struct Criteria<'a> {
    pub nodes: &'a [NodeId],
    pub percentages: bool,
    pub separate_links: bool,
}

impl Criteria<'_> {
    pub fn matches(&self, label: &str) -> bool {
        if !label.starts_with("SKT") {
            return false;
        }
        if label.contains("percent") != self.percentages {
            return false;
        }
        let references_node = self.nodes.iter().any(|n| {
            label.contains(&format!("SKT{}t", n)) || label.contains(&format!("SKT{}d", n))
        });
        if !references_node {
            return false;
        }
        // the per-socket aggregate supersedes the single links
        if !self.separate_links && label.contains(" QPI") {
            return false;
        }
        DIRECTION_TOKENS.iter().any(|t| label.contains(t))
    }
}

/// A chosen series, reordered to follow the sorted time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Time-sorted axis plus every series that passed the filters, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub times: Vec<f64>,
    pub series: Vec<SelectedSeries>,
}

fn permute(series: &Series, order: &[usize]) -> Vec<Option<f64>> {
    order.iter().map(|&i| series.cells[i].as_f64()).collect()
}

/// Filter `table` by `criteria` and sort the survivors and the axis by time.
pub fn select_series(
    table: &SeriesTable,
    axis: &TimeAxis,
    criteria: &Criteria<'_>,
) -> Result<Selection> {
    let order = axis.sorted_order();
    let times: Vec<f64> = order.iter().map(|&i| axis.elapsed[i]).collect();

    let series: Vec<SelectedSeries> = table
        .series
        .iter()
        .filter(|s| {
            let keep = criteria.matches(&s.label);
            trace!(label = %s.label, keep, "selection");
            keep
        })
        .map(|s| SelectedSeries {
            label: s.label.clone(),
            values: permute(s, &order),
        })
        .collect();

    if series.is_empty() {
        return Err(PcmError::empty_result(format!(
            "no series matched nodes {:?} (percentages: {}, separate links: {})",
            criteria.nodes, criteria.percentages, criteria.separate_links
        )));
    }
    debug!(count = series.len(), "selected series");

    Ok(Selection { times, series })
}
