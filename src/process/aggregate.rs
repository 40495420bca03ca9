use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::process::cell::Cell;
use crate::process::ingest::{Series, SeriesTable};

/// Sub-header naming a single interconnect link, e.g. `QPI0` or `UPI2`.
static LINK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(QPI|UPI)\d+$").expect("static regex"));

/// Socket counter whose following empty-main-header columns are more links of it.
fn opens_block(series: &Series) -> bool {
    if !series.label.starts_with("SKT") {
        return false;
    }
    // `SKT` is literal; the counter words are matched in any case, which covers
    // split headers such as `SKT0` over `Traffic In (QPI)` as well as `SKT0dataIn`.
    let lower = series.label.to_ascii_lowercase();
    lower.contains("traffic") || lower.contains("data")
}

fn block_label(opener: &Series) -> String {
    if LINK_NAME.is_match(opener.sub_header.trim()) {
        opener.main_header.trim().to_string()
    } else {
        opener.label.clone()
    }
}

struct Accumulator {
    label: String,
    main_header: String,
    links: usize,
    cells: Vec<Cell>,
}

impl Accumulator {
    fn open(opener: &Series) -> Self {
        Self {
            label: block_label(opener),
            main_header: opener.main_header.clone(),
            links: 1,
            cells: opener.cells.clone(),
        }
    }

    fn add(&mut self, link: &Series) {
        for (acc, cell) in self.cells.iter_mut().zip(&link.cells) {
            *acc = acc.add(cell);
        }
        self.links += 1;
    }

    fn close(self) -> Series {
        debug!(label = %self.label, links = self.links, "aggregated socket links");
        Series {
            label: self.label,
            main_header: self.main_header,
            sub_header: String::new(),
            cells: self.cells,
        }
    }
}

/// Sum the per-link columns of every socket traffic/data block.
///
/// Walks the columns in header order. A matching socket column opens a block,
/// columns with an empty main header extend the open block, and any other
/// column closes it. Returns the synthetic series in the order they closed;
/// the input table is left untouched.
pub fn aggregate_links(table: &SeriesTable) -> Vec<Series> {
    let mut out = Vec::new();
    let mut open: Option<Accumulator> = None;

    for series in &table.series {
        if series.main_header.is_empty() {
            if let Some(acc) = open.as_mut() {
                acc.add(series);
            }
        } else if opens_block(series) {
            if let Some(acc) = open.take() {
                out.push(acc.close());
            }
            open = Some(Accumulator::open(series));
        } else if let Some(acc) = open.take() {
            out.push(acc.close());
        }
    }
    if let Some(acc) = open {
        out.push(acc.close());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::header::RawHeader;
    use crate::process::ingest::ingest_rows;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sums_continuation_links() {
        let header = RawHeader::new(
            strings(&["", "", "SKT0", "", ""]),
            strings(&["Date", "Time", "Traffic In (QPI)", "", ""]),
        )
        .unwrap();
        let rows = vec![
            strings(&["d", "11:00:00.000", "1", "10", "100"]),
            strings(&["d", "11:00:01.000", "2", "20", "200"]),
            strings(&["d", "11:00:02.000", "3.5", "0.5", "0"]),
        ];
        let table = ingest_rows(header, rows).unwrap();
        let aggregates = aggregate_links(&table);

        assert_eq!(aggregates.len(), 1);
        let agg = &aggregates[0];
        assert_eq!(agg.label, "SKT0 Traffic In (QPI)");
        assert_eq!(
            agg.cells,
            vec![Cell::Numeric(111.0), Cell::Numeric(222.0), Cell::Numeric(4.0)]
        );
        // per-link columns stay as they were
        assert_eq!(table.series[2].cells[0], Cell::Numeric(1.0));
    }

    #[test]
    fn test_pcm_layout_blocks() {
        let header = RawHeader::new(
            strings(&[
                "System",
                "",
                "SKT0dataIn",
                "",
                "SKT0trafficOut (percent)",
                "",
                "Socket0",
                "",
                "SKT1dataIn",
                "",
            ]),
            strings(&[
                "Date", "Time", "QPI0", "QPI1", "QPI0", "QPI1", "EXEC", "IPC", "QPI0", "QPI1",
            ]),
        )
        .unwrap();
        let rows = vec![strings(&[
            "d",
            "11:00:00.000",
            "1",
            "2",
            "10%",
            "20%",
            "0.5",
            "0.7",
            "5",
            "n/a",
        ])];
        let table = ingest_rows(header, rows).unwrap();
        let aggregates = aggregate_links(&table);

        let labels: Vec<&str> = aggregates.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["SKT0dataIn", "SKT0trafficOut (percent)", "SKT1dataIn"]
        );
        assert_eq!(aggregates[0].cells, vec![Cell::Numeric(3.0)]);
        assert_eq!(aggregates[1].cells, vec![Cell::Numeric(30.0)]);
        // the Socket0 block must not have been summed into anything
        assert_eq!(aggregates[2].cells, vec![Cell::Text("n/a".into())]);
    }

    #[test]
    fn test_adjacent_blocks_close_each_other() {
        let header = RawHeader::new(
            strings(&["", "", "SKT0dataIn", "SKT1dataIn", ""]),
            strings(&["Date", "Time", "QPI0", "QPI0", "QPI1"]),
        )
        .unwrap();
        let rows = vec![strings(&["d", "t", "1", "2", "3"])];
        let table = ingest_rows(header, rows).unwrap();
        let aggregates = aggregate_links(&table);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].cells, vec![Cell::Numeric(1.0)]);
        assert_eq!(aggregates[1].cells, vec![Cell::Numeric(5.0)]);
    }

    #[test]
    fn test_non_socket_columns_ignored() {
        let header = RawHeader::new(
            strings(&["System", "", "Socket0", ""]),
            strings(&["Date", "Time", "EXEC", "IPC"]),
        )
        .unwrap();
        let table = ingest_rows(header, vec![strings(&["d", "t", "1", "2"])]).unwrap();
        assert!(aggregate_links(&table).is_empty());
    }

    #[test]
    fn test_opener_scope() {
        let header = RawHeader::new(
            strings(&["", "", "SKT0", "", "SKT0", "", "Traffic", "", "skt1dataIn", ""]),
            strings(&[
                "Date", "Time", "Data Hits", "", "EXEC", "", "In", "", "QPI0", "QPI1",
            ]),
        )
        .unwrap();
        let rows = vec![strings(&["d", "t", "1", "2", "3", "4", "5", "6", "7", "8"])];
        let table = ingest_rows(header, rows).unwrap();
        let aggregates = aggregate_links(&table);

        // any-case counter word under an SKT main header opens a block;
        // a missing or lower-case SKT prefix does not
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].label, "SKT0 Data Hits");
        assert_eq!(aggregates[0].cells, vec![Cell::Numeric(3.0)]);
    }
}
