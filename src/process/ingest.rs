use tracing::debug;

use crate::error::{PcmError, Result};
use crate::process::cell::Cell;
use crate::process::header::RawHeader;

/// One column of the export after type coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// Raw main-header cell; empty for continuation columns.
    pub main_header: String,
    pub sub_header: String,
    pub cells: Vec<Cell>,
}

/// All series of one export, aligned by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub series: Vec<Series>,
    pub row_count: usize,
}

impl SeriesTable {
    /// Empty series for every header column, labelled with the merged labels.
    pub fn from_header(header: RawHeader) -> Self {
        let labels = header.resolve_labels();
        let series = labels
            .into_iter()
            .zip(header.main)
            .zip(header.sub)
            .map(|((label, main_header), sub_header)| Series {
                label,
                main_header,
                sub_header,
                cells: Vec::new(),
            })
            .collect();
        Self {
            series,
            row_count: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.series.len()
    }

    /// Append one data row. `row_number` is 1-based and only used for errors.
    pub fn push_row<S: AsRef<str>>(&mut self, row_number: usize, row: &[S]) -> Result<()> {
        if row.len() != self.width() {
            return Err(PcmError::structural(format!(
                "data row {} has {} cells, header has {} columns",
                row_number,
                row.len(),
                self.width()
            )));
        }
        for (series, raw) in self.series.iter_mut().zip(row) {
            series.cells.push(Cell::parse(raw.as_ref()));
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn column(&self, index: usize) -> Option<&Series> {
        self.series.get(index)
    }

    pub fn find(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// Build the table from a header and all data rows.
pub fn ingest_rows<I>(header: RawHeader, rows: I) -> Result<SeriesTable>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut table = SeriesTable::from_header(header);
    for (idx, row) in rows.into_iter().enumerate() {
        table.push_row(idx + 1, row.as_slice())?;
    }
    debug!(
        columns = table.width(),
        rows = table.row_count,
        "ingested data rows"
    );
    Ok(table)
}
