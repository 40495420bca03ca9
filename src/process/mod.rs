// src/process/mod.rs
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

use crate::error::{PcmError, Result};

pub mod aggregate;
pub mod cell;
pub mod header;
pub mod ingest;
pub mod nodes;
pub mod rate;
pub mod select;
pub mod time_axis;

use header::RawHeader;

/// A PCM export as read from disk, before any coercion.
#[derive(Debug)]
pub struct RawExport {
    pub header: RawHeader,
    /// Every data row, one String per field.
    pub rows: Vec<Vec<String>>,
}

/// Open `path` and split it into the two header rows and the data rows.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_pcm_export<P: AsRef<Path>>(path: P) -> Result<RawExport> {
    let file = File::open(&path)?;
    read_pcm_export(file)
}

/// Same as [`load_pcm_export`] for anything readable.
pub fn read_pcm_export<R: Read>(reader: R) -> Result<RawExport> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        // width checks happen per row during ingestion, with better messages
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let mut next_row = |what: &str| -> Result<Vec<String>> {
        match records.next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Err(PcmError::structural(format!("missing {} row", what))),
        }
    };

    let main = next_row("main header")?;
    let sub = next_row("sub header")?;
    let header = RawHeader::new(main, sub)?;

    let rows = records
        .map(|record| -> Result<Vec<String>> {
            Ok(record?.iter().map(str::to_string).collect())
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        columns = header.width(),
        rows = rows.len(),
        "read PCM export"
    );
    Ok(RawExport { header, rows })
}
