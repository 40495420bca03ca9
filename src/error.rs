use std::io;
use thiserror::Error;

/// Everything that can abort a pcmgraph run.
///
/// Unparsable cells are not errors: they are kept as
/// [`Cell::Text`](crate::process::cell::Cell::Text) and filtered out later.
#[derive(Error, Debug)]
pub enum PcmError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header/row width mismatch, missing header rows or a malformed timestamp.
    #[error("Malformed export: {0}")]
    Structural(String),

    #[error(
        "Measurements spanning more than a day are not supported (first date {first:?}, last date {last:?})"
    )]
    MultiDay { first: String, last: String },

    #[error("No data found: {0}")]
    EmptyResult(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PcmError>;

impl PcmError {
    pub fn structural<S: Into<String>>(msg: S) -> Self {
        PcmError::Structural(msg.into())
    }

    pub fn empty_result<S: Into<String>>(msg: S) -> Self {
        PcmError::EmptyResult(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        PcmError::Config(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        PcmError::Render(msg.into())
    }
}
