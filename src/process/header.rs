use crate::error::{PcmError, Result};

pub const DATE_COL: usize = 0;
pub const TIME_COL: usize = 1;

/// The two header rows of a PCM export, as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    /// Section titles; empty for columns continuing the block to their left.
    pub main: Vec<String>,
    /// Leaf metric name of every column.
    pub sub: Vec<String>,
}

impl RawHeader {
    pub fn new(main: Vec<String>, sub: Vec<String>) -> Result<Self> {
        if main.len() != sub.len() {
            return Err(PcmError::structural(format!(
                "header rows differ in width: {} main vs {} sub columns",
                main.len(),
                sub.len()
            )));
        }
        if main.len() <= TIME_COL {
            return Err(PcmError::structural(format!(
                "expected at least date and time columns, header has {}",
                main.len()
            )));
        }
        Ok(Self { main, sub })
    }

    pub fn width(&self) -> usize {
        self.main.len()
    }

    /// Flat per-column labels: last non-empty main title, a space, the sub title.
    pub fn resolve_labels(&self) -> Vec<String> {
        let initial = self.main.first().cloned().unwrap_or_default();
        self.main
            .iter()
            .zip(&self.sub)
            .scan(initial, |current, (main, sub)| {
                if !main.is_empty() {
                    *current = main.clone();
                }
                Some(format!("{} {}", current, sub))
            })
            .collect()
    }
}
