use std::fmt;

/// One parsed value of the export.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Numeric(f64),
    Text(String),
}

impl Cell {
    /// Trim, strip a trailing `%`, then try `f64`; anything else stays text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(number) = trimmed.strip_suffix('%') {
            if let Ok(v) = number.trim_end().parse::<f64>() {
                return Cell::Numeric(v);
            }
            return Cell::Text(trimmed.to_string());
        }

        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Numeric(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Numeric(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Numeric(_) => None,
        }
    }

    /// Elementwise sum used when folding links together. Text is sticky.
    pub fn add(&self, other: &Cell) -> Cell {
        match (self, other) {
            (Cell::Numeric(a), Cell::Numeric(b)) => Cell::Numeric(a + b),
            (Cell::Text(_), _) => self.clone(),
            (_, Cell::Text(_)) => other.clone(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Numeric(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}
