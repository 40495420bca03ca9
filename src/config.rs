// src/config.rs
use std::{fmt, path::PathBuf, str::FromStr};

use crate::error::PcmError;
use crate::process::nodes::NodeId;

/// Which sockets to plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Every `Socket<N>` announced in the export header.
    #[default]
    All,
    /// An explicit list, used as given.
    Explicit(Vec<NodeId>),
}

impl FromStr for NodeSelection {
    type Err = PcmError;

    /// Accepts `all` or a comma separated id list such as `0,1,2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(NodeSelection::All);
        }

        let ids = s
            .split(',')
            .map(|part| {
                part.trim().parse::<NodeId>().map_err(|e| {
                    PcmError::config(format!("invalid node id {:?} in {:?}: {}", part, s, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeSelection::Explicit(ids))
    }
}

impl fmt::Display for NodeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSelection::All => f.write_str("all"),
            NodeSelection::Explicit(ids) => {
                let joined: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

/// Visual theme of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Classic,
    Dark,
}

/// Immutable settings for one run, built once by the CLI layer.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub nodes: NodeSelection,
    /// Plot the `(percent)` columns as-is instead of per-second rates.
    pub percentages: bool,
    /// Keep every QPI link as its own series instead of summing per socket.
    pub separate_links: bool,
    pub theme: Theme,
    pub title: Option<String>,
}

impl Config {
    /// Config with defaults for everything but the input; output is `<input>.png`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = default_output_path(&input);
        Self {
            input,
            output,
            nodes: NodeSelection::All,
            percentages: false,
            separate_links: false,
            theme: Theme::Classic,
            title: None,
        }
    }
}

/// `foo.csv` → `foo.csv.png`
pub fn default_output_path(input: &std::path::Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".png");
    PathBuf::from(name)
}
