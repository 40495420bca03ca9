use anyhow::{Context, Result};
use clap::Parser;
use pcmgraph::{config::default_output_path, pipeline, Config, NodeSelection, Theme};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Plot QPI traffic from an Intel PCM CSV export"
)]
struct Args {
    /// Path to the CSV file that contains the PCM results
    input: PathBuf,
    /// Path to output file. Defaults to <input>.png
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// List of nodes to plot (e.g. 0,1,2,3), or `all`
    #[arg(short, long, default_value = "all")]
    nodes: String,
    /// Use the percentage values for traffic instead of absolute values
    #[arg(short, long)]
    percentages: bool,
    /// Plot traffic for all QPI links separately
    #[arg(short = 'q', long)]
    separate_qpi: bool,
    /// Visual theme of the chart
    #[arg(short, long, value_enum, default_value_t = Theme::Classic)]
    style: Theme,
    /// Title of the figure
    #[arg(short, long)]
    title: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let nodes: NodeSelection = self
            .nodes
            .parse()
            .context("Error parsing node list argument")?;
        let output = self
            .output
            .unwrap_or_else(|| default_output_path(&self.input));
        Ok(Config {
            input: self.input,
            output,
            nodes,
            percentages: self.percentages,
            separate_links: self.separate_qpi,
            theme: self.style,
            title: self.title,
        })
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config()?;
    info!(
        input = %config.input.display(),
        nodes = %config.nodes,
        percentages = config.percentages,
        separate_links = config.separate_links,
        "startup"
    );

    pipeline::run(&config)
        .with_context(|| format!("failed to plot {}", config.input.display()))?;
    Ok(())
}
