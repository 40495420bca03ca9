use anyhow::Result;
use pcmgraph::{
    pipeline::{build_chart, run},
    plot::LineStyle,
    Config, NodeSelection, PcmError,
};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pcmgraph=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Two sockets, two QPI links each, rows logged out of order.
const EXPORT: &str = "\
System;;Socket0;Socket1;SKT0dataIn;;SKT0dataIn (percent);;SKT0trafficOut;;SKT0trafficOut (percent);;SKT1dataIn;;SKT1trafficOut;
Date;Time;EXEC;EXEC;QPI0;QPI1;QPI0;QPI1;QPI0;QPI1;QPI0;QPI1;QPI0;QPI1;QPI0;QPI1
2017-03-01;11:10:46.000;0.51;0.48;100;300;1%;3%;50;50;10%;10%;10;20;5;5
2017-03-01;11:10:48.000;0.50;0.47;800;200;8%;2%;60;40;12%;8%;40;20;6;4
2017-03-01;11:10:47.000;0.52;0.49;150;150;1.5%;1.5%;20;30;4%;6%;5;5;1;1
2017-03-01;11:10:48.500;0.50;0.47;50;50;0.5%;0.5%;10;10;2%;2%;1;2;3;3
";

fn write_export(text: &str) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    tmp.write_all(text.as_bytes())?;
    Ok(tmp)
}

#[test]
fn test_absolute_rates_from_aggregates() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let config = Config::new(tmp.path());

    let chart = build_chart(&config)?;

    let labels: Vec<&str> = chart.lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["SKT0dataIn", "SKT0trafficOut", "SKT1dataIn", "SKT1trafficOut"]);
    assert_eq!(chart.options.y_label, "QPI Traffic (MB/s)");
    assert_eq!(chart.options.x_label, "Time (s)");
    assert_eq!(chart.output, config.output);

    // sorted times are 0, 1, 2, 2.5; SKT0dataIn sums are 400, 300, 1000, 100
    let skt0_in = &chart.lines[0];
    assert_eq!(skt0_in.style, LineStyle::Dashed);
    assert_eq!(
        skt0_in.points,
        vec![(0.0, 400.0), (1.0, 300.0), (2.0, 1000.0), (2.5, 200.0)]
    );

    let skt0_out = &chart.lines[1];
    assert_eq!(skt0_out.style, LineStyle::Solid);
    assert_eq!(
        skt0_out.points,
        vec![(0.0, 100.0), (1.0, 50.0), (2.0, 100.0), (2.5, 40.0)]
    );

    for line in &chart.lines {
        let xs: Vec<f64> = line.points.iter().map(|p| p.0).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]), "{} not sorted", line.label);
    }
    Ok(())
}

#[test]
fn test_percentages_are_not_rate_derived() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let mut config = Config::new(tmp.path());
    config.percentages = true;
    config.nodes = NodeSelection::Explicit(vec![0]);

    let chart = build_chart(&config)?;

    let labels: Vec<&str> = chart.lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["SKT0dataIn (percent)", "SKT0trafficOut (percent)"]);
    assert_eq!(
        chart.lines[0].points,
        vec![(0.0, 4.0), (1.0, 3.0), (2.0, 10.0), (2.5, 1.0)]
    );
    assert_eq!(chart.options.y_label, "QPI Traffic (%)");
    Ok(())
}

#[test]
fn test_separate_links_plots_each_link() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let mut config = Config::new(tmp.path());
    config.separate_links = true;
    config.nodes = NodeSelection::Explicit(vec![1]);

    let chart = build_chart(&config)?;

    let labels: Vec<&str> = chart.lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "SKT1dataIn QPI0",
            "SKT1dataIn QPI1",
            "SKT1trafficOut QPI0",
            "SKT1trafficOut QPI1"
        ]
    );
    // first point is the raw counter, the rest are per second
    assert_eq!(
        chart.lines[0].points,
        vec![(0.0, 10.0), (1.0, 5.0), (2.0, 40.0), (2.5, 2.0)]
    );
    Ok(())
}

#[test]
fn test_unknown_node_is_empty_result() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let mut config = Config::new(tmp.path());
    config.nodes = NodeSelection::Explicit(vec![7]);

    let err = build_chart(&config).unwrap_err();
    assert!(matches!(err, PcmError::EmptyResult(_)), "{err}");
    Ok(())
}

#[test]
fn test_multi_day_export_fails() -> Result<()> {
    init_test_logging();
    let text = EXPORT.replacen("2017-03-01;11:10:48.500", "2017-03-02;00:00:00.500", 1);
    let tmp = write_export(&text)?;

    let err = build_chart(&Config::new(tmp.path())).unwrap_err();
    assert!(matches!(err, PcmError::MultiDay { .. }), "{err}");
    Ok(())
}

#[test]
fn test_ragged_row_fails() -> Result<()> {
    init_test_logging();
    let text = format!("{}2017-03-01;11:10:49.000;0.5\n", EXPORT);
    let tmp = write_export(&text)?;

    let err = build_chart(&Config::new(tmp.path())).unwrap_err();
    match err {
        PcmError::Structural(msg) => assert!(msg.contains("data row 5"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_run_writes_png() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let dir = tempdir()?;
    let mut config = Config::new(tmp.path());
    config.output = dir.path().join("chart.png");
    config.title = Some("QPI traffic".into());

    let chart = run(&config)?;

    assert_eq!(chart.output, config.output);
    let written = std::fs::metadata(&config.output)?;
    assert!(written.len() > 0);
    Ok(())
}

#[test]
fn test_unwritable_output_is_render_error() -> Result<()> {
    init_test_logging();
    let tmp = write_export(EXPORT)?;
    let mut config = Config::new(tmp.path());
    config.output = "/nonexistent_dir/pcmgraph/chart.png".into();

    let err = run(&config).unwrap_err();
    assert!(matches!(err, PcmError::Render(_)), "{err}");
    Ok(())
}
