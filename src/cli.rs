// src/cli.rs
use crate::chart::{ChartConfig, ChartData, MoodChartGenerator};
use crate::config::Settings;
use crate::data::SeriesLoader;
use crate::report::render_report;
use crate::study::Study;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mood-index-study")]
#[command(about = "Market Mood Index vs Nifty forward-return study", long_about = None)]
pub struct Cli {
    /// MMI history CSV (Date, MMI, Nifty)
    pub input: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the chart PNG
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Skip rendering the chart
    #[arg(long)]
    pub no_chart: bool,
}

impl Cli {
    /// Layer command-line overrides on top of file and environment settings
    pub fn settings(&self) -> Result<Settings> {
        let mut settings =
            Settings::load(self.config.as_deref()).context("Failed to load settings")?;

        if let Some(input) = &self.input {
            settings.input_path = input.clone();
        }
        if let Some(chart) = &self.chart {
            settings.chart_path = chart.clone();
        }
        if self.no_chart {
            settings.render_chart = false;
        }

        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }
}

/// Load, analyze, print the report, then render the chart
pub fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;

    let series = SeriesLoader::load(&settings.input_path).with_context(|| {
        format!(
            "Failed to load MMI series from {}",
            settings.input_path.display()
        )
    })?;

    let study = Study::run(series, &settings).context("Study failed")?;

    print!("{}", render_report(&study));

    if settings.render_chart {
        let data = ChartData::from_study(&study)?;
        let generator = MoodChartGenerator::with_config(ChartConfig {
            width: settings.chart_width,
            height: settings.chart_height,
            ..ChartConfig::default()
        });

        generator
            .generate(&data, &settings.chart_path)
            .with_context(|| {
                format!("Failed to render chart to {}", settings.chart_path.display())
            })?;
    } else {
        info!("Chart rendering disabled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_input_and_flags() {
        let cli = Cli::parse_from(["mood-index-study", "data.csv", "--no-chart"]);
        assert_eq!(cli.input, Some(PathBuf::from("data.csv")));
        assert!(cli.no_chart);
        assert!(cli.config.is_none());

        let cli = Cli::parse_from(["mood-index-study", "--chart", "out.png"]);
        assert!(cli.input.is_none());
        assert_eq!(cli.chart, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn command_line_overrides_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("study.toml");
        std::fs::write(&config, "chart_path = \"from_file.png\"\n").unwrap();

        let cli = Cli::parse_from([
            "mood-index-study".into(),
            "custom.csv".into(),
            "--config".into(),
            config.clone().into_os_string(),
            "--no-chart".into(),
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.input_path, PathBuf::from("custom.csv"));
        assert_eq!(settings.chart_path, PathBuf::from("from_file.png"));
        assert!(!settings.render_chart);
    }
}
