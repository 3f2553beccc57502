// src/config.rs
use crate::error::ConfigError;
use crate::strategy::Thresholds;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default export name of the MMI history
pub const DEFAULT_INPUT: &str = "MMI_12-Mar-2025.csv";
/// Optional settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mmi_study";
/// Environment prefix, e.g. `MMI_STUDY_ENTRY_BELOW=25`
pub const ENV_PREFIX: &str = "MMI_STUDY";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub horizons: Vec<usize>,
    pub quantiles: usize,
    pub extreme_fraction: f64,
    pub extreme_horizons: Vec<usize>,
    pub entry_below: f64,
    pub exit_above: f64,
    pub render_chart: bool,
    pub chart_path: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            horizons: vec![5, 10, 20, 60],
            quantiles: 5,
            extreme_fraction: 0.2,
            extreme_horizons: vec![20, 60],
            entry_below: 30.0,
            exit_above: 70.0,
            render_chart: true,
            chart_path: PathBuf::from("mmi_analysis.png"),
            chart_width: 1200,
            chart_height: 1200,
        }
    }
}

impl Settings {
    /// Defaults, then `mmi_study.{toml,json,yaml}` (or `config_file` when
    /// given, which must exist), then `MMI_STUDY_*` environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("input_path", DEFAULT_INPUT)?
            .set_default("horizons", to_i64(&defaults.horizons))?
            .set_default("quantiles", defaults.quantiles as i64)?
            .set_default("extreme_fraction", defaults.extreme_fraction)?
            .set_default("extreme_horizons", to_i64(&defaults.extreme_horizons))?
            .set_default("entry_below", defaults.entry_below)?
            .set_default("exit_above", defaults.exit_above)?
            .set_default("render_chart", defaults.render_chart)?
            .set_default("chart_path", "mmi_analysis.png")?
            .set_default("chart_width", defaults.chart_width as i64)?
            .set_default("chart_height", defaults.chart_height as i64)?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            entry_below: self.entry_below,
            exit_above: self.exit_above,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizons.is_empty() {
            return Err(invalid("horizons", "at least one horizon is required"));
        }
        if self.horizons.contains(&0) {
            return Err(invalid("horizons", "horizons must be positive"));
        }
        if self.quantiles == 0 {
            return Err(invalid("quantiles", "must be at least 1"));
        }
        if !(self.extreme_fraction > 0.0 && self.extreme_fraction <= 0.5) {
            return Err(invalid(
                "extreme_fraction",
                format!("{} outside (0, 0.5]", self.extreme_fraction),
            ));
        }
        if let Some(h) = self
            .extreme_horizons
            .iter()
            .find(|h| !self.horizons.contains(h))
        {
            return Err(invalid(
                "extreme_horizons",
                format!("{}d is not in horizons {:?}", h, self.horizons),
            ));
        }
        if !(self.entry_below <= self.exit_above) {
            return Err(invalid(
                "entry_below",
                format!(
                    "{} must not exceed exit_above {}",
                    self.entry_below, self.exit_above
                ),
            ));
        }
        if self.render_chart {
            if !self.horizons.contains(&crate::chart::SCATTER_HORIZON) {
                return Err(invalid(
                    "horizons",
                    format!(
                        "chart needs the {}d horizon",
                        crate::chart::SCATTER_HORIZON
                    ),
                ));
            }
            if self.chart_width == 0 || self.chart_height == 0 {
                return Err(invalid("chart_width", "chart dimensions must be positive"));
            }
        }
        Ok(())
    }
}

fn to_i64(values: &[usize]) -> Vec<i64> {
    values.iter().map(|&v| v as i64).collect()
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.thresholds(), Thresholds::default());
    }

    #[test]
    fn loads_overrides_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "input_path = \"data/mmi.csv\"\nquantiles = 4\nentry_below = 25.0\nrender_chart = false"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.input_path, PathBuf::from("data/mmi.csv"));
        assert_eq!(settings.quantiles, 4);
        assert_eq!(settings.entry_below, 25.0);
        assert_eq!(settings.exit_above, 70.0);
        assert_eq!(settings.horizons, vec![5, 10, 20, 60]);
        assert!(!settings.render_chart);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Source(_))));
    }

    #[test]
    fn rejects_invalid_combinations() {
        let mut settings = Settings::default();
        settings.extreme_horizons = vec![30];
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "extreme_horizons", .. })
        ));

        let mut settings = Settings::default();
        settings.entry_below = 80.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.horizons = vec![5, 60];
        settings.extreme_horizons = vec![60];
        assert!(settings.validate().is_err());
        settings.render_chart = false;
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.extreme_fraction = 0.7;
        assert!(settings.validate().is_err());
    }
}
