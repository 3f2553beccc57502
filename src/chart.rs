//! Three-panel PNG summary of a study run.
//!
//! 1. MMI over time
//! 2. MMI against the 20-day forward return (scatter)
//! 3. Buy & hold against the MMI strategy equity curves
//!
//! Dates are plotted as `f64` day numbers and formatted back on the axis,
//! which keeps every panel on a plain numeric coordinate system.

use crate::error::ChartError;
use crate::study::Study;
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

/// Forward horizon shown in the scatter panel
pub const SCATTER_HORIZON: usize = 20;

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: RGBColor,
    pub mmi_color: RGBColor,
    pub scatter_color: RGBColor,
    pub buy_hold_color: RGBColor,
    pub strategy_color: RGBColor,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
            background_color: WHITE,
            mmi_color: RGBColor(31, 119, 180),
            scatter_color: RGBColor(31, 119, 180),
            buy_hold_color: RGBColor(31, 119, 180),
            strategy_color: RGBColor(255, 127, 14),
        }
    }
}

/// Plot-ready point sets extracted from a study
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub mmi_line: Vec<(f64, f64)>,
    pub scatter: Vec<(f64, f64)>,
    pub buy_hold: Vec<(f64, f64)>,
    pub strategy: Vec<(f64, f64)>,
}

impl ChartData {
    pub fn from_study(study: &Study) -> Result<Self, ChartError> {
        let dates: Vec<f64> = study.series.dates.iter().map(|d| date_to_x(*d)).collect();

        let mmi_line = dates
            .iter()
            .zip(study.series.mmi.iter())
            .filter_map(|(&x, mmi)| mmi.map(|y| (x, y)))
            .collect();

        let forward = study
            .features
            .forward(SCATTER_HORIZON)
            .map_err(|_| ChartError::NotEnoughData("the 20-day forward return scatter"))?;
        let scatter = study
            .series
            .mmi
            .iter()
            .zip(forward.values.iter())
            .filter_map(|(m, r)| Some(((*m)?, (*r)?)))
            .collect();

        let buy_hold = dates
            .iter()
            .copied()
            .zip(study.backtest.buy_hold_equity.iter().copied())
            .collect();
        let strategy = dates
            .iter()
            .copied()
            .zip(study.backtest.strategy_equity.iter().copied())
            .collect();

        Ok(Self {
            mmi_line,
            scatter,
            buy_hold,
            strategy,
        })
    }
}

pub struct MoodChartGenerator {
    config: ChartConfig,
}

impl MoodChartGenerator {
    pub fn new() -> Self {
        Self {
            config: ChartConfig::default(),
        }
    }

    pub fn with_config(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render the three stacked panels into a PNG at `output_path`
    pub fn generate(&self, data: &ChartData, output_path: &Path) -> Result<(), ChartError> {
        if data.buy_hold.len() < 2 {
            return Err(ChartError::NotEnoughData("the equity curves"));
        }

        let root = BitMapBackend::new(output_path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&self.config.background_color).map_err(render_err)?;

        let panels = root.split_evenly((3, 1));

        self.draw_mmi_line(&panels[0], &data.mmi_line)
            .map_err(render_err)?;
        self.draw_scatter(&panels[1], &data.scatter)
            .map_err(render_err)?;
        self.draw_equity(&panels[2], &data.buy_hold, &data.strategy)
            .map_err(render_err)?;

        root.present().map_err(render_err)?;

        info!("Chart written to {}", output_path.display());
        Ok(())
    }

    fn draw_mmi_line<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        points: &[(f64, f64)],
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(area)
            .caption("Market Mood Index Over Time", ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| format_x_date(*x))
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), &self.config.mmi_color))?;

        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        points: &[(f64, f64)],
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(area)
            .caption("MMI vs 20-Day Forward Return", ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .y_label_formatter(&|y| format!("{:.2}", y))
            .draw()?;

        let color = self.config.scatter_color.mix(0.4);
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 3, color.filled())),
        )?;

        Ok(())
    }

    fn draw_equity<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        buy_hold: &[(f64, f64)],
        strategy: &[(f64, f64)],
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let x_range = padded_range(buy_hold.iter().chain(strategy.iter()).map(|p| p.0));
        let y_range = padded_range(buy_hold.iter().chain(strategy.iter()).map(|p| p.1));

        let mut chart = ChartBuilder::on(area)
            .caption("Strategy vs Buy & Hold", ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| format_x_date(*x))
            .y_label_formatter(&|y| format!("{:.2}", y))
            .draw()?;

        let buy_hold_color = self.config.buy_hold_color;
        chart
            .draw_series(LineSeries::new(buy_hold.iter().copied(), &buy_hold_color))?
            .label("Buy & Hold")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &buy_hold_color));

        let strategy_color = self.config.strategy_color;
        chart
            .draw_series(LineSeries::new(strategy.iter().copied(), &strategy_color))?
            .label("MMI Strategy")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &strategy_color));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

impl Default for MoodChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_x_date(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Min..max of the values with 5% headroom; a flat or empty input still
/// yields a non-empty range.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }

    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad)..(max + pad)
}
