// src/study.rs
use crate::analysis::{
    correlate_horizons, extreme_study, quantile_forward_returns, CorrelationResult, ExtremeStudy,
    QuantileTable,
};
use crate::config::Settings;
use crate::data::MoodSeries;
use crate::features::FeatureSet;
use crate::strategy::{BacktestResult, StrategyEvaluator};
use crate::utils::timing::measure_time;
use anyhow::Result;

/// Everything computed from one MMI series
#[derive(Debug, Clone)]
pub struct Study {
    pub series: MoodSeries,
    pub features: FeatureSet,
    pub correlations: Vec<CorrelationResult>,
    pub quantiles: QuantileTable,
    pub extremes: ExtremeStudy,
    pub backtest: BacktestResult,
}

impl Study {
    /// Run features, analysis and backtest in order. Any failure aborts
    /// the whole study.
    pub fn run(series: MoodSeries, settings: &Settings) -> Result<Self> {
        let features = measure_time("feature build", || {
            Ok(FeatureSet::build(&series, &settings.horizons))
        })?;

        let correlations = measure_time("correlation analysis", || {
            Ok(correlate_horizons(&series.mmi, &features))
        })?;

        let quantiles = measure_time("quantile analysis", || {
            Ok(quantile_forward_returns(
                &series.mmi,
                &features,
                settings.quantiles,
            )?)
        })?;

        let extremes = measure_time("extreme study", || {
            Ok(extreme_study(
                &series.mmi,
                &features,
                settings.extreme_fraction,
                &settings.extreme_horizons,
            )?)
        })?;

        let backtest = measure_time("backtest", || {
            StrategyEvaluator::new(settings.thresholds())
                .backtest(&series, &features.daily_return)
        })?;

        Ok(Self {
            series,
            features,
            correlations,
            quantiles,
            extremes,
            backtest,
        })
    }
}
