pub mod returns;

use crate::data::MoodSeries;
use crate::error::AnalysisError;
use tracing::debug;

pub use self::returns::{daily_returns, forward_returns};

/// Forward returns for a single horizon, aligned with the series rows
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReturns {
    pub horizon: usize,
    pub values: Vec<Option<f64>>,
}

impl ForwardReturns {
    /// Column label used in the report, e.g. `Fwd_20d_Return`
    pub fn label(&self) -> String {
        horizon_label(self.horizon)
    }
}

pub fn horizon_label(horizon: usize) -> String {
    format!("Fwd_{}d_Return", horizon)
}

/// Derived return columns for a `MoodSeries`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub daily_return: Vec<Option<f64>>,
    pub forward: Vec<ForwardReturns>,
}

impl FeatureSet {
    pub fn build(series: &MoodSeries, horizons: &[usize]) -> Self {
        let daily_return = daily_returns(&series.nifty);

        let forward = horizons
            .iter()
            .map(|&horizon| {
                let values = forward_returns(&series.nifty, horizon);
                debug!(
                    "{}: {} defined rows",
                    horizon_label(horizon),
                    values.iter().filter(|v| v.is_some()).count()
                );
                ForwardReturns { horizon, values }
            })
            .collect();

        Self {
            daily_return,
            forward,
        }
    }

    pub fn horizons(&self) -> Vec<usize> {
        self.forward.iter().map(|f| f.horizon).collect()
    }

    pub fn forward(&self, horizon: usize) -> Result<&ForwardReturns, AnalysisError> {
        self.forward
            .iter()
            .find(|f| f.horizon == horizon)
            .ok_or(AnalysisError::MissingHorizon(horizon))
    }
}
