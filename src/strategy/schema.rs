// src/strategy/schema.rs
use crate::error::AnalysisError;
use chrono::NaiveDate;
use std::fmt;

/// Market exposure held at the close of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Out of the market (0)
    #[default]
    Flat,
    /// Long the index (1)
    Long,
}

impl Position {
    /// Exposure multiplier applied to the next day's return
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Flat => write!(f, "0"),
            Position::Long => write!(f, "1"),
        }
    }
}

/// MMI levels that switch the position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Go long when MMI is strictly below this level
    pub entry_below: f64,
    /// Go flat when MMI is strictly above this level
    pub exit_above: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            entry_below: 30.0,
            exit_above: 70.0,
        }
    }
}

/// Headline performance of one equity curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyPerformance {
    /// Final equity minus one
    pub total_return: f64,
    /// Compound annual growth rate over calendar days
    pub annualized_return: f64,
}

impl StrategyPerformance {
    /// Total return and CAGR of a curve seeded at 1.0.
    ///
    /// CAGR = final^(365 / elapsed_days) - 1. A curve spanning zero days
    /// cannot be annualized and is an error.
    pub fn from_curve(
        equity: &[f64],
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Self, AnalysisError> {
        let final_equity = *equity.last().ok_or(AnalysisError::EmptySeries)?;

        let elapsed_days = (last - first).num_days();
        if elapsed_days == 0 {
            return Err(AnalysisError::ZeroElapsed);
        }

        let years = elapsed_days as f64 / 365.0;

        Ok(Self {
            total_return: final_equity - 1.0,
            annualized_return: final_equity.powf(1.0 / years) - 1.0,
        })
    }
}

/// Per-row backtest output plus headline metrics
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub positions: Vec<Position>,
    /// Yesterday's exposure times today's return; undefined on row 0
    pub strategy_returns: Vec<Option<f64>>,
    pub buy_hold_equity: Vec<f64>,
    pub strategy_equity: Vec<f64>,
    pub buy_hold: StrategyPerformance,
    pub strategy: StrategyPerformance,
}

impl BacktestResult {
    /// Number of position switches, counting a long on row 0 as an entry from flat
    pub fn position_changes(&self) -> usize {
        let initial = usize::from(self.positions.first() == Some(&Position::Long));
        initial
            + self
                .positions
                .windows(2)
                .filter(|w| w[0] != w[1])
                .count()
    }
}
