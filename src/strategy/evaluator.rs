// src/strategy/evaluator.rs
use crate::data::MoodSeries;
use crate::error::AnalysisError;
use crate::strategy::schema::{BacktestResult, Position, StrategyPerformance, Thresholds};
use crate::strategy::signal::{EquityCurve, Next, ThresholdSignal};
use anyhow::Result;
use tracing::info;

/// Backtests the MMI threshold rule against buy-and-hold
pub struct StrategyEvaluator {
    thresholds: Thresholds,
}

impl StrategyEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Walk the series in date order.
    ///
    /// The return realized on row t uses the position held at row t - 1,
    /// so a signal never trades on the day it is observed.
    pub fn backtest(
        &self,
        series: &MoodSeries,
        daily_returns: &[Option<f64>],
    ) -> Result<BacktestResult> {
        let (first, last) = match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnalysisError::EmptySeries.into()),
        };

        info!(
            "Backtesting MMI strategy (long below {}, flat above {}) over {} rows",
            self.thresholds.entry_below,
            self.thresholds.exit_above,
            series.len()
        );

        let mut signal = ThresholdSignal::new(self.thresholds)?;
        let positions: Vec<Position> = series.mmi.iter().map(|&mmi| signal.next(mmi)).collect();

        let strategy_returns = Self::lagged_returns(&positions, daily_returns);

        let mut buy_hold_curve = EquityCurve::new();
        let buy_hold_equity: Vec<f64> = daily_returns
            .iter()
            .map(|&r| buy_hold_curve.next(r))
            .collect();

        let mut strategy_curve = EquityCurve::new();
        let strategy_equity: Vec<f64> = strategy_returns
            .iter()
            .map(|&r| strategy_curve.next(r))
            .collect();

        let buy_hold = StrategyPerformance::from_curve(&buy_hold_equity, first, last)?;
        let strategy = StrategyPerformance::from_curve(&strategy_equity, first, last)?;

        let result = BacktestResult {
            positions,
            strategy_returns,
            buy_hold_equity,
            strategy_equity,
            buy_hold,
            strategy,
        };

        info!(
            "Backtest done: {} position changes, strategy total {:.4} vs buy & hold {:.4}",
            result.position_changes(),
            result.strategy.total_return,
            result.buy_hold.total_return
        );

        Ok(result)
    }

    /// position[t - 1] * return[t]; undefined on row 0 and wherever the
    /// daily return is undefined
    fn lagged_returns(positions: &[Position], daily_returns: &[Option<f64>]) -> Vec<Option<f64>> {
        daily_returns
            .iter()
            .enumerate()
            .map(|(t, &r)| {
                let previous = t.checked_sub(1).and_then(|p| positions.get(p))?;
                r.map(|r| previous.exposure() * r)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::MoodRecord;
    use crate::features::daily_returns;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(rows: &[(u32, f64, f64)]) -> MoodSeries {
        MoodSeries::from_records(
            rows.iter()
                .map(|&(day, mmi, nifty)| MoodRecord {
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    mmi: Some(mmi),
                    nifty,
                })
                .collect(),
        )
    }

    #[test]
    fn carries_long_through_neutral_band() {
        let series = series(&[(1, 80.0, 100.0), (2, 20.0, 105.0), (3, 50.0, 110.0), (4, 60.0, 108.0)]);
        let returns = daily_returns(&series.nifty);

        let result = StrategyEvaluator::new(Thresholds::default())
            .backtest(&series, &returns)
            .unwrap();

        assert_eq!(
            result.positions,
            vec![Position::Flat, Position::Long, Position::Long, Position::Long]
        );
        assert!(result.strategy_returns[0].is_none());
        assert_eq!(result.strategy_returns[1], Some(0.0));
        assert_abs_diff_eq!(result.strategy_returns[2].unwrap(), 110.0 / 105.0 - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.strategy_returns[3].unwrap(), 108.0 / 110.0 - 1.0, epsilon = 1e-12);

        assert_eq!(result.buy_hold_equity[0], 1.0);
        assert_abs_diff_eq!(*result.buy_hold_equity.last().unwrap(), 1.08, epsilon = 1e-12);
        assert_abs_diff_eq!(*result.strategy_equity.last().unwrap(), 108.0 / 105.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.buy_hold.total_return, 0.08, epsilon = 1e-12);
        assert_eq!(result.position_changes(), 1);
    }

    #[test]
    fn buy_hold_matches_price_ratio() {
        let rows: Vec<(u32, f64, f64)> = (1..=28)
            .map(|d| (d, (d * 7 % 100) as f64, 100.0 + ((d * 13) % 11) as f64))
            .collect();
        let series = series(&rows);
        let returns = daily_returns(&series.nifty);

        let result = StrategyEvaluator::new(Thresholds::default())
            .backtest(&series, &returns)
            .unwrap();

        let ratio = series.nifty[series.len() - 1] / series.nifty[0];
        assert_abs_diff_eq!(*result.buy_hold_equity.last().unwrap(), ratio, epsilon = 1e-9);
        assert_eq!(result.strategy_equity.len(), series.len());
    }

    #[test]
    fn single_row_cannot_be_annualized() {
        let series = series(&[(1, 50.0, 100.0)]);
        let returns = daily_returns(&series.nifty);

        let err = StrategyEvaluator::new(Thresholds::default())
            .backtest(&series, &returns)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::ZeroElapsed)
        ));
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = StrategyEvaluator::new(Thresholds::default())
            .backtest(&MoodSeries::new(), &[])
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::EmptySeries)
        ));
    }
}
