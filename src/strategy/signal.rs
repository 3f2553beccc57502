// src/strategy/signal.rs
use crate::strategy::schema::{Position, Thresholds};

/// Incremental series transform: feed one row, get that row's output
pub trait Next<T> {
    type Output;
    fn next(&mut self, input: T) -> Self::Output;
}

/// Long/flat switch driven by MMI thresholds.
///
/// MMI below `entry_below` sets `Long`, MMI above `exit_above` sets
/// `Flat`; anything else (neutral band or missing MMI) keeps the last
/// state. Starts `Flat`.
#[derive(Debug, Clone)]
pub struct ThresholdSignal {
    thresholds: Thresholds,
    state: Position,
}

impl ThresholdSignal {
    pub fn new(thresholds: Thresholds) -> anyhow::Result<Self> {
        if !(thresholds.entry_below <= thresholds.exit_above) {
            return Err(anyhow::anyhow!(
                "entry threshold {} must not exceed exit threshold {}",
                thresholds.entry_below,
                thresholds.exit_above
            ));
        }

        Ok(Self {
            thresholds,
            state: Position::Flat,
        })
    }

    pub fn state(&self) -> Position {
        self.state
    }
}

impl Next<Option<f64>> for ThresholdSignal {
    type Output = Position;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        if let Some(mmi) = input {
            if mmi < self.thresholds.entry_below {
                self.state = Position::Long;
            } else if mmi > self.thresholds.exit_above {
                self.state = Position::Flat;
            }
        }

        self.state
    }
}

/// Running product of (1 + r), seeded at 1.0. Undefined returns leave the
/// curve unchanged.
#[derive(Debug, Clone)]
pub struct EquityCurve {
    value: f64,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self { value: 1.0 }
    }
}

impl Default for EquityCurve {
    fn default() -> Self {
        Self::new()
    }
}

impl Next<Option<f64>> for EquityCurve {
    type Output = f64;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        if let Some(r) = input {
            self.value *= 1.0 + r;
        }
        self.value
    }
}
