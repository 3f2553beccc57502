// src/strategy/mod.rs
pub mod evaluator;
pub mod schema;
pub mod signal;

pub use self::evaluator::StrategyEvaluator;
pub use self::schema::{BacktestResult, Position, StrategyPerformance, Thresholds};
