pub mod correlation;
pub mod extremes;
pub mod quantiles;
pub mod stats;

pub use self::correlation::{correlate_horizons, CorrelationResult};
pub use self::extremes::{extreme_study, ExtremeStudy, ExtremeSubset};
pub use self::quantiles::{quantile_forward_returns, QuantileBucket, QuantileTable};
pub use self::stats::HorizonMean;
