// src/analysis/extremes.rs
use crate::analysis::stats::{mean_defined, percentile, HorizonMean};
use crate::error::AnalysisError;
use crate::features::FeatureSet;
use tracing::{debug, warn};

/// Rows whose MMI lies at or beyond a percentile threshold
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeSubset {
    /// MMI percentile bounding the subset, `None` without any MMI data
    pub threshold: Option<f64>,
    pub count: usize,
    pub means: Vec<HorizonMean>,
}

/// Extreme fear (lowest MMI) and extreme greed (highest MMI) subsets
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeStudy {
    /// Fraction of the distribution in each tail, e.g. 0.2
    pub fraction: f64,
    pub fear: ExtremeSubset,
    pub greed: ExtremeSubset,
}

impl ExtremeStudy {
    /// Rows counted in both tails; only happens when thresholds coincide
    /// or overlap because of repeated MMI values.
    pub fn overlap(&self, mmi: &[Option<f64>]) -> usize {
        match (self.fear.threshold, self.greed.threshold) {
            (Some(low), Some(high)) => mmi
                .iter()
                .flatten()
                .filter(|&&v| v <= low && v >= high)
                .count(),
            _ => 0,
        }
    }
}

/// Mean forward returns for MMI <= p(fraction) and MMI >= p(1 - fraction)
pub fn extreme_study(
    mmi: &[Option<f64>],
    features: &FeatureSet,
    fraction: f64,
    horizons: &[usize],
) -> Result<ExtremeStudy, AnalysisError> {
    if !(fraction > 0.0 && fraction <= 0.5) {
        return Err(AnalysisError::InvalidParameter(format!(
            "extreme fraction {} outside (0, 0.5]",
            fraction
        )));
    }

    let defined: Vec<f64> = mmi.iter().flatten().copied().collect();
    let low_threshold = percentile(&defined, fraction);
    let high_threshold = percentile(&defined, 1.0 - fraction);

    let fear = subset(mmi, features, horizons, low_threshold, |v, t| v <= t)?;
    let greed = subset(mmi, features, horizons, high_threshold, |v, t| v >= t)?;

    debug!(
        "Extreme thresholds: low {:?} ({} rows), high {:?} ({} rows)",
        low_threshold, fear.count, high_threshold, greed.count
    );

    let study = ExtremeStudy {
        fraction,
        fear,
        greed,
    };

    let overlap = study.overlap(mmi);
    if overlap > 0 {
        warn!(
            "{} rows fall into both extreme subsets (repeated MMI values at the thresholds)",
            overlap
        );
    }

    Ok(study)
}

fn subset<F>(
    mmi: &[Option<f64>],
    features: &FeatureSet,
    horizons: &[usize],
    threshold: Option<f64>,
    keep: F,
) -> Result<ExtremeSubset, AnalysisError>
where
    F: Fn(f64, f64) -> bool,
{
    let rows: Vec<usize> = match threshold {
        Some(t) => mmi
            .iter()
            .enumerate()
            .filter(|(_, value)| value.map_or(false, |v| keep(v, t)))
            .map(|(row, _)| row)
            .collect(),
        None => Vec::new(),
    };

    let means = horizons
        .iter()
        .map(|&horizon| {
            let forward = features.forward(horizon)?;
            Ok(HorizonMean {
                horizon,
                mean: mean_defined(rows.iter().map(|&row| forward.values[row])),
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    Ok(ExtremeSubset {
        threshold,
        count: rows.len(),
        means,
    })
}
