// src/analysis/quantiles.rs
use crate::analysis::stats::{mean_defined, percentile, HorizonMean};
use crate::error::AnalysisError;
use crate::features::FeatureSet;
use tracing::debug;

/// One equal-frequency MMI bucket
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBucket {
    /// 0 = lowest sentiment
    pub index: usize,
    pub count: usize,
    /// Smallest MMI in the bucket
    pub lower: Option<f64>,
    /// Largest MMI in the bucket
    pub upper: Option<f64>,
    pub means: Vec<HorizonMean>,
}

/// Bucket statistics plus the bucket label of every row
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    pub buckets: Vec<QuantileBucket>,
    /// Per-row bucket index, `None` where MMI is missing
    pub assignments: Vec<Option<usize>>,
}

impl QuantileTable {
    pub fn total_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Interior bucket edges: the `k / quantiles` percentiles of `values`
/// for k = 1..quantiles-1, linearly interpolated.
pub fn bucket_edges(values: &[f64], quantiles: usize) -> Vec<f64> {
    (1..quantiles)
        .filter_map(|k| percentile(values, k as f64 / quantiles as f64))
        .collect()
}

/// Split rows with a defined MMI into `quantiles` equal-frequency
/// buckets cut at the data's own quantiles.
///
/// Buckets are right-closed and the lowest one includes the minimum, so a
/// value goes to the bucket numbered by how many edges lie strictly below
/// it. Equal values always share a bucket; repeated edges leave empty
/// buckets.
pub fn assign_buckets(mmi: &[Option<f64>], quantiles: usize) -> Vec<Option<usize>> {
    if quantiles == 0 {
        return vec![None; mmi.len()];
    }

    let defined: Vec<f64> = mmi.iter().filter_map(|v| *v).collect();
    let edges = bucket_edges(&defined, quantiles);
    debug!("MMI bucket edges: {:?}", edges);

    mmi.iter()
        .map(|value| value.map(|v| edges.iter().filter(|&&edge| edge < v).count()))
        .collect()
}

/// Average every forward-return horizon inside each MMI bucket
pub fn quantile_forward_returns(
    mmi: &[Option<f64>],
    features: &FeatureSet,
    quantiles: usize,
) -> Result<QuantileTable, AnalysisError> {
    if quantiles == 0 {
        return Err(AnalysisError::InvalidParameter(
            "quantile count must be at least 1".to_string(),
        ));
    }

    let assignments = assign_buckets(mmi, quantiles);

    let buckets = (0..quantiles)
        .map(|index| {
            let rows: Vec<usize> = assignments
                .iter()
                .enumerate()
                .filter(|(_, bucket)| **bucket == Some(index))
                .map(|(row, _)| row)
                .collect();

            let values: Vec<f64> = rows.iter().filter_map(|&row| mmi[row]).collect();
            let lower = values.iter().copied().reduce(f64::min);
            let upper = values.iter().copied().reduce(f64::max);

            let means = features
                .forward
                .iter()
                .map(|forward| HorizonMean {
                    horizon: forward.horizon,
                    mean: mean_defined(rows.iter().map(|&row| forward.values[row])),
                })
                .collect();

            debug!(
                "Bucket {}: {} rows, MMI {:?}..{:?}",
                index,
                rows.len(),
                lower,
                upper
            );

            QuantileBucket {
                index,
                count: rows.len(),
                lower,
                upper,
                means,
            }
        })
        .collect();

    Ok(QuantileTable {
        buckets,
        assignments,
    })
}
