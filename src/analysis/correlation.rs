// src/analysis/correlation.rs
use crate::features::FeatureSet;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, warn};

/// Pearson correlation between MMI and one forward-return horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub horizon: usize,
    /// Rows where both MMI and the forward return are defined
    pub observations: usize,
    pub coefficient: Option<f64>,
    /// Two-sided p-value against zero correlation
    pub p_value: Option<f64>,
}

/// Pearson correlation coefficient; `None` for mismatched, short or
/// constant input.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;

    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Two-sided p-value for a sample correlation `r` over `n` pairs,
/// using Student's t with n - 2 degrees of freedom.
pub fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 2 || !r.is_finite() {
        return None;
    }
    if n == 2 {
        // Two points always lie on a line
        return Some(1.0);
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;

    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Correlate MMI with every forward-return horizon in `features`
pub fn correlate_horizons(mmi: &[Option<f64>], features: &FeatureSet) -> Vec<CorrelationResult> {
    features
        .forward
        .iter()
        .map(|forward| {
            let (x, y): (Vec<f64>, Vec<f64>) = mmi
                .iter()
                .zip(forward.values.iter())
                .filter_map(|(m, r)| Some(((*m)?, (*r)?)))
                .unzip();

            let coefficient = pearson_correlation(&x, &y);
            let p_value = coefficient.and_then(|r| correlation_p_value(r, x.len()));

            if coefficient.is_none() {
                warn!(
                    "Correlation for {}d horizon undefined ({} usable rows)",
                    forward.horizon,
                    x.len()
                );
            } else {
                debug!(
                    "{}d horizon: r = {:?}, p = {:?} over {} rows",
                    forward.horizon,
                    coefficient,
                    p_value,
                    x.len()
                );
            }

            CorrelationResult {
                horizon: forward.horizon,
                observations: x.len(),
                coefficient,
                p_value,
            }
        })
        .collect()
}
