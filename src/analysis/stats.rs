// src/analysis/stats.rs
use statrs::statistics::Statistics;

/// Mean of a forward-return horizon over some subset of rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonMean {
    pub horizon: usize,
    /// `None` when no row in the subset has a defined value
    pub mean: Option<f64>,
}

/// Mean of the defined values, skipping gaps
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let defined: Vec<f64> = values.into_iter().flatten().collect();
    if defined.is_empty() {
        return None;
    }
    Some(defined.iter().mean())
}

/// Percentile with linear interpolation between order statistics
/// (position `p * (n - 1)`), `p` in [0, 1].
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mean_skips_gaps() {
        assert_eq!(mean_defined(vec![Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_defined(vec![None, None]), None);
        assert_eq!(mean_defined(Vec::new()), None);
    }

    #[test]
    fn percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(percentile(&values, 0.2).unwrap(), 1.8, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&values, 0.8).unwrap(), 4.2, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&values, 0.5).unwrap(), 3.0, epsilon = 1e-12);
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(5.0));
    }

    #[test]
    fn percentile_of_unsorted_and_degenerate_input() {
        assert_eq!(percentile(&[9.0, 1.0, 5.0], 0.5), Some(5.0));
        assert_eq!(percentile(&[7.0], 0.2), Some(7.0));
        assert_eq!(percentile(&[], 0.2), None);
        assert_eq!(percentile(&[1.0, 2.0], 1.5), None);
    }
}
