// src/features/returns.rs

/// Percentage change against the previous row. Row 0 has no predecessor.
pub fn daily_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut results = Vec::with_capacity(prices.len());

    if prices.is_empty() {
        return results;
    }

    results.push(None);
    results.extend(prices.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));

    results
}

/// Return from row t to row t + horizon. The last `horizon` rows have no
/// future price and stay undefined.
pub fn forward_returns(prices: &[f64], horizon: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|t| {
            prices
                .get(t + horizon)
                .map(|future| future / prices[t] - 1.0)
        })
        .collect()
}
