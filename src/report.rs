// src/report.rs
use crate::analysis::{ExtremeSubset, HorizonMean};
use crate::features::horizon_label;
use crate::study::Study;
use std::fmt::Write;

pub const CORRELATION_HEADER: &str = "==== Correlation Analysis ====";
pub const QUANTILE_HEADER: &str = "==== Quantile Forward Returns ====";
pub const FEAR_HEADER: &str = "==== Extreme Fear (Lowest 20%) ====";
pub const GREED_HEADER: &str = "==== Extreme Greed (Highest 20%) ====";
pub const PERFORMANCE_HEADER: &str = "==== Performance Comparison ====";

/// Render the plain-text study report printed on stdout
pub fn render_report(study: &Study) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    write_report(&mut out, study).ok();
    out
}

/// Write every report section, in order, into `out`
pub fn write_report<W: Write>(out: &mut W, study: &Study) -> std::fmt::Result {
    write_correlations(out, study)?;
    write_quantiles(out, study)?;
    write_extreme(out, FEAR_HEADER, "<=", &study.extremes.fear)?;
    write_extreme(out, GREED_HEADER, ">=", &study.extremes.greed)?;
    write_performance(out, study)
}

fn write_correlations(out: &mut impl Write, study: &Study) -> std::fmt::Result {
    writeln!(out, "\n{}", CORRELATION_HEADER)?;

    for result in &study.correlations {
        writeln!(
            out,
            "MMI vs {}d Forward Return: Corr = {}, p-value = {}",
            result.horizon,
            fmt_opt(result.coefficient, 4),
            fmt_opt(result.p_value, 4)
        )?;
    }

    Ok(())
}

fn write_quantiles(out: &mut impl Write, study: &Study) -> std::fmt::Result {
    writeln!(out, "\n{}", QUANTILE_HEADER)?;

    let labels: Vec<String> = study
        .features
        .horizons()
        .into_iter()
        .map(horizon_label)
        .collect();

    write!(out, "{:<12} {:>15} {:>6}", "MMI_Quantile", "MMI range", "Rows")?;
    for label in &labels {
        write!(out, " {:>15}", label)?;
    }
    writeln!(out)?;

    for bucket in &study.quantiles.buckets {
        let range = match (bucket.lower, bucket.upper) {
            (Some(lo), Some(hi)) => format!("{:.2}-{:.2}", lo, hi),
            _ => "-".to_string(),
        };
        write!(out, "{:<12} {:>15} {:>6}", bucket.index, range, bucket.count)?;
        for mean in &bucket.means {
            write!(out, " {:>15}", fmt_opt(mean.mean, 6))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_extreme(
    out: &mut impl Write,
    header: &str,
    comparison: &str,
    subset: &ExtremeSubset,
) -> std::fmt::Result {
    writeln!(out, "\n{}", header)?;
    writeln!(
        out,
        "MMI {} {} ({} rows)",
        comparison,
        fmt_opt(subset.threshold, 2),
        subset.count
    )?;

    for HorizonMean { horizon, mean } in &subset.means {
        writeln!(out, "{:<16} {:>12}", horizon_label(*horizon), fmt_opt(*mean, 6))?;
    }

    Ok(())
}

fn write_performance(out: &mut impl Write, study: &Study) -> std::fmt::Result {
    let backtest = &study.backtest;

    writeln!(out, "\n{}", PERFORMANCE_HEADER)?;
    writeln!(out, "Buy & Hold Total Return: {:.2}", backtest.buy_hold.total_return)?;
    writeln!(out, "Buy & Hold CAGR: {:.2}%", backtest.buy_hold.annualized_return * 100.0)?;
    writeln!(out, "Strategy Total Return: {:.2}", backtest.strategy.total_return)?;
    writeln!(out, "Strategy CAGR: {:.2}%", backtest.strategy.annualized_return * 100.0)?;

    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::data::models::{MoodRecord, MoodSeries};
    use chrono::{Duration, NaiveDate};

    fn study(rows: usize) -> Study {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let records = (0..rows)
            .map(|i| MoodRecord {
                date: start + Duration::days(i as i64),
                mmi: Some(((i * 37) % 100) as f64),
                nifty: 100.0 + i as f64,
            })
            .collect();

        Study::run(MoodSeries::from_records(records), &Settings::default()).unwrap()
    }

    #[test]
    fn sections_appear_in_order() {
        let report = render_report(&study(120));

        let positions: Vec<usize> = [
            CORRELATION_HEADER,
            QUANTILE_HEADER,
            FEAR_HEADER,
            GREED_HEADER,
            PERFORMANCE_HEADER,
        ]
        .iter()
        .map(|h| report.find(h).expect("header missing"))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.contains("MMI vs 60d Forward Return: Corr = "));
        assert!(report.contains("Fwd_20d_Return"));
    }

    #[test]
    fn performance_lines_use_two_decimals() {
        let report = render_report(&study(366));

        // Nifty 100 -> 465 over 365 days: total 3.65, CAGR 365%
        assert!(report.contains("Buy & Hold Total Return: 3.65"));
        assert!(report.contains("Buy & Hold CAGR: 365.00%"));
    }

    struct FullBuffer;

    impl Write for FullBuffer {
        fn write_str(&mut self, _: &str) -> std::fmt::Result {
            Err(std::fmt::Error)
        }
    }

    #[test]
    fn write_errors_propagate() {
        let study = study(120);
        assert!(write_report(&mut FullBuffer, &study).is_err());

        let mut out = String::new();
        write_report(&mut out, &study).unwrap();
        assert_eq!(out, render_report(&study));
    }

    #[test]
    fn undefined_values_print_as_nan() {
        assert_eq!(fmt_opt(None, 4), "NaN");
        assert_eq!(fmt_opt(Some(0.123456), 4), "0.1235");
    }
}
