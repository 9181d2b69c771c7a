/// Statistical reduction of simulated paths
/// Reduces the terminal row of a path matrix to mean, extrema, percentile band and tail figures

use crate::error::{ForecastError, ForecastResult};
use crate::models::{ConfidenceInterval, PathMatrix, SummaryStatistics};

/// Summarize the terminal distribution of `matrix`.
///
/// `reference_value` is the level below which a trial counts as a loss (or a
/// stockout proxy); `target_value`, when given, yields the share of trials
/// finishing at or above it. An empty matrix is reported as `NoData`.
pub fn analyze(
    matrix: &PathMatrix,
    reference_value: f64,
    target_value: Option<f64>,
) -> ForecastResult<SummaryStatistics> {
    let terminal = matrix.terminal().ok_or(ForecastError::NoData)?;
    summarize(terminal, reference_value, target_value)
}

/// Same reduction as [`analyze`], starting from an optional matrix
pub fn analyze_optional(
    matrix: Option<&PathMatrix>,
    reference_value: f64,
    target_value: Option<f64>,
) -> ForecastResult<SummaryStatistics> {
    match matrix {
        Some(matrix) => analyze(matrix, reference_value, target_value),
        None => Err(ForecastError::NoData),
    }
}

/// Reduce a slice of terminal values directly
pub fn summarize(
    values: &[f64],
    reference_value: f64,
    target_value: Option<f64>,
) -> ForecastResult<SummaryStatistics> {
    if values.is_empty() {
        return Err(ForecastError::NoData);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let probability_above_target =
        target_value.map(|target| share_percent(&sorted, |v| v >= target));
    let probability_of_loss_or_stockout = share_percent(&sorted, |v| v < reference_value);

    let p5 = percentile_sorted(&sorted, 5.0);
    let p95 = percentile_sorted(&sorted, 95.0);

    Ok(SummaryStatistics {
        mean,
        min,
        max,
        probability_above_target,
        probability_of_loss_or_stockout,
        confidence_interval_90: ConfidenceInterval {
            lower: p5,
            upper: p95,
        },
        value_at_risk_95: Some(reference_value - p5),
    })
}

fn share_percent(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    let hits = values.iter().filter(|&&v| predicate(v)).count();
    hits as f64 / values.len() as f64 * 100.0
}

/// Percentile `p` in [0, 100] with linear interpolation between closest ranks.
/// Returns `None` for an empty slice or a non-finite `p`.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !p.is_finite() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(percentile_sorted(&sorted, p))
}

/// `sorted` must be ascending and non-empty
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(terminal: Vec<f64>) -> PathMatrix {
        let start = vec![100.0; terminal.len()];
        PathMatrix::from_rows(vec![start, terminal]).unwrap()
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        // rank = 0.05 * 9 = 0.45
        assert_relative_eq!(percentile(&values, 5.0).unwrap(), 1.45, max_relative = 1e-12);
        assert_relative_eq!(percentile(&values, 95.0).unwrap(), 9.55, max_relative = 1e-12);
        assert_eq!(percentile(&values, 50.0), Some(5.5));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(10.0));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[3.0], 5.0), Some(3.0));
    }

    #[test]
    fn test_percentile_rejects_non_finite_rank() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&values, f64::NAN), None);
        assert_eq!(percentile(&values, f64::INFINITY), None);
        assert_eq!(percentile(&values, 150.0), Some(3.0));
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let values = [7.0, 1.0, 4.0, 10.0, 2.0];
        assert_eq!(percentile(&values, 50.0), Some(4.0));
    }

    #[test]
    fn test_analyze_price_terminal() {
        let m = matrix(vec![90.0, 95.0, 100.0, 105.0, 110.0]);
        let stats = analyze(&m, 100.0, Some(105.0)).unwrap();
        assert_eq!(stats.mean, 100.0);
        assert_eq!(stats.min, 90.0);
        assert_eq!(stats.max, 110.0);
        assert_eq!(stats.probability_above_target, Some(40.0));
        assert_eq!(stats.probability_of_loss_or_stockout, 40.0);
        // rank 0.2 and 3.8
        assert_relative_eq!(stats.confidence_interval_90.lower, 91.0, max_relative = 1e-12);
        assert_relative_eq!(stats.confidence_interval_90.upper, 109.0, max_relative = 1e-12);
        assert_relative_eq!(stats.value_at_risk_95.unwrap(), 9.0, max_relative = 1e-9);
    }

    #[test]
    fn test_missing_target_is_none() {
        let stats = analyze(&matrix(vec![1.0, 2.0]), 1.5, None).unwrap();
        assert_eq!(stats.probability_above_target, None);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["probability_above_target"].is_null());
    }

    #[test]
    fn test_no_data() {
        assert_eq!(analyze(&PathMatrix::empty(), 100.0, None), Err(ForecastError::NoData));
        assert_eq!(analyze_optional(None, 100.0, None), Err(ForecastError::NoData));
        let no_trials = PathMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        assert_eq!(analyze(&no_trials, 100.0, None), Err(ForecastError::NoData));
    }

    #[test]
    fn test_scaling_is_linear() {
        let m = matrix(vec![3.0, 8.0, 1.0, 12.5, 7.25, 4.0, 9.5]);
        let k = 2.5;
        let base = analyze(&m, 5.0, None).unwrap();
        let scaled = analyze(&m.scaled(k), 5.0 * k, None).unwrap();
        assert_relative_eq!(scaled.mean, base.mean * k, max_relative = 1e-12);
        assert_relative_eq!(scaled.min, base.min * k, max_relative = 1e-12);
        assert_relative_eq!(scaled.max, base.max * k, max_relative = 1e-12);
        assert_relative_eq!(
            scaled.confidence_interval_90.lower,
            base.confidence_interval_90.lower * k,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            scaled.confidence_interval_90.upper,
            base.confidence_interval_90.upper * k,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_band_within_extrema_and_idempotent() {
        let m = matrix(vec![5.0, -2.0, 14.0, 3.3, 3.3, 0.0, 8.1, 11.0]);
        let first = analyze(&m, 4.0, Some(6.0)).unwrap();
        let second = analyze(&m, 4.0, Some(6.0)).unwrap();
        assert_eq!(first, second);
        let band = first.confidence_interval_90;
        assert!(first.min <= band.lower);
        assert!(band.lower <= band.upper);
        assert!(band.upper <= first.max);
    }
}
