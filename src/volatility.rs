/// Volatility inputs for the price simulator
/// Converts annualized percentages and estimates daily volatility from closing prices

use crate::error::{ForecastError, ForecastResult};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual volatility in percent (e.g. 20.0) to a daily standard deviation
pub fn daily_from_annual_percent(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / TRADING_DAYS_PER_YEAR.sqrt()
}

/// Day-over-day percentage returns, `close[i] / close[i-1] - 1`
pub fn daily_returns(closes: &[f64]) -> ForecastResult<Vec<f64>> {
    if let Some(bad) = closes.iter().find(|c| !c.is_finite() || **c <= 0.0) {
        return Err(ForecastError::invalid(
            "closes",
            format!("prices must be positive and finite, got {}", bad),
        ));
    }
    Ok(closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Sample standard deviation of daily returns over the given window.
/// Needs at least three closes (two returns).
pub fn estimate_daily_volatility(closes: &[f64]) -> ForecastResult<f64> {
    let returns = daily_returns(closes)?;
    if returns.len() < 2 {
        return Err(ForecastError::NoData);
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annual_to_daily() {
        assert_relative_eq!(daily_from_annual_percent(20.0), 0.2 / 252f64.sqrt());
        assert_eq!(daily_from_annual_percent(0.0), 0.0);
    }

    #[test]
    fn test_returns() {
        let returns = daily_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_relative_eq!(returns[0], 0.1, max_relative = 1e-12);
        assert_relative_eq!(returns[1], -0.1, max_relative = 1e-12);
    }

    #[test]
    fn test_estimate_sample_std() {
        // returns +10%, -10%: mean 0, sample variance 0.02
        let vol = estimate_daily_volatility(&[100.0, 110.0, 99.0]).unwrap();
        assert_relative_eq!(vol, 0.02f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        assert_eq!(estimate_daily_volatility(&[50.0, 50.0, 50.0, 50.0]), Ok(0.0));
    }

    #[test]
    fn test_too_short_or_bad_prices() {
        assert_eq!(estimate_daily_volatility(&[100.0, 101.0]), Err(ForecastError::NoData));
        assert!(matches!(
            estimate_daily_volatility(&[100.0, 0.0, 101.0]),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }
}
