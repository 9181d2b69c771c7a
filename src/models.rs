/// Data structures shared by the simulators and the analyzer

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Inputs for an asset price simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceParams {
    pub initial_price: f64,
    pub daily_volatility: f64,
    pub num_days: usize,
    pub num_simulations: usize,
    #[serde(default)]
    pub target_price: Option<f64>,
}

impl PriceParams {
    /// Check every precondition before any randomness is consumed
    pub fn validate(&self) -> ForecastResult<()> {
        require_positive("initial_price", self.initial_price)?;
        require_positive("daily_volatility", self.daily_volatility)?;
        require_nonzero("num_days", self.num_days)?;
        require_nonzero("num_simulations", self.num_simulations)?;
        if let Some(target) = self.target_price {
            if !target.is_finite() {
                return Err(ForecastError::invalid("target_price", "must be finite"));
            }
        }
        Ok(())
    }
}

/// How an inventory trial is replenished.
///
/// The two policies count stockouts differently and are kept apart on purpose:
/// `ReorderPoint` counts stockout days over `num_days * num_simulations`,
/// `FixedInterval` flags stockout trials over `num_simulations`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplenishmentPolicy {
    /// Order back up to the initial level when stock drops below
    /// `avg_daily_demand * lead_time_days` and nothing is outstanding.
    ReorderPoint,
    /// Receive `avg_daily_demand * lead_time_days` units every `lead_time_days` days.
    FixedInterval,
}

/// Inputs for an inventory simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryParams {
    pub initial_inventory: u32,
    pub avg_daily_demand: f64,
    pub demand_volatility: f64,
    pub lead_time_days: usize,
    pub num_days: usize,
    pub num_simulations: usize,
    pub policy: ReplenishmentPolicy,
}

impl InventoryParams {
    pub fn validate(&self) -> ForecastResult<()> {
        require_non_negative("avg_daily_demand", self.avg_daily_demand)?;
        require_non_negative("demand_volatility", self.demand_volatility)?;
        require_nonzero("lead_time_days", self.lead_time_days)?;
        require_nonzero("num_days", self.num_days)?;
        require_nonzero("num_simulations", self.num_simulations)?;
        Ok(())
    }

    /// Level below which the reorder-point policy places an order
    pub fn reorder_point(&self) -> f64 {
        self.avg_daily_demand * self.lead_time_days as f64
    }
}

fn require_positive(name: &'static str, value: f64) -> ForecastResult<()> {
    if !value.is_finite() {
        return Err(ForecastError::invalid(name, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(ForecastError::invalid(name, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

fn require_non_negative(name: &'static str, value: f64) -> ForecastResult<()> {
    if !value.is_finite() {
        return Err(ForecastError::invalid(name, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(ForecastError::invalid(name, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

fn require_nonzero(name: &'static str, value: usize) -> ForecastResult<()> {
    if value == 0 {
        return Err(ForecastError::invalid(name, "must be > 0"));
    }
    Ok(())
}

/// Simulated values laid out day-major in one flat buffer.
///
/// Row 0 holds the starting value of every trial, row `d` the value after day `d`.
/// The buffer is never mutated once built.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PathMatrix {
    /// Assemble from one path per trial, each of length `num_days + 1`
    pub(crate) fn from_columns(num_days: usize, columns: Vec<Vec<f64>>) -> Self {
        let rows = num_days + 1;
        let cols = columns.len();
        let mut values = vec![0.0; rows * cols];
        for (trial, column) in columns.iter().enumerate() {
            debug_assert_eq!(column.len(), rows);
            for (day, value) in column.iter().enumerate() {
                values[day * cols + trial] = *value;
            }
        }
        PathMatrix { rows, cols, values }
    }

    /// Build from day-major rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ForecastResult<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(ForecastError::invalid("rows", "all rows must have the same length"));
        }
        let num_rows = rows.len();
        let values = rows.into_iter().flatten().collect();
        Ok(PathMatrix {
            rows: num_rows,
            cols,
            values,
        })
    }

    /// An empty matrix, the shape a failed or skipped simulation leaves behind
    pub fn empty() -> Self {
        PathMatrix {
            rows: 0,
            cols: 0,
            values: Vec::new(),
        }
    }

    /// `(num_days + 1, num_simulations)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn num_days(&self) -> usize {
        self.rows.saturating_sub(1)
    }

    pub fn num_trials(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, day: usize, trial: usize) -> Option<f64> {
        if day < self.rows && trial < self.cols {
            Some(self.values[day * self.cols + trial])
        } else {
            None
        }
    }

    pub fn row(&self, day: usize) -> Option<&[f64]> {
        if day < self.rows {
            Some(&self.values[day * self.cols..(day + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |day| &self.values[day * self.cols..(day + 1) * self.cols])
    }

    /// Values on the final day across all trials
    pub fn terminal(&self) -> Option<&[f64]> {
        if self.is_empty() {
            return None;
        }
        self.row(self.rows - 1)
    }

    pub fn column(&self, trial: usize) -> Option<Vec<f64>> {
        if trial >= self.cols {
            return None;
        }
        Some(self.rows().map(|row| row[trial]).collect())
    }

    /// Per-day average across trials
    pub fn mean_path(&self) -> Vec<f64> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.rows()
            .map(|row| row.iter().sum::<f64>() / self.cols as f64)
            .collect()
    }

    /// Every value multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        PathMatrix {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }
}

impl Serialize for PathMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// 5th to 95th percentile band of the terminal distribution
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Reduction of a terminal distribution to decision figures
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Percent of trials ending at or above the target, `None` without a target
    pub probability_above_target: Option<f64>,
    /// Percent of trials ending strictly below the reference value
    pub probability_of_loss_or_stockout: f64,
    pub confidence_interval_90: ConfidenceInterval,
    /// `reference_value - p5`; `None` outside the price domain
    pub value_at_risk_95: Option<f64>,
}

/// Stockout count under one replenishment policy, with its own denominator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockoutTally {
    /// Days with unmet demand, out of `num_days * num_simulations`
    StockoutDays { days: u64, opportunities: u64 },
    /// Trials that stocked out at least once, out of `num_simulations`
    StockoutTrials { trials: u64, total: u64 },
}

impl StockoutTally {
    /// Stockout probability in percent
    pub fn probability(&self) -> f64 {
        let (hits, denominator) = match *self {
            StockoutTally::StockoutDays { days, opportunities } => (days, opportunities),
            StockoutTally::StockoutTrials { trials, total } => (trials, total),
        };
        if denominator == 0 {
            return 0.0;
        }
        hits as f64 / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_params() -> PriceParams {
        PriceParams {
            initial_price: 100.0,
            daily_volatility: 0.01,
            num_days: 10,
            num_simulations: 50,
            target_price: None,
        }
    }

    #[test]
    fn test_price_params_reject_zero_volatility() {
        let params = PriceParams {
            daily_volatility: 0.0,
            ..price_params()
        };
        match params.validate() {
            Err(ForecastError::InvalidParameter { name, .. }) => assert_eq!(name, "daily_volatility"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_price_params_reject_nan() {
        let params = PriceParams {
            initial_price: f64::NAN,
            ..price_params()
        };
        assert!(params.validate().is_err());
        assert!(price_params().validate().is_ok());
    }

    #[test]
    fn test_inventory_params_allow_zero_volatility() {
        let params = InventoryParams {
            initial_inventory: 0,
            avg_daily_demand: 0.0,
            demand_volatility: 0.0,
            lead_time_days: 1,
            num_days: 1,
            num_simulations: 1,
            policy: ReplenishmentPolicy::FixedInterval,
        };
        assert!(params.validate().is_ok());

        let negative = InventoryParams {
            avg_daily_demand: -1.0,
            ..params.clone()
        };
        assert!(negative.validate().is_err());

        let no_lead = InventoryParams {
            lead_time_days: 0,
            ..params
        };
        assert!(no_lead.validate().is_err());
    }

    #[test]
    fn test_from_columns_is_day_major() {
        let matrix = PathMatrix::from_columns(2, vec![vec![1.0, 2.0, 3.0], vec![1.0, 5.0, 6.0]]);
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.row(0), Some(&[1.0, 1.0][..]));
        assert_eq!(matrix.terminal(), Some(&[3.0, 6.0][..]));
        assert_eq!(matrix.column(1), Some(vec![1.0, 5.0, 6.0]));
        assert_eq!(matrix.get(1, 0), Some(2.0));
        assert_eq!(matrix.get(3, 0), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(PathMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        let empty = PathMatrix::from_rows(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.terminal(), None);
    }

    #[test]
    fn test_mean_path() {
        let matrix = PathMatrix::from_rows(vec![vec![10.0, 10.0], vec![8.0, 12.0], vec![6.0, 20.0]]).unwrap();
        assert_eq!(matrix.mean_path(), vec![10.0, 10.0, 13.0]);
    }

    #[test]
    fn test_matrix_serializes_as_nested_rows() {
        let matrix = PathMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
    }

    #[test]
    fn test_stockout_tally_denominators() {
        let days = StockoutTally::StockoutDays { days: 3, opportunities: 30 };
        let trials = StockoutTally::StockoutTrials { trials: 1, total: 4 };
        assert_eq!(days.probability(), 10.0);
        assert_eq!(trials.probability(), 25.0);
        let json = serde_json::to_value(trials).unwrap();
        assert_eq!(json["kind"], "stockout_trials");
    }
}
