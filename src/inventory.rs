/// Daily inventory simulation under a replenishment policy
/// Each trial walks the horizon day by day: receive stock, draw demand, fulfil, replenish

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{InventoryParams, PathMatrix, ReplenishmentPolicy, StockoutTally};
use crate::sampler::{NormalSampler, SamplerFactory};

/// Output of an inventory run: the level paths plus the policy's stockout count
#[derive(Clone, Debug, PartialEq)]
pub struct InventoryRun {
    pub paths: PathMatrix,
    pub stockouts: StockoutTally,
}

/// Result of a single trial
struct TrialOutcome {
    path: Vec<f64>,
    stockout_days: u64,
}

pub struct InventorySimulator<F> {
    streams: F,
    cancellation: Option<CancellationToken>,
}

impl<F: SamplerFactory> InventorySimulator<F> {
    pub fn new(streams: F) -> Self {
        InventorySimulator {
            streams,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn simulate(&self, params: &InventoryParams) -> ForecastResult<InventoryRun> {
        params.validate()?;
        log::debug!(
            "simulating {} inventory paths over {} days ({:?}, lead time {})",
            params.num_simulations,
            params.num_days,
            params.policy,
            params.lead_time_days
        );

        let outcomes = (0..params.num_simulations)
            .into_par_iter()
            .map(|trial| {
                if self.is_cancelled() {
                    return Err(ForecastError::Cancelled);
                }
                let mut sampler = self.streams.for_trial(trial);
                Ok(match params.policy {
                    ReplenishmentPolicy::ReorderPoint => run_reorder_point(&mut sampler, params),
                    ReplenishmentPolicy::FixedInterval => run_fixed_interval(&mut sampler, params),
                })
            })
            .collect::<ForecastResult<Vec<TrialOutcome>>>();

        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(err) => {
                log::warn!("inventory simulation stopped: {}", err);
                return Err(err);
            }
        };

        let trials = params.num_simulations as u64;
        let stockouts = match params.policy {
            ReplenishmentPolicy::ReorderPoint => StockoutTally::StockoutDays {
                days: outcomes.iter().map(|o| o.stockout_days).sum(),
                opportunities: params.num_days as u64 * trials,
            },
            ReplenishmentPolicy::FixedInterval => StockoutTally::StockoutTrials {
                trials: outcomes.iter().filter(|o| o.stockout_days > 0).count() as u64,
                total: trials,
            },
        };

        let columns = outcomes.into_iter().map(|o| o.path).collect();
        Ok(InventoryRun {
            paths: PathMatrix::from_columns(params.num_days, columns),
            stockouts,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|token| token.is_cancelled())
            .unwrap_or(false)
    }
}

/// Reorder-point policy with order tracking.
/// Demand is compared unfloored; only the ending level is floored at zero.
fn run_reorder_point<S: NormalSampler>(sampler: &mut S, params: &InventoryParams) -> TrialOutcome {
    let initial = params.initial_inventory as f64;
    let reorder_point = params.reorder_point();

    let mut path = Vec::with_capacity(params.num_days + 1);
    path.push(initial);
    let mut level = initial;
    let mut stockout_days = 0;
    // arrival day -> quantity
    let mut pending: HashMap<usize, f64> = HashMap::new();

    for day in 1..=params.num_days {
        if let Some(quantity) = pending.remove(&day) {
            level += quantity;
        }

        let demand = sampler.sample(params.avg_daily_demand, params.demand_volatility);
        if level >= demand {
            level -= demand;
        } else {
            level = 0.0;
            stockout_days += 1;
        }

        if level < reorder_point && pending.is_empty() {
            let quantity = initial - level;
            // Orders landing past the horizon are never placed
            let arrival = day
                .checked_add(params.lead_time_days)
                .filter(|&arrival| arrival <= params.num_days);
            if let (Some(arrival), true) = (arrival, quantity > 0.0) {
                pending.insert(arrival, quantity);
            }
        }

        path.push(level);
    }

    TrialOutcome { path, stockout_days }
}

/// Fixed-interval policy: a delivery every `lead_time_days` days, no order tracking.
fn run_fixed_interval<S: NormalSampler>(sampler: &mut S, params: &InventoryParams) -> TrialOutcome {
    let initial = params.initial_inventory as f64;
    let delivery = params.reorder_point();

    let mut path = Vec::with_capacity(params.num_days + 1);
    path.push(initial);
    let mut level = initial;
    let mut stocked_out = false;

    for day in 1..=params.num_days {
        let demand = sampler.sample(params.avg_daily_demand, params.demand_volatility);
        if demand > level {
            stocked_out = true;
            level = 0.0;
        } else {
            level -= demand;
        }

        if day % params.lead_time_days == 0 {
            level += delivery;
        }

        path.push(level);
    }

    TrialOutcome {
        path,
        stockout_days: u64::from(stocked_out),
    }
}
