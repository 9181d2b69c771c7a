/// Run configuration for the forecast binary
/// Loaded from a JSON file; anything left out falls back to the built-in defaults

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{InventoryParams, PriceParams, ReplenishmentPolicy};
use crate::volatility::daily_from_annual_percent;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Fixed seed for reproducible runs; drawn from entropy when absent
    pub seed: Option<u64>,
    pub price: Option<PriceRequest>,
    pub inventory: Option<InventoryRequest>,
    pub history: Option<HistoryRequest>,
    /// Also print forecasts as JSON
    pub json_output: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            seed: None,
            price: Some(PriceRequest::default()),
            inventory: Some(InventoryRequest::default()),
            history: None,
            json_output: false,
        }
    }
}

impl ForecastConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Price request as the web form submits it: volatility is annualized, in percent
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PriceRequest {
    pub initial_price: f64,
    pub annual_volatility_pct: f64,
    pub num_days: usize,
    pub num_simulations: usize,
    #[serde(default)]
    pub target_price: Option<f64>,
}

impl Default for PriceRequest {
    fn default() -> Self {
        PriceRequest {
            initial_price: 100.0,
            annual_volatility_pct: 20.0,
            num_days: 30,
            num_simulations: 1_000,
            target_price: Some(105.0),
        }
    }
}

impl PriceRequest {
    pub fn to_params(&self) -> PriceParams {
        PriceParams {
            initial_price: self.initial_price,
            daily_volatility: daily_from_annual_percent(self.annual_volatility_pct),
            num_days: self.num_days,
            num_simulations: self.num_simulations,
            target_price: self.target_price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InventoryRequest {
    pub initial_inventory: u32,
    pub avg_daily_demand: f64,
    pub demand_volatility: f64,
    pub lead_time_days: usize,
    pub num_days: usize,
    pub num_simulations: usize,
    pub policy: ReplenishmentPolicy,
}

impl Default for InventoryRequest {
    fn default() -> Self {
        InventoryRequest {
            initial_inventory: 100,
            avg_daily_demand: 10.0,
            demand_volatility: 3.0,
            lead_time_days: 5,
            num_days: 30,
            num_simulations: 1_000,
            policy: ReplenishmentPolicy::ReorderPoint,
        }
    }
}

impl InventoryRequest {
    pub fn to_params(&self) -> InventoryParams {
        InventoryParams {
            initial_inventory: self.initial_inventory,
            avg_daily_demand: self.avg_daily_demand,
            demand_volatility: self.demand_volatility,
            lead_time_days: self.lead_time_days,
            num_days: self.num_days,
            num_simulations: self.num_simulations,
            policy: self.policy,
        }
    }
}

/// Closing prices, oldest first, for a forecast driven by market history
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryRequest {
    pub closes: Vec<f64>,
    pub num_days: usize,
    pub num_simulations: usize,
}
