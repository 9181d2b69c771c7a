//! Monte Carlo forecasting for asset prices and replenished inventory.
//!
//! Simulators generate a dense path matrix per request; the analyzer reduces
//! its terminal row to summary statistics. Randomness is injected through
//! [`sampler::SamplerFactory`], one independent stream per trial.

pub mod cancel;
pub mod config;
pub mod error;
pub mod forecast;
pub mod inventory;
pub mod models;
pub mod price;
pub mod reporting;
pub mod risk;
pub mod sampler;
pub mod statistics;
pub mod volatility;

pub use cancel::CancellationToken;
pub use error::{ConfigError, ForecastError, ForecastResult};
pub use forecast::{Forecaster, HistoricalForecast, InventoryForecast, PriceForecast};
pub use inventory::{InventoryRun, InventorySimulator};
pub use models::{
    ConfidenceInterval, InventoryParams, PathMatrix, PriceParams, ReplenishmentPolicy,
    StockoutTally, SummaryStatistics,
};
pub use price::PriceSimulator;
pub use risk::{classify, RiskLevel};
pub use sampler::{ConstantStreams, NormalSampler, RandomStreams, SamplerFactory, ScriptedStreams};
pub use statistics::{analyze, percentile};
