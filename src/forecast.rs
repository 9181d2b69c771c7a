/// End-to-end forecasts: generate paths, then reduce them
/// Generation and reduction stay separate phases; the analyzer only sees a finished matrix.

use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::error::ForecastResult;
use crate::inventory::InventorySimulator;
use crate::models::{
    ConfidenceInterval, InventoryParams, PathMatrix, PriceParams, ReplenishmentPolicy,
    StockoutTally, SummaryStatistics,
};
use crate::price::PriceSimulator;
use crate::risk::{classify, RiskLevel};
use crate::sampler::SamplerFactory;
use crate::statistics::analyze;
use crate::volatility::estimate_daily_volatility;

/// Price forecast: every simulated path plus the terminal summary
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceForecast {
    pub params: PriceParams,
    pub simulations: PathMatrix,
    pub summary: SummaryStatistics,
}

/// Inventory forecast with the stockout figure of the chosen policy
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventoryForecast {
    pub params: InventoryParams,
    pub simulations: PathMatrix,
    pub stockouts: StockoutTally,
    pub prob_of_stockout: f64,
    pub avg_final_inventory: f64,
    pub confidence_interval_90: ConfidenceInterval,
    /// Terminal summary with the reorder point as reference value
    pub summary: SummaryStatistics,
}

/// Price forecast seeded from a window of historical closes
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoricalForecast {
    pub current_price: f64,
    pub daily_volatility: f64,
    pub confidence_range: ConfidenceInterval,
    pub prob_of_loss: f64,
    pub risk_level: RiskLevel,
    pub forecast: PriceForecast,
}

/// Runs simulations and analysis with one source of random streams
pub struct Forecaster<F> {
    streams: F,
    cancellation: Option<CancellationToken>,
}

impl<F: SamplerFactory + Clone> Forecaster<F> {
    pub fn new(streams: F) -> Self {
        Forecaster {
            streams,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn price(&self, params: &PriceParams) -> ForecastResult<PriceForecast> {
        let mut simulator = PriceSimulator::new(self.streams.clone());
        if let Some(token) = &self.cancellation {
            simulator = simulator.with_cancellation(token.clone());
        }
        let simulations = simulator.simulate(params)?;
        let summary = analyze(&simulations, params.initial_price, params.target_price)?;
        log::info!(
            "price forecast: mean {:.2}, P(loss) {:.2}%, VaR95 {:?}",
            summary.mean,
            summary.probability_of_loss_or_stockout,
            summary.value_at_risk_95
        );
        Ok(PriceForecast {
            params: params.clone(),
            simulations,
            summary,
        })
    }

    pub fn inventory(&self, params: &InventoryParams) -> ForecastResult<InventoryForecast> {
        let mut simulator = InventorySimulator::new(self.streams.clone());
        if let Some(token) = &self.cancellation {
            simulator = simulator.with_cancellation(token.clone());
        }
        let run = simulator.simulate(params)?;
        let mut summary = analyze(&run.paths, params.reorder_point(), None)?;
        // Value at risk only applies to prices
        summary.value_at_risk_95 = None;
        let prob_of_stockout = run.stockouts.probability();
        log::info!(
            "inventory forecast ({}): P(stockout) {:.2}%, mean final {:.1}",
            policy_label(params.policy),
            prob_of_stockout,
            summary.mean
        );
        Ok(InventoryForecast {
            params: params.clone(),
            simulations: run.paths,
            stockouts: run.stockouts,
            prob_of_stockout,
            avg_final_inventory: summary.mean,
            confidence_interval_90: summary.confidence_interval_90,
            summary,
        })
    }

    /// Forecast from historical closes, oldest first. The last close is the
    /// starting price; volatility is estimated from the whole window.
    pub fn from_history(
        &self,
        closes: &[f64],
        num_days: usize,
        num_simulations: usize,
    ) -> ForecastResult<HistoricalForecast> {
        let daily_volatility = estimate_daily_volatility(closes)?;
        // estimate_daily_volatility guarantees at least three closes
        let current_price = closes[closes.len() - 1];
        let params = PriceParams {
            initial_price: current_price,
            daily_volatility,
            num_days,
            num_simulations,
            target_price: None,
        };
        let forecast = self.price(&params)?;
        let prob_of_loss = forecast.summary.probability_of_loss_or_stockout;
        let risk_level = classify(prob_of_loss, daily_volatility);
        log::info!(
            "historical forecast from {} closes: sigma {:.4}, risk {}",
            closes.len(),
            daily_volatility,
            risk_level
        );
        Ok(HistoricalForecast {
            current_price,
            daily_volatility,
            confidence_range: forecast.summary.confidence_interval_90,
            prob_of_loss,
            risk_level,
            forecast,
        })
    }
}

pub fn policy_label(policy: ReplenishmentPolicy) -> &'static str {
    match policy {
        ReplenishmentPolicy::ReorderPoint => "reorder point",
        ReplenishmentPolicy::FixedInterval => "fixed interval",
    }
}
