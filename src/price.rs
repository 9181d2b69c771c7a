/// Asset price path generation
/// Multiplicative random walk: price[d] = price[d-1] * (1 + shock), shock ~ N(0, daily_volatility²)

use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{PathMatrix, PriceParams};
use crate::sampler::{NormalSampler, SamplerFactory};

pub struct PriceSimulator<F> {
    streams: F,
    cancellation: Option<CancellationToken>,
}

impl<F: SamplerFactory> PriceSimulator<F> {
    pub fn new(streams: F) -> Self {
        PriceSimulator {
            streams,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Generate `num_simulations` independent paths over `num_days` steps.
    /// `target_price` is not used here; it only matters to the analyzer.
    pub fn simulate(&self, params: &PriceParams) -> ForecastResult<PathMatrix> {
        params.validate()?;
        log::debug!(
            "simulating {} price paths over {} days (S0={}, sigma={})",
            params.num_simulations,
            params.num_days,
            params.initial_price,
            params.daily_volatility
        );

        let columns = (0..params.num_simulations)
            .into_par_iter()
            .map(|trial| {
                if self.is_cancelled() {
                    return Err(ForecastError::Cancelled);
                }
                let mut sampler = self.streams.for_trial(trial);
                Ok(simulate_path(&mut sampler, params))
            })
            .collect::<ForecastResult<Vec<_>>>();

        let columns = match columns {
            Ok(columns) => columns,
            Err(err) => {
                log::warn!("price simulation stopped: {}", err);
                return Err(err);
            }
        };

        Ok(PathMatrix::from_columns(params.num_days, columns))
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|token| token.is_cancelled())
            .unwrap_or(false)
    }
}

/// One trial. No floor: extreme shocks may drive the price to or below zero.
fn simulate_path<S: NormalSampler>(sampler: &mut S, params: &PriceParams) -> Vec<f64> {
    let mut path = Vec::with_capacity(params.num_days + 1);
    let mut price = params.initial_price;
    path.push(price);
    for _ in 0..params.num_days {
        let shock = sampler.sample(0.0, params.daily_volatility);
        price *= 1.0 + shock;
        path.push(price);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{ConstantStreams, RandomStreams, ScriptedStreams};
    use approx::assert_relative_eq;

    fn params(num_days: usize, num_simulations: usize) -> PriceParams {
        PriceParams {
            initial_price: 100.0,
            daily_volatility: 0.02,
            num_days,
            num_simulations,
            target_price: None,
        }
    }

    #[test]
    fn test_shape_and_first_row() {
        let matrix = PriceSimulator::new(RandomStreams::seeded(1))
            .simulate(&params(12, 37))
            .unwrap();
        assert_eq!(matrix.shape(), (13, 37));
        assert!(matrix.row(0).unwrap().iter().all(|&p| p == 100.0));
    }

    #[test]
    fn test_multiplicative_step() {
        // shocks of +1 sigma then -1 sigma
        let matrix = PriceSimulator::new(ScriptedStreams::new(vec![1.0, -1.0]))
            .simulate(&params(2, 3))
            .unwrap();
        for trial in 0..3 {
            assert_relative_eq!(matrix.get(1, trial).unwrap(), 102.0, max_relative = 1e-12);
            assert_relative_eq!(matrix.get(2, trial).unwrap(), 102.0 * 0.98, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_no_floor_at_zero() {
        // A -60 sigma shock at 2% volatility is a -120% move
        let matrix = PriceSimulator::new(ConstantStreams::new(-60.0))
            .simulate(&params(1, 1))
            .unwrap();
        assert_relative_eq!(matrix.get(1, 0).unwrap(), -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let a = PriceSimulator::new(RandomStreams::seeded(99)).simulate(&params(20, 64)).unwrap();
        let b = PriceSimulator::new(RandomStreams::seeded(99)).simulate(&params(20, 64)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let sim = PriceSimulator::new(RandomStreams::seeded(1));
        let bad = [
            PriceParams { initial_price: 0.0, ..params(5, 5) },
            PriceParams { daily_volatility: -0.1, ..params(5, 5) },
            params(0, 5),
            params(5, 0),
        ];
        for p in bad.iter() {
            assert!(matches!(sim.simulate(p), Err(ForecastError::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = PriceSimulator::new(RandomStreams::seeded(1))
            .with_cancellation(token)
            .simulate(&params(5, 100));
        assert_eq!(result, Err(ForecastError::Cancelled));
    }
}
