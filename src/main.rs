use std::env;
use std::process::ExitCode;

use mc_forecast::config::ForecastConfig;
use mc_forecast::reporting::{
    display_banner, display_historical_forecast, display_inventory_forecast, display_mean_path,
    display_price_forecast,
};
use mc_forecast::{Forecaster, RandomStreams};

fn main() -> ExitCode {
    env_logger::init();

    // Optional JSON config path as the only argument
    let config = match env::args().nth(1) {
        Some(path) => match ForecastConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => ForecastConfig::default(),
    };

    let streams = match config.seed {
        Some(seed) => RandomStreams::seeded(seed),
        None => RandomStreams::from_entropy(),
    };
    let forecaster = Forecaster::new(streams);

    display_banner();
    println!("Seed: {}\n", streams.seed());

    let mut failed = false;

    if let Some(request) = &config.price {
        match forecaster.price(&request.to_params()) {
            Ok(forecast) => {
                display_price_forecast(&forecast);
                display_mean_path("Price", &forecast.simulations.mean_path(), 10);
                print_json(config.json_output, &forecast);
            }
            Err(err) => {
                log::error!("price forecast failed: {}", err);
                failed = true;
            }
        }
    }

    if let Some(request) = &config.inventory {
        match forecaster.inventory(&request.to_params()) {
            Ok(forecast) => {
                display_inventory_forecast(&forecast);
                display_mean_path("Inventory", &forecast.simulations.mean_path(), 10);
                print_json(config.json_output, &forecast);
            }
            Err(err) => {
                log::error!("inventory forecast failed: {}", err);
                failed = true;
            }
        }
    }

    if let Some(request) = &config.history {
        match forecaster.from_history(&request.closes, request.num_days, request.num_simulations) {
            Ok(forecast) => {
                display_historical_forecast(&forecast);
                print_json(config.json_output, &forecast);
            }
            Err(err) => {
                log::error!("historical forecast failed: {}", err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_json<T: serde::Serialize>(enabled: bool, value: &T) {
    if !enabled {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}\n", json),
        Err(err) => log::error!("failed to serialize forecast: {}", err),
    }
}
