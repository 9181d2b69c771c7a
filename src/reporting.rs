/// Reporting and output formatting module
/// Handles all console output and forecast presentation

use crate::forecast::{policy_label, HistoricalForecast, InventoryForecast, PriceForecast};
use crate::models::StockoutTally;

pub fn display_banner() {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                    MONTE CARLO PRICE & INVENTORY FORECAST                    ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");
}

/// Display a price forecast summary
pub fn display_price_forecast(forecast: &PriceForecast) {
    let params = &forecast.params;
    let summary = &forecast.summary;

    println!("=== Price Simulation ===");
    println!(
        "  Start: ${:.2} | Daily σ: {:.4} | {} days x {} paths",
        params.initial_price, params.daily_volatility, params.num_days, params.num_simulations
    );
    println!("  Average Final Price:   ${:.2}", summary.mean);
    println!("  Best Case:             ${:.2}", summary.max);
    println!("  Worst Case:            ${:.2}", summary.min);
    match (params.target_price, summary.probability_above_target) {
        (Some(target), Some(probability)) => {
            println!("  P(final ≥ ${:.2}):     {:.2}%", target, probability)
        }
        _ => println!("  Target Probability:    n/a"),
    }
    println!("  Probability of Loss:   {:.2}%", summary.probability_of_loss_or_stockout);
    println!(
        "  90% Confidence:        ${:.2} - ${:.2}",
        summary.confidence_interval_90.lower, summary.confidence_interval_90.upper
    );
    match summary.value_at_risk_95 {
        Some(var) => println!("  Value at Risk (95%):   ${:.2}\n", var),
        None => println!("  Value at Risk (95%):   n/a\n"),
    }
}

/// Display an inventory forecast summary
pub fn display_inventory_forecast(forecast: &InventoryForecast) {
    let params = &forecast.params;

    println!("=== Inventory Simulation ({}) ===", policy_label(params.policy));
    println!(
        "  Start: {} units | Demand: {:.1} ± {:.1}/day | Lead time: {} days | {} days x {} paths",
        params.initial_inventory,
        params.avg_daily_demand,
        params.demand_volatility,
        params.lead_time_days,
        params.num_days,
        params.num_simulations
    );
    let basis = match forecast.stockouts {
        StockoutTally::StockoutDays { days, opportunities } => {
            format!("{} of {} trial-days", days, opportunities)
        }
        StockoutTally::StockoutTrials { trials, total } => {
            format!("{} of {} trials", trials, total)
        }
    };
    println!("  Probability of Stockout: {:.2}% ({})", forecast.prob_of_stockout, basis);
    println!("  Average Final Inventory: {:.2} units", forecast.avg_final_inventory);
    println!(
        "  90% Confidence Interval: {:.0} - {:.0} units\n",
        forecast.confidence_interval_90.lower, forecast.confidence_interval_90.upper
    );
}

/// Display a forecast driven by historical closes
pub fn display_historical_forecast(forecast: &HistoricalForecast) {
    println!("=== Historical Forecast ===");
    println!("  Current Price:     ${:.2}", forecast.current_price);
    println!("  Estimated σ/day:   {:.4}", forecast.daily_volatility);
    println!(
        "  Confidence Range:  ${:.2} - ${:.2}",
        forecast.confidence_range.lower, forecast.confidence_range.upper
    );
    println!("  Probability of Loss: {:.2}%", forecast.prob_of_loss);
    println!("  Risk Level:        {}\n", forecast.risk_level);
}

/// Display the per-day average path, sampled to at most `max_points` lines
pub fn display_mean_path(label: &str, mean_path: &[f64], max_points: usize) {
    if mean_path.is_empty() || max_points == 0 {
        return;
    }
    let step = (mean_path.len() + max_points - 1) / max_points;
    println!("  {} (average path):", label);
    for (day, value) in mean_path.iter().enumerate().step_by(step.max(1)) {
        println!("    day {:>4}: {:.2}", day, value);
    }
    println!();
}
