/// Risk classification for price forecasts
/// Maps loss probability and daily volatility to a coarse tier

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse risk tier for a price forecast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Map a loss probability (percent) and a daily volatility to a tier.
/// All comparisons are strict.
pub fn classify(probability_of_loss: f64, volatility: f64) -> RiskLevel {
    if probability_of_loss > 60.0 || volatility > 0.03 {
        RiskLevel::High
    } else if probability_of_loss > 45.0 || volatility > 0.015 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
