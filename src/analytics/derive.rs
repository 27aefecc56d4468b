use serde::{Deserialize, Serialize};

use crate::models::{ResultType, TradeSide};

/// The three take-profit levels at 1x, 2x and 3x the stop distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPrices {
    pub target1: f64,
    pub target2: f64,
    pub target3: f64,
}

/// Target k sits at `entry * (1 +/- k * stop)` depending on side. No targets
/// can be derived without a positive entry price and stop distance.
pub fn derive_targets(
    entry_price: f64,
    stop_percentage: f64,
    side: TradeSide,
) -> Option<TargetPrices> {
    if entry_price <= 0.0 || stop_percentage <= 0.0 {
        return None;
    }

    let level = |k: f64| match side {
        TradeSide::Long => entry_price * (1.0 + k * stop_percentage),
        TradeSide::Short => entry_price * (1.0 - k * stop_percentage),
    };

    Some(TargetPrices {
        target1: level(1.0),
        target2: level(2.0),
        target3: level(3.0),
    })
}

/// Signed return fraction of the trade. A zero entry price falls back to a
/// denominator of 1 instead of dividing by zero; callers are expected to
/// validate prices upstream.
pub fn derive_win_percentage(entry_price: f64, exit_price: f64, side: TradeSide) -> f64 {
    let denominator = if entry_price == 0.0 { 1.0 } else { entry_price };
    match side {
        TradeSide::Long => (exit_price - entry_price) / denominator,
        TradeSide::Short => (entry_price - exit_price) / denominator,
    }
}

/// Exactly zero counts as a win; there is no break-even category.
pub fn derive_result_type(win_percentage: f64) -> ResultType {
    if win_percentage >= 0.0 {
        ResultType::Win
    } else {
        ResultType::Loss
    }
}

/// Realized return relative to the initial stop distance. IEEE infinity when
/// the stop is zero; callers guard or render it specially.
pub fn risk_reward_ratio(win_percentage: f64, stop_percentage: f64) -> f64 {
    (win_percentage / stop_percentage).abs()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl TradeQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeQuality::Excellent => "Excellent",
            TradeQuality::Good => "Good",
            TradeQuality::Fair => "Fair",
            TradeQuality::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for TradeQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Losses are never rated above Poor regardless of magnitude. Winning trades
/// climb the ladder on risk/reward, ties going to the higher tier.
pub fn quality(win_percentage: f64, risk_reward: f64) -> TradeQuality {
    if win_percentage < 0.0 {
        return TradeQuality::Poor;
    }
    if risk_reward >= 3.0 {
        TradeQuality::Excellent
    } else if risk_reward >= 2.0 {
        TradeQuality::Good
    } else if risk_reward >= 1.0 {
        TradeQuality::Fair
    } else {
        TradeQuality::Poor
    }
}
