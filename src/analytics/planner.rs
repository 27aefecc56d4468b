use serde::{Deserialize, Serialize};

use crate::analytics::fees::{fee_rate, SCALED_EXIT};
use crate::models::{OrderType, TradeSide};

/// Inputs for planning a trade before entry. Percentages are fractions
/// (0.02 means 2%). Target 1 always sits at the stop distance for a 1:1
/// risk/reward; targets 2 and 3 are chosen freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlanInput {
    pub side: TradeSide,
    pub order_type: OrderType,
    pub margin: f64,
    pub leverage: f64,
    pub entry_price: f64,
    pub stop_percentage: f64,
    pub target2_percentage: f64,
    pub target3_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPlan {
    pub price: f64,
    pub exit_fraction: f64,
    pub gross_profit: f64,
    pub exit_fee: f64,
    pub net_profit: f64,
    pub risk_reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub position_size: f64,
    pub entry_fee: f64,
    pub stop_price: f64,
    /// Loss at the stop, as a negative dollar amount.
    pub stop_loss: f64,
    pub targets: [TargetPlan; 3],
    /// Gross profit when every target fills.
    pub total_gross_profit: f64,
    /// Entry fee plus every exit fee.
    pub total_fees: f64,
    /// Profit after all fees when every target fills.
    pub net_profit: f64,
}

/// Projects position size, stop, the 50/25/25 target ladder and the fee
/// impact of a planned trade. Pure arithmetic over the inputs.
pub fn plan_trade(input: &TradePlanInput) -> TradePlan {
    let position_size = input.margin * input.leverage;
    let rate = fee_rate(input.order_type);
    let entry_fee = position_size * rate;

    let stop_price = match input.side {
        TradeSide::Long => input.entry_price * (1.0 - input.stop_percentage),
        TradeSide::Short => input.entry_price * (1.0 + input.stop_percentage),
    };
    let stop_loss = -position_size * input.stop_percentage;
    let risk = stop_loss.abs();

    let target_percentages = [
        input.stop_percentage,
        input.target2_percentage,
        input.target3_percentage,
    ];

    let target = |percentage: f64, exit_fraction: f64| {
        let price = match input.side {
            TradeSide::Long => input.entry_price * (1.0 + percentage),
            TradeSide::Short => input.entry_price * (1.0 - percentage),
        };
        let gross_profit = position_size * percentage * exit_fraction;
        let exit_fee = position_size * exit_fraction * rate;
        TargetPlan {
            price,
            exit_fraction,
            gross_profit,
            exit_fee,
            net_profit: gross_profit - exit_fee,
            risk_reward: if risk > 0.0 { gross_profit / risk } else { 0.0 },
        }
    };

    let targets = [
        target(target_percentages[0], SCALED_EXIT[0]),
        target(target_percentages[1], SCALED_EXIT[1]),
        target(target_percentages[2], SCALED_EXIT[2]),
    ];

    let total_gross_profit: f64 = targets.iter().map(|t| t.gross_profit).sum();
    let total_exit_fees: f64 = targets.iter().map(|t| t.exit_fee).sum();
    let net_after_targets: f64 = targets.iter().map(|t| t.net_profit).sum();

    TradePlan {
        position_size,
        entry_fee,
        stop_price,
        stop_loss,
        targets,
        total_gross_profit,
        total_fees: entry_fee + total_exit_fees,
        net_profit: net_after_targets - entry_fee,
    }
}
