use serde::{Deserialize, Serialize};

use crate::models::{ResultType, Trade};

/// Portfolio-level statistics over a trade subset. Percentages are already
/// scaled (win_rate 55.0 means 55%), dollar amounts are signed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub avg_cost: f64,
    pub profit_after_fees: f64,
    pub total_profit: f64,
    pub total_fees: f64,
}

impl MetricsSnapshot {
    /// Wins with no losses produce an infinite profit factor, which renders
    /// differently from any finite ratio.
    pub fn has_infinite_profit_factor(&self) -> bool {
        self.profit_factor.is_infinite()
    }
}

/// Aggregates a trade subset into a [`MetricsSnapshot`]. An empty subset
/// yields the all-zero snapshot; no NaN or infinity leaks out of divisions.
pub fn compute_metrics(trades: &[Trade]) -> MetricsSnapshot {
    if trades.is_empty() {
        return MetricsSnapshot::default();
    }

    let total_trades = trades.len();
    let winners: Vec<&Trade> = trades.iter().filter(|t| t.result_type == ResultType::Win).collect();
    let losers: Vec<&Trade> = trades.iter().filter(|t| t.result_type == ResultType::Loss).collect();

    // Win rate
    let win_rate = winners.len() as f64 / total_trades as f64 * 100.0;

    // Gross profit and fee totals
    let total_profit: f64 = trades.iter().map(|t| t.profit()).sum();
    let total_fees: f64 = trades.iter().map(|t| t.total_cost).sum();
    let profit_after_fees = total_profit - total_fees;

    // Mean signed return on each side, zero when the side is empty
    let avg_win = if winners.is_empty() {
        0.0
    } else {
        winners.iter().map(|t| t.win_percentage).sum::<f64>() / winners.len() as f64 * 100.0
    };
    let avg_loss = if losers.is_empty() {
        0.0
    } else {
        losers.iter().map(|t| t.win_percentage).sum::<f64>() / losers.len() as f64 * 100.0
    };

    // Profit factor
    let gross_wins: f64 = winners.iter().map(|t| t.profit()).sum();
    let gross_losses: f64 = losers.iter().map(|t| t.profit()).sum::<f64>().abs();
    let profit_factor = if gross_losses > 0.0 {
        gross_wins / gross_losses
    } else if gross_wins > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let avg_cost = total_fees / total_trades as f64;

    MetricsSnapshot {
        total_trades,
        win_rate,
        avg_win,
        avg_loss,
        profit_factor,
        avg_cost,
        profit_after_fees,
        total_profit,
        total_fees,
    }
}
