use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    pub date: NaiveDate,
    pub daily_profit: f64,
    pub cumulative_profit: f64,
    pub trade_count: usize,
}

/// Net profit after fees per calendar day, ascending, with a running total.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityCurvePoint> {
    let mut daily: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for trade in trades {
        let entry = daily.entry(trade.date).or_insert((0.0, 0));
        entry.0 += trade.profit() - trade.total_cost;
        entry.1 += 1;
    }

    let mut cumulative_profit = 0.0;
    daily
        .into_iter()
        .map(|(date, (daily_profit, trade_count))| {
            cumulative_profit += daily_profit;
            EquityCurvePoint {
                date,
                daily_profit,
                cumulative_profit,
                trade_count,
            }
        })
        .collect()
}

pub const DEFAULT_RETURN_BIN_PCT: f64 = 2.0;

/// A half-open histogram bucket `[lower, upper)` of return percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl ReturnBin {
    pub fn label(&self) -> String {
        format!("{}% to {}%", self.lower, self.upper)
    }
}

/// Buckets `win_percentage * 100` into bins of `bin_size` percent, edges
/// snapped to multiples of the bin size. The top edge is pushed out one bin
/// when the maximum return lands exactly on it, so every trade is counted.
pub fn returns_distribution(trades: &[Trade], bin_size: f64) -> Vec<ReturnBin> {
    if trades.is_empty() || bin_size <= 0.0 {
        return Vec::new();
    }

    let returns: Vec<f64> = trades.iter().map(|t| t.win_percentage * 100.0).collect();
    let min = returns.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let lower_edge = (min / bin_size).floor() * bin_size;
    let mut upper_edge = (max / bin_size).ceil() * bin_size;
    if upper_edge <= max {
        upper_edge += bin_size;
    }

    let steps = ((upper_edge - lower_edge) / bin_size).round() as usize;
    (0..steps)
        .map(|k| {
            let lower = lower_edge + k as f64 * bin_size;
            let upper = lower + bin_size;
            let count = returns.iter().filter(|r| **r >= lower && **r < upper).count();
            ReturnBin { lower, upper, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderType, ResultType, TradeSide};

    fn trade(id: i64, win_percentage: f64, total_cost: f64, day: u32) -> Trade {
        Trade {
            id,
            side: TradeSide::Long,
            order_type: OrderType::Taker,
            margin: 100.0,
            leverage: 10.0,
            entry_price: 40000.0,
            exit_price: 40000.0 * (1.0 + win_percentage),
            stop_percentage: 0.02,
            win_percentage,
            result_type: if win_percentage >= 0.0 {
                ResultType::Win
            } else {
                ResultType::Loss
            },
            entry_fee: total_cost / 2.0,
            exit_fee: total_cost / 2.0,
            total_cost,
            date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            setup: None,
            broker: None,
            target1_price: None,
            target2_price: None,
            target3_price: None,
        }
    }

    #[test]
    fn equity_curve_groups_by_day_and_accumulates() {
        let trades = vec![
            trade(1, 0.1, 2.0, 2),   // +98 on day 2
            trade(2, -0.05, 2.0, 1), // -52 on day 1
            trade(3, 0.01, 2.0, 2),  // +8 on day 2
        ];

        let curve = equity_curve(&trades);
        assert_eq!(curve.len(), 2);

        assert_eq!(curve[0].date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert!((curve[0].daily_profit + 52.0).abs() < 1e-9);
        assert!((curve[0].cumulative_profit + 52.0).abs() < 1e-9);
        assert_eq!(curve[0].trade_count, 1);

        assert_eq!(curve[1].date, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
        assert!((curve[1].daily_profit - 106.0).abs() < 1e-9);
        assert!((curve[1].cumulative_profit - 54.0).abs() < 1e-9);
        assert_eq!(curve[1].trade_count, 2);
    }

    #[test]
    fn equity_curve_of_nothing_is_empty() {
        assert!(equity_curve(&[]).is_empty());
    }

    #[test]
    fn distribution_bins_cover_every_trade() {
        let trades = vec![
            trade(1, 0.011, 0.0, 1), // 1.1%
            trade(2, 0.035, 0.0, 1), // 3.5%
            trade(3, -0.02, 0.0, 1), // -2.0%
        ];

        let bins = returns_distribution(&trades, DEFAULT_RETURN_BIN_PCT);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, trades.len());
        assert_eq!(bins.first().unwrap().lower, -2.0);
    }

    #[test]
    fn max_return_on_a_bin_edge_is_still_counted() {
        let trades = vec![trade(1, 0.04, 0.0, 1)]; // exactly 4%

        let bins = returns_distribution(&trades, 2.0);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 1);
        let hit = bins.iter().find(|b| b.count == 1).unwrap();
        assert_eq!(hit.lower, 4.0);
        assert_eq!(hit.upper, 6.0);
        assert_eq!(hit.label(), "4% to 6%");
    }

    #[test]
    fn distribution_guards_degenerate_inputs() {
        assert!(returns_distribution(&[], 2.0).is_empty());
        assert!(returns_distribution(&[trade(1, 0.01, 0.0, 1)], 0.0).is_empty());
        assert!(returns_distribution(&[trade(1, 0.01, 0.0, 1)], -1.0).is_empty());
    }
}
