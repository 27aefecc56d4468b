use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ResultType, Trade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupBreakdown {
    pub setup: String,
    pub count: usize,
    pub win_rate: f64,
    pub avg_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerBreakdown {
    pub broker: String,
    pub count: usize,
    pub win_rate: f64,
    pub avg_fee: f64,
    pub total_profit: f64,
}

#[derive(Default)]
struct LabelStats {
    count: usize,
    wins: usize,
    total_return: f64,
    total_fees: f64,
    total_profit: f64,
}

// Accumulates per-label stats in first-encounter order so the later stable
// sort keeps encounter order among ties.
fn group_by_label<'a>(
    trades: &'a [Trade],
    label: impl Fn(&'a Trade) -> Option<&'a str>,
) -> Vec<(String, LabelStats)> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, LabelStats)> = Vec::new();

    for trade in trades {
        let Some(name) = label(trade) else {
            continue;
        };
        let index = *order.entry(name).or_insert_with(|| {
            groups.push((name.to_string(), LabelStats::default()));
            groups.len() - 1
        });

        let stats = &mut groups[index].1;
        stats.count += 1;
        if trade.result_type == ResultType::Win {
            stats.wins += 1;
        }
        stats.total_return += trade.win_percentage;
        stats.total_fees += trade.total_cost;
        stats.total_profit += trade.profit();
    }

    groups
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// One row per distinct setup present in the subset, sorted by average
/// return descending. Trades without a setup are skipped.
pub fn setup_analysis(trades: &[Trade]) -> Vec<SetupBreakdown> {
    let mut rows: Vec<SetupBreakdown> = group_by_label(trades, |t| t.setup.as_deref())
        .into_iter()
        .map(|(setup, stats)| SetupBreakdown {
            setup,
            count: stats.count,
            win_rate: stats.wins as f64 / stats.count as f64 * 100.0,
            avg_return: stats.total_return / stats.count as f64 * 100.0,
        })
        .collect();

    rows.sort_by(|a, b| descending(a.avg_return, b.avg_return));
    rows
}

/// One row per distinct broker present in the subset, sorted by total profit
/// descending. Trades without a broker are skipped.
pub fn broker_analysis(trades: &[Trade]) -> Vec<BrokerBreakdown> {
    let mut rows: Vec<BrokerBreakdown> = group_by_label(trades, |t| t.broker.as_deref())
        .into_iter()
        .map(|(broker, stats)| BrokerBreakdown {
            broker,
            count: stats.count,
            win_rate: stats.wins as f64 / stats.count as f64 * 100.0,
            avg_fee: stats.total_fees / stats.count as f64,
            total_profit: stats.total_profit,
        })
        .collect();

    rows.sort_by(|a, b| descending(a.total_profit, b.total_profit));
    rows
}
