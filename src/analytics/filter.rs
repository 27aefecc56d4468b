use crate::models::{Trade, TradeFilters};

/// Narrows `trades` to the rows matching every constrained axis of
/// `filters`. The result is a fresh snapshot preserving the input order; no
/// re-sorting happens here.
pub fn apply_filter(trades: &[Trade], filters: &TradeFilters) -> Vec<Trade> {
    trades
        .iter()
        .filter(|trade| matches(trade, filters))
        .cloned()
        .collect()
}

fn matches(trade: &Trade, filters: &TradeFilters) -> bool {
    if let Some(side) = filters.side {
        if trade.side != side {
            return false;
        }
    }

    if let Some(order_type) = filters.order_type {
        if trade.order_type != order_type {
            return false;
        }
    }

    if let Some(setup) = &filters.setup {
        if trade.setup.as_deref() != Some(setup.as_str()) {
            return false;
        }
    }

    if let Some(broker) = &filters.broker {
        if trade.broker.as_deref() != Some(broker.as_str()) {
            return false;
        }
    }

    // inclusive containment, and only when both bounds are set
    if let (Some(start), Some(end)) = filters.date_range {
        if trade.date < start || trade.date > end {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderType, ResultType, TradeSide};
    use chrono::NaiveDate;

    fn trade(id: i64, side: TradeSide, setup: Option<&str>, day: u32) -> Trade {
        Trade {
            id,
            side,
            order_type: if id % 2 == 0 {
                OrderType::Maker
            } else {
                OrderType::Taker
            },
            margin: 100.0,
            leverage: 5.0,
            entry_price: 30000.0,
            exit_price: 31000.0,
            stop_percentage: 0.02,
            win_percentage: 0.033,
            result_type: ResultType::Win,
            entry_fee: 0.1,
            exit_fee: 0.1,
            total_cost: 0.2,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            setup: setup.map(String::from),
            broker: Some("Binance".to_string()),
            target1_price: None,
            target2_price: None,
            target3_price: None,
        }
    }

    #[test]
    fn unconstrained_filter_returns_equal_content_and_order() {
        let trades = vec![
            trade(1, TradeSide::Long, Some("Breakout"), 1),
            trade(2, TradeSide::Short, None, 2),
            trade(3, TradeSide::Long, Some("Reversal"), 3),
        ];

        let filtered = apply_filter(&trades, &TradeFilters::default());
        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(apply_filter(&[], &TradeFilters::default()).is_empty());
    }

    #[test]
    fn side_and_setup_predicates_intersect() {
        let trades = vec![
            trade(1, TradeSide::Long, Some("Breakout"), 1),
            trade(2, TradeSide::Short, Some("Breakout"), 2),
            trade(3, TradeSide::Long, Some("Reversal"), 3),
        ];

        let filters = TradeFilters {
            side: Some(TradeSide::Long),
            setup: Some("Breakout".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_filter(&trades, &filters).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn trades_without_label_never_match_a_label_filter() {
        let trades = vec![
            trade(1, TradeSide::Long, None, 1),
            trade(2, TradeSide::Long, Some("Breakout"), 2),
        ];

        let filters = TradeFilters {
            setup: Some("Breakout".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_filter(&trades, &filters).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let trades = vec![
            trade(1, TradeSide::Long, None, 1),
            trade(2, TradeSide::Long, None, 2),
            trade(3, TradeSide::Long, None, 3),
            trade(4, TradeSide::Long, None, 4),
        ];

        let filters = TradeFilters {
            date_range: (
                NaiveDate::from_ymd_opt(2024, 6, 2),
                NaiveDate::from_ymd_opt(2024, 6, 3),
            ),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_filter(&trades, &filters).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn single_date_bound_is_unconstrained() {
        let trades = vec![trade(1, TradeSide::Long, None, 1), trade(2, TradeSide::Long, None, 30)];

        let filters = TradeFilters {
            date_range: (NaiveDate::from_ymd_opt(2024, 6, 15), None),
            ..Default::default()
        };
        assert_eq!(apply_filter(&trades, &filters).len(), 2);

        let filters = TradeFilters {
            date_range: (None, NaiveDate::from_ymd_opt(2024, 6, 15)),
            ..Default::default()
        };
        assert_eq!(apply_filter(&trades, &filters).len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let trades = vec![
            trade(1, TradeSide::Long, Some("Breakout"), 1),
            trade(2, TradeSide::Short, Some("Breakout"), 2),
            trade(3, TradeSide::Long, Some("Reversal"), 3),
        ];
        let filters = TradeFilters {
            side: Some(TradeSide::Long),
            ..Default::default()
        };

        let once = apply_filter(&trades, &filters);
        let twice = apply_filter(&once, &filters);
        let once_ids: Vec<i64> = once.iter().map(|t| t.id).collect();
        let twice_ids: Vec<i64> = twice.iter().map(|t| t.id).collect();
        assert_eq!(once_ids, twice_ids);
    }
}
