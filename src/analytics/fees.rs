use crate::models::OrderType;

/// Fraction of notional charged per fill.
pub const MAKER_FEE: f64 = 0.0002;
pub const TAKER_FEE: f64 = 0.0006;

/// Single full exit at one price.
pub const FULL_EXIT: &[f64] = &[1.0];

/// The 50/25/25 scale-out ladder used by the trade planner.
pub const SCALED_EXIT: &[f64] = &[0.5, 0.25, 0.25];

pub fn fee_rate(order_type: OrderType) -> f64 {
    match order_type {
        OrderType::Maker => MAKER_FEE,
        OrderType::Taker => TAKER_FEE,
    }
}

pub fn compute_fee(position_value: f64, order_type: OrderType) -> f64 {
    position_value * fee_rate(order_type)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeBreakdown {
    pub entry_fee: f64,
    pub exit_fees: Vec<f64>,
    pub total_cost: f64,
}

impl FeeBreakdown {
    pub fn exit_fee(&self) -> f64 {
        self.exit_fees.iter().sum()
    }
}

/// Entry fee on the full notional plus one exit fee per partial exit
/// fraction. `total_cost` is entry plus all exits.
pub fn compute_fees(
    margin: f64,
    leverage: f64,
    order_type: OrderType,
    exit_fractions: &[f64],
) -> FeeBreakdown {
    let position_value = margin * leverage;
    let rate = fee_rate(order_type);

    let entry_fee = position_value * rate;
    let exit_fees: Vec<f64> = exit_fractions
        .iter()
        .map(|fraction| position_value * fraction * rate)
        .collect();
    let total_cost = entry_fee + exit_fees.iter().sum::<f64>();

    FeeBreakdown {
        entry_fee,
        exit_fees,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maker_rate_is_lower_than_taker() {
        assert_eq!(fee_rate(OrderType::Maker), 0.0002);
        assert_eq!(fee_rate(OrderType::Taker), 0.0006);
        assert!(fee_rate(OrderType::Maker) < fee_rate(OrderType::Taker));
    }

    #[test]
    fn compute_fee_scales_with_notional() {
        assert_eq!(compute_fee(1000.0, OrderType::Taker), 0.6);
        assert_eq!(compute_fee(1000.0, OrderType::Maker), 0.2);
        assert_eq!(compute_fee(0.0, OrderType::Taker), 0.0);
    }

    #[test]
    fn full_exit_charges_entry_and_one_exit() {
        let fees = compute_fees(100.0, 10.0, OrderType::Taker, FULL_EXIT);
        assert_eq!(fees.entry_fee, 0.6);
        assert_eq!(fees.exit_fees, vec![0.6]);
        assert_eq!(fees.total_cost, 1.2);
    }

    #[test]
    fn total_cost_is_entry_plus_all_exits() {
        let fees = compute_fees(200.0, 5.0, OrderType::Maker, SCALED_EXIT);
        assert_eq!(fees.exit_fees.len(), 3);
        let expected = fees.entry_fee + fees.exit_fees.iter().sum::<f64>();
        assert!((fees.total_cost - expected).abs() < 1e-12);
        // fractions sum to 1, so exits together equal one full-size fill
        assert!((fees.exit_fee() - fees.entry_fee).abs() < 1e-12);
    }

    #[test]
    fn no_exits_means_entry_fee_only() {
        let fees = compute_fees(100.0, 10.0, OrderType::Taker, &[]);
        assert_eq!(fees.exit_fees, Vec::<f64>::new());
        assert_eq!(fees.total_cost, fees.entry_fee);
    }
}
