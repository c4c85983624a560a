use bond_metrics_core::cash_flows;
use bond_metrics_core::metrics::calculate_bond_metrics;
use bond_metrics_core::CashFlowSeries;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn positive_flows() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((1i64..10_000_000).prop_map(|c| Decimal::new(c, 2)), 1..40)
}

fn non_negative_flows() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..10_000_000).prop_map(|c| Decimal::new(c, 2)), 1..40)
        .prop_filter("at least one positive flow", |v| v.iter().any(|c| !c.is_zero()))
}

/// Yields in (-1, 1], as thousandths.
fn yield_above_minus_one() -> impl Strategy<Value = Decimal> {
    (-500i64..=1000).prop_map(|b| Decimal::new(b, 3))
}

fn non_negative_yield() -> impl Strategy<Value = Decimal> {
    (0i64..=1000).prop_map(|b| Decimal::new(b, 3))
}

proptest! {
    #[test]
    fn positive_flows_have_positive_price(flows in positive_flows(), y in yield_above_minus_one()) {
        let series = CashFlowSeries::new(flows).unwrap();
        let m = calculate_bond_metrics(&series, y).unwrap();
        prop_assert!(m.total_present_value > Decimal::ZERO);
    }

    #[test]
    fn present_values_sum_to_total(flows in positive_flows(), y in yield_above_minus_one()) {
        let series = CashFlowSeries::new(flows).unwrap();
        let m = calculate_bond_metrics(&series, y).unwrap();
        let sum: Decimal = m.period_present_values.iter().copied().sum();
        let tolerance = m.total_present_value.abs() * dec!(0.000000001);
        prop_assert!((sum - m.total_present_value).abs() <= tolerance);
        prop_assert_eq!(m.period_present_values.len(), series.len());
    }

    #[test]
    fn weights_sum_to_one(flows in non_negative_flows(), y in yield_above_minus_one()) {
        let series = CashFlowSeries::new(flows).unwrap();
        let m = calculate_bond_metrics(&series, y).unwrap();
        prop_assert!((m.weight_total() - Decimal::ONE).abs() < dec!(0.000000001));
    }

    #[test]
    fn duration_within_horizon(flows in non_negative_flows(), y in non_negative_yield()) {
        let series = CashFlowSeries::new(flows).unwrap();
        let m = calculate_bond_metrics(&series, y).unwrap();
        prop_assert!(m.duration >= Decimal::ZERO);
        prop_assert!(m.duration <= Decimal::from(series.maturity()));
    }

    #[test]
    fn metrics_are_deterministic(flows in positive_flows(), y in yield_above_minus_one()) {
        let series = CashFlowSeries::new(flows).unwrap();
        let a = calculate_bond_metrics(&series, y).unwrap();
        let b = calculate_bond_metrics(&series, y).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn bullet_schedule_shape(n in 1u32..60, face in 1i64..10_000_000, coupon_bp in 0i64..2000) {
        let face = Decimal::from(face);
        let coupon = Decimal::new(coupon_bp, 4);
        let series = cash_flows::bullet_cash_flows(n, face, coupon).unwrap();
        prop_assert_eq!(series.len(), n as usize);
        let amounts = series.amounts();
        prop_assert!(amounts[..amounts.len() - 1].iter().all(|a| *a == face * coupon));
        prop_assert_eq!(amounts[amounts.len() - 1], face * coupon + face);
    }

    #[test]
    fn amortized_payments_exceed_face(n in 1u32..40, rate_bp in 1i64..1500) {
        let rate = Decimal::new(rate_bp, 4);
        let series = cash_flows::amortized_cash_flows(n, dec!(100000), rate).unwrap();
        prop_assert!(series.total() > dec!(100000));
    }
}
