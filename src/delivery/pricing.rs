use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::delivery::zone::Deviation;

pub const BASE_PRICE: Decimal = dec!(5.00);

/// Beyond this radius home delivery is not offered at all.
pub const MAX_DELIVERY_RADIUS_METERS: f64 = 80_000.0;

/// Open-ended tier surcharge per km past `SURCHARGE_FROM_KM`.
const SURCHARGE_PER_KM: Decimal = dec!(0.5);
const SURCHARGE_FROM_KM: f64 = 40.0;

/// Base price multiplier per deviation tier, indexed by `tier - 1`.
const TIER_MULTIPLIERS: [Decimal; 5] = [dec!(0), dec!(0.6), dec!(1.0), dec!(1.5), dec!(2.0)];

/// Delivery fee for a tier. Only the open-ended tier looks at the raw distance.
pub fn price_for_deviation(deviation: Deviation, distance_m: f64) -> Decimal {
    let multiplier = TIER_MULTIPLIERS[usize::from(deviation.get() - 1)];
    let mut price = BASE_PRICE * multiplier;

    if deviation == Deviation::OPEN_ENDED {
        let excess_km = (distance_m / 1000.0 - SURCHARGE_FROM_KM).max(0.0);
        let excess_km = Decimal::from_f64(excess_km).unwrap_or(Decimal::ZERO);
        price += SURCHARGE_PER_KM * excess_km;
    }

    to_cents(price)
}

pub fn is_deliverable(distance_m: f64) -> bool {
    is_deliverable_within(distance_m, MAX_DELIVERY_RADIUS_METERS)
}

pub fn is_deliverable_within(distance_m: f64, max_radius_m: f64) -> bool {
    distance_m <= max_radius_m
}

/// Round to exactly two decimal places for display.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(n: u8) -> Deviation {
        Deviation::new(n).unwrap()
    }

    #[test]
    fn test_bounded_tiers() {
        assert_eq!(price_for_deviation(tier(1), 0.0), dec!(0.00));
        assert_eq!(price_for_deviation(tier(1), 5_000.0), dec!(0.00));
        assert_eq!(price_for_deviation(tier(2), 7_500.0), dec!(3.00));
        assert_eq!(price_for_deviation(tier(3), 15_000.0), dec!(5.00));
        assert_eq!(price_for_deviation(tier(4), 30_000.0), dec!(7.50));
    }

    #[test]
    fn test_open_ended_tier_surcharge() {
        assert_eq!(price_for_deviation(tier(5), 40_000.0), dec!(10.00));
        assert_eq!(price_for_deviation(tier(5), 45_000.0), dec!(12.50));
        assert_eq!(price_for_deviation(tier(5), 50_000.0), dec!(15.00));
        assert_eq!(price_for_deviation(tier(5), 41_234.0), dec!(10.62));
    }

    #[test]
    fn test_prices_render_two_decimals() {
        assert_eq!(price_for_deviation(tier(1), 0.0).to_string(), "0.00");
        assert_eq!(price_for_deviation(tier(2), 7_500.0).to_string(), "3.00");
        assert_eq!(price_for_deviation(tier(5), 45_000.0).to_string(), "12.50");
    }

    #[test]
    fn test_to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents(dec!(1.005)).to_string(), "1.01");
        assert_eq!(to_cents(dec!(2)).to_string(), "2.00");
    }

    #[test]
    fn test_is_deliverable() {
        assert!(is_deliverable(0.0));
        assert!(is_deliverable(80_000.0));
        assert!(!is_deliverable(80_001.0));
        assert!(!is_deliverable_within(30_000.0, 25_000.0));
    }
}
