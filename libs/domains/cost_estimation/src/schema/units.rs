//! Unit multipliers shared by every cost component.
//!
//! Prices are quoted per hour or per month depending on the meter. A month is
//! always 730 hours, so conversions between the two are fixed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hours in a billing month
pub const HOUR_TO_MONTH_UNIT_MULTIPLIER: Decimal = dec!(730);

const HOURS_IN_DAY: Decimal = dec!(24);
const DAY_PRECISION: u32 = 24;

/// Multiplier that turns a monthly quantity into an hourly one
pub fn month_to_hour_unit_multiplier() -> Decimal {
    Decimal::ONE / HOUR_TO_MONTH_UNIT_MULTIPLIER
}

/// Days in a billing month (730 / 24)
pub fn days_in_month() -> Decimal {
    (HOUR_TO_MONTH_UNIT_MULTIPLIER / HOURS_IN_DAY).round_dp(DAY_PRECISION)
}

/// Multiplier used by meters that are priced per day but shown per hour
pub fn day_to_month_unit_multiplier() -> Decimal {
    (days_in_month() / HOUR_TO_MONTH_UNIT_MULTIPLIER).round_dp(DAY_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_to_hour_round_trips_to_one() {
        let product = month_to_hour_unit_multiplier() * HOUR_TO_MONTH_UNIT_MULTIPLIER;
        assert_eq!(product.round_dp(10), Decimal::ONE);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month().round_dp(4), dec!(30.4167));
        assert!(days_in_month().scale() <= DAY_PRECISION);
    }

    #[test]
    fn test_day_to_month_is_one_twenty_fourth() {
        assert_eq!(day_to_month_unit_multiplier().round_dp(6), dec!(0.041667));
    }
}
