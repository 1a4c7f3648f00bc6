use rust_decimal::Decimal;

/// Split `quantity` across successive pricing tiers.
///
/// Each entry in `tier_widths` is the size of one tier, so `[10240, 30720]`
/// describes 0-10TB, 10-40TB and everything above. The result always has
/// `tier_widths.len() + 1` buckets; the final one collects the overflow.
pub fn calculate_tier_buckets(quantity: Decimal, tier_widths: &[i64]) -> Vec<Decimal> {
    let mut buckets = vec![Decimal::ZERO; tier_widths.len() + 1];
    let mut remaining = quantity.max(Decimal::ZERO);

    for (bucket, width) in buckets.iter_mut().zip(tier_widths) {
        if remaining.is_zero() {
            return buckets;
        }

        let width = Decimal::from(*width);
        let filled = remaining.min(width);
        *bucket = filled;
        remaining -= filled;
    }

    if let Some(last) = buckets.last_mut() {
        *last = remaining;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::below_first_tier(dec!(500), vec![dec!(500), dec!(0), dec!(0)])]
    #[case::exactly_first_tier(dec!(10240), vec![dec!(10240), dec!(0), dec!(0)])]
    #[case::into_second_tier(dec!(20000), vec![dec!(10240), dec!(9760), dec!(0)])]
    #[case::overflow(dec!(50000), vec![dec!(10240), dec!(30720), dec!(9040)])]
    #[case::zero(dec!(0), vec![dec!(0), dec!(0), dec!(0)])]
    #[case::negative(dec!(-5), vec![dec!(0), dec!(0), dec!(0)])]
    fn test_application_gateway_tiers(#[case] quantity: Decimal, #[case] expected: Vec<Decimal>) {
        assert_eq!(calculate_tier_buckets(quantity, &[10240, 30720]), expected);
    }

    #[test]
    fn test_dns_queries_first_billion() {
        let buckets = calculate_tier_buckets(dec!(1500000000), &[1_000_000_000]);
        assert_eq!(buckets, vec![dec!(1000000000), dec!(500000000)]);
    }

    #[test]
    fn test_no_tiers_puts_everything_in_one_bucket() {
        assert_eq!(calculate_tier_buckets(dec!(42.5), &[]), vec![dec!(42.5)]);
    }

    #[test]
    fn test_fractional_quantities_are_kept() {
        let buckets = calculate_tier_buckets(dec!(5.5), &[5]);
        assert_eq!(buckets, vec![dec!(5), dec!(0.5)]);
    }
}
