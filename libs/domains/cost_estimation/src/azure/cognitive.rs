//! Pieces shared by the Cognitive Services account mappings.
//!
//! Commitment tiers are bought in fixed amounts. The committed amount is
//! priced as a single unit per month, with overage billed on top of it.

use rust_decimal::Decimal;
use tracing::warn;

use super::util::{product_filter, regex_filter};
use crate::schema::{AttributeFilter, CostComponent, ProductFilter, Resource, UsageData};

pub const SERVICE: &str = "Cognitive Services";
pub const PRODUCT_FAMILY: &str = "AI + Machine Learning";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentTier {
    Standard,
    ConnectedContainer,
}

impl CommitmentTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "commitment",
            Self::ConnectedContainer => "connected container commitment",
        }
    }

    /// Word used in catalog SKU names, e.g. `Commitment Tier Azure 1M`
    pub fn sku_word(self) -> &'static str {
        match self {
            Self::Standard => "Azure",
            Self::ConnectedContainer => "Connected",
        }
    }
}

/// Committed amount and overage read from a pair of usage keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitmentUsage {
    pub committed: Option<i64>,
    pub overage: Option<Decimal>,
}

impl CommitmentUsage {
    pub fn from_usage(usage: &UsageData, committed_key: &str, overage_key: &str) -> Self {
        Self {
            committed: usage.get_i64(committed_key),
            overage: usage.get_decimal(overage_key),
        }
    }
}

/// Pay-as-you-go pricing is shown unless a commitment covers it, or when
/// pay-as-you-go usage is given alongside one
pub fn needs_pay_as_you_go(
    standard: &CommitmentUsage,
    connected: &CommitmentUsage,
    pay_as_you_go_usage: bool,
) -> bool {
    (standard.committed.is_none() && connected.committed.is_none()) || pay_as_you_go_usage
}

pub enum AccountSku {
    Free,
    Standard,
}

/// `F0` is free and `S`, `S0` and `S1` are standard; anything else is unsupported
pub fn account_sku(address: &str, sku: &str) -> Option<AccountSku> {
    if sku.eq_ignore_ascii_case("f0") {
        return Some(AccountSku::Free);
    }
    if ["s", "s0", "s1"].iter().any(|s| sku.eq_ignore_ascii_case(s)) {
        return Some(AccountSku::Standard);
    }
    warn!(address = %address, sku = %sku, "Unsupported cognitive account SKU");
    None
}

pub fn free_resource(address: &str) -> Resource {
    Resource {
        name: address.to_string(),
        no_price: true,
        is_skipped: true,
        ..Default::default()
    }
}

/// `5000` -> `5K`, `2000000000` -> `2000M`
pub fn amount_to_description(amount: i64) -> String {
    if amount < 1_000 {
        amount.to_string()
    } else if amount < 1_000_000 {
        format!("{}K", amount / 1_000)
    } else {
        format!("{}M", amount / 1_000_000)
    }
}

/// `value / divisor`, for usage given in raw records or characters
pub fn per(value: Option<i64>, divisor: i64) -> Option<Decimal> {
    value.map(|v| Decimal::from(v) / Decimal::from(divisor))
}

pub fn cognitive_filter(
    region: &str,
    product_name: &str,
    sku_name: &str,
    meter: AttributeFilter,
) -> Option<ProductFilter> {
    product_filter(
        region,
        SERVICE,
        PRODUCT_FAMILY,
        vec![
            AttributeFilter::exact("productName", product_name),
            AttributeFilter::exact("skuName", sku_name),
            meter,
        ],
    )
}

/// A commitment tier SKU of one cognitive product
pub struct CommitmentSku<'a> {
    pub region: &'a str,
    pub product_name: &'a str,
    pub sku_name: String,
}

impl CommitmentSku<'_> {
    /// The whole commitment priced as one unit; `committed` is in display units
    pub fn commitment_cost_component(
        &self,
        name: String,
        unit: &str,
        committed: Decimal,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            unit_multiplier: Decimal::ONE / committed,
            monthly_quantity: Some(Decimal::ONE),
            product_filter: cognitive_filter(
                self.region,
                self.product_name,
                &self.sku_name,
                AttributeFilter::regex("meterName", regex_filter("Unit$")),
            ),
            ..Default::default()
        }
    }

    pub fn overage_cost_component(
        &self,
        name: String,
        unit: &str,
        quantity: Decimal,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            monthly_quantity: Some(quantity),
            product_filter: cognitive_filter(
                self.region,
                self.product_name,
                &self.sku_name,
                AttributeFilter::regex("meterName", regex_filter("Overage")),
            ),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_to_description() {
        assert_eq!(amount_to_description(500), "500");
        assert_eq!(amount_to_description(2_000), "2K");
        assert_eq!(amount_to_description(80_000_000), "80M");
        assert_eq!(amount_to_description(2_000_000_000), "2000M");
    }

    #[test]
    fn test_account_sku() {
        assert!(matches!(account_sku("a", "F0"), Some(AccountSku::Free)));
        assert!(matches!(account_sku("a", "s0"), Some(AccountSku::Standard)));
        assert!(matches!(account_sku("a", "S"), Some(AccountSku::Standard)));
        assert!(account_sku("a", "E0").is_none());
    }

    #[test]
    fn test_commitment_priced_as_one_unit() {
        let sku = CommitmentSku {
            region: "eastus",
            product_name: "Language",
            sku_name: "Commitment Tier Azure 1M".to_string(),
        };
        let component = sku.commitment_cost_component(
            "Text analytics (commitment)".to_string(),
            "1K records",
            dec!(1000),
        );
        assert_eq!(component.monthly_quantity, Some(Decimal::ONE));
        assert_eq!(component.unit_multiplier, dec!(0.001));
        assert_eq!(component.unit_multiplier_monthly_quantity(), Some(dec!(1000)));
    }

    #[test]
    fn test_pay_as_you_go_shown_without_commitment() {
        let none = CommitmentUsage::default();
        let committed = CommitmentUsage {
            committed: Some(1_000_000),
            overage: None,
        };
        assert!(needs_pay_as_you_go(&none, &none, false));
        assert!(!needs_pay_as_you_go(&committed, &none, false));
        assert!(needs_pay_as_you_go(&none, &committed, true));
    }
}
