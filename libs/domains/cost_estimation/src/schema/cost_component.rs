use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::units::{HOUR_TO_MONTH_UNIT_MULTIPLIER, month_to_hour_unit_multiplier};

/// Matches a single product attribute by exact value or by `/regex/flags`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_regex: Option<String>,
}

impl AttributeFilter {
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            value_regex: None,
        }
    }

    /// `pattern` must already be in `/pattern/flags` form
    pub fn regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            value_regex: Some(pattern.into()),
        }
    }
}

/// Selects the product a cost component is priced against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub vendor_name: Option<String>,
    pub region: Option<String>,
    pub service: Option<String>,
    pub product_family: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub attribute_filters: Vec<AttributeFilter>,
}

/// Selects one price among those offered for a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFilter {
    pub purchase_option: Option<String>,
    pub unit: Option<String>,
    pub description_regex: Option<String>,
    pub term_length: Option<String>,
    pub term_purchase_option: Option<String>,
    pub term_offering_class: Option<String>,
    pub start_usage_amount: Option<String>,
    pub end_usage_amount: Option<String>,
}

/// One billable dimension of a resource.
///
/// Quantities are expressed in the priced unit. `unit_multiplier` converts
/// between that unit and the one shown to users (e.g. a component priced per
/// GB-hour but displayed per GB-month has a multiplier of 730).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComponent {
    pub name: String,
    pub unit: String,
    pub unit_multiplier: Decimal,
    /// Decimal places used when displaying unit-adjusted quantities
    pub unit_rounding: Option<u32>,
    pub hourly_quantity: Option<Decimal>,
    pub monthly_quantity: Option<Decimal>,
    pub product_filter: Option<ProductFilter>,
    pub price_filter: Option<PriceFilter>,
    /// Quantity comes from usage estimates rather than static configuration
    pub usage_based: bool,
    pub ignore_if_missing_price: bool,
    /// Fraction between 0 and 1 taken off the monthly cost
    pub monthly_discount_perc: Decimal,
    /// Fixed price used instead of a catalog lookup
    pub custom_price: Option<Decimal>,
    pub hourly_cost: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,
    pub(crate) price: Decimal,
    pub(crate) price_not_found: bool,
}

impl Default for CostComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            unit: String::new(),
            unit_multiplier: Decimal::ONE,
            unit_rounding: None,
            hourly_quantity: None,
            monthly_quantity: None,
            product_filter: None,
            price_filter: None,
            usage_based: false,
            ignore_if_missing_price: false,
            monthly_discount_perc: Decimal::ZERO,
            custom_price: None,
            hourly_cost: None,
            monthly_cost: None,
            price: Decimal::ZERO,
            price_not_found: false,
        }
    }
}

impl CostComponent {
    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
        self.price_not_found = false;
    }

    pub fn price_not_found(&self) -> bool {
        self.price_not_found
    }

    pub fn set_price_not_found(&mut self) {
        self.price = Decimal::ZERO;
        self.price_not_found = true;
    }

    /// Fill in the missing quantity side, then price both sides
    pub fn calculate_costs(&mut self) {
        self.fill_quantities();

        let discount = Decimal::ONE - self.monthly_discount_perc;

        if let Some(quantity) = self.hourly_quantity {
            self.hourly_cost = Some(self.price * quantity * discount);
        }
        if let Some(quantity) = self.monthly_quantity {
            self.monthly_cost = Some(self.price * quantity * discount);
        }
    }

    fn fill_quantities(&mut self) {
        match (self.hourly_quantity, self.monthly_quantity) {
            (Some(hourly), None) => {
                self.monthly_quantity = Some(hourly * HOUR_TO_MONTH_UNIT_MULTIPLIER);
            }
            (None, Some(monthly)) => {
                self.hourly_quantity = Some(monthly * month_to_hour_unit_multiplier());
            }
            _ => {}
        }
    }

    /// Price per displayed unit
    pub fn unit_multiplier_price(&self) -> Decimal {
        self.price * self.unit_multiplier
    }

    pub fn unit_multiplier_hourly_quantity(&self) -> Option<Decimal> {
        self.hourly_quantity.map(|q| self.to_display_quantity(q))
    }

    pub fn unit_multiplier_monthly_quantity(&self) -> Option<Decimal> {
        self.monthly_quantity.map(|q| self.to_display_quantity(q))
    }

    fn to_display_quantity(&self, quantity: Decimal) -> Decimal {
        if self.unit_multiplier.is_zero() {
            return Decimal::ZERO;
        }

        let adjusted = quantity / self.unit_multiplier;
        match self.unit_rounding {
            Some(dp) => adjusted.round_dp(dp),
            None => adjusted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_unit_multiplier_is_one() {
        let component = CostComponent::default();
        assert_eq!(component.unit_multiplier, Decimal::ONE);
        assert!(component.hourly_cost.is_none());
        assert!(!component.price_not_found());
    }

    #[test]
    fn test_hourly_quantity_fills_monthly() {
        let mut component = CostComponent {
            name: "Instance usage".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(dec!(2)),
            ..Default::default()
        };
        component.set_price(dec!(0.5));
        component.calculate_costs();

        assert_eq!(component.monthly_quantity, Some(dec!(1460)));
        assert_eq!(component.hourly_cost, Some(dec!(1.0)));
        assert_eq!(component.monthly_cost, Some(dec!(730.0)));
    }

    #[test]
    fn test_monthly_quantity_fills_hourly() {
        let mut component = CostComponent {
            monthly_quantity: Some(dec!(730)),
            ..Default::default()
        };
        component.set_price(dec!(2));
        component.calculate_costs();

        assert_eq!(component.hourly_quantity.map(|q| q.round_dp(6)), Some(dec!(1)));
        assert_eq!(component.monthly_cost, Some(dec!(1460)));
    }

    #[test]
    fn test_no_quantity_means_no_cost() {
        let mut component = CostComponent::default();
        component.set_price(dec!(10));
        component.calculate_costs();

        assert!(component.hourly_cost.is_none());
        assert!(component.monthly_cost.is_none());
    }

    #[test]
    fn test_discount_applies_to_costs() {
        let mut component = CostComponent {
            monthly_quantity: Some(dec!(100)),
            hourly_quantity: Some(dec!(1)),
            monthly_discount_perc: dec!(0.25),
            ..Default::default()
        };
        component.set_price(dec!(1));
        component.calculate_costs();

        assert_eq!(component.monthly_cost, Some(dec!(75.00)));
    }

    #[test]
    fn test_unit_multiplier_quantities() {
        let component = CostComponent {
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: Some(dec!(1460)),
            ..Default::default()
        };
        assert_eq!(component.unit_multiplier_hourly_quantity(), Some(dec!(2)));
    }

    #[test]
    fn test_unit_rounding() {
        let component = CostComponent {
            unit_multiplier: month_to_hour_unit_multiplier(),
            unit_rounding: Some(0),
            monthly_quantity: Some(dec!(1)),
            ..Default::default()
        };
        assert_eq!(component.unit_multiplier_monthly_quantity(), Some(dec!(730)));
    }

    #[test]
    fn test_zero_unit_multiplier() {
        let component = CostComponent {
            unit_multiplier: Decimal::ZERO,
            monthly_quantity: Some(dec!(5)),
            ..Default::default()
        };
        assert_eq!(component.unit_multiplier_monthly_quantity(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_unit_multiplier_price() {
        let mut component = CostComponent {
            unit_multiplier: dec!(1000),
            ..Default::default()
        };
        component.set_price(dec!(0.0004));
        assert_eq!(component.unit_multiplier_price(), dec!(0.4));
    }

    #[test]
    fn test_price_not_found_resets_price() {
        let mut component = CostComponent::default();
        component.set_price(dec!(3));
        component.set_price_not_found();
        assert!(component.price_not_found());
        assert_eq!(component.price(), Decimal::ZERO);
    }

    #[test]
    fn test_attribute_filter_constructors() {
        let exact = AttributeFilter::exact("meterName", "DNS Queries");
        assert_eq!(exact.value.as_deref(), Some("DNS Queries"));
        assert!(exact.value_regex.is_none());

        let regex = AttributeFilter::regex("skuName", "/^standard$/i");
        assert_eq!(regex.value_regex.as_deref(), Some("/^standard$/i"));
        assert!(regex.value.is_none());
    }
}
