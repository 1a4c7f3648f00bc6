use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::schema::cost_component::{AttributeFilter, PriceFilter, ProductFilter};

pub const VENDOR_NAME: &str = "azure";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Case-insensitive `/pattern/i` filter
pub fn regex_filter(pattern: &str) -> String {
    format!("/{pattern}/i")
}

/// `West Europe` -> `westeurope`
pub fn to_azure_cli_name(location: &str) -> String {
    WHITESPACE.replace_all(location, "").to_lowercase()
}

/// Region of a resource: its own location, then the first parent with one, then `default`.
///
/// Placeholder locations containing `mock` are ignored.
pub fn lookup_region(location: Option<&str>, parent_locations: &[&str], default: &str) -> String {
    let usable = |l: &&str| !l.is_empty() && !l.contains("mock");

    if let Some(location) = location.filter(usable) {
        return to_azure_cli_name(location);
    }

    if let Some(parent) = parent_locations.iter().copied().find(usable) {
        return to_azure_cli_name(parent);
    }

    debug!(region = %default, "No location found, using default region");
    to_azure_cli_name(default)
}

/// Billing region used by globally priced services
pub fn convert_region(region: &str) -> &'static str {
    let region = region.to_lowercase();
    if region.contains("usgov") {
        "US Gov"
    } else if region.contains("china") {
        "China"
    } else {
        "Global"
    }
}

/// Alerts deployed to the `global` location are priced under `Global`
pub fn monitor_region(region: &str) -> &str {
    if region == "global" { "Global" } else { region }
}

/// `premium` -> `Premium`
pub fn title_case(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_us_gov(region: &str) -> bool {
    region.to_lowercase().contains("usgov")
}

/// Price filter for pay-as-you-go prices
pub fn price_filter_consumption() -> Option<PriceFilter> {
    Some(PriceFilter {
        purchase_option: Some("Consumption".to_string()),
        ..Default::default()
    })
}

/// Pay-as-you-go price for the tier starting at `start_usage_amount`
pub fn price_filter_tier(start_usage_amount: &str) -> Option<PriceFilter> {
    Some(PriceFilter {
        purchase_option: Some("Consumption".to_string()),
        start_usage_amount: Some(start_usage_amount.to_string()),
        ..Default::default()
    })
}

pub fn product_filter(
    region: &str,
    service: &str,
    product_family: &str,
    attribute_filters: Vec<AttributeFilter>,
) -> Option<ProductFilter> {
    Some(ProductFilter {
        vendor_name: Some(VENDOR_NAME.to_string()),
        region: Some(region.to_string()),
        service: Some(service.to_string()),
        product_family: Some(product_family.to_string()),
        sku: None,
        attribute_filters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CostComponent;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_azure_cli_name() {
        assert_eq!(to_azure_cli_name("West Europe"), "westeurope");
        assert_eq!(to_azure_cli_name("  UK South "), "uksouth");
    }

    #[test]
    fn test_lookup_region_priority() {
        assert_eq!(lookup_region(Some("East US"), &["westus"], "northeurope"), "eastus");
        assert_eq!(lookup_region(None, &["", "West US 2"], "northeurope"), "westus2");
        assert_eq!(lookup_region(Some("mock-location"), &[], "North Europe"), "northeurope");
        assert_eq!(lookup_region(Some(""), &["mock"], "eastus"), "eastus");
    }

    #[test]
    fn test_convert_region() {
        assert_eq!(convert_region("usgovvirginia"), "US Gov");
        assert_eq!(convert_region("chinanorth2"), "China");
        assert_eq!(convert_region("westeurope"), "Global");
        assert!(is_us_gov("USGovArizona"));
        assert!(!is_us_gov("eastus"));
    }

    #[test]
    fn test_monitor_region() {
        assert_eq!(monitor_region("global"), "Global");
        assert_eq!(monitor_region("westeurope"), "westeurope");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("PREMIUM"), "Premium");
        assert_eq!(title_case("standard"), "Standard");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_regex_filter() {
        assert_eq!(regex_filter("^Standard$"), "/^Standard$/i");
    }

    #[test]
    fn test_component_built_outside_schema_is_priceable() {
        let mut component = CostComponent {
            name: "Storage".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: Some(dec!(10)),
            product_filter: product_filter("eastus", "Storage", "Storage", vec![]),
            price_filter: price_filter_consumption(),
            ..Default::default()
        };
        assert!(!component.price_not_found());

        component.set_price(dec!(0.5));
        component.calculate_costs();
        assert_eq!(component.price(), dec!(0.5));
        assert_eq!(component.monthly_cost, Some(dec!(5)));
    }

    #[test]
    fn test_product_filter_sets_vendor() {
        let filter = product_filter("eastus", "Backup", "Storage", vec![]).unwrap();
        assert_eq!(filter.vendor_name.as_deref(), Some(VENDOR_NAME));
        assert_eq!(filter.region.as_deref(), Some("eastus"));
    }
}
