use rust_decimal::Decimal;

use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

/// Test tiers: display suffix and price start amount. The first ten tests are free.
const TEST_TIERS: &[(&str, &str)] = &[
    ("(0-10)", "0"),
    ("(10-240,010)", "10"),
    ("(240,010-750,010)", "240010"),
    ("(750,010-1,000,010)", "750010"),
    ("(1,000,010+)", "1000010"),
];
const TEST_TIER_LIMITS: &[i64] = &[10, 240_000, 510_000, 250_000];

#[derive(Debug, Clone, Default)]
pub struct NetworkConnectionMonitor {
    pub address: String,
    pub region: String,

    pub tests: Option<i64>,
}

impl NetworkConnectionMonitor {
    fn tests_cost_component(
        &self,
        suffix: &str,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name: format!("Tests {suffix}"),
            unit: "tests".to_string(),
            monthly_quantity: quantity,
            product_filter: product_filter(
                &self.region,
                "Network Watcher",
                "Networking",
                vec![AttributeFilter::exact("meterName", "Standard Connection Monitor Test")],
            ),
            price_filter: Some(PriceFilter {
                start_usage_amount: Some(start.to_string()),
                ..Default::default()
            }),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for NetworkConnectionMonitor {
    fn core_type(&self) -> &'static str {
        "NetworkConnectionMonitor"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("tests")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.tests = usage.get_i64("tests");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = match self.tests {
            None => {
                let (suffix, start) = TEST_TIERS[0];
                vec![self.tests_cost_component(suffix, start, None)]
            }
            Some(tests) => TEST_TIERS
                .iter()
                .zip(calculate_tier_buckets(Decimal::from(tests), TEST_TIER_LIMITS))
                .skip(1)
                .filter(|(_, quantity)| *quantity > Decimal::ZERO)
                .map(|((suffix, start), quantity)| {
                    self.tests_cost_component(suffix, start, Some(quantity))
                })
                .collect(),
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn monitor(tests: Option<i64>) -> NetworkConnectionMonitor {
        NetworkConnectionMonitor {
            address: "azurerm_network_connection_monitor.web".to_string(),
            region: "eastus".to_string(),
            tests,
        }
    }

    #[test]
    fn test_free_tests_are_not_billed() {
        let resource = monitor(Some(300_000)).build_resource().unwrap();

        let tiers: Vec<(&str, Option<Decimal>)> = resource
            .cost_components
            .iter()
            .map(|c| (c.name.as_str(), c.monthly_quantity))
            .collect();
        assert_eq!(
            tiers,
            vec![
                ("Tests (10-240,010)", Some(dec!(240000))),
                ("Tests (240,010-750,010)", Some(dec!(59990))),
            ]
        );

        assert!(monitor(Some(8)).build_resource().unwrap().cost_components.is_empty());
    }

    #[test]
    fn test_without_usage() {
        let resource = monitor(None).build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].name, "Tests (0-10)");
        assert!(resource.cost_components[0].monthly_quantity.is_none());
    }
}
