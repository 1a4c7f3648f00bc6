use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_tier, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

const QUERIES_PER_UNIT: Decimal = dec!(1000000);
const FIRST_TIER_QUERIES: i64 = 1_000_000_000;

/// Billing region for Traffic Manager meters
pub fn traffic_manager_billing_region(region: &str) -> &'static str {
    let region = region.to_lowercase();
    if region.contains("usgov") {
        "US Gov"
    } else if region.contains("china") {
        "China"
    } else if region.contains("germany") {
        "Germany"
    } else {
        "Global"
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrafficManagerProfile {
    pub address: String,
    pub region: String,
    pub enabled: bool,
    pub traffic_view_enabled: bool,

    pub monthly_dns_queries: Option<i64>,
    pub monthly_traffic_view_data_points: Option<i64>,
}

impl TrafficManagerProfile {
    fn dns_queries_cost_component(
        &self,
        queries: Option<Decimal>,
        tier: &str,
        start: &str,
    ) -> CostComponent {
        CostComponent {
            name: format!("DNS queries ({tier})"),
            unit: "1M queries".to_string(),
            monthly_quantity: queries.map(|q| q / QUERIES_PER_UNIT),
            product_filter: product_filter(
                traffic_manager_billing_region(&self.region),
                "Traffic Manager",
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", "Azure Endpoint"),
                    AttributeFilter::exact("meterName", "DNS Queries"),
                ],
            ),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    fn traffic_view_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Traffic view".to_string(),
            unit: "1M data points".to_string(),
            monthly_quantity: self
                .monthly_traffic_view_data_points
                .map(|points| Decimal::from(points) / QUERIES_PER_UNIT),
            product_filter: product_filter(
                traffic_manager_billing_region(&self.region),
                "Traffic Manager",
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", "Traffic View"),
                    AttributeFilter::exact("meterName", "Traffic View Data Points Processed"),
                ],
            ),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for TrafficManagerProfile {
    fn core_type(&self) -> &'static str {
        "TrafficManagerProfile"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_dns_queries"),
            UsageItem::int("monthly_traffic_view_data_points"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_dns_queries = usage.get_i64("monthly_dns_queries");
        self.monthly_traffic_view_data_points = usage.get_i64("monthly_traffic_view_data_points");
    }

    fn build_resource(&self) -> Option<Resource> {
        if !self.enabled {
            return Some(Resource {
                name: self.address.clone(),
                ..Default::default()
            });
        }

        let mut cost_components = Vec::new();
        match self.monthly_dns_queries {
            Some(queries) => {
                let buckets = calculate_tier_buckets(Decimal::from(queries), &[FIRST_TIER_QUERIES]);
                let first = self.dns_queries_cost_component(Some(buckets[0]), "first 1B", "0");
                cost_components.push(first);
                if buckets[1] > Decimal::ZERO {
                    let over = self.dns_queries_cost_component(Some(buckets[1]), "over 1B", "1000");
                    cost_components.push(over);
                }
            }
            None => cost_components.push(self.dns_queries_cost_component(None, "first 1B", "0")),
        }

        if self.traffic_view_enabled {
            cost_components.push(self.traffic_view_cost_component());
        }

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
    use serde_json::json;

    fn profile() -> TrafficManagerProfile {
        TrafficManagerProfile {
            address: "azurerm_traffic_manager_profile.web".to_string(),
            region: "eastus".to_string(),
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_billing_region() {
        assert_eq!(traffic_manager_billing_region("usgovtexas"), "US Gov");
        assert_eq!(traffic_manager_billing_region("chinaeast"), "China");
        assert_eq!(traffic_manager_billing_region("germanynorth"), "Germany");
        assert_eq!(traffic_manager_billing_region("westus"), "Global");
    }

    #[test]
    fn test_disabled_profile_has_no_components() {
        let tm = TrafficManagerProfile {
            enabled: false,
            traffic_view_enabled: true,
            ..profile()
        };
        let resource = tm.build_resource().unwrap();
        assert!(resource.cost_components.is_empty());
        assert_eq!(resource.name, "azurerm_traffic_manager_profile.web");
    }

    #[test]
    fn test_dns_queries_without_usage() {
        let resource = profile().build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].name, "DNS queries (first 1B)");
        assert!(resource.cost_components[0].monthly_quantity.is_none());
    }

    #[test]
    fn test_dns_queries_over_first_tier() {
        let mut tm = TrafficManagerProfile {
            traffic_view_enabled: true,
            ..profile()
        };
        let usage = UsageData::from_value(
            "azurerm_traffic_manager_profile.web",
            &json!({
                "monthly_dns_queries": 1_500_000_000i64,
                "monthly_traffic_view_data_points": 2_000_000
            }),
        )
        .unwrap();
        tm.populate_usage(&usage);

        let resource = tm.build_resource().unwrap();
        let quantities: Vec<Option<Decimal>> =
            resource.cost_components.iter().map(|c| c.monthly_quantity).collect();
        assert_eq!(quantities, vec![Some(dec!(1000)), Some(dec!(500)), Some(dec!(2))]);
        assert_eq!(resource.cost_components[1].name, "DNS queries (over 1B)");
        assert_eq!(resource.cost_components[2].name, "Traffic view");
    }

    #[test]
    fn test_dns_queries_under_first_tier() {
        let mut tm = profile();
        let usage = UsageData::from_value(
            "azurerm_traffic_manager_profile.web",
            &json!({"monthly_dns_queries": 500_000}),
        )
        .unwrap();
        tm.populate_usage(&usage);

        let resource = tm.build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(0.5)));
    }
}
