use rust_decimal::Decimal;

use super::util::{price_filter_consumption, price_filter_tier, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

const INCLUDED_ROUTING_RULES: i64 = 5;
const FREE_FRONTEND_HOSTS: i64 = 100;
const GOV_ZONE: &str = "US Gov Zone 1";

/// Outbound transfer zones: billing zone, usage key, display name
const OUTBOUND_ZONES: &[(&str, &str, &str)] = &[
    ("Zone 1", "north_america_europe_africa", "North America, Europe and Africa"),
    ("Zone 2", "asia_pacific", "Asia Pacific (including Japan)"),
    ("Zone 3", "south_america", "South America"),
    ("Zone 4", "australia", "Australia"),
    ("Zone 5", "india", "India"),
];

/// Outbound tiers: display suffix and price start amount, sized 10TB then 40TB
const OUTBOUND_TIERS: &[(&str, &str)] =
    &[("first 10TB", "0"), ("next 40TB", "10000"), ("over 50TB", "50000")];

/// Classic Front Door. `region` holds the billing zone, e.g. `Zone 1` or `US Gov Zone 1`.
#[derive(Debug, Clone, Default)]
pub struct Frontdoor {
    pub address: String,
    pub region: String,
    pub frontend_hosts: i64,
    pub routing_rules: i64,

    pub monthly_inbound_data_transfer_gb: Option<Decimal>,
    /// Outbound GB per zone usage key, `us_gov` for the government zone
    pub monthly_outbound_data_transfer_gb: Option<UsageData>,
}

impl Frontdoor {
    fn is_gov_zone(&self) -> bool {
        self.region.eq_ignore_ascii_case(GOV_ZONE)
    }

    fn frontdoor_product_filter(&self, meter: &str) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Azure Front Door Service",
            "Networking",
            vec![
                AttributeFilter::exact("skuName", "Standard"),
                AttributeFilter::regex("meterName", regex_filter(&format!("{meter}$"))),
                AttributeFilter::exact("productName", "Azure Front Door Service"),
            ],
        )
    }

    /// The API prices the first rules at zero from `0`, so the billed price starts at `5`.
    /// The government zone has a single price.
    fn routing_rules_cost_components(&self) -> Vec<CostComponent> {
        let first_start = if self.is_gov_zone() { "0" } else { "5" };
        let tiers = [
            (
                format!("Routing rules (first {INCLUDED_ROUTING_RULES} rules)"),
                "Included Routing Rules",
                first_start,
            ),
            (
                "Routing rules (per additional rule)".to_string(),
                "Overage Routing Rules",
                "0",
            ),
        ];

        let buckets =
            calculate_tier_buckets(Decimal::from(self.routing_rules), &[INCLUDED_ROUTING_RULES]);

        tiers
            .into_iter()
            .zip(buckets)
            .filter(|(_, quantity)| *quantity > Decimal::ZERO)
            .map(|((name, meter, start), quantity)| CostComponent {
                name,
                unit: "hours".to_string(),
                hourly_quantity: Some(quantity),
                product_filter: self.frontdoor_product_filter(meter),
                price_filter: price_filter_tier(start),
                ..Default::default()
            })
            .collect()
    }

    fn frontend_hosts_cost_component(&self) -> Option<CostComponent> {
        if self.frontend_hosts <= FREE_FRONTEND_HOSTS {
            return None;
        }

        Some(CostComponent {
            name: format!("Frontend hosts (over {FREE_FRONTEND_HOSTS})"),
            unit: "hosts".to_string(),
            monthly_quantity: Some(Decimal::from(self.frontend_hosts - FREE_FRONTEND_HOSTS)),
            product_filter: self.frontdoor_product_filter("Custom Domain"),
            price_filter: price_filter_consumption(),
            ..Default::default()
        })
    }

    fn inbound_data_transfer_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Inbound data transfer".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_inbound_data_transfer_gb,
            product_filter: self.frontdoor_product_filter("Data Transfer In"),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }

    fn outbound_cost_component(
        &self,
        name: String,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: "GB".to_string(),
            monthly_quantity: quantity,
            product_filter: self.frontdoor_product_filter("Data Transfer Out"),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    fn outbound_usage(&self, key: &str) -> Option<Decimal> {
        self.monthly_outbound_data_transfer_gb
            .as_ref()
            .and_then(|usage| usage.get_decimal(key))
    }

    fn outbound_data_transfer_cost_components(&self) -> Vec<CostComponent> {
        if self.is_gov_zone() {
            let usage = self.outbound_usage("us_gov");
            return vec![self.outbound_cost_component("US Gov".to_string(), "0", usage)];
        }

        let (_, usage_key, zone_name) = OUTBOUND_ZONES
            .iter()
            .find(|(zone, _, _)| zone.eq_ignore_ascii_case(&self.region))
            .unwrap_or(&OUTBOUND_ZONES[0]);

        let Some(quantity) = self.outbound_usage(usage_key) else {
            let (suffix, start) = OUTBOUND_TIERS[0];
            let name = format!("{zone_name} ({suffix})");
            return vec![self.outbound_cost_component(name, start, None)];
        };

        let buckets = calculate_tier_buckets(quantity, &[10000, 40000]);
        OUTBOUND_TIERS
            .iter()
            .zip(buckets)
            .filter(|(_, quantity)| *quantity > Decimal::ZERO)
            .map(|((suffix, start), quantity)| {
                let name = format!("{zone_name} ({suffix})");
                self.outbound_cost_component(name, start, Some(quantity))
            })
            .collect()
    }
}

impl CoreResource for Frontdoor {
    fn core_type(&self) -> &'static str {
        "Frontdoor"
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_inbound_data_transfer_gb"),
            UsageItem::sub_resource(
                "monthly_outbound_data_transfer_gb",
                vec![
                    UsageItem::float("us_gov"),
                    UsageItem::float("north_america_europe_africa"),
                    UsageItem::float("asia_pacific"),
                    UsageItem::float("south_america"),
                    UsageItem::float("australia"),
                    UsageItem::float("india"),
                ],
            ),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_inbound_data_transfer_gb =
            usage.get_decimal("monthly_inbound_data_transfer_gb");
        self.monthly_outbound_data_transfer_gb =
            usage.get_sub_usage("monthly_outbound_data_transfer_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = self.routing_rules_cost_components();
        cost_components.extend(self.frontend_hosts_cost_component());
        cost_components.push(self.inbound_data_transfer_cost_component());

        // Tiers are grouped under their own sub-resource
        let outbound = Resource {
            name: "Outbound data transfer".to_string(),
            cost_components: self.outbound_data_transfer_cost_components(),
            ..Default::default()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            sub_resources: vec![outbound],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn frontdoor(region: &str, routing_rules: i64, frontend_hosts: i64) -> Frontdoor {
        Frontdoor {
            address: "azurerm_frontdoor.main".to_string(),
            region: region.to_string(),
            routing_rules,
            frontend_hosts,
            ..Default::default()
        }
    }

    fn start_amount(component: &CostComponent) -> Option<&str> {
        component
            .price_filter
            .as_ref()
            .and_then(|f| f.start_usage_amount.as_deref())
    }

    #[test]
    fn test_routing_rules_split_at_five() {
        let resource = frontdoor("Zone 1", 7, 1).build_resource().unwrap();

        let first = &resource.cost_components[0];
        assert_eq!(first.name, "Routing rules (first 5 rules)");
        assert_eq!(first.hourly_quantity, Some(dec!(5)));
        assert_eq!(start_amount(first), Some("5"));

        let extra = &resource.cost_components[1];
        assert_eq!(extra.name, "Routing rules (per additional rule)");
        assert_eq!(extra.hourly_quantity, Some(dec!(2)));
    }

    #[test]
    fn test_few_rules_and_hosts() {
        let resource = frontdoor("US Gov Zone 1", 2, 100).build_resource().unwrap();

        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Routing rules (first 5 rules)", "Inbound data transfer"]);
        assert_eq!(start_amount(&resource.cost_components[0]), Some("0"));

        let outbound = &resource.sub_resources[0].cost_components;
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].name, "US Gov");
    }

    #[test]
    fn test_frontend_hosts_over_free_limit() {
        let resource = frontdoor("Zone 1", 1, 120).build_resource().unwrap();
        let hosts = &resource.cost_components[1];
        assert_eq!(hosts.name, "Frontend hosts (over 100)");
        assert_eq!(hosts.monthly_quantity, Some(dec!(20)));
    }

    #[test]
    fn test_outbound_without_usage_shows_first_tier() {
        let resource = frontdoor("Zone 2", 1, 1).build_resource().unwrap();
        let outbound = &resource.sub_resources[0].cost_components;
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].name, "Asia Pacific (including Japan) (first 10TB)");
        assert!(outbound[0].monthly_quantity.is_none());
    }

    #[test]
    fn test_outbound_tiers_for_zone() {
        let mut fd = frontdoor("Zone 1", 1, 1);
        let usage = UsageData::from_value(
            "azurerm_frontdoor.main",
            &json!({
                "monthly_inbound_data_transfer_gb": 10,
                "monthly_outbound_data_transfer_gb": {
                    "north_america_europe_africa": 60000,
                    "india": 5
                }
            }),
        )
        .unwrap();
        fd.populate_usage(&usage);

        let resource = fd.build_resource().unwrap();
        let outbound = &resource.sub_resources[0].cost_components;
        let quantities: Vec<Option<Decimal>> =
            outbound.iter().map(|c| c.monthly_quantity).collect();
        assert_eq!(quantities, vec![Some(dec!(10000)), Some(dec!(40000)), Some(dec!(10000))]);
        assert_eq!(start_amount(&outbound[2]), Some("50000"));
        assert_eq!(outbound[2].name, "North America, Europe and Africa (over 50TB)");
    }
}
