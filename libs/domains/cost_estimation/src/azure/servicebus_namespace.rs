use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_tier, product_filter, regex_filter, title_case};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, ProductFilter,
    Resource, UsageData, UsageItem, calculate_tier_buckets,
};

const OPERATIONS_PER_UNIT: Decimal = dec!(1000000);

/// Standard tier messaging operations. The first 13M are included.
const MESSAGING_TIERS: &[(&str, &str)] = &[
    (" (first 13M)", "0"),
    (" (13M-100M)", "13"),
    (" (100M-2,500M)", "100"),
    (" (over 2,500M)", "2500"),
];
const MESSAGING_TIER_LIMITS: &[i64] = &[13_000_000, 87_000_000, 2_400_000_000];

/// Standard tier brokered connections. The first 1K are included.
const CONNECTION_TIERS: &[(&str, &str)] = &[
    (" (first 1K)", "0"),
    (" (1K-100K)", "1000"),
    (" (100K-500K)", "100000"),
    (" (over 500K)", "500000"),
];
const CONNECTION_TIER_LIMITS: &[i64] = &[1000, 99000, 400000];

#[derive(Debug, Clone, Default)]
pub struct ServiceBusNamespace {
    pub address: String,
    pub region: String,
    /// `Basic`, `Standard` or `Premium`
    pub sku: String,
    /// Premium messaging units
    pub capacity: i64,

    pub monthly_messaging_operations: Option<i64>,
    pub monthly_brokered_connections: Option<i64>,
}

impl ServiceBusNamespace {
    fn normalized_sku(&self) -> String {
        title_case(&self.sku)
    }

    fn service_bus_filter(&self, meter_suffix: &str) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Service Bus",
            "Integration",
            vec![
                AttributeFilter::exact("skuName", self.normalized_sku()),
                AttributeFilter::regex("meterName", regex_filter(&format!("{meter_suffix}$"))),
            ],
        )
    }

    fn base_charge_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Base charge".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: self.service_bus_filter("Base Unit"),
            ..Default::default()
        }
    }

    fn messaging_units_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Messaging units".to_string(),
            unit: "units".to_string(),
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: Some(Decimal::from(self.capacity)),
            product_filter: self.service_bus_filter("Messaging Unit"),
            ..Default::default()
        }
    }

    fn messaging_operations_cost_component(
        &self,
        suffix: &str,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name: format!("Messaging operations{suffix}"),
            unit: "1M operations".to_string(),
            monthly_quantity: quantity.map(|q| q / OPERATIONS_PER_UNIT),
            product_filter: self.service_bus_filter("Messaging Operations"),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    fn brokered_connections_cost_component(
        &self,
        suffix: &str,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name: format!("Brokered connections{suffix}"),
            unit: "connections".to_string(),
            monthly_quantity: quantity,
            product_filter: self.service_bus_filter("Brokered Connection"),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    fn messaging_operations_cost_components(&self) -> Vec<CostComponent> {
        let quantity = self.monthly_messaging_operations.map(Decimal::from);
        if self.sku.eq_ignore_ascii_case("basic") {
            return vec![self.messaging_operations_cost_component("", "0", quantity)];
        }

        billed_tiers(quantity, MESSAGING_TIERS, MESSAGING_TIER_LIMITS)
            .into_iter()
            .map(|(suffix, start, q)| self.messaging_operations_cost_component(suffix, start, q))
            .collect()
    }

    fn brokered_connections_cost_components(&self) -> Vec<CostComponent> {
        let quantity = self.monthly_brokered_connections.map(Decimal::from);
        billed_tiers(quantity, CONNECTION_TIERS, CONNECTION_TIER_LIMITS)
            .into_iter()
            .map(|(suffix, start, q)| self.brokered_connections_cost_component(suffix, start, q))
            .collect()
    }
}

/// Tiers after the included first one that carry a quantity. Without usage
/// only the first billed tier is listed, with no quantity.
fn billed_tiers(
    quantity: Option<Decimal>,
    tiers: &[(&'static str, &'static str)],
    limits: &[i64],
) -> Vec<(&'static str, &'static str, Option<Decimal>)> {
    let Some(quantity) = quantity else {
        let (suffix, start) = tiers[1];
        return vec![(suffix, start, None)];
    };

    tiers
        .iter()
        .zip(calculate_tier_buckets(quantity, limits))
        .skip(1)
        .filter(|(_, bucket)| *bucket > Decimal::ZERO)
        .map(|((suffix, start), bucket)| (*suffix, *start, Some(bucket)))
        .collect()
}

impl CoreResource for ServiceBusNamespace {
    fn core_type(&self) -> &'static str {
        "ServiceBusNamespace"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_messaging_operations"),
            UsageItem::int("monthly_brokered_connections"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_messaging_operations = usage.get_i64("monthly_messaging_operations");
        self.monthly_brokered_connections = usage.get_i64("monthly_brokered_connections");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = if self.sku.eq_ignore_ascii_case("premium") {
            vec![self.messaging_units_cost_component()]
        } else if self.sku.eq_ignore_ascii_case("basic") {
            self.messaging_operations_cost_components()
        } else {
            let mut components = vec![self.base_charge_cost_component()];
            components.extend(self.messaging_operations_cost_components());
            components.extend(self.brokered_connections_cost_components());
            components
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
    use serde_json::json;

    fn namespace(sku: &str) -> ServiceBusNamespace {
        ServiceBusNamespace {
            address: "azurerm_servicebus_namespace.events".to_string(),
            region: "eastus".to_string(),
            sku: sku.to_string(),
            capacity: 2,
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
    fn test_normalized_sku() {
        assert_eq!(namespace("PREMIUM").normalized_sku(), "Premium");
        assert_eq!(namespace("standard").normalized_sku(), "Standard");
    }

    #[test]
    fn test_premium_bills_messaging_units() {
        let resource = namespace("Premium").build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].name, "Messaging units");
        assert_eq!(resource.cost_components[0].hourly_quantity, Some(dec!(2)));
    }

    #[test]
    fn test_basic_flat_operations() {
        let mut ns = namespace("Basic");
        let usage = UsageData::from_value(
            "azurerm_servicebus_namespace.events",
            &json!({"monthly_messaging_operations": 3_000_000}),
        )
        .unwrap();
        ns.populate_usage(&usage);

        let resource = ns.build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].name, "Messaging operations");
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(3)));
    }

    #[test]
    fn test_standard_without_usage() {
        let resource = namespace("Standard").build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Base charge",
                "Messaging operations (13M-100M)",
                "Brokered connections (1K-100K)"
            ]
        );
    }

    #[test]
    fn test_standard_tiers_from_usage() {
        let mut ns = namespace("Standard");
        let usage = UsageData::from_value(
            "azurerm_servicebus_namespace.events",
            &json!({
                "monthly_messaging_operations": 150_000_000,
                "monthly_brokered_connections": 600_000
            }),
        )
        .unwrap();
        ns.populate_usage(&usage);

        let resource = ns.build_resource().unwrap();
        let operations: Vec<&CostComponent> = resource
            .cost_components
            .iter()
            .filter(|c| c.name.starts_with("Messaging operations"))
            .collect();
        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].monthly_quantity, Some(dec!(87)));
        assert_eq!(operations[1].monthly_quantity, Some(dec!(50)));
        assert_eq!(start_amount(operations[1]), Some("100"));

        let connections: Vec<&CostComponent> = resource
            .cost_components
            .iter()
            .filter(|c| c.name.starts_with("Brokered connections"))
            .collect();
        let quantities: Vec<Option<Decimal>> =
            connections.iter().map(|c| c.monthly_quantity).collect();
        assert_eq!(quantities, vec![Some(dec!(99000)), Some(dec!(400000)), Some(dec!(100000))]);
        assert_eq!(start_amount(connections[1]), Some("100000"));
        assert_eq!(start_amount(connections[2]), Some("500000"));
    }
}
