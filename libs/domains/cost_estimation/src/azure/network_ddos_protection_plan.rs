use rust_decimal::Decimal;

use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, ProductFilter,
    Resource, UsageData, UsageItem,
};

/// DDoS network protection plan. The plan covers 100 public IPs; resources
/// above that are billed as overage.
#[derive(Debug, Clone, Default)]
pub struct NetworkDdosProtectionPlan {
    pub address: String,
    pub region: String,

    pub overage_amount: Option<i64>,
}

impl NetworkDdosProtectionPlan {
    fn ddos_product_filter(&self, meter: &str) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Azure DDOS Protection",
            "Networking",
            vec![
                AttributeFilter::exact("skuName", "Network Protection"),
                AttributeFilter::exact("meterName", meter),
            ],
        )
    }
}

impl CoreResource for NetworkDdosProtectionPlan {
    fn core_type(&self) -> &'static str {
        "NetworkDdosProtectionPlan"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("overage_amount")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.overage_amount = usage.get_i64("overage_amount");
    }

    fn build_resource(&self) -> Option<Resource> {
        let overage_unit = match self.overage_amount {
            Some(amount) if amount > 1 => "resources",
            _ => "resource",
        };

        let plan = CostComponent {
            name: "DDoS Protection Plan".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: self.ddos_product_filter("Network Protection Plan"),
            ..Default::default()
        };
        let overage = CostComponent {
            name: "Overage charges".to_string(),
            unit: overage_unit.to_string(),
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: self.overage_amount.map(Decimal::from),
            product_filter: self.ddos_product_filter("Network Protection Resource"),
            usage_based: true,
            ..Default::default()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![plan, overage],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overage_unit_pluralised() {
        let plan = NetworkDdosProtectionPlan {
            address: "azurerm_network_ddos_protection_plan.ddos".to_string(),
            region: "eastus".to_string(),
            overage_amount: Some(20),
        };
        let resource = plan.build_resource().unwrap();

        let overage = &resource.cost_components[1];
        assert_eq!(overage.unit, "resources");
        assert_eq!(overage.hourly_quantity, Some(dec!(20)));
        assert_eq!(overage.unit_multiplier, dec!(730));

        let single = NetworkDdosProtectionPlan {
            overage_amount: Some(1),
            ..plan
        };
        assert_eq!(single.build_resource().unwrap().cost_components[1].unit, "resource");
    }
}
