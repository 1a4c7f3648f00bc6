use rust_decimal::Decimal;

use super::util::{price_filter_consumption, price_filter_tier, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

const SKU: &str = "Basic";

/// Outbound transfer tiers: display suffix and price start amount
const OUTBOUND_TIERS: &[(&str, &str)] = &[
    ("(first 10TB)", "5"),
    ("(next 40TB)", "10240"),
    ("(next 100TB)", "51200"),
    ("(next 350TB)", "153600"),
    ("(over 500TB)", "512000"),
];
const OUTBOUND_TIER_LIMITS: &[i64] = &[10000, 50000, 150000, 500000];

#[derive(Debug, Clone, Default)]
pub struct BastionHost {
    pub address: String,
    pub region: String,

    pub monthly_outbound_data_gb: Option<Decimal>,
}

impl BastionHost {
    fn outbound_cost_component(
        &self,
        suffix: &str,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name: format!("Outbound data transfer {suffix}"),
            unit: "GB".to_string(),
            monthly_quantity: quantity,
            product_filter: product_filter(
                &self.region,
                "Azure Bastion",
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", SKU),
                    AttributeFilter::exact("meterName", "Data Transfer Out"),
                ],
            ),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    fn outbound_cost_components(&self) -> Vec<CostComponent> {
        let Some(outbound) = self.monthly_outbound_data_gb else {
            let (suffix, start) = OUTBOUND_TIERS[0];
            return vec![self.outbound_cost_component(suffix, start, None)];
        };

        OUTBOUND_TIERS
            .iter()
            .zip(calculate_tier_buckets(outbound, OUTBOUND_TIER_LIMITS))
            .filter(|(_, quantity)| *quantity > Decimal::ZERO)
            .map(|((suffix, start), quantity)| {
                self.outbound_cost_component(suffix, start, Some(quantity))
            })
            .collect()
    }
}

impl CoreResource for BastionHost {
    fn core_type(&self) -> &'static str {
        "BastionHost"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_outbound_data_gb")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_outbound_data_gb = usage.get_decimal("monthly_outbound_data_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let host = CostComponent {
            name: "Bastion host".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: product_filter(
                &self.region,
                "Azure Bastion",
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", SKU),
                    AttributeFilter::exact("meterName", SKU),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        };

        let mut cost_components = vec![host];
        cost_components.extend(self.outbound_cost_components());

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

    #[test]
    fn test_outbound_tiers() {
        let bastion = BastionHost {
            address: "azurerm_bastion_host.jump".to_string(),
            region: "eastus".to_string(),
            monthly_outbound_data_gb: Some(dec!(60000)),
        };
        let resource = bastion.build_resource().unwrap();

        let quantities: Vec<Option<Decimal>> =
            resource.cost_components.iter().map(|c| c.monthly_quantity).collect();
        assert_eq!(
            quantities,
            vec![None, Some(dec!(10000)), Some(dec!(50000))]
        );
        assert_eq!(resource.cost_components[0].hourly_quantity, Some(dec!(1)));
        assert_eq!(resource.cost_components[2].name, "Outbound data transfer (next 40TB)");
    }

    #[test]
    fn test_without_usage() {
        let resource = BastionHost::default().build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 2);
        assert_eq!(resource.cost_components[1].name, "Outbound data transfer (first 10TB)");
        assert!(resource.cost_components[1].monthly_quantity.is_none());
    }
}
