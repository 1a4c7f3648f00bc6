use rust_decimal::Decimal;

use super::util::{price_filter_consumption, price_filter_tier, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

/// Data processing tiers in GB: 10TB then 30TB more
const DATA_PROCESSED_TIERS: &[i64] = &[10240, 30720];

/// Application Gateway. `sku_name` is `<tier>_<size>`, e.g. `Standard_Small`,
/// `WAF_Medium` or `WAF_v2`.
#[derive(Debug, Clone, Default)]
pub struct ApplicationGateway {
    pub address: String,
    pub region: String,
    pub sku_name: String,
    pub sku_capacity: i64,

    pub monthly_data_processed_gb: Option<Decimal>,
    pub monthly_v2_capacity_units: Option<i64>,
}

impl ApplicationGateway {
    /// Lower-cased size part and whether the tier is `Standard`
    fn sku_parts(&self) -> (String, bool) {
        let mut parts = self.sku_name.splitn(2, '_');
        let is_standard = parts
            .next()
            .is_some_and(|tier| tier.eq_ignore_ascii_case("standard"));
        let size = parts.next().unwrap_or_default().to_lowercase();
        (size, is_standard)
    }

    fn gateway_cost_component(&self, tier: &str, size: &str) -> CostComponent {
        CostComponent {
            name: format!("Gateway usage ({tier}, {size})"),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::from(self.sku_capacity)),
            product_filter: product_filter(
                &self.region,
                "Application Gateway",
                "Networking",
                vec![
                    AttributeFilter::regex("productName", format!("/{tier} Application Gateway/i")),
                    AttributeFilter::regex("meterName", format!("/{size} Gateway/i")),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn data_processing_cost_component(
        &self,
        name: &str,
        size: &str,
        start: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: "GB".to_string(),
            monthly_quantity: quantity,
            product_filter: product_filter(
                &self.region,
                "Application Gateway",
                "Networking",
                vec![AttributeFilter::regex("meterName", format!("/{size} Data Processed/i"))],
            ),
            price_filter: price_filter_tier(start),
            usage_based: true,
            ..Default::default()
        }
    }

    /// Medium gateways include the first 10TB and large ones the first 40TB
    fn v1_data_processing_cost_components(&self, size: &str) -> Vec<CostComponent> {
        let Some(processed) = self.monthly_data_processed_gb else {
            let name = "Data processing (0-10TB)";
            return vec![self.data_processing_cost_component(name, size, "0", None)];
        };

        let buckets = calculate_tier_buckets(processed, DATA_PROCESSED_TIERS);
        let (first_billed_tier, start) = match size {
            "small" => (0, "0"),
            "medium" => (1, "10240"),
            "large" => (2, "40960"),
            _ => return Vec::new(),
        };

        let names = [
            "Data processing (0-10TB)",
            "Data processing (10-40TB)",
            "Data processing (over 40TB)",
        ];
        names
            .iter()
            .zip(buckets)
            .skip(first_billed_tier)
            .filter(|(_, quantity)| *quantity > Decimal::ZERO)
            .map(|(name, quantity)| {
                self.data_processing_cost_component(name, size, start, Some(quantity))
            })
            .collect()
    }

    fn fixed_v2_cost_component(&self, name: &str, tier: &str) -> CostComponent {
        CostComponent {
            name: format!("Gateway usage ({name})"),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::from(self.sku_capacity)),
            product_filter: product_filter(
                &self.region,
                "Application Gateway",
                "Networking",
                vec![
                    AttributeFilter::regex("productName", format!("/Application Gateway {tier}/i")),
                    AttributeFilter::exact("meterName", "Fixed Cost"),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn capacity_units_cost_component(&self, name: &str, tier: &str) -> CostComponent {
        CostComponent {
            name: format!("V2 capacity units ({name})"),
            unit: "CU".to_string(),
            monthly_quantity: self.monthly_v2_capacity_units.map(Decimal::from),
            product_filter: product_filter(
                &self.region,
                "Application Gateway",
                "Networking",
                vec![
                    AttributeFilter::exact("meterName", "Capacity Units"),
                    AttributeFilter::regex("productName", format!("/Application Gateway {tier}/i")),
                ],
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for ApplicationGateway {
    fn core_type(&self) -> &'static str {
        "ApplicationGateway"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_data_processed_gb"),
            UsageItem::int("monthly_v2_capacity_units"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_data_processed_gb = usage.get_decimal("monthly_data_processed_gb");
        self.monthly_v2_capacity_units = usage.get_i64("monthly_v2_capacity_units");
    }

    fn build_resource(&self) -> Option<Resource> {
        let (size, is_standard) = self.sku_parts();

        let cost_components = if size == "v2" {
            if is_standard {
                vec![
                    self.fixed_v2_cost_component("basic v2", "standard v2"),
                    self.capacity_units_cost_component("basic", "standard v2"),
                ]
            } else {
                vec![
                    self.fixed_v2_cost_component("WAF v2", "WAF v2"),
                    self.capacity_units_cost_component("WAF", "WAF v2"),
                ]
            }
        } else {
            let tier = if is_standard { "basic" } else { "WAF" };
            let mut components = vec![self.gateway_cost_component(tier, &size)];
            components.extend(self.v1_data_processing_cost_components(&size));
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
