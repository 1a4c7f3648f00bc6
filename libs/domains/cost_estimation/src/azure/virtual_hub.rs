use rust_decimal::Decimal;

use super::util::{price_filter_consumption, product_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const SERVICE: &str = "Virtual WAN";

/// Virtual WAN hub; `Basic` hubs are free
#[derive(Debug, Clone, Default)]
pub struct VirtualHub {
    pub address: String,
    pub region: String,
    pub sku: String,

    pub monthly_data_processed_gb: Option<Decimal>,
}

impl VirtualHub {
    fn hub_cost_component(&self, name: &str, meter: &str) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", format!("{} Hub", self.sku)),
                    AttributeFilter::exact("meterName", format!("{} Hub {meter}", self.sku)),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for VirtualHub {
    fn core_type(&self) -> &'static str {
        "VirtualHub"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_data_processed_gb")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_data_processed_gb = usage.get_decimal("monthly_data_processed_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        if self.sku == "Basic" {
            return Some(Resource {
                name: self.address.clone(),
                usage_schema: self.usage_schema(),
                is_skipped: true,
                no_price: true,
                ..Default::default()
            });
        }

        let mut cost_components = vec![CostComponent {
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            ..self.hub_cost_component("Deployment", "Unit")
        }];
        if let Some(gb) = self.monthly_data_processed_gb {
            cost_components.push(CostComponent {
                unit: "GB".to_string(),
                monthly_quantity: Some(gb),
                usage_based: true,
                ..self.hub_cost_component("Data processed", "Data Processed")
            });
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
