use rust_decimal::Decimal;

use super::util::{price_filter_tier, product_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

#[derive(Debug, Clone, Default)]
pub struct EventGridTopic {
    pub address: String,
    pub region: String,

    pub monthly_operations: Option<Decimal>,
}

impl CoreResource for EventGridTopic {
    fn core_type(&self) -> &'static str {
        "EventGridTopic"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_operations")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_operations = usage.get_decimal("monthly_operations");
    }

    fn build_resource(&self) -> Option<Resource> {
        // Billed per whole 100k block
        let quantity = self
            .monthly_operations
            .map(|operations| (operations / Decimal::from(100_000)).floor());

        let operations = CostComponent {
            name: "Operations".to_string(),
            unit: "100k operations".to_string(),
            monthly_quantity: quantity,
            product_filter: product_filter(
                &self.region,
                "Event Grid",
                "Internet of Things",
                vec![
                    AttributeFilter::exact("skuName", "Standard"),
                    AttributeFilter::exact("meterName", "Standard Operations"),
                ],
            ),
            price_filter: price_filter_tier("1"),
            usage_based: true,
            ..Default::default()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![operations],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
