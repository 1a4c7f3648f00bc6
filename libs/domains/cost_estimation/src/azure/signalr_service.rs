use rust_decimal::Decimal;

use super::util::{product_filter, title_case};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
    days_in_month,
};

#[derive(Debug, Clone, Default)]
pub struct SignalRService {
    pub address: String,
    pub region: String,
    /// e.g. `Standard_S1` or `Free_F1`
    pub sku_name: String,
    pub sku_capacity: i64,

    pub monthly_additional_messages: Option<i64>,
}

impl SignalRService {
    /// `Standard_S1` -> `Standard`
    fn sku(&self) -> String {
        match self.sku_name.split_once('_') {
            Some((tier, size)) if !size.contains('_') => tier.to_string(),
            _ => title_case(&self.sku_name),
        }
    }

    fn signalr_product_filter(&self, meter: String) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "SignalR",
            "Analytics",
            vec![AttributeFilter::exact("meterName", meter)],
        )
    }
}

impl CoreResource for SignalRService {
    fn core_type(&self) -> &'static str {
        "SignalRService"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("monthly_additional_messages")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_additional_messages = usage.get_i64("monthly_additional_messages");
    }

    fn build_resource(&self) -> Option<Resource> {
        let sku = self.sku();
        if sku == "Free" {
            return Some(Resource {
                name: self.address.clone(),
                is_skipped: true,
                no_price: true,
                ..Default::default()
            });
        }

        // Units are priced per day
        let service_usage = CostComponent {
            name: format!("Service usage ({sku})"),
            unit: "units".to_string(),
            unit_multiplier: days_in_month(),
            monthly_quantity: Some(Decimal::from(self.sku_capacity) * days_in_month()),
            product_filter: self.signalr_product_filter(format!("{sku} Unit")),
            ..Default::default()
        };
        let messages = CostComponent {
            name: format!("Additional messages ({sku})"),
            unit: "1M messages".to_string(),
            monthly_quantity: self
                .monthly_additional_messages
                .map(|m| Decimal::from(m) / Decimal::from(1_000_000)),
            product_filter: self.signalr_product_filter(format!("{sku} Message")),
            usage_based: true,
            ..Default::default()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![service_usage, messages],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
