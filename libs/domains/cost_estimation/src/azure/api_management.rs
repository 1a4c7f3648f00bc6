use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_consumption, price_filter_tier, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, ProductFilter,
    Resource, UsageData, UsageItem,
};

/// API Management. `sku_name` is `<tier>_<capacity>`, e.g. `Developer_1` or
/// `Consumption_0`.
#[derive(Debug, Clone, Default)]
pub struct ApiManagement {
    pub address: String,
    pub region: String,
    pub sku_name: String,

    pub self_hosted_gateway_count: Option<i64>,
    pub monthly_api_calls: Option<i64>,
}

impl ApiManagement {
    fn sku_parts(&self) -> Option<(String, Decimal)> {
        let (tier, capacity) = self.sku_name.split_once('_')?;
        let capacity = capacity.parse().ok()?;
        Some((tier.to_lowercase(), capacity))
    }

    fn api_management_filter(
        &self,
        attribute_filters: Vec<AttributeFilter>,
    ) -> Option<ProductFilter> {
        product_filter(&self.region, "API Management", "Developer Tools", attribute_filters)
    }

    fn unit_cost_component(
        &self,
        name: String,
        unit: &str,
        tier: &str,
        quantity: Option<Decimal>,
        usage_based: bool,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: quantity,
            product_filter: self.api_management_filter(vec![
                AttributeFilter::regex("skuName", format!("/^{tier}$/i")),
                AttributeFilter::regex("meterName", format!("/^{tier} unit$/i")),
            ]),
            price_filter: price_filter_consumption(),
            usage_based,
            ..Default::default()
        }
    }

    fn consumption_cost_component(&self, tier: &str) -> CostComponent {
        CostComponent {
            name: "API management (consumption)".to_string(),
            unit: "1M calls".to_string(),
            unit_multiplier: dec!(100),
            monthly_quantity: self
                .monthly_api_calls
                .map(|calls| Decimal::from(calls) / dec!(10000)),
            product_filter: self.api_management_filter(vec![AttributeFilter::regex(
                "skuName",
                format!("/^{tier}$/i"),
            )]),
            price_filter: price_filter_tier("100"),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for ApiManagement {
    fn core_type(&self) -> &'static str {
        "APIManagement"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("self_hosted_gateway_count"), UsageItem::int("monthly_api_calls")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.self_hosted_gateway_count = usage.get_i64("self_hosted_gateway_count");
        self.monthly_api_calls = usage.get_i64("monthly_api_calls");
    }

    fn build_resource(&self) -> Option<Resource> {
        let (tier, capacity) = self.sku_parts()?;
        let mut cost_components = Vec::new();

        if tier == "consumption" {
            cost_components.push(self.consumption_cost_component(&tier));
        } else {
            cost_components.push(self.unit_cost_component(
                format!("API management ({tier})"),
                "units",
                &tier,
                Some(capacity),
                false,
            ));
        }

        if tier == "premium" {
            cost_components.push(self.unit_cost_component(
                "Self hosted gateway".to_string(),
                "gateways",
                "Gateway",
                self.self_hosted_gateway_count.map(Decimal::from),
                true,
            ));
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
