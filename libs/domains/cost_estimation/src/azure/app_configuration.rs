use rust_decimal::Decimal;

use super::util::{product_filter, title_case};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct AppConfiguration {
    pub address: String,
    pub region: String,
    /// `free` or `standard`
    pub sku: String,
    pub replicas: i64,

    pub monthly_additional_requests: Option<i64>,
}

impl AppConfiguration {
    fn app_configuration_filter(
        &self,
        attribute_filters: Vec<AttributeFilter>,
    ) -> Option<ProductFilter> {
        product_filter(&self.region, "App Configuration", "Developer Tools", attribute_filters)
    }

    /// The primary store plus every replica is billed per day
    fn instance_cost_component(&self, sku: &str) -> CostComponent {
        let instances = Decimal::from(1 + self.replicas.max(0));
        let name = match self.replicas {
            r if r <= 0 => "Instance".to_string(),
            1 => "Instance (1 replica)".to_string(),
            r => format!("Instance ({r} replicas)"),
        };

        CostComponent {
            name,
            unit: "days".to_string(),
            unit_multiplier: instances,
            monthly_quantity: Some(Decimal::from(DAYS_PER_MONTH) * instances),
            product_filter: self.app_configuration_filter(vec![
                AttributeFilter::exact("skuName", sku),
                AttributeFilter::exact("meterName", format!("{sku} Instance")),
            ]),
            ..Default::default()
        }
    }

    fn request_cost_component(&self, sku: &str) -> CostComponent {
        CostComponent {
            name: "Requests (over 200k/day per replica)".to_string(),
            unit: "10k requests".to_string(),
            monthly_quantity: self
                .monthly_additional_requests
                .map(|requests| Decimal::from(requests) / Decimal::from(10000)),
            product_filter: self.app_configuration_filter(vec![AttributeFilter::exact(
                "meterName",
                format!("{sku} Overage Operations"),
            )]),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for AppConfiguration {
    fn core_type(&self) -> &'static str {
        "AppConfiguration"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("monthly_additional_requests")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_additional_requests = usage.get_i64("monthly_additional_requests");
    }

    fn build_resource(&self) -> Option<Resource> {
        if self.sku.eq_ignore_ascii_case("free") {
            return Some(Resource {
                name: self.address.clone(),
                no_price: true,
                is_skipped: true,
                ..Default::default()
            });
        }

        let sku = title_case(&self.sku);
        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![
                self.instance_cost_component(&sku),
                self.request_cost_component(&sku),
            ],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn store(sku: &str, replicas: i64) -> AppConfiguration {
        AppConfiguration {
            address: "azurerm_app_configuration.config".to_string(),
            region: "westeurope".to_string(),
            sku: sku.to_string(),
            replicas,
            ..Default::default()
        }
    }

    #[test]
    fn test_free_sku_has_no_price() {
        let resource = store("free", 0).build_resource().unwrap();
        assert!(resource.no_price);
        assert!(resource.is_skipped);
        assert!(resource.cost_components.is_empty());
    }

    #[test]
    fn test_replicas_multiply_instance_days() {
        let resource = store("standard", 2).build_resource().unwrap();
        let instance = &resource.cost_components[0];
        assert_eq!(instance.name, "Instance (2 replicas)");
        assert_eq!(instance.monthly_quantity, Some(dec!(90)));
        assert_eq!(instance.unit_multiplier, dec!(3));

        let filters = &instance.product_filter.as_ref().unwrap().attribute_filters;
        assert_eq!(filters[1], AttributeFilter::exact("meterName", "Standard Instance"));
    }

    #[test]
    fn test_requests_in_ten_thousands() {
        let mut config = store("standard", 1);
        config.monthly_additional_requests = Some(250_000);

        let resource = config.build_resource().unwrap();
        assert_eq!(resource.cost_components[0].name, "Instance (1 replica)");
        let requests = &resource.cost_components[1];
        assert_eq!(requests.monthly_quantity, Some(dec!(25)));
        assert!(requests.usage_based);
    }
}
