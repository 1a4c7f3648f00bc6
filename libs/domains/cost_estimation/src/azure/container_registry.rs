use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_consumption, price_filter_tier, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

const DAYS_PER_MONTH: i64 = 30;
const SECONDS_PER_HOUR: Decimal = dec!(3600);

#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    pub address: String,
    pub region: String,
    /// `Basic`, `Standard` or `Premium`; empty means `Classic`
    pub sku: String,
    pub geo_replication_locations: i64,

    pub storage_gb: Option<Decimal>,
    pub monthly_build_vcpu_hrs: Option<Decimal>,
}

impl ContainerRegistry {
    fn sku(&self) -> &str {
        if self.sku.is_empty() { "Classic" } else { &self.sku }
    }

    fn included_storage_gb(&self) -> Decimal {
        match self.sku() {
            "Standard" => dec!(100),
            "Premium" => dec!(500),
            _ => dec!(10),
        }
    }

    fn registry_filter(&self, meter: &str) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Container Registry",
            "Containers",
            vec![
                AttributeFilter::exact("productName", "Container Registry"),
                AttributeFilter::exact("skuName", self.sku()),
                AttributeFilter::exact("meterName", meter),
            ],
        )
    }

    fn registry_unit_cost_component(&self, name: String, days: i64) -> CostComponent {
        CostComponent {
            name,
            unit: "days".to_string(),
            monthly_quantity: Some(Decimal::from(days)),
            product_filter: self.registry_filter(&format!("{} Registry Unit", self.sku())),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    /// Only storage over the SKU allowance is billed
    fn storage_cost_component(&self) -> Option<CostComponent> {
        let included = self.included_storage_gb();
        let quantity = match self.storage_gb {
            Some(storage) if storage > included => Some(storage - included),
            Some(_) => return None,
            None => None,
        };

        Some(CostComponent {
            name: format!("Storage (over {included}GB)"),
            unit: "GB".to_string(),
            monthly_quantity: quantity,
            product_filter: self.registry_filter("Data Stored"),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        })
    }

    fn build_vcpu_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Build vCPU".to_string(),
            unit: "seconds".to_string(),
            monthly_quantity: self.monthly_build_vcpu_hrs.map(|hours| hours * SECONDS_PER_HOUR),
            product_filter: self.registry_filter("Task vCPU Duration"),
            price_filter: price_filter_tier("6000"),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for ContainerRegistry {
    fn core_type(&self) -> &'static str {
        "ContainerRegistry"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("storage_gb"), UsageItem::float("monthly_build_vcpu_hrs")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.storage_gb = usage.get_decimal("storage_gb");
        self.monthly_build_vcpu_hrs = usage.get_decimal("monthly_build_vcpu_hrs");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = Vec::new();

        let locations = self.geo_replication_locations;
        if locations > 0 {
            let plural = if locations == 1 { "location" } else { "locations" };
            cost_components.push(self.registry_unit_cost_component(
                format!("Geo replication ({locations} {plural})"),
                DAYS_PER_MONTH * locations,
            ));
        }

        cost_components.push(
            self.registry_unit_cost_component(
                format!("Registry usage ({})", self.sku()),
                DAYS_PER_MONTH,
            ),
        );
        cost_components.extend(self.storage_cost_component());
        cost_components.push(self.build_vcpu_cost_component());

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

    fn registry(sku: &str, locations: i64) -> ContainerRegistry {
        ContainerRegistry {
            address: "azurerm_container_registry.acr".to_string(),
            region: "eastus".to_string(),
            sku: sku.to_string(),
            geo_replication_locations: locations,
            ..Default::default()
        }
    }

    fn names(resource: &Resource) -> Vec<&str> {
        resource.cost_components.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_classic_without_usage() {
        let resource = registry("", 0).build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec!["Registry usage (Classic)", "Storage (over 10GB)", "Build vCPU"]
        );
    }

    #[test]
    fn test_premium_geo_replication_and_usage() {
        let mut acr = registry("Premium", 2);
        let usage = UsageData::from_value(
            "azurerm_container_registry.acr",
            &serde_json::json!({"storage_gb": 650, "monthly_build_vcpu_hrs": 2.5}),
        )
        .unwrap();
        acr.populate_usage(&usage);

        let resource = acr.build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec![
                "Geo replication (2 locations)",
                "Registry usage (Premium)",
                "Storage (over 500GB)",
                "Build vCPU"
            ]
        );
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(60)));
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(150)));
        assert_eq!(resource.cost_components[3].monthly_quantity, Some(dec!(9000)));
    }

    #[test]
    fn test_storage_within_allowance_is_free() {
        let acr = ContainerRegistry {
            storage_gb: Some(dec!(80)),
            ..registry("Standard", 1)
        };
        let resource = acr.build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec!["Geo replication (1 location)", "Registry usage (Standard)", "Build vCPU"]
        );
    }
}
