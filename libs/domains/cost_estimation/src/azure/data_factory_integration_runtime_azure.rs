use rust_decimal::Decimal;

use super::data_factory::{PRODUCT_FAMILY, SERVICE};
use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const RUNTIME: &str = "Cloud";

/// Azure-hosted integration runtime: data flow compute plus activity meters
#[derive(Debug, Clone, Default)]
pub struct DataFactoryIntegrationRuntimeAzure {
    pub address: String,
    pub region: String,
    pub cores: i64,
    /// `general`, `compute_optimized` or `memory_optimized`
    pub compute_type: String,

    pub monthly_orchestration_runs: Option<i64>,
}

fn compute_product_type(compute_type: &str) -> &'static str {
    match compute_type {
        "general" => "General Purpose",
        "compute_optimized" => "Compute Optimized",
        "memory_optimized" => "Memory Optimized",
        _ => "",
    }
}

impl DataFactoryIntegrationRuntimeAzure {
    fn runtime_filters(&self, meter: &str) -> Vec<AttributeFilter> {
        vec![
            AttributeFilter::regex("meterName", regex_filter(&format!("^{RUNTIME} {meter}$"))),
            AttributeFilter::regex("skuName", regex_filter(&format!("^{RUNTIME}$"))),
            AttributeFilter::regex("productName", regex_filter(&format!("^{SERVICE}$"))),
        ]
    }

    fn activity_cost_component(&self, name: &str, meter: &str) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                self.runtime_filters(meter),
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    /// The catalog carries two records at the same price; only the newer
    /// one has an armSkuName, so the productName filter is kept exact.
    fn compute_cost_component(&self) -> CostComponent {
        let product_type = compute_product_type(&self.compute_type);
        let cores = Decimal::from(self.cores);

        CostComponent {
            name: format!("Compute ({product_type}, {} vCores)", self.cores),
            unit: "hours".to_string(),
            unit_multiplier: cores,
            hourly_quantity: Some(cores),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::regex("skuName", regex_filter("^vCore$")),
                    AttributeFilter::regex(
                        "productName",
                        regex_filter(&format!("^{SERVICE} Data Flow - {product_type}$")),
                    ),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn orchestration_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Orchestration".to_string(),
            unit: "1k runs".to_string(),
            monthly_quantity: self
                .monthly_orchestration_runs
                .map(|runs| Decimal::from(runs) / Decimal::from(1000)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                self.runtime_filters("Orchestration Activity Run"),
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for DataFactoryIntegrationRuntimeAzure {
    fn core_type(&self) -> &'static str {
        "DataFactoryIntegrationRuntimeAzure"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("monthly_orchestration_runs")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_orchestration_runs = usage.get_i64("monthly_orchestration_runs");
    }

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![
                self.compute_cost_component(),
                self.orchestration_cost_component(),
                self.activity_cost_component("Data movement activity", "Data Movement"),
                self.activity_cost_component("Pipeline activity", "Pipeline Activity"),
                self.activity_cost_component(
                    "External pipeline activity",
                    "External Pipeline Activity",
                ),
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

    fn runtime() -> DataFactoryIntegrationRuntimeAzure {
        DataFactoryIntegrationRuntimeAzure {
            address: "azurerm_data_factory_integration_runtime_azure.flow".to_string(),
            region: "eastus".to_string(),
            cores: 16,
            compute_type: "memory_optimized".to_string(),
            monthly_orchestration_runs: Some(2500),
        }
    }

    #[test]
    fn test_compute_scales_with_cores() {
        let resource = runtime().build_resource().unwrap();
        let compute = &resource.cost_components[0];

        assert_eq!(compute.name, "Compute (Memory Optimized, 16 vCores)");
        assert_eq!(compute.hourly_quantity, Some(dec!(16)));
        assert_eq!(compute.unit_multiplier, dec!(16));
        assert_eq!(
            compute.product_filter.as_ref().unwrap().attribute_filters[1],
            AttributeFilter::regex(
                "productName",
                "/^Azure Data Factory v2 Data Flow - Memory Optimized$/i"
            )
        );
    }

    #[test]
    fn test_activity_components() {
        let resource = runtime().build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names[1..],
            [
                "Orchestration",
                "Data movement activity",
                "Pipeline activity",
                "External pipeline activity"
            ]
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(2.5)));
        assert_eq!(
            resource.cost_components[4].product_filter.as_ref().unwrap().attribute_filters[0],
            AttributeFilter::regex("meterName", "/^Cloud External Pipeline Activity$/i")
        );
    }
}
