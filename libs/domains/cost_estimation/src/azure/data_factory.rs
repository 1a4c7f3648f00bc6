use rust_decimal::Decimal;

use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

pub(crate) const SERVICE: &str = "Azure Data Factory v2";
pub(crate) const PRODUCT_FAMILY: &str = "Analytics";

/// Data Factory pipeline operations. Pricing is the same for every
/// integration runtime.
#[derive(Debug, Clone, Default)]
pub struct DataFactory {
    pub address: String,
    pub region: String,

    pub monthly_read_write_operation_entities: Option<i64>,
    pub monthly_monitoring_operation_entities: Option<i64>,
}

impl DataFactory {
    fn operations_cost_component(
        &self,
        name: &str,
        meter: &str,
        entities: Option<i64>,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: "50k entities".to_string(),
            monthly_quantity: entities.map(|e| Decimal::from(e) / Decimal::from(50_000)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::regex("meterName", regex_filter(&format!("^{meter}$"))),
                    AttributeFilter::regex("skuName", regex_filter("^Cloud$")),
                    AttributeFilter::regex("productName", regex_filter(&format!("^{SERVICE}$"))),
                ],
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for DataFactory {
    fn core_type(&self) -> &'static str {
        "DataFactory"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_read_write_operation_entities"),
            UsageItem::int("monthly_monitoring_operation_entities"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_read_write_operation_entities =
            usage.get_i64("monthly_read_write_operation_entities");
        self.monthly_monitoring_operation_entities =
            usage.get_i64("monthly_monitoring_operation_entities");
    }

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![
                self.operations_cost_component(
                    "Read/Write operations",
                    "Cloud Read Write Operations",
                    self.monthly_read_write_operation_entities,
                ),
                self.operations_cost_component(
                    "Monitoring operations",
                    "Cloud Monitoring Operations",
                    self.monthly_monitoring_operation_entities,
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

    #[test]
    fn test_operations_in_50k_entities() {
        let mut factory = DataFactory {
            address: "azurerm_data_factory.etl".to_string(),
            region: "westeurope".to_string(),
            ..Default::default()
        };
        let usage = UsageData::from_value(
            "azurerm_data_factory.etl",
            &serde_json::json!({"monthly_read_write_operation_entities": 125000}),
        )
        .unwrap();
        factory.populate_usage(&usage);

        let resource = factory.build_resource().unwrap();
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(2.5)));
        assert!(resource.cost_components[1].monthly_quantity.is_none());
        assert_eq!(
            resource.cost_components[1].product_filter.as_ref().unwrap().attribute_filters[0],
            AttributeFilter::regex("meterName", "/^Cloud Monitoring Operations$/i")
        );
    }
}
