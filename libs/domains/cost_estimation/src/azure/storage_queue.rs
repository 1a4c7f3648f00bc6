use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::util::{price_filter_tier, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

const OPERATIONS_PER_UNIT: Decimal = dec!(10000);

const V1_REPLICATION_TYPES: &[&str] = &["LRS", "GRS", "RA-GRS"];
const V2_REPLICATION_TYPES: &[&str] = &["LRS", "ZRS", "GRS", "RA-GRS", "GZRS", "RA-GZRS"];

/// Queue storage priced on the parent account's kind and redundancy.
/// Only `Storage` and `StorageV2` accounts host billable queues.
#[derive(Debug, Clone, Default)]
pub struct StorageQueue {
    pub address: String,
    pub region: String,
    pub account_kind: String,
    pub account_replication_type: String,

    pub monthly_storage_gb: Option<Decimal>,
    pub monthly_class_1_operations: Option<i64>,
    pub monthly_class_2_operations: Option<i64>,
    pub monthly_geo_replication_data_transfer_gb: Option<Decimal>,
}

impl StorageQueue {
    fn is_storage_v1(&self) -> bool {
        self.account_kind.eq_ignore_ascii_case("storage")
    }

    fn is_storage_v2(&self) -> bool {
        self.account_kind.eq_ignore_ascii_case("storagev2")
    }

    fn replication(&self) -> String {
        self.account_replication_type.to_uppercase()
    }

    fn replication_supported(&self) -> bool {
        let valid = if self.is_storage_v1() { V1_REPLICATION_TYPES } else { V2_REPLICATION_TYPES };
        valid.contains(&self.replication().as_str())
    }

    fn product_name(&self) -> &'static str {
        if self.is_storage_v1() { "Queues" } else { "Queues v2" }
    }

    fn queue_filter(&self, meter: AttributeFilter) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Storage",
            "Storage",
            vec![
                AttributeFilter::exact("productName", self.product_name()),
                AttributeFilter::exact("skuName", format!("Standard {}", self.replication())),
                meter,
            ],
        )
    }

    fn capacity_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Capacity".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_storage_gb,
            product_filter: self.queue_filter(AttributeFilter::exact(
                "meterName",
                format!("{} Data Stored", self.replication()),
            )),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }

    fn operations_cost_component(&self, class: u8, operations: Option<i64>) -> CostComponent {
        CostComponent {
            name: format!("Class {class} operations"),
            unit: "10k operations".to_string(),
            monthly_quantity: operations.map(|ops| Decimal::from(ops) / OPERATIONS_PER_UNIT),
            product_filter: self.queue_filter(AttributeFilter::regex(
                "meterName",
                regex_filter(&format!("Class {class} Operations$")),
            )),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }

    /// Geo-zone-redundant accounts have no class 1 operations meter
    fn operations_cost_components(&self) -> Vec<CostComponent> {
        let mut components = Vec::new();
        if !matches!(self.replication().as_str(), "GZRS" | "RA-GZRS") {
            components.push(self.operations_cost_component(1, self.monthly_class_1_operations));
        }
        components.push(self.operations_cost_component(2, self.monthly_class_2_operations));
        components
    }

    fn geo_replication_cost_component(&self) -> Option<CostComponent> {
        if matches!(self.replication().as_str(), "LRS" | "ZRS") {
            return None;
        }

        Some(CostComponent {
            name: "Geo-replication data transfer".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_geo_replication_data_transfer_gb,
            product_filter: product_filter(
                &self.region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", "Storage - Bandwidth"),
                    AttributeFilter::exact("skuName", "Geo-Replication v2"),
                    AttributeFilter::exact("meterName", "Geo-Replication v2 Data Transfer"),
                ],
            ),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        })
    }
}

impl CoreResource for StorageQueue {
    fn core_type(&self) -> &'static str {
        "StorageQueue"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_storage_gb"),
            UsageItem::int("monthly_class_1_operations"),
            UsageItem::int("monthly_class_2_operations"),
            UsageItem::float("monthly_geo_replication_data_transfer_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_storage_gb = usage.get_decimal("monthly_storage_gb");
        self.monthly_class_1_operations = usage.get_i64("monthly_class_1_operations");
        self.monthly_class_2_operations = usage.get_i64("monthly_class_2_operations");
        self.monthly_geo_replication_data_transfer_gb =
            usage.get_decimal("monthly_geo_replication_data_transfer_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        if !self.is_storage_v1() && !self.is_storage_v2() {
            warn!(
                resource = %self.address,
                account_kind = %self.account_kind,
                "Skipping resource, storage queues are not supported for this account kind"
            );
            return None;
        }

        if !self.replication_supported() {
            warn!(
                resource = %self.address,
                replication = %self.account_replication_type,
                "Skipping resource, storage queues are not supported for this redundancy"
            );
            return None;
        }

        let mut cost_components = vec![self.capacity_cost_component()];
        cost_components.extend(self.operations_cost_components());
        cost_components.extend(self.geo_replication_cost_component());

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
    use serde_json::json;

    fn queue(kind: &str, replication: &str) -> StorageQueue {
        StorageQueue {
            address: "azurerm_storage_queue.jobs".to_string(),
            region: "eastus".to_string(),
            account_kind: kind.to_string(),
            account_replication_type: replication.to_string(),
            ..Default::default()
        }
    }

    fn names(resource: &Resource) -> Vec<&str> {
        resource.cost_components.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_unsupported_accounts_are_skipped() {
        assert!(queue("BlobStorage", "LRS").build_resource().is_none());
        assert!(queue("Storage", "ZRS").build_resource().is_none());
    }

    #[test]
    fn test_lrs_has_no_geo_replication() {
        let resource = queue("StorageV2", "lrs").build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec!["Capacity", "Class 1 operations", "Class 2 operations"]
        );
        let sku =
            &resource.cost_components[0].product_filter.as_ref().unwrap().attribute_filters[1];
        assert_eq!(sku.value.as_deref(), Some("Standard LRS"));
    }

    #[test]
    fn test_gzrs_skips_class_1() {
        let resource = queue("StorageV2", "RA-GZRS").build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec!["Capacity", "Class 2 operations", "Geo-replication data transfer"]
        );
    }

    #[test]
    fn test_class_2_operations_follow_their_own_usage() {
        let mut q = queue("Storage", "GRS");
        let usage = UsageData::from_value(
            "azurerm_storage_queue.jobs",
            &json!({"monthly_class_2_operations": 50000, "monthly_storage_gb": 12.5}),
        )
        .unwrap();
        q.populate_usage(&usage);

        let resource = q.build_resource().unwrap();
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(12.5)));
        assert!(resource.cost_components[1].monthly_quantity.is_none());
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(5)));
        let product =
            &resource.cost_components[0].product_filter.as_ref().unwrap().attribute_filters[0];
        assert_eq!(product.value.as_deref(), Some("Queues"));
    }
}
