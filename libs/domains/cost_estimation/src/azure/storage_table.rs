use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::util::{price_filter_tier, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const OPERATIONS_PER_UNIT: Decimal = dec!(10000);
const REPLICATION_TYPES: &[&str] = &["LRS", "ZRS", "GRS", "RA-GRS", "GZRS", "RA-GZRS"];

/// Matches `Write Operations` but not `Batch Write Operations`.
/// Look-behind must be fixed width, so a single separator is assumed.
const SINGLE_WRITE_METER: &str = r"(?<!Batch\s)Write";

#[derive(Debug, Clone, Default)]
pub struct StorageTable {
    pub address: String,
    pub region: String,
    pub account_replication_type: String,
    pub has_customer_managed_key: bool,

    pub monthly_storage_gb: Option<Decimal>,
    pub batch_write_operations: Option<i64>,
    pub write_operations: Option<i64>,
    pub read_operations: Option<i64>,
    pub scan_operations: Option<i64>,
    pub list_operations: Option<i64>,
    pub delete_operations: Option<i64>,
}

impl StorageTable {
    fn replication(&self) -> String {
        self.account_replication_type.to_uppercase()
    }

    fn sku_prefix(&self) -> &'static str {
        if self.has_customer_managed_key { "Account Encrypted" } else { "Standard" }
    }

    /// Encrypted geo-zone accounts are stored at geo-redundant prices
    fn capacity_replication(&self) -> String {
        let replication = self.replication();
        match (self.has_customer_managed_key, replication.as_str()) {
            (true, "GZRS") => "GRS".to_string(),
            (true, "RA-GZRS") => "RA-GRS".to_string(),
            _ => replication,
        }
    }

    fn capacity_cost_component(&self) -> CostComponent {
        let replication = self.capacity_replication();
        let sku = format!("{} {replication}", self.sku_prefix());
        CostComponent {
            name: "Capacity".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_storage_gb,
            product_filter: product_filter(
                &self.region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", "Tables"),
                    AttributeFilter::exact("skuName", sku),
                    AttributeFilter::exact("meterName", format!("{replication} Data Stored")),
                ],
            ),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }

    fn operations_cost_component(&self, operation: &str, operations: Option<i64>) -> CostComponent {
        let is_write = operation == "Write" || operation == "Batch Write";
        let read_priced =
            !self.has_customer_managed_key && self.replication() == "RA-GZRS" && is_write;

        let meter = if read_priced {
            "Read"
        } else if operation == "Write" {
            SINGLE_WRITE_METER
        } else {
            operation
        };
        let sku = format!("{} {}", self.sku_prefix(), self.replication());
        let meter = regex_filter(&format!("{meter} Operations$"));

        CostComponent {
            name: format!("{operation} operations"),
            unit: "10k operations".to_string(),
            monthly_quantity: operations.map(|ops| Decimal::from(ops) / OPERATIONS_PER_UNIT),
            product_filter: product_filter(
                &self.region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", "Tables"),
                    AttributeFilter::exact("skuName", sku),
                    AttributeFilter::regex("meterName", meter),
                ],
            ),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for StorageTable {
    fn core_type(&self) -> &'static str {
        "StorageTable"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_storage_gb"),
            UsageItem::int("batch_write_operations"),
            UsageItem::int("write_operations"),
            UsageItem::int("read_operations"),
            UsageItem::int("scan_operations"),
            UsageItem::int("list_operations"),
            UsageItem::int("delete_operations"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_storage_gb = usage.get_decimal("monthly_storage_gb");
        self.batch_write_operations = usage.get_i64("batch_write_operations");
        self.write_operations = usage.get_i64("write_operations");
        self.read_operations = usage.get_i64("read_operations");
        self.scan_operations = usage.get_i64("scan_operations");
        self.list_operations = usage.get_i64("list_operations");
        self.delete_operations = usage.get_i64("delete_operations");
    }

    fn build_resource(&self) -> Option<Resource> {
        if !REPLICATION_TYPES.contains(&self.replication().as_str()) {
            warn!(
                resource = %self.address,
                replication = %self.account_replication_type,
                "Skipping resource, storage tables are not supported for this redundancy"
            );
            return None;
        }

        let operations = [
            ("Batch Write", self.batch_write_operations),
            ("Write", self.write_operations),
            ("Read", self.read_operations),
            ("Scan", self.scan_operations),
            ("List", self.list_operations),
            ("Delete", self.delete_operations),
        ];

        let mut cost_components = vec![self.capacity_cost_component()];
        cost_components.extend(
            operations
                .into_iter()
                .map(|(operation, quantity)| self.operations_cost_component(operation, quantity)),
        );

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
