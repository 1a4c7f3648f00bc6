use rust_decimal::Decimal;

use super::util::{price_filter_tier, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const OPERATIONS_PER_UNIT: i64 = 10_000;

/// Azure Files share, priced by the storage account's access tier and replication
#[derive(Debug, Clone, Default)]
pub struct StorageShare {
    pub address: String,
    pub region: String,
    pub account_replication_type: String,
    /// `Hot`, `Cool`, `TransactionOptimized` or `Premium`
    pub access_tier: String,
    /// Provisioned size in GB, billed for premium shares
    pub quota: i64,

    pub storage_gb: Option<Decimal>,
    pub monthly_read_operations: Option<i64>,
    pub monthly_write_operations: Option<i64>,
    pub monthly_list_operations: Option<i64>,
    pub monthly_other_operations: Option<i64>,
    pub monthly_data_retrieval_gb: Option<Decimal>,
    pub snapshots_storage_gb: Option<Decimal>,
    pub metadata_at_rest_storage_gb: Option<Decimal>,
}

impl StorageShare {
    /// Pricing tier name; unknown tiers map to an empty string
    fn tier(&self) -> &'static str {
        match self.access_tier.to_lowercase().as_str() {
            "hot" => "Hot",
            "cool" => "Cool",
            "transactionoptimized" => "Standard",
            "premium" => "Premium",
            _ => "",
        }
    }

    fn is_premium(&self) -> bool {
        self.tier() == "Premium"
    }

    fn share_cost_component(
        &self,
        name: &str,
        unit: &str,
        meter: &str,
        monthly_quantity: Option<Decimal>,
    ) -> CostComponent {
        let product = if self.is_premium() { "Premium Files" } else { "Files v2" };
        let sku = format!("{} {}", self.tier(), self.account_replication_type.to_uppercase());
        CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity,
            product_filter: product_filter(
                &self.region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", product),
                    AttributeFilter::exact("skuName", sku),
                    AttributeFilter::regex("meterName", regex_filter(&format!("{meter}$"))),
                ],
            ),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }

    fn operations_cost_component(
        &self,
        name: &str,
        meter: &str,
        ops: Option<i64>,
    ) -> CostComponent {
        let quantity = ops.map(|ops| Decimal::from(ops) / Decimal::from(OPERATIONS_PER_UNIT));
        self.share_cost_component(name, "10k operations", meter, quantity)
    }
}

impl CoreResource for StorageShare {
    fn core_type(&self) -> &'static str {
        "StorageShare"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("storage_gb"),
            UsageItem::int("monthly_read_operations"),
            UsageItem::int("monthly_write_operations"),
            UsageItem::int("monthly_list_operations"),
            UsageItem::int("monthly_other_operations"),
            UsageItem::float("monthly_data_retrieval_gb"),
            UsageItem::float("snapshots_storage_gb"),
            UsageItem::float("metadata_at_rest_storage_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.storage_gb = usage.get_decimal("storage_gb");
        self.monthly_read_operations = usage.get_i64("monthly_read_operations");
        self.monthly_write_operations = usage.get_i64("monthly_write_operations");
        self.monthly_list_operations = usage.get_i64("monthly_list_operations");
        self.monthly_other_operations = usage.get_i64("monthly_other_operations");
        self.monthly_data_retrieval_gb = usage.get_decimal("monthly_data_retrieval_gb");
        self.snapshots_storage_gb = usage.get_decimal("snapshots_storage_gb");
        self.metadata_at_rest_storage_gb = usage.get_decimal("metadata_at_rest_storage_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let tier = self.tier();
        let premium = self.is_premium();

        let stored = self
            .storage_gb
            .or_else(|| premium.then(|| Decimal::from(self.quota)));
        let (data_meter, snapshot_meter) =
            if premium { ("Provisioned", "Snapshots") } else { ("Data Stored", "Data Stored") };

        let mut cost_components = vec![
            self.share_cost_component("Data at rest", "GB", data_meter, stored),
            self.share_cost_component("Snapshots", "GB", snapshot_meter, self.snapshots_storage_gb),
        ];

        if tier != "Premium" && tier != "Standard" {
            cost_components.push(self.share_cost_component(
                "Metadata at rest",
                "GB",
                "Metadata",
                self.metadata_at_rest_storage_gb,
            ));
        }

        if !premium {
            let other_meter =
                if tier == "Standard" { "Protocol Operations" } else { "Other Operations" };
            cost_components.extend([
                self.operations_cost_component(
                    "Read operations",
                    "Read Operations",
                    self.monthly_read_operations,
                ),
                self.operations_cost_component(
                    "Write operations",
                    "Write Operations",
                    self.monthly_write_operations,
                ),
                self.operations_cost_component(
                    "List operations",
                    "List Operations",
                    self.monthly_list_operations,
                ),
                self.operations_cost_component(
                    "Other operations",
                    other_meter,
                    self.monthly_other_operations,
                ),
            ]);
        }

        let retrieval_billed = !matches!(tier, "Premium" | "Standard" | "Hot")
            && !self.account_replication_type.eq_ignore_ascii_case("GZRS");
        if retrieval_billed {
            cost_components.push(self.share_cost_component(
                "Data retrieval",
                "GB",
                "Data Retrieval",
                self.monthly_data_retrieval_gb,
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
