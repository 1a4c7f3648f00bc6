use rust_decimal::Decimal;
use strum::EnumString;
use tracing::warn;

use super::util::{
    price_filter_consumption, price_filter_tier, product_filter, regex_filter, title_case,
};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

/// Hot capacity tiers: first 50 TB, next 450 TB, then the rest
const HOT_CAPACITY_TIERS: &[(&str, &str)] = &[
    ("Capacity (first 50TB)", "0"),
    ("Capacity (next 450TB)", "51200"),
    ("Capacity (over 500TB)", "512000"),
];
const HOT_CAPACITY_TIER_WIDTHS: &[i64] = &[51200, 460800];

/// Write and read meters on hierarchical namespace accounts, excluding the iterative ones
const NON_ITERATIVE_WRITE_METER: &str = r"(?<!Iterative) Write Operations";
const NON_ITERATIVE_READ_METER: &str = r"(?<!Iterative) Read Operations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum AccountKind {
    Storage,
    StorageV2,
    BlobStorage,
    BlockBlobStorage,
    FileStorage,
}

/// General purpose, blob, block blob or file storage account
#[derive(Debug, Clone, Default)]
pub struct StorageAccount {
    pub address: String,
    pub region: String,
    /// `Hot` or `Cool`; ignored for premium and v1 accounts
    pub access_tier: String,
    pub account_kind: String,
    pub account_replication_type: String,
    /// `Standard` or `Premium`
    pub account_tier: String,
    /// Hierarchical namespace with NFSv3 enabled
    pub nfsv3: bool,

    pub storage_gb: Option<Decimal>,
    pub monthly_iterative_read_operations: Option<i64>,
    pub monthly_read_operations: Option<i64>,
    pub monthly_iterative_write_operations: Option<i64>,
    pub monthly_write_operations: Option<i64>,
    pub monthly_list_and_create_container_operations: Option<i64>,
    pub monthly_other_operations: Option<i64>,
    pub monthly_data_retrieval_gb: Option<Decimal>,
    pub monthly_data_write_gb: Option<Decimal>,
    pub blob_index_tags: Option<i64>,
    pub data_at_rest_storage_gb: Option<Decimal>,
    pub snapshots_storage_gb: Option<Decimal>,
    pub metadata_at_rest_storage_gb: Option<Decimal>,
    pub early_deletion_gb: Option<Decimal>,
}

impl StorageAccount {
    fn kind(&self) -> Option<AccountKind> {
        self.account_kind.parse().ok()
    }

    fn is_kind(&self, kind: AccountKind) -> bool {
        self.kind() == Some(kind)
    }

    fn is_premium(&self) -> bool {
        self.account_tier.eq_ignore_ascii_case("premium")
    }

    fn is_hierarchical_v2(&self) -> bool {
        self.is_kind(AccountKind::StorageV2) && self.nfsv3
    }

    fn replication(&self) -> String {
        self.account_replication_type.to_uppercase()
    }

    /// Access tier used for pricing; premium and v1 accounts have a fixed one
    fn access_tier(&self) -> String {
        if self.is_premium() {
            "Premium".to_string()
        } else if self.is_kind(AccountKind::Storage) {
            "Standard".to_string()
        } else {
            title_case(&self.access_tier)
        }
    }

    fn is_hot(&self) -> bool {
        self.access_tier() == "Hot"
    }

    fn is_hot_lrs(&self) -> bool {
        self.is_hot() && self.replication() == "LRS"
    }

    fn is_cool(&self) -> bool {
        self.access_tier() == "Cool"
    }

    fn is_replication_supported(&self) -> bool {
        let supported: &[&str] = match self.kind() {
            _ if self.is_premium() => &["LRS", "ZRS"],
            Some(AccountKind::BlockBlobStorage) | Some(AccountKind::BlobStorage) => {
                &["LRS", "GRS", "RA-GRS"]
            }
            Some(AccountKind::Storage) => &["LRS", "ZRS", "GRS", "RA-GRS"],
            Some(AccountKind::StorageV2) => &["LRS", "ZRS", "GRS", "RA-GRS", "GZRS", "RA-GZRS"],
            Some(AccountKind::FileStorage) => &["LRS", "GRS", "ZRS"],
            None => return true,
        };
        supported.contains(&self.replication().as_str())
    }

    fn product_name(&self) -> &'static str {
        let premium = self.is_premium();
        match self.kind() {
            Some(AccountKind::Storage) if !premium => "General Block Blob",
            Some(AccountKind::StorageV2) if self.nfsv3 && premium => {
                "Premium Block Blob v2 Hierarchical Namespace"
            }
            Some(AccountKind::StorageV2) if self.nfsv3 => {
                "General Block Blob v2 Hierarchical Namespace"
            }
            Some(AccountKind::StorageV2) if !premium && !self.is_hot_lrs() => {
                "General Block Blob v2"
            }
            Some(AccountKind::FileStorage) if premium => "Premium Files",
            Some(AccountKind::FileStorage) => "Files v2",
            Some(_) if premium => "Premium Block Blob",
            Some(_) => "Blob Storage",
            None => "",
        }
    }

    fn storage_cost_component(
        &self,
        name: &str,
        unit: &str,
        meter: &str,
        monthly_quantity: Option<Decimal>,
    ) -> CostComponent {
        let sku = format!("{} {}", self.access_tier(), self.replication());
        CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity,
            product_filter: product_filter(
                &self.region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", self.product_name()),
                    AttributeFilter::exact("skuName", sku),
                    AttributeFilter::regex("meterName", regex_filter(&format!("{meter}$"))),
                ],
            ),
            price_filter: price_filter_consumption(),
            ignore_if_missing_price: self.is_kind(AccountKind::StorageV2),
            usage_based: true,
            ..Default::default()
        }
    }

    fn operations_cost_component(
        &self,
        name: &str,
        meter: &str,
        operations: Option<i64>,
        per: i64,
        unit: &str,
    ) -> CostComponent {
        let quantity = operations.map(|ops| Decimal::from(ops) / Decimal::from(per));
        self.storage_cost_component(name, unit, meter, quantity)
    }

    fn capacity_cost_components(&self) -> Vec<CostComponent> {
        if self.is_kind(AccountKind::FileStorage) {
            return Vec::new();
        }

        let capacity = |name: &str, start: &str, quantity: Option<Decimal>| CostComponent {
            price_filter: price_filter_tier(start),
            ..self.storage_cost_component(name, "GB", "Data Stored", quantity)
        };

        match self.storage_gb {
            Some(stored) if self.is_hot() => HOT_CAPACITY_TIERS
                .iter()
                .zip(calculate_tier_buckets(stored, HOT_CAPACITY_TIER_WIDTHS))
                .filter(|(_, quantity)| *quantity > Decimal::ZERO)
                .map(|((name, start), quantity)| capacity(name, start, Some(quantity)))
                .collect(),
            stored => vec![capacity("Capacity", "0", stored)],
        }
    }

    /// Files accounts bill stored data, snapshots and metadata separately
    fn file_cost_components(&self) -> Vec<CostComponent> {
        if !self.is_kind(AccountKind::FileStorage) {
            return Vec::new();
        }

        let premium = self.is_premium();
        let (data_meter, snapshot_meter) =
            if premium { ("Provisioned", "Snapshots") } else { ("Data Stored", "Data Stored") };
        let mut components = vec![
            self.storage_cost_component(
                "Data at rest",
                "GB",
                data_meter,
                self.data_at_rest_storage_gb,
            ),
            self.storage_cost_component(
                "Snapshots",
                "GB",
                snapshot_meter,
                self.snapshots_storage_gb,
            ),
        ];
        if !premium {
            components.push(self.storage_cost_component(
                "Metadata at rest",
                "GB",
                "Metadata",
                self.metadata_at_rest_storage_gb,
            ));
        }
        components
    }

    fn operations_cost_components(&self) -> Vec<CostComponent> {
        let mut components = Vec::new();
        if self.is_kind(AccountKind::FileStorage) && self.is_premium() {
            return components;
        }

        let hierarchical = self.is_hierarchical_v2();
        let storage_v1 = self.is_kind(AccountKind::Storage);

        if hierarchical && !self.is_premium() {
            components.push(self.operations_cost_component(
                "Iterative write operations",
                "Iterative Write Operations",
                self.monthly_iterative_write_operations,
                100,
                "100 operations",
            ));
        }

        let write_meter = if hierarchical { NON_ITERATIVE_WRITE_METER } else { "Write Operations" };
        components.push(self.operations_cost_component(
            "Write operations",
            write_meter,
            self.monthly_write_operations,
            10_000,
            "10k operations",
        ));

        if !hierarchical {
            let (name, meter) = if self.is_kind(AccountKind::FileStorage) {
                ("List operations", "List Operations")
            } else {
                ("List and create container operations", "List and Create Container Operations")
            };
            components.push(self.operations_cost_component(
                name,
                meter,
                self.monthly_list_and_create_container_operations,
                10_000,
                "10k operations",
            ));
        }

        if hierarchical && !self.is_premium() {
            components.push(self.operations_cost_component(
                "Iterative read operations",
                "Iterative Read Operations",
                self.monthly_iterative_read_operations,
                10_000,
                "10k operations",
            ));
        }

        let shared_read_meter = ["LRS", "GRS", "RA-GRS"].contains(&self.replication().as_str());
        let read_meter = if storage_v1 && shared_read_meter {
            "(Other|Read) Operations"
        } else if hierarchical {
            NON_ITERATIVE_READ_METER
        } else {
            "Read Operations"
        };
        components.push(self.operations_cost_component(
            "Read operations",
            read_meter,
            self.monthly_read_operations,
            10_000,
            "10k operations",
        ));

        let other_meter = if storage_v1 { "Delete Operations" } else { "Other Operations" };
        components.push(self.operations_cost_component(
            "All other operations",
            other_meter,
            self.monthly_other_operations,
            10_000,
            "10k operations",
        ));

        components
    }

    fn data_access_cost_components(&self) -> Vec<CostComponent> {
        let mut components = Vec::new();
        let cool = self.is_cool();
        let premium = self.is_premium();

        if cool {
            components.push(self.storage_cost_component(
                "Data retrieval",
                "GB",
                "Data Retrieval",
                self.monthly_data_retrieval_gb,
            ));
        }
        if cool && self.is_kind(AccountKind::BlockBlobStorage) {
            components.push(self.storage_cost_component(
                "Data write",
                "GB",
                "Data Write",
                self.monthly_data_write_gb,
            ));
        }

        let index_tags_billed = match self.kind() {
            Some(AccountKind::FileStorage) | Some(AccountKind::Storage) => false,
            Some(AccountKind::BlockBlobStorage) | Some(AccountKind::BlobStorage) => !premium,
            Some(AccountKind::StorageV2) => !self.nfsv3 && !premium,
            None => true,
        };
        if index_tags_billed {
            components.push(self.operations_cost_component(
                "Blob index",
                "Index Tags",
                self.blob_index_tags,
                10_000,
                "10k tags",
            ));
        }

        let early_deletion_billed = cool
            && !matches!(
                self.kind(),
                Some(AccountKind::Storage)
                    | Some(AccountKind::BlockBlobStorage)
                    | Some(AccountKind::BlobStorage)
            );
        if early_deletion_billed {
            components.push(self.storage_cost_component(
                "Early deletion",
                "GB",
                "Early Delete",
                self.early_deletion_gb,
            ));
        }

        components
    }
}

impl CoreResource for StorageAccount {
    fn core_type(&self) -> &'static str {
        "StorageAccount"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("storage_gb"),
            UsageItem::int("monthly_iterative_read_operations"),
            UsageItem::int("monthly_read_operations"),
            UsageItem::int("monthly_iterative_write_operations"),
            UsageItem::int("monthly_write_operations"),
            UsageItem::int("monthly_list_and_create_container_operations"),
            UsageItem::int("monthly_other_operations"),
            UsageItem::float("monthly_data_retrieval_gb"),
            UsageItem::float("monthly_data_write_gb"),
            UsageItem::int("blob_index_tags"),
            UsageItem::float("data_at_rest_storage_gb"),
            UsageItem::float("snapshots_storage_gb"),
            UsageItem::float("metadata_at_rest_storage_gb"),
            UsageItem::float("early_deletion_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.storage_gb = usage.get_decimal("storage_gb");
        self.monthly_iterative_read_operations = usage.get_i64("monthly_iterative_read_operations");
        self.monthly_read_operations = usage.get_i64("monthly_read_operations");
        self.monthly_iterative_write_operations =
            usage.get_i64("monthly_iterative_write_operations");
        self.monthly_write_operations = usage.get_i64("monthly_write_operations");
        self.monthly_list_and_create_container_operations =
            usage.get_i64("monthly_list_and_create_container_operations");
        self.monthly_other_operations = usage.get_i64("monthly_other_operations");
        self.monthly_data_retrieval_gb = usage.get_decimal("monthly_data_retrieval_gb");
        self.monthly_data_write_gb = usage.get_decimal("monthly_data_write_gb");
        self.blob_index_tags = usage.get_i64("blob_index_tags");
        self.data_at_rest_storage_gb = usage.get_decimal("data_at_rest_storage_gb");
        self.snapshots_storage_gb = usage.get_decimal("snapshots_storage_gb");
        self.metadata_at_rest_storage_gb = usage.get_decimal("metadata_at_rest_storage_gb");
        self.early_deletion_gb = usage.get_decimal("early_deletion_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        if !self.is_replication_supported() {
            warn!(
                address = %self.address,
                account_kind = %self.account_kind,
                account_tier = %self.account_tier,
                replication = %self.account_replication_type,
                "Skipping storage account with unsupported redundancy"
            );
            return None;
        }

        let mut cost_components = self.capacity_cost_components();
        cost_components.extend(self.file_cost_components());
        cost_components.extend(self.operations_cost_components());
        cost_components.extend(self.data_access_cost_components());

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
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn account(kind: &str, tier: &str, access_tier: &str, replication: &str) -> StorageAccount {
        StorageAccount {
            address: "azurerm_storage_account.data".to_string(),
            region: "eastus".to_string(),
            access_tier: access_tier.to_string(),
            account_kind: kind.to_string(),
            account_replication_type: replication.to_string(),
            account_tier: tier.to_string(),
            ..Default::default()
        }
    }

    fn names(resource: &Resource) -> Vec<&str> {
        resource.cost_components.iter().map(|c| c.name.as_str()).collect()
    }

    fn attribute(component: &CostComponent, index: usize) -> &AttributeFilter {
        &component.product_filter.as_ref().unwrap().attribute_filters[index]
    }

    #[rstest]
    #[case("StorageV2", "Standard", "Hot", "LRS", "Blob Storage")]
    #[case("StorageV2", "Standard", "Cool", "LRS", "General Block Blob v2")]
    #[case("StorageV2", "Standard", "Hot", "GRS", "General Block Blob v2")]
    #[case("Storage", "Standard", "Hot", "LRS", "General Block Blob")]
    #[case("BlockBlobStorage", "Premium", "Hot", "LRS", "Premium Block Blob")]
    #[case("FileStorage", "Premium", "", "ZRS", "Premium Files")]
    #[case("blobstorage", "Standard", "Cool", "RA-GRS", "Blob Storage")]
    fn test_product_name(
        #[case] kind: &str,
        #[case] tier: &str,
        #[case] access_tier: &str,
        #[case] replication: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(account(kind, tier, access_tier, replication).product_name(), expected);
    }

    #[test]
    fn test_unsupported_redundancy_is_skipped() {
        assert!(account("StorageV2", "Premium", "Hot", "GRS").build_resource().is_none());
        assert!(account("BlobStorage", "Standard", "Hot", "ZRS").build_resource().is_none());
        assert!(account("Unknown", "Standard", "Hot", "ZRS").build_resource().is_some());
    }

    #[test]
    fn test_hot_capacity_is_tiered() {
        let mut account = account("StorageV2", "Standard", "Hot", "LRS");
        account.storage_gb = Some(dec!(100000));
        let resource = account.build_resource().unwrap();

        let capacity: Vec<_> = resource.cost_components[..2]
            .iter()
            .map(|c| (c.name.as_str(), c.monthly_quantity))
            .collect();
        assert_eq!(
            capacity,
            [
                ("Capacity (first 50TB)", Some(dec!(51200))),
                ("Capacity (next 450TB)", Some(dec!(48800))),
            ]
        );
        let next_tier = resource.cost_components[1].price_filter.as_ref().unwrap();
        assert_eq!(next_tier.start_usage_amount.as_deref(), Some("51200"));
        assert!(resource.cost_components[0].ignore_if_missing_price);
    }

    #[test]
    fn test_cool_v2_account_components() {
        let resource = account("StorageV2", "Standard", "cool", "GRS").build_resource().unwrap();

        assert_eq!(
            names(&resource),
            [
                "Capacity",
                "Write operations",
                "List and create container operations",
                "Read operations",
                "All other operations",
                "Data retrieval",
                "Blob index",
                "Early deletion",
            ]
        );
        assert_eq!(
            attribute(&resource.cost_components[0], 1),
            &AttributeFilter::exact("skuName", "Cool GRS")
        );
    }

    #[test]
    fn test_hierarchical_namespace_excludes_iterative_meters() {
        let mut account = account("StorageV2", "Standard", "Hot", "LRS");
        account.nfsv3 = true;
        account.monthly_iterative_write_operations = Some(500);
        let resource = account.build_resource().unwrap();

        assert_eq!(
            names(&resource),
            [
                "Capacity",
                "Iterative write operations",
                "Write operations",
                "Iterative read operations",
                "Read operations",
                "All other operations",
            ]
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(5)));
        assert_eq!(
            attribute(&resource.cost_components[2], 2),
            &AttributeFilter::regex("meterName", "/(?<!Iterative) Write Operations$/i")
        );
        assert_eq!(
            attribute(&resource.cost_components[0], 0),
            &AttributeFilter::exact("productName", "General Block Blob v2 Hierarchical Namespace")
        );
    }

    #[test]
    fn test_v1_account_meters() {
        let resource = account("Storage", "Standard", "Cool", "GRS").build_resource().unwrap();

        let read = &resource.cost_components[3];
        assert_eq!(read.name, "Read operations");
        assert_eq!(
            attribute(read, 2),
            &AttributeFilter::regex("meterName", "/(Other|Read) Operations$/i")
        );
        assert_eq!(attribute(read, 1), &AttributeFilter::exact("skuName", "Standard GRS"));
        assert_eq!(
            attribute(&resource.cost_components[4], 2),
            &AttributeFilter::regex("meterName", "/Delete Operations$/i")
        );
        assert!(!names(&resource).contains(&"Blob index"));
    }

    #[test]
    fn test_premium_file_storage_bills_provisioned_data() {
        let mut account = account("FileStorage", "Premium", "", "LRS");
        account.data_at_rest_storage_gb = Some(dec!(1024));
        let resource = account.build_resource().unwrap();

        assert_eq!(names(&resource), ["Data at rest", "Snapshots"]);
        let data = &resource.cost_components[0];
        assert_eq!(data.monthly_quantity, Some(dec!(1024)));
        assert_eq!(attribute(data, 1), &AttributeFilter::exact("skuName", "Premium LRS"));
        assert_eq!(attribute(data, 2), &AttributeFilter::regex("meterName", "/Provisioned$/i"));
    }
}
