use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_consumption, price_filter_tier, product_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const SMALL_INSTANCE_GB: Decimal = dec!(50);
const LARGE_INSTANCE_GB: Decimal = dec!(500);

/// Backup of a single VM into a recovery services vault.
///
/// Charged a flat monthly fee per protected instance, sized by the data on
/// the VM, plus the storage the backup consumes in the vault.
#[derive(Debug, Clone, Default)]
pub struct BackupProtectedVm {
    pub address: String,
    pub region: String,
    /// Vault redundancy: `LRS`, `ZRS` or `GRS`
    pub storage_type: String,
    pub disk_size_gb: Decimal,

    /// Data actually stored on the VM; defaults to the full disk size
    pub disk_utilization_gb: Option<Decimal>,
    /// Extra data kept in the vault by daily/monthly/yearly retention
    pub additional_backup_retention_gb: Option<Decimal>,
}

impl BackupProtectedVm {
    fn disk_utilization(&self) -> Decimal {
        self.disk_utilization_gb.unwrap_or(self.disk_size_gb)
    }

    fn total_backup_size(&self) -> Decimal {
        (self.disk_utilization() + self.additional_backup_retention_gb.unwrap_or_default()).trunc()
    }

    fn instance_cost_component(&self) -> CostComponent {
        let utilization = self.disk_utilization();

        let (meter, unit, quantity) = if utilization <= SMALL_INSTANCE_GB {
            ("Azure Files Protected Instances", "under 50 GB", Decimal::ONE)
        } else if utilization <= LARGE_INSTANCE_GB {
            ("Azure VM Protected Instances", "under 500 GB", Decimal::ONE)
        } else {
            let increments = (utilization.trunc() / LARGE_INSTANCE_GB).trunc();
            ("Azure VM Protected Instances", "over 500 GB", increments)
        };

        CostComponent {
            name: format!("Instance backup ({unit})"),
            unit: "month".to_string(),
            unit_multiplier: quantity,
            monthly_quantity: Some(quantity),
            product_filter: product_filter(
                &self.region,
                "Backup",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", "Backup"),
                    AttributeFilter::exact("meterName", meter),
                ],
            ),
            price_filter: price_filter_tier("0"),
            usage_based: true,
            ..Default::default()
        }
    }

    fn storage_cost_component(&self) -> CostComponent {
        let data_stored = format!("{} data stored", self.storage_type);

        CostComponent {
            unit: "GB".to_string(),
            monthly_quantity: Some(self.total_backup_size()),
            product_filter: product_filter(
                &self.region,
                "Backup",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", "Backup"),
                    AttributeFilter::exact("skuName", "Standard"),
                    AttributeFilter::regex("meterName", format!("/^{data_stored}/i")),
                ],
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            name: data_stored,
            ..Default::default()
        }
    }
}

impl CoreResource for BackupProtectedVm {
    fn core_type(&self) -> &'static str {
        "BackupProtectedVM"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("disk_utilization_gb"),
            UsageItem::float("additional_backup_retention_gb"),
        ]
    }

    /// Usually called by the owning vault with the VM's merged usage
    fn populate_usage(&mut self, usage: &UsageData) {
        self.disk_utilization_gb = usage.get_decimal("disk_utilization_gb");
        self.additional_backup_retention_gb = usage.get_decimal("additional_backup_retention_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.address.clone(),
            usage_schema: self.usage_schema(),
            cost_components: vec![self.instance_cost_component(), self.storage_cost_component()],
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vm(disk_size_gb: Decimal) -> BackupProtectedVm {
        BackupProtectedVm {
            address: "azurerm_backup_protected_vm.web".to_string(),
            region: "eastus".to_string(),
            storage_type: "GRS".to_string(),
            disk_size_gb,
            ..Default::default()
        }
    }

    #[rstest]
    #[case::small(dec!(30), "Instance backup (under 50 GB)", dec!(1))]
    #[case::boundary_50(dec!(50), "Instance backup (under 50 GB)", dec!(1))]
    #[case::medium(dec!(51), "Instance backup (under 500 GB)", dec!(1))]
    #[case::boundary_500(dec!(500), "Instance backup (under 500 GB)", dec!(1))]
    #[case::large(dec!(1200.7), "Instance backup (over 500 GB)", dec!(2))]
    fn test_instance_backup_tiers(
        #[case] size: Decimal,
        #[case] name: &str,
        #[case] quantity: Decimal,
    ) {
        let resource = vm(size).build_resource().unwrap();
        let instance = &resource.cost_components[0];

        assert_eq!(instance.name, name);
        assert_eq!(instance.monthly_quantity, Some(quantity));
        assert_eq!(instance.unit_multiplier, quantity);
    }

    #[test]
    fn test_small_instance_uses_files_meter() {
        let resource = vm(dec!(10)).build_resource().unwrap();
        let filter = resource.cost_components[0].product_filter.as_ref().unwrap();
        assert!(
            filter
                .attribute_filters
                .contains(&AttributeFilter::exact("meterName", "Azure Files Protected Instances"))
        );
    }

    #[test]
    fn test_storage_includes_retention_and_truncates() {
        let mut backup = vm(dec!(128));
        let usage = UsageData::from_value(
            "x",
            &serde_json::json!({
                "disk_utilization_gb": 40.5,
                "additional_backup_retention_gb": 10.9
            }),
        )
        .unwrap();
        backup.populate_usage(&usage);

        let resource = backup.build_resource().unwrap();
        let storage = &resource.cost_components[1];

        assert_eq!(resource.cost_components[0].name, "Instance backup (under 50 GB)");
        assert_eq!(storage.name, "GRS data stored");
        assert_eq!(storage.monthly_quantity, Some(dec!(51)));
        assert!(
            storage.product_filter.as_ref().unwrap().attribute_filters.contains(
                &AttributeFilter::regex("meterName", "/^GRS data stored/i")
            )
        );
    }

    #[test]
    fn test_defaults_to_disk_size() {
        let resource = vm(dec!(64)).build_resource().unwrap();
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(64)));
        assert_eq!(resource.usage_schema.len(), 2);
    }
}
