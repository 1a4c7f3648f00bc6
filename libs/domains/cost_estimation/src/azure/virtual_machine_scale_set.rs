use rust_decimal::Decimal;

use super::managed_disk::ManagedDiskData;
use super::virtual_machine::{
    disk_operations, disk_sub_resource, disk_usage_schema, linux_virtual_machine_cost_component,
    windows_virtual_machine_cost_component,
};
use crate::schema::{CoreResource, Resource, UsageData, UsageItem};

const DEFAULT_WINDOWS_LICENSE: &str = "Windows_Client";

/// Scale set of identical VMs. Compute and disks are multiplied by the
/// instance count, taken from `instances` usage or the SKU capacity.
#[derive(Debug, Clone, Default)]
pub struct VirtualMachineScaleSet {
    pub address: String,
    pub region: String,
    pub sku_name: String,
    pub sku_capacity: i64,
    pub is_windows: bool,
    pub is_dev_test: bool,
    pub license_type: Option<String>,
    pub os_disk: Option<ManagedDiskData>,
    pub data_disks: Vec<ManagedDiskData>,

    pub instances: Option<i64>,
    pub os_disk_monthly_operations: Option<i64>,
    pub data_disk_monthly_operations: Option<i64>,
}

impl CoreResource for VirtualMachineScaleSet {
    fn core_type(&self) -> &'static str {
        "VirtualMachineScaleSet"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("instances"),
            disk_usage_schema("storage_profile_os_disk"),
            disk_usage_schema("storage_profile_data_disk"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.instances = usage.get_i64("instances");
        self.os_disk_monthly_operations = disk_operations(usage, "storage_profile_os_disk");
        self.data_disk_monthly_operations = disk_operations(usage, "storage_profile_data_disk");
    }

    fn build_resource(&self) -> Option<Resource> {
        let compute = if self.is_windows {
            windows_virtual_machine_cost_component(
                &self.region,
                &self.sku_name,
                self.license_type.as_deref().unwrap_or(DEFAULT_WINDOWS_LICENSE),
                None,
                self.is_dev_test,
            )
        } else {
            linux_virtual_machine_cost_component(&self.region, &self.sku_name, None)
        };

        let mut sub_resources = Vec::new();
        if let Some(os_disk) = &self.os_disk {
            sub_resources.push(disk_sub_resource(
                "storage_os_disk",
                &self.region,
                os_disk,
                self.os_disk_monthly_operations,
            ));
        }
        sub_resources.extend(self.data_disks.iter().map(|disk| {
            disk_sub_resource(
                "storage_data_disk",
                &self.region,
                disk,
                self.data_disk_monthly_operations,
            )
        }));

        let mut resource = Resource {
            name: self.address.clone(),
            cost_components: vec![compute],
            sub_resources,
            usage_schema: self.usage_schema(),
            ..Default::default()
        };

        let capacity = self.instances.unwrap_or(self.sku_capacity);
        resource.multiply_quantities(Decimal::from(capacity));

        Some(resource)
    }
}
