use rust_decimal::Decimal;

use super::managed_disk::ManagedDiskData;
use super::virtual_machine::{
    disk_operations, disk_sub_resource, disk_usage_schema, linux_virtual_machine_cost_component,
    ultra_ssd_reservation_cost_component,
};
use crate::schema::{CoreResource, Resource, UsageData, UsageItem};

#[derive(Debug, Clone, Default)]
pub struct LinuxVirtualMachine {
    pub address: String,
    pub region: String,
    pub size: String,
    pub ultra_ssd_enabled: bool,
    pub os_disk: Option<ManagedDiskData>,

    pub monthly_hrs: Option<Decimal>,
    pub os_disk_monthly_operations: Option<i64>,
}

impl CoreResource for LinuxVirtualMachine {
    fn core_type(&self) -> &'static str {
        "LinuxVirtualMachine"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_hrs"), disk_usage_schema("os_disk")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_hrs = usage.get_decimal("monthly_hrs");
        self.os_disk_monthly_operations = disk_operations(usage, "os_disk");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = vec![linux_virtual_machine_cost_component(
            &self.region,
            &self.size,
            self.monthly_hrs,
        )];
        if self.ultra_ssd_enabled {
            cost_components.push(ultra_ssd_reservation_cost_component(&self.region));
        }

        let sub_resources = self
            .os_disk
            .iter()
            .map(|disk| {
                disk_sub_resource("os_disk", &self.region, disk, self.os_disk_monthly_operations)
            })
            .collect();

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            sub_resources,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
