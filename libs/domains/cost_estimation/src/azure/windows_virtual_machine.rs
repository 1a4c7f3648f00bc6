use rust_decimal::Decimal;

use super::managed_disk::ManagedDiskData;
use super::virtual_machine::{
    disk_operations, disk_sub_resource, disk_usage_schema, ultra_ssd_reservation_cost_component,
    windows_virtual_machine_cost_component,
};
use crate::schema::{CoreResource, Resource, UsageData, UsageItem};

#[derive(Debug, Clone, Default)]
pub struct WindowsVirtualMachine {
    pub address: String,
    pub region: String,
    pub size: String,
    /// `Windows_Client` or `Windows_Server` for Azure Hybrid Benefit
    pub license_type: Option<String>,
    pub ultra_ssd_enabled: bool,
    pub os_disk: Option<ManagedDiskData>,
    pub is_dev_test: bool,

    pub monthly_hrs: Option<Decimal>,
    pub os_disk_monthly_operations: Option<i64>,
}

impl CoreResource for WindowsVirtualMachine {
    fn core_type(&self) -> &'static str {
        "WindowsVirtualMachine"
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
        let mut cost_components = vec![windows_virtual_machine_cost_component(
            &self.region,
            &self.size,
            self.license_type.as_deref().unwrap_or_default(),
            self.monthly_hrs,
            self.is_dev_test,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_vm_hybrid_benefit() {
        let vm = WindowsVirtualMachine {
            address: "azurerm_windows_virtual_machine.ad".to_string(),
            region: "westeurope".to_string(),
            size: "Standard_D4s_v3".to_string(),
            license_type: Some("Windows_Client".to_string()),
            os_disk: Some(ManagedDiskData::new("Premium_LRS", Some(127))),
            ..Default::default()
        };

        let resource = vm.build_resource().unwrap();

        assert_eq!(
            resource.cost_components[0].name,
            "Instance usage (Windows, hybrid benefit, Standard_D4s_v3)"
        );
        assert_eq!(resource.sub_resources[0].cost_components[0].name, "Storage (P10)");
    }
}
